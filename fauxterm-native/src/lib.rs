//! Native backends for fauxterm consoles.
//!
//! [`create_terminal_console`] draws a console into the controlling terminal
//! through `crossterm`, writing only the cells that changed since the last
//! refresh. [`create_window_console`] opens an OpenGL 3.3 window through
//! `winit` and `glutin` and draws every layer as textured quads.
//!
//! Both attach the console to a [`Context`](fauxterm_core::Context) and
//! return its id; input from either ends up in the context's event queue.

mod config;
mod error;
mod terminal;
mod window;
mod window_system;

pub use config::{LayerInfo, TerminalConfig, WindowConfig};
pub use error::Error;
pub use fauxterm_core::ConsoleId;
pub use terminal::{create_terminal_console, restore_terminal};
pub use window::create_window_console;

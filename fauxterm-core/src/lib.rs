//! Layered tile console engine.
//!
//! A [`Console`] is a grid of tiles drawn through a stack of [`Layer`]s. How
//! it is presented is up to its [`Backend`]: the [`Compositor`] turns layers
//! into a minimal stream of changed cells for character terminals, and the
//! [`gl`] module batches them into textured quads for a GPU window. A
//! [`Context`] owns the consoles and collects their input into one
//! [`EventQueue`].

mod backend;
mod color;
mod compositor;
mod console;
mod context;
mod error;
mod event;
mod frame_limiter;
pub mod gl;
mod layer;
mod mat4;
mod viewport;

pub use backend::{Backend, WindowControls};
pub use color::{CellColors, ColorPairs, ColorResolver, TerminalCaps, negotiate_color_modes};
pub use compositor::{Cell, CellWriter, Compositor, RenderStats};
pub use console::Console;
pub use context::{ConsoleMut, Context};
pub use error::Error;
pub use event::{
    Action, ConsoleId, Event, EventKind, EventQueue, EventSink, Key, Modifiers, MouseButton,
};
pub use fauxterm_data::{Color, ColorMode, Font, FontError, FontId, Rgba};
pub use frame_limiter::FrameLimiter;
pub use gl::{GlConsoleRenderer, GlState};
pub use layer::{Layer, LayerCommand, Tile};
pub use mat4::Mat4;
pub use viewport::Viewport;

/// GL shader language target for version injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlslVersion {
    /// OpenGL ES 3.0: `#version 300 es`
    Es300,
    /// OpenGL 3.3 Core: `#version 330 core`
    Gl330,
}

impl GlslVersion {
    /// Header prepended to vertex shader sources.
    #[must_use]
    pub fn vertex_preamble(&self) -> &'static str {
        match self {
            Self::Es300 => "#version 300 es\nprecision highp float;\n",
            Self::Gl330 => "#version 330 core\n",
        }
    }

    /// Header prepended to fragment shader sources.
    #[must_use]
    pub fn fragment_preamble(&self) -> &'static str {
        match self {
            Self::Es300 => "#version 300 es\nprecision mediump float;\n",
            Self::Gl330 => "#version 330 core\n",
        }
    }
}

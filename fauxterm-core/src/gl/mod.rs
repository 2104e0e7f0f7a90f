//! OpenGL rendering of consoles through `glow`.

mod batch;
mod buffer;
mod console_renderer;
mod context;
mod program;
mod renderer;
mod texture;

pub use batch::{BatchStats, Vertex, build_layer_vertices};
use buffer::*;
pub use console_renderer::{FrameStats, GlConsoleRenderer};
pub use context::GlState;
pub(crate) use program::*;
pub use renderer::{Drawable, RenderContext};

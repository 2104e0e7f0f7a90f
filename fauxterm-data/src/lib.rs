//! Fonts, glyph tables, colors and text decoding for the fauxterm tile
//! console. Nothing in this crate touches a GPU or a terminal.

mod color;
mod descriptor;
mod error;
mod font;
mod glyph;
mod glyph_table;
mod image;
pub mod utf8;

pub use color::{Color, ColorMode, Rgba};
pub use descriptor::{FontDescriptor, GlyphEntry};
pub use error::FontError;
pub use font::{Font, FontId};
pub use glyph::{Glyph, TexRect};
pub use glyph_table::{GlyphTable, fnv1a_64};
pub use image::{FontImage, ImagePage};

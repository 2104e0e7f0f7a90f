use std::mem::offset_of;

use fauxterm_data::{Color, Font, Glyph};
use glow::HasContext;

use crate::{
    Error, Layer, LayerCommand,
    gl::{Drawable, RenderContext, buffer_upload_array},
};

/// One corner of a glyph quad, as consumed by the tile shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    /// Position in normalized device coordinates
    pub pos: [f32; 2],
    /// Texture coordinates and texture page
    pub uvp: [f32; 3],
    /// Foreground color, normalized RGBA
    pub fg: [f32; 4],
    /// Background color, normalized RGBA
    pub bg: [f32; 4],
}

/// Outcome of batching one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchStats {
    /// Quads emitted
    pub quads: usize,
    /// Cells skipped for lack of a glyph
    pub missing_glyphs: usize,
}

impl BatchStats {
    /// Number of vertices emitted.
    #[must_use]
    pub fn vertices(&self) -> usize {
        self.quads * 6
    }
}

mod attrib {
    pub const POS: u32 = 0;
    pub const UVP: u32 = 1;
    pub const FG: u32 = 2;
    pub const BG: u32 = 3;
}

/// Expands a layer's commands into two triangles per drawn cell.
///
/// A layer cell measures `2 / (tiles * divisor)` in normalized device units
/// on each axis, with cell `(0, 0)` at the top-left corner. Fills cover the
/// whole layer grid. Cells whose codepoint has neither a glyph nor a
/// fallback glyph are skipped.
///
/// `out` is cleared first; its allocation is reused across frames.
pub fn build_layer_vertices(
    layer: &Layer,
    font: &Font,
    console_tiles: (usize, usize),
    out: &mut Vec<Vertex>,
) -> BatchStats {
    out.clear();

    let (div_x, div_y) = layer.divisor();
    let grid = (console_tiles.0 as f64 * div_x, console_tiles.1 as f64 * div_y);
    let mut stats = BatchStats::default();
    if grid.0 <= 0.0 || grid.1 <= 0.0 {
        return stats;
    }

    let quad = QuadBuilder { cell_wh: ((2.0 / grid.0) as f32, (2.0 / grid.1) as f32) };
    let mut emit = |x: u32, y: u32, codepoint: u32, fg: &Color, bg: &Color| {
        match font.glyph_or_fallback(codepoint) {
            Some(glyph) => {
                quad.push(out, (x, y), glyph, fg, bg);
                stats.quads += 1;
            },
            None => stats.missing_glyphs += 1,
        }
    };

    let (cols, rows) = (grid.0.ceil() as u32, grid.1.ceil() as u32);
    for command in layer.commands() {
        match command {
            LayerCommand::Fill { codepoint, fg, bg } => {
                for y in 0..rows {
                    for x in 0..cols {
                        emit(x, y, *codepoint, fg, bg);
                    }
                }
            },
            LayerCommand::Tile(tile) => {
                emit(tile.pos.0, tile.pos.1, tile.codepoint, &tile.fg, &tile.bg);
            },
        }
    }

    stats
}

struct QuadBuilder {
    cell_wh: (f32, f32),
}

impl QuadBuilder {
    fn push(&self, out: &mut Vec<Vertex>, pos: (u32, u32), glyph: &Glyph, fg: &Color, bg: &Color) {
        let (w, h) = self.cell_wh;
        let left = pos.0 as f32 * w - 1.0;
        let top = 1.0 - pos.1 as f32 * h;
        let right = left + w * glyph.tiles_wh.0 as f32;
        let bottom = top - h * glyph.tiles_wh.1 as f32;

        let tex = glyph.tex;
        let page = glyph.page as f32;
        let (fg, bg) = (fg.rgba.to_f32_array(), bg.rgba.to_f32_array());
        let vertex = |pos: [f32; 2], u: f32, v: f32| Vertex { pos, uvp: [u, v, page], fg, bg };

        #[rustfmt::skip]
        out.extend_from_slice(&[
            vertex([left,  top],    tex.s, tex.p), // top-left
            vertex([right, top],    tex.t, tex.p), // top-right
            vertex([left,  bottom], tex.s, tex.q), // bottom-left
            vertex([right, top],    tex.t, tex.p), // top-right
            vertex([right, bottom], tex.t, tex.q), // bottom-right
            vertex([left,  bottom], tex.s, tex.q), // bottom-left
        ]);
    }
}

/// Vertex array, vertex buffer and CPU-side vertices of one layer.
#[derive(Debug)]
#[must_use = "call `delete(gl)` before dropping to avoid GPU resource leaks"]
pub(crate) struct LayerBatch {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertices: Vec<Vertex>,
}

impl LayerBatch {
    pub(crate) fn new(gl: &glow::Context) -> Result<Self, Error> {
        let vao =
            unsafe { gl.create_vertex_array() }.map_err(Error::vertex_array_creation_failed)?;
        unsafe { gl.bind_vertex_array(Some(vao)) };

        let vbo = match unsafe { gl.create_buffer() } {
            Ok(vbo) => vbo,
            Err(e) => {
                unsafe {
                    gl.bind_vertex_array(None);
                    gl.delete_vertex_array(vao);
                }
                return Err(Error::buffer_creation_failed("layer-vertices", e));
            },
        };

        unsafe { gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo)) };

        // vertex attributes, captured by the bound VAO
        let stride = size_of::<Vertex>() as i32;
        enable_vertex_attrib(gl, attrib::POS, 2, offset_of!(Vertex, pos), stride);
        enable_vertex_attrib(gl, attrib::UVP, 3, offset_of!(Vertex, uvp), stride);
        enable_vertex_attrib(gl, attrib::FG, 4, offset_of!(Vertex, fg), stride);
        enable_vertex_attrib(gl, attrib::BG, 4, offset_of!(Vertex, bg), stride);

        unsafe {
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }

        Ok(Self { vao, vbo, vertices: Vec::new() })
    }

    /// Rebuilds the vertices from `layer` and uploads them in full.
    pub(crate) fn update(
        &mut self,
        gl: &glow::Context,
        layer: &Layer,
        font: &Font,
        console_tiles: (usize, usize),
    ) -> BatchStats {
        let stats = build_layer_vertices(layer, font, console_tiles, &mut self.vertices);

        unsafe {
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            buffer_upload_array(gl, glow::ARRAY_BUFFER, &self.vertices, glow::STREAM_DRAW);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }

        stats
    }

    pub(crate) fn delete(self, gl: &glow::Context) {
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
        }
    }
}

fn enable_vertex_attrib(gl: &glow::Context, index: u32, size: i32, offset: usize, stride: i32) {
    unsafe {
        gl.enable_vertex_attrib_array(index);
        gl.vertex_attrib_pointer_f32(index, size, glow::FLOAT, false, stride, offset as i32);
    }
}

impl Drawable for LayerBatch {
    fn prepare(&self, context: &mut RenderContext) -> Result<(), Error> {
        unsafe { context.gl.bind_vertex_array(Some(self.vao)) };
        Ok(())
    }

    fn draw(&self, context: &mut RenderContext) {
        let count = self.vertices.len() as i32;
        unsafe { context.gl.draw_arrays(glow::TRIANGLES, 0, count) };
    }

    fn cleanup(&self, context: &mut RenderContext) {
        unsafe { context.gl.bind_vertex_array(None) };
    }
}

#[cfg(test)]
mod tests {
    use fauxterm_data::{FontDescriptor, FontImage, ImagePage};

    use super::*;

    const FG: Color = Color::WHITE;
    const BG: Color = Color::BLACK;

    /// 32x16 single page: 'A' in the left half, 'B' in the right half.
    fn font() -> Font {
        let text = "test\n16 16 alpha\n0 16 0 16 0 65\n16 32 0 16 0 66\n";
        let descriptor = FontDescriptor::parse(text).unwrap();
        let page = ImagePage::from_rgba(32, 16, vec![0; 32 * 16 * 4]).unwrap();
        Font::from_parts(descriptor, FontImage::from_pages(vec![page]).unwrap()).unwrap()
    }

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-6 && (a[1] - b[1]).abs() < 1e-6
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(size_of::<Vertex>(), 13 * 4);
        assert_eq!(offset_of!(Vertex, uvp), 8);
        assert_eq!(offset_of!(Vertex, fg), 20);
        assert_eq!(offset_of!(Vertex, bg), 36);
    }

    #[test]
    fn test_single_tile_quad() {
        let font = font();
        let mut layer = Layer::new();
        layer.push_codepoint('B' as u32, (1, 0), FG, BG);

        let mut out = Vec::new();
        let stats = build_layer_vertices(&layer, &font, (4, 2), &mut out);
        assert_eq!(stats, BatchStats { quads: 1, missing_glyphs: 0 });
        assert_eq!(out.len(), stats.vertices());

        // 4x2 grid: a tile is 0.5 wide, 1.0 tall
        let corners: Vec<[f32; 2]> = out.iter().map(|v| v.pos).collect();
        let expected = [[-0.5, 1.0], [0.0, 1.0], [-0.5, 0.0], [0.0, 1.0], [0.0, 0.0], [-0.5, 0.0]];
        for (got, want) in corners.iter().zip(expected) {
            assert!(close(*got, want), "{got:?} != {want:?}");
        }

        let uvs: Vec<[f32; 3]> = out.iter().map(|v| v.uvp).collect();
        assert_eq!(uvs[0], [0.5, 0.0, 0.0]);
        assert_eq!(uvs[4], [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_colors_are_normalized() {
        let font = font();
        let mut layer = Layer::new();
        let fg = Color::from_rgba(255, 0, 51, 255);
        layer.push_codepoint('A' as u32, (0, 0), fg, BG);

        let mut out = Vec::new();
        build_layer_vertices(&layer, &font, (1, 1), &mut out);
        assert!(out.iter().all(|v| v.fg == [1.0, 0.0, 0.2, 1.0]));
        assert!(out.iter().all(|v| v.bg == [0.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_divisor_shrinks_cells() {
        let font = font();
        let mut layer = Layer::new();
        layer.set_divisor((2.0, 2.0));
        layer.push_codepoint('A' as u32, (1, 1), FG, BG);

        let mut out = Vec::new();
        build_layer_vertices(&layer, &font, (2, 2), &mut out);
        // 4x4 layer grid: cell (1, 1) spans x -0.5..0.0 and y 0.5..0.0
        assert!(close(out[0].pos, [-0.5, 0.5]));
        assert!(close(out[4].pos, [0.0, 0.0]));
    }

    #[test]
    fn test_fill_covers_layer_grid() {
        let font = font();
        let mut layer = Layer::new();
        layer.set_divisor((2.0, 1.0));
        layer.fill('A' as u32, FG, BG);

        let mut out = Vec::new();
        let stats = build_layer_vertices(&layer, &font, (3, 2), &mut out);
        assert_eq!(stats.quads, 6 * 2);
    }

    #[test]
    fn test_missing_glyph_skipped_or_fallback() {
        let mut layer = Layer::new();
        layer.push_text("AzB", (0, 0), 0, 0, FG, BG);

        let mut out = Vec::new();
        let stats = build_layer_vertices(&layer, &font(), (3, 1), &mut out);
        assert_eq!(stats, BatchStats { quads: 2, missing_glyphs: 1 });
        assert_eq!(out.len(), 12);

        let font = font().with_fallback('A' as u32);
        let stats = build_layer_vertices(&layer, &font, (3, 1), &mut out);
        assert_eq!(stats, BatchStats { quads: 3, missing_glyphs: 0 });
        assert_eq!(out.len(), 18);
    }

    #[test]
    fn test_output_is_reused() {
        let font = font();
        let mut layer = Layer::new();
        layer.fill('A' as u32, FG, BG);

        let mut out = Vec::new();
        build_layer_vertices(&layer, &font, (10, 10), &mut out);
        let capacity = out.capacity();

        layer.clear();
        layer.push_codepoint('A' as u32, (0, 0), FG, BG);
        build_layer_vertices(&layer, &font, (10, 10), &mut out);
        assert_eq!(out.len(), 6);
        assert_eq!(out.capacity(), capacity);
    }

    #[test]
    fn test_empty_grid_emits_nothing() {
        let font = font();
        let mut layer = Layer::new();
        layer.fill('A' as u32, FG, BG);

        let mut out = Vec::new();
        assert_eq!(build_layer_vertices(&layer, &font, (0, 0), &mut out), BatchStats::default());
        assert!(out.is_empty());
    }
}

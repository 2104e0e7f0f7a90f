use std::rc::Rc;

use glow::HasContext;

use crate::{
    Console, Error, GlslVersion, Mat4,
    gl::{
        Drawable, GlState, RenderContext, ShaderProgram,
        batch::LayerBatch,
        texture::FontTextureCache,
    },
};

/// Totals of one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Layers that produced at least one draw call
    pub layers_drawn: usize,
    /// Vertices drawn across all layers
    pub vertices: usize,
    /// Cells skipped for lack of a glyph
    pub missing_glyphs: usize,
}

/// Draws every layer of a [`Console`] as textured quads.
///
/// Each layer gets its own vertex batch, rebuilt and re-uploaded every frame.
/// Font textures are uploaded on first use and shared between layers using
/// the same font. Must be released with [`delete`] while the GL context is
/// still current.
///
/// [`delete`]: GlConsoleRenderer::delete
#[derive(Debug)]
#[must_use = "call `delete(gl)` before dropping to avoid GPU resource leaks"]
pub struct GlConsoleRenderer {
    shader: ShaderProgram,
    transform_loc: glow::UniformLocation,
    sampler_loc: glow::UniformLocation,
    batches: Vec<LayerBatch>,
    textures: FontTextureCache,
}

impl GlConsoleRenderer {
    const VERTEX_GLSL: &'static str = include_str!("../shaders/tile.vert");
    const FRAGMENT_GLSL: &'static str = include_str!("../shaders/tile.frag");

    /// Compiles the tile shader and allocates a vertex batch per layer.
    ///
    /// # Errors
    /// Returns an error if the shader fails to build or a GL object cannot
    /// be created.
    pub fn new(gl: &glow::Context, layer_count: usize, glsl: GlslVersion) -> Result<Self, Error> {
        let vertex_source = format!("{}{}", glsl.vertex_preamble(), Self::VERTEX_GLSL);
        let fragment_source = format!("{}{}", glsl.fragment_preamble(), Self::FRAGMENT_GLSL);
        let shader = ShaderProgram::create(gl, &vertex_source, &fragment_source)?;

        let (transform_loc, sampler_loc) = match uniform_locations(gl, &shader) {
            Ok(locations) => locations,
            Err(e) => {
                shader.delete(gl);
                return Err(e);
            },
        };

        let mut renderer = Self {
            shader,
            transform_loc,
            sampler_loc,
            batches: Vec::with_capacity(layer_count),
            textures: FontTextureCache::default(),
        };

        if let Err(e) = renderer.ensure_batches(gl, layer_count) {
            renderer.delete(gl);
            return Err(e);
        }

        tracing::debug!(layers = layer_count, ?glsl, "console renderer created");
        Ok(renderer)
    }

    fn ensure_batches(&mut self, gl: &glow::Context, layer_count: usize) -> Result<(), Error> {
        while self.batches.len() < layer_count {
            self.batches.push(LayerBatch::new(gl)?);
        }
        Ok(())
    }

    /// Renders one frame and consumes the console's queued commands.
    ///
    /// The framebuffer is cleared to the console's pending fill, or opaque
    /// black, then each layer with a font and queued commands is drawn in
    /// index order under `transform`. Layers without a font are emptied
    /// without drawing.
    ///
    /// # Errors
    /// Returns an error if a font texture or layer batch cannot be created.
    pub fn render(
        &mut self,
        gl: &glow::Context,
        state: &mut GlState,
        console: &mut Console,
        framebuffer_px: (u32, u32),
        transform: &Mat4,
    ) -> Result<FrameStats, Error> {
        self.ensure_batches(gl, console.layer_count())?;

        let clear = console
            .take_fill()
            .map_or([0.0, 0.0, 0.0, 1.0], |fill| fill.rgba.to_f32_array());
        state
            .viewport(gl, 0, 0, framebuffer_px.0 as i32, framebuffer_px.1 as i32)
            .clear_color(gl, clear)
            .blend_func(gl, glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA)
            .active_texture(gl, glow::TEXTURE0);
        unsafe { gl.clear(glow::COLOR_BUFFER_BIT) };

        self.shader.use_program(gl);
        unsafe {
            gl.uniform_matrix_4_f32_slice(Some(&self.transform_loc), false, &transform.data);
            gl.uniform_1_i32(Some(&self.sampler_loc), 0);
        }

        let tiles = console.tile_wh();
        let mut frame = FrameStats::default();
        let mut result = Ok(());

        for (layer, batch) in console.layers_mut().iter_mut().zip(&mut self.batches) {
            let Some(font) = layer.font().map(Rc::clone) else {
                layer.clear();
                continue;
            };
            if layer.is_empty() {
                continue;
            }

            let stats = batch.update(gl, layer, &font, tiles);
            layer.clear();
            frame.vertices += stats.vertices();
            frame.missing_glyphs += stats.missing_glyphs;
            if stats.quads == 0 {
                continue;
            }

            let texture = match self.textures.get_or_upload(gl, &font) {
                Ok(texture) => texture,
                Err(e) => {
                    result = Err(e);
                    break;
                },
            };
            texture.bind(gl);

            let mut context = RenderContext { gl, state: &mut *state };
            if let Err(e) = batch.prepare(&mut context) {
                result = Err(e);
                break;
            }
            batch.draw(&mut context);
            batch.cleanup(&mut context);
            frame.layers_drawn += 1;
        }

        unsafe {
            gl.bind_texture(glow::TEXTURE_2D_ARRAY, None);
            gl.use_program(None);
        }
        result?;

        tracing::trace!(
            layers = frame.layers_drawn,
            vertices = frame.vertices,
            missing = frame.missing_glyphs,
            textures = self.textures.len(),
            "console rendered"
        );
        Ok(frame)
    }

    /// Releases every GL object owned by this renderer.
    pub fn delete(mut self, gl: &glow::Context) {
        for batch in self.batches.drain(..) {
            batch.delete(gl);
        }
        self.textures.delete(gl);
        self.shader.delete(gl);
    }
}

fn uniform_locations(
    gl: &glow::Context,
    shader: &ShaderProgram,
) -> Result<(glow::UniformLocation, glow::UniformLocation), Error> {
    Ok((
        shader.uniform_location(gl, "u_transform")?,
        shader.uniform_location(gl, "u_sampler")?,
    ))
}

use glow::HasContext;

/// Caches GL state so repeated frames skip redundant state changes.
#[derive(Debug)]
pub struct GlState {
    // [x, y, width, height]
    viewport: [i32; 4],
    clear_color: [f32; 4],
    blend_enabled: bool,
    // (src_factor, dst_factor)
    blend_func: (u32, u32),
    active_texture_unit: u32,
}

impl GlState {
    /// Creates a cache matching a fresh context's defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            viewport: [0, 0, 0, 0],
            clear_color: [0.0, 0.0, 0.0, 0.0],
            blend_enabled: false,
            blend_func: (glow::ONE, glow::ZERO),
            active_texture_unit: glow::TEXTURE0,
        }
    }

    /// Sets the GL viewport if it changed.
    pub fn viewport(
        &mut self,
        gl: &glow::Context,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> &mut Self {
        let new_viewport = [x, y, width, height];
        if self.viewport != new_viewport {
            unsafe { gl.viewport(x, y, width, height) };
            self.viewport = new_viewport;
        }
        self
    }

    /// Sets the clear color if it changed.
    pub fn clear_color(&mut self, gl: &glow::Context, rgba: [f32; 4]) -> &mut Self {
        if self.clear_color != rgba {
            unsafe { gl.clear_color(rgba[0], rgba[1], rgba[2], rgba[3]) };
            self.clear_color = rgba;
        }
        self
    }

    /// Enables blending with the given factors.
    pub fn blend_func(&mut self, gl: &glow::Context, src: u32, dst: u32) -> &mut Self {
        if !self.blend_enabled {
            unsafe { gl.enable(glow::BLEND) };
            self.blend_enabled = true;
        }
        if self.blend_func != (src, dst) {
            unsafe { gl.blend_func(src, dst) };
            self.blend_func = (src, dst);
        }
        self
    }

    /// Selects the active texture unit if it changed.
    pub fn active_texture(&mut self, gl: &glow::Context, texture_unit: u32) -> &mut Self {
        if self.active_texture_unit != texture_unit {
            unsafe { gl.active_texture(texture_unit) };
            self.active_texture_unit = texture_unit;
        }
        self
    }

    /// Resets tracked state to GL defaults. Viewport and clear color are left
    /// alone since every frame sets them.
    pub fn reset(&mut self, gl: &glow::Context) {
        if self.blend_enabled {
            unsafe { gl.disable(glow::BLEND) };
            self.blend_enabled = false;
        }

        if self.blend_func != (glow::ONE, glow::ZERO) {
            unsafe { gl.blend_func(glow::ONE, glow::ZERO) };
            self.blend_func = (glow::ONE, glow::ZERO);
        }

        if self.active_texture_unit != glow::TEXTURE0 {
            unsafe { gl.active_texture(glow::TEXTURE0) };
            self.active_texture_unit = glow::TEXTURE0;
        }
    }
}

impl Default for GlState {
    fn default() -> Self {
        Self::new()
    }
}

use crate::Mat4;

/// Window-fit and user pan/zoom transforms of a windowed console.
///
/// The base transform maps the fixed tile grid onto the top-left of the
/// framebuffer at one framebuffer pixel per tile pixel. The viewport
/// transform is applied on top of it, so the uploaded matrix is
/// `viewport × base`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    translation: (f32, f32),
    scale: (f32, f32),
    base: Mat4,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            translation: (0.0, 0.0),
            scale: (1.0, 1.0),
            base: Mat4::IDENTITY,
        }
    }
}

impl Viewport {
    /// Recomputes the base transform for a grid of `grid_px` pixels shown
    /// in a framebuffer of `framebuffer_px` pixels.
    pub fn update_base(&mut self, grid_px: (f64, f64), framebuffer_px: (u32, u32)) {
        if framebuffer_px.0 == 0 || framebuffer_px.1 == 0 {
            return;
        }

        let sx = (grid_px.0 / f64::from(framebuffer_px.0)) as f32;
        let sy = (grid_px.1 / f64::from(framebuffer_px.1)) as f32;
        self.base = Mat4::translate_scale((-1.0 + sx, 1.0 - sy), (sx, sy));
    }

    /// Sets the user transform: NDC translation and scale.
    pub fn transform(&mut self, translation: (f32, f32), scale: (f32, f32)) {
        self.translation = translation;
        self.scale = scale;
    }

    /// Restores the identity user transform.
    pub fn reset(&mut self) {
        self.translation = (0.0, 0.0);
        self.scale = (1.0, 1.0);
    }

    /// User pan in normalized device units.
    #[must_use]
    pub fn translation(&self) -> (f32, f32) {
        self.translation
    }

    /// User zoom per axis.
    #[must_use]
    pub fn scale(&self) -> (f32, f32) {
        self.scale
    }

    /// Transform placing the grid in the top-left of the framebuffer.
    #[must_use]
    pub fn base(&self) -> &Mat4 {
        &self.base
    }

    /// The matrix uploaded to the vertex stage.
    #[must_use]
    pub fn combined(&self) -> Mat4 {
        Mat4::translate_scale(self.translation, self.scale) * self.base
    }

    /// Maps a cursor position in window pixels to console tiles, undoing
    /// the user transform.
    #[must_use]
    pub fn cursor_tile_pos(
        &self,
        cursor_px: (f64, f64),
        tile_px: (u32, u32),
        console_tiles: (usize, usize),
    ) -> (f64, f64) {
        if tile_px.0 == 0 || tile_px.1 == 0 {
            return (0.0, 0.0);
        }

        let tile_x = cursor_px.0 / f64::from(tile_px.0);
        let tile_y = cursor_px.1 / f64::from(tile_px.1);

        let trans_x = f64::from(self.translation.0) * console_tiles.0 as f64 / 2.0;
        let trans_y = -f64::from(self.translation.1) * console_tiles.1 as f64 / 2.0;

        (
            (tile_x - trans_x) / f64::from(self.scale.0),
            (tile_y - trans_y) / f64::from(self.scale.1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_fills_matching_framebuffer() {
        let mut viewport = Viewport::default();
        viewport.update_base((640.0, 480.0), (640, 480));
        assert_eq!(*viewport.base(), Mat4::IDENTITY);
    }

    #[test]
    fn test_base_anchors_grid_top_left() {
        let mut viewport = Viewport::default();
        viewport.update_base((400.0, 300.0), (800, 600));

        let m = viewport.combined();
        // NDC corners of the grid land in the top-left quadrant
        assert_eq!(m.transform_point(-1.0, 1.0), (-1.0, 1.0));
        assert_eq!(m.transform_point(1.0, -1.0), (0.0, 0.0));
    }

    #[test]
    fn test_zero_framebuffer_keeps_base() {
        let mut viewport = Viewport::default();
        viewport.update_base((400.0, 300.0), (0, 600));
        assert_eq!(*viewport.base(), Mat4::IDENTITY);
    }

    #[test]
    fn test_combined_is_viewport_times_base() {
        let mut viewport = Viewport::default();
        viewport.update_base((400.0, 300.0), (800, 600));
        viewport.transform((0.5, 0.0), (2.0, 2.0));

        let expected = Mat4::translate_scale((0.5, 0.0), (2.0, 2.0)) * *viewport.base();
        assert_eq!(viewport.combined(), expected);

        viewport.reset();
        assert_eq!(viewport.combined(), *viewport.base());
    }

    #[test]
    fn test_cursor_tile_pos_inverts_user_transform() {
        let mut viewport = Viewport::default();
        assert_eq!(viewport.cursor_tile_pos((80.0, 48.0), (8, 16), (80, 25)), (10.0, 3.0));

        // shift right by a quarter of NDC width (10 tiles), zoom 2x
        viewport.transform((0.25, 0.0), (2.0, 2.0));
        assert_eq!(viewport.cursor_tile_pos((160.0, 64.0), (8, 16), (80, 25)), (5.0, 2.0));
    }
}

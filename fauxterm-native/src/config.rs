use std::rc::Rc;

use compact_str::CompactString;
use fauxterm_data::{ColorMode, Font};

/// Settings for a console backed by the real terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalConfig {
    layer_count: usize,
    fg_mode: ColorMode,
    bg_mode: ColorMode,
    mouse_capture: bool,
    frame_limit: Option<f64>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            layer_count: 1,
            fg_mode: ColorMode::Ansi256,
            bg_mode: ColorMode::Ansi256,
            mouse_capture: true,
            frame_limit: None,
        }
    }
}

impl TerminalConfig {
    /// Default settings: one layer, 256 colors, mouse captured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of layers; composited bottom to top.
    #[must_use]
    pub fn layer_count(mut self, layer_count: usize) -> Self {
        self.layer_count = layer_count;
        self
    }

    /// Requested color mode for both sides. The terminal may grant less.
    #[must_use]
    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.fg_mode = mode;
        self.bg_mode = mode;
        self
    }

    /// Requested foreground color mode.
    #[must_use]
    pub fn fg_mode(mut self, mode: ColorMode) -> Self {
        self.fg_mode = mode;
        self
    }

    /// Requested background color mode.
    #[must_use]
    pub fn bg_mode(mut self, mode: ColorMode) -> Self {
        self.bg_mode = mode;
        self
    }

    /// Reports mouse buttons, motion and wheel; on by default.
    #[must_use]
    pub fn mouse_capture(mut self, enabled: bool) -> Self {
        self.mouse_capture = enabled;
        self
    }

    /// Caps refresh rate at `fps` frames per second.
    #[must_use]
    pub fn frame_limit(mut self, fps: f64) -> Self {
        self.frame_limit = Some(fps);
        self
    }

    pub(crate) fn layers(&self) -> usize {
        self.layer_count
    }

    pub(crate) fn requested_modes(&self) -> (ColorMode, ColorMode) {
        (self.fg_mode, self.bg_mode)
    }

    pub(crate) fn captures_mouse(&self) -> bool {
        self.mouse_capture
    }

    pub(crate) fn fps(&self) -> Option<f64> {
        self.frame_limit
    }
}

/// Font and size of one window layer.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    /// Glyph source; a layer without a font draws nothing
    pub font: Option<Rc<Font>>,
    /// Subdivision of a base tile into layer tiles
    pub divisor: (f64, f64),
}

impl LayerInfo {
    /// A layer drawn with `font` at full tile size.
    #[must_use]
    pub fn new(font: Rc<Font>) -> Self {
        Self { font: Some(font), divisor: (1.0, 1.0) }
    }

    /// Splits each tile into `divisor` cells per axis; values below 1 count as 1.
    #[must_use]
    pub fn with_divisor(mut self, divisor: (f64, f64)) -> Self {
        self.divisor = divisor;
        self
    }
}

/// Settings for a console presented in an OpenGL window.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    tile_pixel_wh: (u32, u32),
    layers: Vec<LayerInfo>,
    color_mode: ColorMode,
    title: CompactString,
    vsync: bool,
    frame_limit: Option<f64>,
}

impl WindowConfig {
    /// A window whose base tile is `tile_pixel_wh` pixels, with no layers
    /// until [`WindowConfig::layer`] adds them.
    #[must_use]
    pub fn new(tile_pixel_wh: (u32, u32)) -> Self {
        Self {
            tile_pixel_wh,
            layers: Vec::new(),
            color_mode: ColorMode::TrueColorAlpha,
            title: CompactString::const_new("fauxterm"),
            vsync: true,
            frame_limit: None,
        }
    }

    /// Appends a layer above the existing ones.
    #[must_use]
    pub fn layer(mut self, layer: LayerInfo) -> Self {
        self.layers.push(layer);
        self
    }

    /// Color mode of the rendered tiles.
    #[must_use]
    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    /// Window title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = CompactString::new(title);
        self
    }

    /// Waits for the display's vertical blank on swap; on by default.
    #[must_use]
    pub fn vsync(mut self, enabled: bool) -> Self {
        self.vsync = enabled;
        self
    }

    /// Caps refreshes at `fps` frames per second.
    #[must_use]
    pub fn frame_limit(mut self, fps: f64) -> Self {
        self.frame_limit = Some(fps);
        self
    }

    pub(crate) fn tile_px(&self) -> (u32, u32) {
        self.tile_pixel_wh
    }

    pub(crate) fn layer_infos(&self) -> &[LayerInfo] {
        &self.layers
    }

    pub(crate) fn mode(&self) -> ColorMode {
        self.color_mode
    }

    pub(crate) fn window_title(&self) -> &str {
        &self.title
    }

    pub(crate) fn uses_vsync(&self) -> bool {
        self.vsync
    }

    pub(crate) fn fps(&self) -> Option<f64> {
        self.frame_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_config_defaults() {
        let config = TerminalConfig::default();
        assert_eq!(config.layers(), 1);
        assert!(config.captures_mouse());
        assert_eq!(config.fps(), None);
        assert_eq!(config.requested_modes(), (ColorMode::Ansi256, ColorMode::Ansi256));
    }

    #[test]
    fn test_terminal_config_builder() {
        let config = TerminalConfig::new()
            .layer_count(3)
            .color_mode(ColorMode::Ansi16)
            .bg_mode(ColorMode::Ansi8)
            .mouse_capture(false)
            .frame_limit(30.0);

        assert_eq!(config.layers(), 3);
        assert_eq!(config.requested_modes(), (ColorMode::Ansi16, ColorMode::Ansi8));
        assert!(!config.captures_mouse());
        assert_eq!(config.fps(), Some(30.0));
    }

    #[test]
    fn test_window_config_builder() {
        let config = WindowConfig::new((8, 16))
            .title("rain")
            .vsync(false)
            .color_mode(ColorMode::Ansi256)
            .frame_limit(60.0);

        assert_eq!(config.tile_px(), (8, 16));
        assert_eq!(config.window_title(), "rain");
        assert!(!config.uses_vsync());
        assert_eq!(config.mode(), ColorMode::Ansi256);
        assert_eq!(config.fps(), Some(60.0));
        assert!(config.layer_infos().is_empty());
    }

    #[test]
    fn test_window_config_defaults() {
        let config = WindowConfig::new((10, 10));
        assert_eq!(config.window_title(), "fauxterm");
        assert!(config.uses_vsync());
        assert_eq!(config.mode(), ColorMode::TrueColorAlpha);
    }
}

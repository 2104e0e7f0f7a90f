use std::rc::Rc;

use fauxterm_data::{Color, ColorMode, Font};

use crate::{FrameLimiter, Layer};

/// The addressable rendering surface: a fixed set of layers over a grid of
/// base tiles.
///
/// A console knows nothing about how it is presented. Backends read its
/// layers on refresh and update its tile size on resize.
#[derive(Debug)]
pub struct Console {
    layers: Vec<Layer>,
    tile_wh: (usize, usize),
    fg_mode: ColorMode,
    bg_mode: ColorMode,
    is_real_terminal: bool,
    fill: Option<Color>,
    frame_limiter: Option<FrameLimiter>,
}

impl Console {
    /// Creates a console with `layer_count` empty layers, each without a
    /// font and with a 1x1 divisor.
    #[must_use]
    pub fn new(
        layer_count: usize,
        tile_wh: (usize, usize),
        color_mode: ColorMode,
        is_real_terminal: bool,
    ) -> Self {
        Self {
            layers: (0..layer_count).map(|_| Layer::new()).collect(),
            tile_wh,
            fg_mode: color_mode,
            bg_mode: color_mode,
            is_real_terminal,
            fill: None,
            frame_limiter: None,
        }
    }

    /// Uses separate foreground and background color modes.
    #[must_use]
    pub fn with_color_modes(mut self, fg_mode: ColorMode, bg_mode: ColorMode) -> Self {
        self.fg_mode = fg_mode;
        self.bg_mode = bg_mode;
        self
    }

    /// Empties every layer and drops the pending fill.
    pub fn clear(&mut self) {
        self.layers.iter_mut().for_each(Layer::clear);
        self.fill = None;
    }

    /// Fills the whole surface with `color` on the next refresh.
    pub fn fill(&mut self, color: Color) {
        self.fill = Some(color);
    }

    /// Background fill recorded for the next refresh.
    #[must_use]
    pub fn pending_fill(&self) -> Option<Color> {
        self.fill
    }

    /// Consumes the pending fill.
    pub fn take_fill(&mut self) -> Option<Color> {
        self.fill.take()
    }

    /// Sets the font of layer `i`, emptying it. Out-of-range indices are
    /// ignored.
    pub fn set_layer_font(&mut self, i: usize, font: Option<Rc<Font>>) {
        if let Some(layer) = self.layers.get_mut(i) {
            layer.set_font(font);
        }
    }

    /// Sets the sub-tile divisor of layer `i`, emptying it. An axis below 1
    /// is treated as 1. Out-of-range indices are ignored.
    pub fn set_layer_divisor(&mut self, i: usize, divisor: (f64, f64)) {
        if let Some(layer) = self.layers.get_mut(i) {
            layer.set_divisor(divisor);
        }
    }

    /// Layer `i`, bottom first.
    #[must_use]
    pub fn layer(&self, i: usize) -> Option<&Layer> {
        self.layers.get(i)
    }

    /// Layer `i` for drawing.
    pub fn layer_mut(&mut self, i: usize) -> Option<&mut Layer> {
        self.layers.get_mut(i)
    }

    /// All layers, bottom first.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// All layers, bottom first, for drawing.
    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Grid size in base tiles.
    #[must_use]
    pub fn tile_wh(&self) -> (usize, usize) {
        self.tile_wh
    }

    /// Updates the grid size; called by backends on resize.
    pub fn set_tile_wh(&mut self, tile_wh: (usize, usize)) {
        self.tile_wh = tile_wh;
    }

    /// The effective color mode, the higher of the foreground and
    /// background modes.
    #[must_use]
    pub fn color_mode(&self) -> ColorMode {
        self.fg_mode.max(self.bg_mode)
    }

    /// Foreground and background color modes.
    #[must_use]
    pub fn color_modes(&self) -> (ColorMode, ColorMode) {
        (self.fg_mode, self.bg_mode)
    }

    /// Whether this console is presented on a character terminal.
    #[must_use]
    pub fn is_real_terminal(&self) -> bool {
        self.is_real_terminal
    }

    /// Caps presentation at `fps` frames per second, or removes the cap.
    pub fn set_frame_limit(&mut self, fps: Option<f64>) {
        self.frame_limiter = fps.map(FrameLimiter::new);
    }

    /// The frame limiter, if a frame limit is set.
    pub fn frame_limiter_mut(&mut self) -> Option<&mut FrameLimiter> {
        self.frame_limiter.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_console_layers_are_default() {
        let console = Console::new(3, (80, 25), ColorMode::Ansi16, true);
        assert_eq!(console.layer_count(), 3);
        for layer in console.layers() {
            assert!(layer.is_empty());
            assert!(layer.font().is_none());
            assert_eq!(layer.divisor(), (1.0, 1.0));
        }
        assert_eq!(console.color_modes(), (ColorMode::Ansi16, ColorMode::Ansi16));
        assert!(console.is_real_terminal());
    }

    #[test]
    fn test_clear_empties_layers_and_fill() {
        let mut console = Console::new(2, (10, 10), ColorMode::TrueColor, false);
        console.fill(Color::BLACK);
        for layer in console.layers_mut() {
            layer.push_codepoint('a' as u32, (1, 1), Color::WHITE, Color::BLACK);
        }

        console.clear();
        assert!(console.layers().iter().all(Layer::is_empty));
        assert_eq!(console.pending_fill(), None);
    }

    #[test]
    fn test_fill_is_deferred() {
        let mut console = Console::new(1, (4, 4), ColorMode::Ansi8, true);
        console.fill(Color::WHITE);
        assert!(console.layers()[0].is_empty());
        assert_eq!(console.take_fill(), Some(Color::WHITE));
        assert_eq!(console.pending_fill(), None);
    }

    #[test]
    fn test_layer_setters_clear_only_that_layer() {
        let mut console = Console::new(2, (4, 4), ColorMode::Ansi8, true);
        for layer in console.layers_mut() {
            layer.push_codepoint('a' as u32, (0, 0), Color::WHITE, Color::BLACK);
        }

        console.set_layer_divisor(1, (2.0, 2.0));
        assert_eq!(console.layer(0).unwrap().len(), 1);
        assert!(console.layer(1).unwrap().is_empty());

        console.set_layer_font(0, None);
        assert!(console.layer(0).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_layer_is_ignored() {
        let mut console = Console::new(1, (4, 4), ColorMode::Ansi8, true);
        console.set_layer_divisor(5, (2.0, 2.0));
        console.set_layer_font(5, None);
        assert!(console.layer(5).is_none());
        assert!(console.layer_mut(1).is_none());
    }

    #[test]
    fn test_split_color_modes() {
        let console = Console::new(1, (4, 4), ColorMode::NoColors, true)
            .with_color_modes(ColorMode::Ansi256, ColorMode::Ansi8);
        assert_eq!(console.color_modes(), (ColorMode::Ansi256, ColorMode::Ansi8));
        assert_eq!(console.color_mode(), ColorMode::Ansi256);
    }
}

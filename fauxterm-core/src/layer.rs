use std::rc::Rc;

use fauxterm_data::{Color, Font, utf8};

const INITIAL_CAPACITY: usize = 64;

/// One drawable grid cell, queued for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Grid position in layer tiles
    pub pos: (u32, u32),
    /// Unicode scalar value to draw
    pub codepoint: u32,
    /// Foreground (glyph) color
    pub fg: Color,
    /// Background color
    pub bg: Color,
}

/// A draw directive queued on a [`Layer`].
///
/// Commands are applied in queue order, so a later command at the same
/// cell overrides an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerCommand {
    /// Covers every cell of the layer.
    Fill {
        /// Unicode scalar value to draw in every cell
        codepoint: u32,
        /// Foreground color
        fg: Color,
        /// Background color
        bg: Color,
    },
    /// Draws a single cell.
    Tile(Tile),
}

/// An independently fonted and scaled stack of draw commands.
///
/// A layer holds no state across frames beyond its font and divisor: its
/// command list is emptied by [`Layer::clear`] and whenever the font or
/// divisor changes.
#[derive(Debug, Clone)]
pub struct Layer {
    font: Option<Rc<Font>>,
    divisor: (f64, f64),
    commands: Vec<LayerCommand>,
}

impl Default for Layer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer {
    /// Creates an empty layer with no font and a 1x1 divisor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            font: None,
            divisor: (1.0, 1.0),
            commands: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Queues `codepoint` at `pos`. Negative positions are dropped.
    pub fn push_codepoint(&mut self, codepoint: u32, pos: (i32, i32), fg: Color, bg: Color) {
        let (Ok(x), Ok(y)) = (u32::try_from(pos.0), u32::try_from(pos.1)) else {
            return;
        };
        self.push(LayerCommand::Tile(Tile { pos: (x, y), codepoint, fg, bg }));
    }

    /// Queues UTF-8 `text` starting at `pos`.
    ///
    /// `\n` moves to the start of the next row and `\r` is ignored. A
    /// non-zero `wrap_width` wraps to the next row once that many columns
    /// are filled; a non-zero `max_height` stops all output once that many
    /// rows are used. Malformed UTF-8 is drawn as U+FFFD.
    pub fn push_text(
        &mut self,
        text: impl AsRef<[u8]>,
        pos: (i32, i32),
        wrap_width: u32,
        max_height: u32,
        fg: Color,
        bg: Color,
    ) {
        let (mut col, mut row) = (0_u32, 0_u32);
        let exhausted = |row: u32| max_height > 0 && row >= max_height;

        for codepoint in utf8::codepoints(text.as_ref()) {
            if exhausted(row) {
                break;
            }

            match codepoint {
                0x0a => {
                    col = 0;
                    row += 1;
                    continue;
                },
                0x0d => continue,
                _ => {},
            }

            if wrap_width > 0 && col >= wrap_width {
                col = 0;
                row += 1;
                if exhausted(row) {
                    break;
                }
            }

            let x = pos.0.saturating_add_unsigned(col);
            let y = pos.1.saturating_add_unsigned(row);
            self.push_codepoint(codepoint, (x, y), fg, bg);
            col += 1;
        }
    }

    /// Queues a fill covering every cell of this layer.
    pub fn fill(&mut self, codepoint: u32, fg: Color, bg: Color) {
        self.push(LayerCommand::Fill { codepoint, fg, bg });
    }

    fn push(&mut self, command: LayerCommand) {
        if self.commands.len() == self.commands.capacity() {
            let additional = self.commands.capacity().max(INITIAL_CAPACITY);
            if self.commands.try_reserve(additional).is_err() {
                tracing::warn!(queued = self.commands.len(), "layer command storage exhausted");
                return;
            }
        }
        self.commands.push(command);
    }

    /// Drops every queued command, keeping the storage.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Queued commands in draw order.
    #[must_use]
    pub fn commands(&self) -> &[LayerCommand] {
        &self.commands
    }

    /// Queued single-cell tiles in draw order, skipping fills.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.commands.iter().filter_map(|command| match command {
            LayerCommand::Tile(tile) => Some(tile),
            LayerCommand::Fill { .. } => None,
        })
    }

    /// Number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Font the layer is drawn with in a window.
    #[must_use]
    pub fn font(&self) -> Option<&Rc<Font>> {
        self.font.as_ref()
    }

    /// Sub-tile divisor; each axis is at least 1.
    #[must_use]
    pub fn divisor(&self) -> (f64, f64) {
        self.divisor
    }

    pub(crate) fn set_font(&mut self, font: Option<Rc<Font>>) {
        self.font = font;
        self.clear();
    }

    pub(crate) fn set_divisor(&mut self, divisor: (f64, f64)) {
        let clamp = |d: f64| if d >= 1.0 { d } else { 1.0 };
        self.divisor = (clamp(divisor.0), clamp(divisor.1));
        self.clear();
    }

    pub(crate) fn take_commands(&mut self) -> std::vec::Drain<'_, LayerCommand> {
        self.commands.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FG: Color = Color::WHITE;
    const BG: Color = Color::BLACK;

    fn placed(layer: &Layer) -> Vec<(char, (u32, u32))> {
        layer
            .tiles()
            .map(|t| (char::from_u32(t.codepoint).unwrap(), t.pos))
            .collect()
    }

    #[test]
    fn test_negative_position_dropped() {
        let mut layer = Layer::new();
        layer.push_codepoint('x' as u32, (-1, 0), FG, BG);
        layer.push_codepoint('x' as u32, (0, -5), FG, BG);
        assert!(layer.is_empty());

        layer.push_codepoint('x' as u32, (0, 0), FG, BG);
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn test_text_newline() {
        let mut layer = Layer::new();
        layer.push_text("ab\ncd", (0, 0), 0, 0, FG, BG);
        assert_eq!(
            placed(&layer),
            vec![('a', (0, 0)), ('b', (1, 0)), ('c', (0, 1)), ('d', (1, 1))]
        );
    }

    #[test]
    fn test_text_wrap_width() {
        let mut layer = Layer::new();
        layer.push_text("abcdef", (0, 0), 3, 0, FG, BG);
        assert_eq!(
            placed(&layer),
            vec![
                ('a', (0, 0)),
                ('b', (1, 0)),
                ('c', (2, 0)),
                ('d', (0, 1)),
                ('e', (1, 1)),
                ('f', (2, 1)),
            ]
        );
    }

    #[test]
    fn test_text_max_height_stops_output() {
        let mut layer = Layer::new();
        layer.push_text("abcdefg", (2, 3), 3, 2, FG, BG);
        assert_eq!(placed(&layer).len(), 6);
        assert_eq!(layer.tiles().last().unwrap().pos, (4, 4));

        let mut layer = Layer::new();
        layer.push_text("ab\ncd\nef", (0, 0), 0, 2, FG, BG);
        assert_eq!(placed(&layer).len(), 4);
    }

    #[test]
    fn test_text_ignores_carriage_return() {
        let mut layer = Layer::new();
        layer.push_text("a\r\nb", (0, 0), 0, 0, FG, BG);
        assert_eq!(placed(&layer), vec![('a', (0, 0)), ('b', (0, 1))]);
    }

    #[test]
    fn test_text_offscreen_prefix_is_dropped() {
        let mut layer = Layer::new();
        layer.push_text("abc", (-2, 0), 0, 0, FG, BG);
        assert_eq!(placed(&layer), vec![('c', (0, 0))]);
    }

    #[test]
    fn test_text_malformed_utf8() {
        let mut layer = Layer::new();
        layer.push_text([b'a', 0xff, b'b'], (0, 0), 0, 0, FG, BG);
        let codepoints: Vec<u32> = layer.tiles().map(|t| t.codepoint).collect();
        assert_eq!(codepoints, vec![0x61, utf8::REPLACEMENT, 0x62]);
    }

    #[test]
    fn test_storage_grows_past_initial_capacity() {
        let mut layer = Layer::new();
        for i in 0..1000 {
            layer.push_codepoint('#' as u32, (i, 0), FG, BG);
        }
        assert_eq!(layer.len(), 1000);
        assert_eq!(layer.tiles().nth(999).unwrap().pos, (999, 0));
    }

    #[test]
    fn test_divisor_clamped_and_layer_cleared() {
        let mut layer = Layer::new();
        layer.fill(' ' as u32, FG, BG);
        layer.set_divisor((0.0, 2.0));
        assert_eq!(layer.divisor(), (1.0, 2.0));
        assert!(layer.is_empty());
    }

    #[test]
    fn test_fractional_and_nan_divisor_clamp_to_one() {
        let mut layer = Layer::new();
        layer.set_divisor((0.5, 0.25));
        assert_eq!(layer.divisor(), (1.0, 1.0));

        layer.set_divisor((f64::NAN, -3.0));
        assert_eq!(layer.divisor(), (1.0, 1.0));

        layer.set_divisor((1.5, 4.0));
        assert_eq!(layer.divisor(), (1.5, 4.0));
    }

    #[test]
    fn test_fill_is_not_a_tile() {
        let mut layer = Layer::new();
        layer.fill('.' as u32, FG, BG);
        layer.push_codepoint('x' as u32, (1, 1), FG, BG);
        assert_eq!(layer.len(), 2);
        assert_eq!(layer.tiles().count(), 1);
        assert!(matches!(layer.commands()[0], LayerCommand::Fill { .. }));
    }
}

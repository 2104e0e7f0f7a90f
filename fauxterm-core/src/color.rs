use fauxterm_data::ColorMode;

use crate::Cell;

/// Default foreground palette index (ANSI white).
const DEFAULT_FG: u8 = 7;
/// Default background palette index (ANSI black).
const DEFAULT_BG: u8 = 0;

/// Palette indices and color pair of one resolved cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellColors {
    /// Foreground palette index
    pub fg_index: u8,
    /// Background palette index
    pub bg_index: u8,
    /// Color pair number; `0` is the terminal's default colors
    pub pair: u32,
}

impl CellColors {
    /// Whether this is the terminal's default white-on-black pair.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.pair == 0
    }
}

/// Maps cell colors to palette indices and pair numbers for a palette-indexed
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorResolver {
    fg_mode: ColorMode,
    bg_mode: ColorMode,
}

impl ColorResolver {
    /// Resolves foreground and background through their own modes.
    #[must_use]
    pub fn new(fg_mode: ColorMode, bg_mode: ColorMode) -> Self {
        Self { fg_mode, bg_mode }
    }

    /// Whether any color attributes are written at all.
    #[must_use]
    pub fn has_colors(&self) -> bool {
        self.fg_mode != ColorMode::NoColors || self.bg_mode != ColorMode::NoColors
    }

    /// Resolves a cell's colors. A side in [`ColorMode::NoColors`] keeps the
    /// terminal default.
    #[must_use]
    pub fn resolve(&self, cell: &Cell) -> CellColors {
        let fg_index = self.fg_mode.index_of(&cell.fg).unwrap_or(DEFAULT_FG);
        let bg_index = self.bg_mode.index_of(&cell.bg).unwrap_or(DEFAULT_BG);
        CellColors { fg_index, bg_index, pair: self.pair_index(fg_index, bg_index) }
    }

    /// Pair number for a foreground/background index pair:
    /// `bg * fg_count + fg`.
    ///
    /// White on black is pair `0`, the terminal default. Black on black
    /// takes the slot white on black leaves free, so pair numbers stay
    /// unique.
    #[must_use]
    pub fn pair_index(&self, fg: u8, bg: u8) -> u32 {
        match (fg, bg) {
            (DEFAULT_FG, DEFAULT_BG) => 0,
            (DEFAULT_BG, DEFAULT_BG) => u32::from(DEFAULT_FG),
            _ => u32::from(bg) * self.fg_count() + u32::from(fg),
        }
    }

    fn fg_count(&self) -> u32 {
        self.fg_mode.palette_size().max(8)
    }
}

/// Lazily populated table of the color pairs a terminal has seen, indexed by
/// pair number. Pair `0` always holds the default colors.
#[derive(Debug, Clone)]
pub struct ColorPairs {
    pairs: Vec<Option<(u8, u8)>>,
}

impl Default for ColorPairs {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorPairs {
    /// An empty table with pair 0 reserved.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: vec![Some((DEFAULT_FG, DEFAULT_BG))] }
    }

    /// Records `colors` under its pair number. Returns `true` the first time
    /// a pair is seen.
    pub fn register(&mut self, colors: &CellColors) -> bool {
        let index = colors.pair as usize;
        if index >= self.pairs.len() {
            self.pairs.resize(index + 1, None);
        }

        let slot = &mut self.pairs[index];
        let is_new = slot.is_none();
        *slot = Some((colors.fg_index, colors.bg_index));
        is_new
    }

    /// The (fg, bg) indices registered for `pair`.
    #[must_use]
    pub fn get(&self, pair: u32) -> Option<(u8, u8)> {
        self.pairs.get(pair as usize).copied().flatten()
    }

    /// Number of registered pairs, including the default pair.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.iter().filter(|p| p.is_some()).count()
    }

    /// Whether no pair has been allocated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Color capabilities reported by a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCaps {
    /// Number of palette colors
    pub colors: u32,
    /// Number of color pairs
    pub color_pairs: u32,
}

impl TerminalCaps {
    /// Capabilities reporting `colors` colors and `color_pairs` pairs.
    #[must_use]
    pub fn new(colors: u32, color_pairs: u32) -> Self {
        Self { colors, color_pairs }
    }

    /// Reads the capabilities of the controlling terminal from `NO_COLOR`,
    /// `COLORTERM` and `TERM`.
    #[must_use]
    pub fn detect() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        let caps = Self::from_env_vars(
            var("NO_COLOR").as_deref(),
            var("COLORTERM").as_deref(),
            var("TERM").as_deref(),
        );
        tracing::debug!(colors = caps.colors, pairs = caps.color_pairs, "detected terminal colors");
        caps
    }

    /// Derives capabilities from environment variable values.
    #[must_use]
    pub fn from_env_vars(
        no_color: Option<&str>,
        colorterm: Option<&str>,
        term: Option<&str>,
    ) -> Self {
        if no_color.is_some_and(|v| !v.is_empty()) {
            return Self::new(0, 0);
        }

        if colorterm.is_some_and(|v| matches!(v, "truecolor" | "24bit")) {
            return Self::new(256, 65_536);
        }

        match term.unwrap_or_default() {
            "" | "dumb" => Self::new(0, 0),
            t if t.contains("256color") || t.contains("direct") => Self::new(256, 65_536),
            t if t.contains("16color") => Self::new(16, 256),
            _ => Self::new(8, 64),
        }
    }
}

/// Picks the best color modes a terminal supports, never exceeding the
/// request.
///
/// True-color requests are capped to [`ColorMode::Ansi256`], since output is
/// palette-indexed. Candidates are tried foreground-major, from the
/// requested modes downward; the first pair of modes whose color count and
/// pair count both fit `caps` wins.
#[must_use]
pub fn negotiate_color_modes(
    requested_fg: ColorMode,
    requested_bg: ColorMode,
    caps: TerminalCaps,
) -> (ColorMode, ColorMode) {
    let cap = |mode: ColorMode| mode.min(ColorMode::Ansi256);

    let mut fg = Some(cap(requested_fg));
    while let Some(fg_mode) = fg {
        let mut bg = Some(cap(requested_bg));
        while let Some(bg_mode) = bg {
            let (fg_count, bg_count) = (fg_mode.palette_size(), bg_mode.palette_size());
            let pairs = u64::from(fg_count) * u64::from(bg_count);

            if caps.colors >= fg_count.max(bg_count) && u64::from(caps.color_pairs) >= pairs {
                return (fg_mode, bg_mode);
            }
            bg = bg_mode.downgrade();
        }
        fg = fg_mode.downgrade();
    }

    (ColorMode::NoColors, ColorMode::NoColors)
}

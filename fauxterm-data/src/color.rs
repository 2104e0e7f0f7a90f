/// 32-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channels normalized to `0.0..=1.0`, in RGBA order.
    #[must_use]
    pub fn to_f32_array(self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        ]
    }
}

/// A color carried in four parallel representations.
///
/// A console picks exactly one representation at output time, based on its
/// negotiated [`ColorMode`], so the same draw call works unchanged on a
/// 16-color terminal and on a true-color GPU window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Index into the 8-color ANSI palette
    pub palette8: u8,
    /// Index into the 16-color ANSI palette
    pub palette16: u8,
    /// Index into the xterm 256-color palette
    pub palette256: u8,
    /// Full 32-bit color
    pub rgba: Rgba,
}

impl Color {
    /// Opaque black, palette entry 0 in every palette.
    pub const BLACK: Color = Color::new(0, 0, 0, Rgba::new(0, 0, 0, 255));
    /// Light gray (ANSI white), the terminal's default foreground.
    pub const WHITE: Color = Color::new(7, 7, 7, Rgba::new(192, 192, 192, 255));

    /// Creates a color with explicitly chosen palette entries.
    #[must_use]
    pub const fn new(palette8: u8, palette16: u8, palette256: u8, rgba: Rgba) -> Self {
        Self { palette8, palette16, palette256, rgba }
    }

    /// Creates a color from RGBA channels, deriving each palette entry as
    /// the nearest palette color.
    #[must_use]
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let rgb = (r, g, b);
        Self {
            palette8: nearest_in(&ANSI16[..8], rgb),
            palette16: nearest_in(&ANSI16, rgb),
            palette256: nearest_xterm256(rgb),
            rgba: Rgba::new(r, g, b, a),
        }
    }

    /// Creates a color from normalized channels; values are clamped to
    /// `0.0..=1.0`.
    #[must_use]
    pub fn from_rgba_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::from_rgba(channel(r), channel(g), channel(b), channel(a))
    }
}

/// Palette capability, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ColorMode {
    /// Monochrome output
    #[default]
    NoColors,
    /// 8 ANSI colors
    Ansi8,
    /// 16 ANSI colors
    Ansi16,
    /// xterm 256-color palette
    Ansi256,
    /// 24-bit color
    TrueColor,
    /// 24-bit color with alpha
    TrueColorAlpha,
}

impl ColorMode {
    /// All modes, lowest capability first.
    pub const ALL: [ColorMode; 6] = [
        ColorMode::NoColors,
        ColorMode::Ansi8,
        ColorMode::Ansi16,
        ColorMode::Ansi256,
        ColorMode::TrueColor,
        ColorMode::TrueColorAlpha,
    ];

    /// Number of palette entries addressed in this mode. True-color modes
    /// report 256 since palette-indexed output caps there.
    #[must_use]
    pub const fn palette_size(self) -> u32 {
        match self {
            ColorMode::NoColors => 0,
            ColorMode::Ansi8 => 8,
            ColorMode::Ansi16 => 16,
            ColorMode::Ansi256 | ColorMode::TrueColor | ColorMode::TrueColorAlpha => 256,
        }
    }

    /// The palette index a color resolves to in this mode, or `None` for
    /// [`ColorMode::NoColors`]. True-color modes resolve to the 256-color
    /// entry.
    #[must_use]
    pub const fn index_of(self, color: &Color) -> Option<u8> {
        match self {
            ColorMode::NoColors => None,
            ColorMode::Ansi8 => Some(color.palette8),
            ColorMode::Ansi16 => Some(color.palette16),
            ColorMode::Ansi256 | ColorMode::TrueColor | ColorMode::TrueColorAlpha => {
                Some(color.palette256)
            },
        }
    }

    /// The next lower mode, or `None` below [`ColorMode::NoColors`].
    #[must_use]
    pub const fn downgrade(self) -> Option<ColorMode> {
        match self {
            ColorMode::NoColors => None,
            ColorMode::Ansi8 => Some(ColorMode::NoColors),
            ColorMode::Ansi16 => Some(ColorMode::Ansi8),
            ColorMode::Ansi256 => Some(ColorMode::Ansi16),
            ColorMode::TrueColor => Some(ColorMode::Ansi256),
            ColorMode::TrueColorAlpha => Some(ColorMode::TrueColor),
        }
    }

    /// Whether colors are rendered from the full RGBA value.
    #[must_use]
    pub const fn is_true_color(self) -> bool {
        matches!(self, ColorMode::TrueColor | ColorMode::TrueColorAlpha)
    }
}

/// xterm's default values for the 16 ANSI colors.
#[rustfmt::skip]
const ANSI16: [(u8, u8, u8); 16] = [
    (0,   0,   0),   (205, 0,   0),   (0,   205, 0),   (205, 205, 0),
    (0,   0,   238), (205, 0,   205), (0,   205, 205), (229, 229, 229),
    (127, 127, 127), (255, 0,   0),   (0,   255, 0),   (255, 255, 0),
    (92,  92,  255), (255, 0,   255), (0,   255, 255), (255, 255, 255),
];

/// Channel levels of the xterm 6x6x6 color cube (indices 16..=231).
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

fn distance_sq(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| (i32::from(x) - i32::from(y)).unsigned_abs().pow(2);
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}

fn nearest_in(palette: &[(u8, u8, u8)], rgb: (u8, u8, u8)) -> u8 {
    palette
        .iter()
        .enumerate()
        .min_by_key(|(_, entry)| distance_sq(**entry, rgb))
        .map_or(0, |(i, _)| i as u8)
}

fn nearest_cube_level(v: u8) -> usize {
    CUBE_LEVELS
        .iter()
        .enumerate()
        .min_by_key(|(_, level)| (i32::from(**level) - i32::from(v)).unsigned_abs())
        .map_or(0, |(i, _)| i)
}

fn nearest_xterm256(rgb: (u8, u8, u8)) -> u8 {
    let (ri, gi, bi) = (nearest_cube_level(rgb.0), nearest_cube_level(rgb.1), nearest_cube_level(rgb.2));
    let cube = (CUBE_LEVELS[ri], CUBE_LEVELS[gi], CUBE_LEVELS[bi]);
    let cube_index = 16 + 36 * ri + 6 * gi + bi;

    // gray ramp 232..=255 covers 8, 18, .., 238
    let avg = (u32::from(rgb.0) + u32::from(rgb.1) + u32::from(rgb.2)) / 3;
    let gray_step = (avg.saturating_sub(3) / 10).min(23);
    let gray_level = (8 + gray_step * 10) as u8;
    let gray = (gray_level, gray_level, gray_level);

    if distance_sq(gray, rgb) < distance_sq(cube, rgb) {
        232 + gray_step as u8
    } else {
        cube_index as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_colors_map_to_ansi_indices() {
        let red = Color::from_rgba(255, 0, 0, 255);
        assert_eq!(red.palette8, 1);
        assert_eq!(red.palette16, 9);
        assert_eq!(red.palette256, 196);

        let black = Color::from_rgba(0, 0, 0, 255);
        assert_eq!((black.palette8, black.palette16, black.palette256), (0, 0, 16));

        let white = Color::from_rgba(255, 255, 255, 255);
        assert_eq!(white.palette8, 7);
        assert_eq!(white.palette16, 15);
        assert_eq!(white.palette256, 231);
    }

    #[test]
    fn test_grays_use_gray_ramp() {
        let gray = Color::from_rgba(128, 128, 128, 255);
        assert_eq!(gray.palette256, 244);

        let dark = Color::from_rgba(20, 20, 20, 255);
        assert!((232..=255).contains(&dark.palette256));
    }

    #[test]
    fn test_normalized_constructor() {
        let c = Color::from_rgba_f32(0.0, 1.0, 0.5, 2.0);
        assert_eq!(c.rgba, Rgba::new(0, 255, 128, 255));
    }

    #[test]
    fn test_rgba_normalization() {
        assert_eq!(Rgba::new(255, 0, 51, 255).to_f32_array(), [1.0, 0.0, 0.2, 1.0]);
    }

    #[test]
    fn test_mode_ordering_and_sizes() {
        assert!(ColorMode::NoColors < ColorMode::Ansi8);
        assert!(ColorMode::Ansi256 < ColorMode::TrueColor);
        assert_eq!(ColorMode::Ansi16.palette_size(), 16);
        assert_eq!(ColorMode::TrueColorAlpha.palette_size(), 256);
        assert_eq!(ColorMode::NoColors.downgrade(), None);
        assert_eq!(ColorMode::TrueColor.downgrade(), Some(ColorMode::Ansi256));
    }

    #[test]
    fn test_index_of_selects_representation() {
        let c = Color::new(3, 11, 226, Rgba::new(255, 255, 0, 255));
        assert_eq!(ColorMode::NoColors.index_of(&c), None);
        assert_eq!(ColorMode::Ansi8.index_of(&c), Some(3));
        assert_eq!(ColorMode::Ansi16.index_of(&c), Some(11));
        assert_eq!(ColorMode::Ansi256.index_of(&c), Some(226));
        assert_eq!(ColorMode::TrueColor.index_of(&c), Some(226));
    }
}

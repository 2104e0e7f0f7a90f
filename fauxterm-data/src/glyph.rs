/// Normalized texture rectangle of a glyph inside one page of a font image.
///
/// | Field | Edge   | Range      |
/// |-------|--------|------------|
/// | `s`   | left   | `0.0..=1.0` |
/// | `t`   | right  | `0.0..=1.0` |
/// | `p`   | top    | `0.0..=1.0` |
/// | `q`   | bottom | `0.0..=1.0` |
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TexRect {
    /// Left edge
    pub s: f32,
    /// Right edge
    pub t: f32,
    /// Top edge
    pub p: f32,
    /// Bottom edge
    pub q: f32,
}

impl TexRect {
    /// Converts a pixel rectangle into normalized coordinates of an image
    /// of `image_wh` pixels.
    #[must_use]
    pub fn from_pixels(left: i32, right: i32, top: i32, bottom: i32, image_wh: (u32, u32)) -> Self {
        let (w, h) = (image_wh.0 as f32, image_wh.1 as f32);
        Self {
            s: left as f32 / w,
            t: right as f32 / w,
            p: top as f32 / h,
            q: bottom as f32 / h,
        }
    }
}

/// A font's metadata for one codepoint.
///
/// Glyphs are immutable once loaded into a [`Font`](crate::Font). Every
/// glyph spans a single tile; wide glyphs and ligatures are not modelled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Unicode scalar value this glyph renders
    pub codepoint: u32,
    /// Width and height in layer tiles
    pub tiles_wh: (u32, u32),
    /// Location inside the texture page
    pub tex: TexRect,
    /// Texture page (array layer) index
    pub page: u32,
}

impl Glyph {
    /// Creates a single-tile glyph.
    #[must_use]
    pub fn new(codepoint: u32, tex: TexRect, page: u32) -> Self {
        Self { codepoint, tiles_wh: (1, 1), tex, page }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tex_rect_normalization() {
        let rect = TexRect::from_pixels(16, 32, 0, 16, (256, 128));
        assert_eq!(rect.s, 0.0625);
        assert_eq!(rect.t, 0.125);
        assert_eq!(rect.p, 0.0);
        assert_eq!(rect.q, 0.125);
    }

    #[test]
    fn test_glyph_defaults_to_single_tile() {
        let glyph = Glyph::new('A' as u32, TexRect::default(), 2);
        assert_eq!(glyph.tiles_wh, (1, 1));
        assert_eq!(glyph.page, 2);
    }
}

use std::{
    path::Path,
    sync::atomic::{AtomicU64, Ordering},
};

use compact_str::CompactString;

use crate::{FontDescriptor, FontError, FontImage, Glyph, GlyphTable, TexRect};

static NEXT_FONT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a loaded [`Font`].
///
/// Renderers key their texture caches on this rather than on the font's
/// address, so a font dropped and another loaded in its place never
/// resolves to a stale texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(u64);

impl FontId {
    fn next() -> Self {
        Self(NEXT_FONT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A bitmap font: texture pages plus a glyph table mapping codepoints into
/// them.
///
/// Fonts are immutable once loaded and are shared between layers and
/// consoles through `Rc<Font>`.
#[derive(Debug)]
pub struct Font {
    id: FontId,
    name: CompactString,
    tile_wh: (u32, u32),
    blend_mode: CompactString,
    image: FontImage,
    table: GlyphTable,
    fallback: Option<u32>,
}

impl Font {
    /// Assembles a font from a parsed descriptor and its image pages.
    ///
    /// # Errors
    /// Returns [`FontError::PageOutOfRange`] if a glyph references a page
    /// that was not loaded, or any error from [`GlyphTable::build`].
    pub fn from_parts(descriptor: FontDescriptor, image: FontImage) -> Result<Self, FontError> {
        let image_wh = (image.width(), image.height());
        let pages = image.pages();

        if let Some(bad) = descriptor
            .glyphs
            .iter()
            .find(|entry| entry.page as usize >= pages)
        {
            return Err(FontError::PageOutOfRange {
                codepoint: bad.codepoint,
                page: bad.page,
                pages,
            });
        }

        let glyphs = descriptor.glyphs.iter().map(|entry| {
            let tex = TexRect::from_pixels(entry.left, entry.right, entry.top, entry.bottom, image_wh);
            Glyph::new(entry.codepoint, tex, entry.page)
        });
        let table = GlyphTable::build(glyphs)?;

        let font = Self {
            id: FontId::next(),
            name: descriptor.name,
            tile_wh: descriptor.tile_wh,
            blend_mode: descriptor.blend_mode,
            image,
            table,
            fallback: None,
        };

        tracing::debug!(
            font = %font.name,
            glyphs = font.table.len(),
            slots = font.table.capacity(),
            max_probe = font.table.max_probe(),
            pages,
            "font loaded"
        );

        Ok(font)
    }

    /// Loads a descriptor file and its PNG pages, in page order.
    ///
    /// # Errors
    /// Fails closed on any read, decode, parse or validation error.
    pub fn load<P: AsRef<Path>>(
        descriptor_path: impl AsRef<Path>,
        page_paths: &[P],
    ) -> Result<Self, FontError> {
        let descriptor_path = descriptor_path.as_ref();
        let text = std::fs::read_to_string(descriptor_path)
            .map_err(|e| FontError::io(descriptor_path, e))?;

        let descriptor = FontDescriptor::parse(&text)?;
        let image = FontImage::load_png_pages(page_paths)?;

        Self::from_parts(descriptor, image)
    }

    /// Sets the codepoint drawn in place of codepoints without a glyph.
    #[must_use]
    pub fn with_fallback(mut self, codepoint: u32) -> Self {
        if self.table.get(codepoint).is_none() {
            tracing::warn!(font = %self.name, codepoint, "fallback codepoint has no glyph");
        }
        self.fallback = Some(codepoint);
        self
    }

    /// Looks up the glyph for `codepoint`.
    #[must_use]
    pub fn glyph(&self, codepoint: u32) -> Option<&Glyph> {
        self.table.get(codepoint)
    }

    /// Looks up `codepoint`, falling back to the fallback glyph on a miss.
    #[must_use]
    pub fn glyph_or_fallback(&self, codepoint: u32) -> Option<&Glyph> {
        self.table
            .get(codepoint)
            .or_else(|| self.fallback.and_then(|cp| self.table.get(cp)))
    }

    /// Process-unique identity, used to share GPU textures.
    #[must_use]
    pub fn id(&self) -> FontId {
        self.id
    }

    /// Font name from the descriptor's first line.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tile size in pixels, as declared by the descriptor.
    #[must_use]
    pub fn tile_wh(&self) -> (u32, u32) {
        self.tile_wh
    }

    /// Blend mode keyword, as declared by the descriptor.
    #[must_use]
    pub fn blend_mode(&self) -> &str {
        &self.blend_mode
    }

    /// Codepoint drawn in place of missing glyphs.
    #[must_use]
    pub fn fallback_codepoint(&self) -> Option<u32> {
        self.fallback
    }

    /// The decoded texture pages.
    #[must_use]
    pub fn image(&self) -> &FontImage {
        &self.image
    }

    /// Codepoint to glyph lookup.
    #[must_use]
    pub fn glyph_table(&self) -> &GlyphTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GlyphEntry, ImagePage};

    fn descriptor(glyphs: &[(u32, u32)]) -> FontDescriptor {
        FontDescriptor {
            name: "test".into(),
            tile_wh: (8, 8),
            blend_mode: "alpha".into(),
            glyphs: glyphs
                .iter()
                .enumerate()
                .map(|(i, &(codepoint, page))| GlyphEntry {
                    left: i as i32 * 8,
                    right: i as i32 * 8 + 8,
                    top: 0,
                    bottom: 8,
                    page,
                    codepoint,
                })
                .collect(),
        }
    }

    fn image(pages: usize) -> FontImage {
        let pages = (0..pages)
            .map(|_| ImagePage::from_rgba(32, 8, vec![0; 32 * 8 * 4]).unwrap())
            .collect();
        FontImage::from_pages(pages).unwrap()
    }

    #[test]
    fn test_from_parts_normalizes_rects() {
        let font = Font::from_parts(descriptor(&[(0x41, 0), (0x42, 1)]), image(2)).unwrap();

        let b = font.glyph(0x42).unwrap();
        assert_eq!(b.page, 1);
        assert_eq!(b.tex, TexRect { s: 0.25, t: 0.5, p: 0.0, q: 1.0 });
        assert_eq!(font.tile_wh(), (8, 8));
        assert_eq!(font.blend_mode(), "alpha");
    }

    #[test]
    fn test_page_out_of_range_fails_closed() {
        let result = Font::from_parts(descriptor(&[(0x41, 0), (0x42, 2)]), image(2));
        assert!(matches!(
            result,
            Err(FontError::PageOutOfRange { codepoint: 0x42, page: 2, pages: 2 })
        ));
    }

    #[test]
    fn test_duplicate_glyph_fails_closed() {
        let result = Font::from_parts(descriptor(&[(0x41, 0), (0x41, 0)]), image(1));
        assert!(matches!(result, Err(FontError::DuplicateCodepoint(0x41))));
    }

    #[test]
    fn test_fallback_lookup() {
        let font = Font::from_parts(descriptor(&[(0x3f, 0), (0x41, 0)]), image(1)).unwrap();
        assert!(font.glyph_or_fallback(0x263a).is_none());

        let font = font.with_fallback(0x3f);
        assert_eq!(font.glyph_or_fallback(0x263a).map(|g| g.codepoint), Some(0x3f));
        assert_eq!(font.glyph_or_fallback(0x41).map(|g| g.codepoint), Some(0x41));
        assert!(font.glyph(0x263a).is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Font::from_parts(descriptor(&[(0x41, 0)]), image(1)).unwrap();
        let b = Font::from_parts(descriptor(&[(0x41, 0)]), image(1)).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_load_missing_descriptor() {
        let result = Font::load("/nonexistent/font.txt", &["/nonexistent/page.png"]);
        assert!(matches!(result, Err(FontError::Io { .. })));
    }
}

use compact_str::{CompactString, ToCompactString};

use crate::FontError;

/// One glyph line of a font descriptor, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphEntry {
    /// Left edge in pixels
    pub left: i32,
    /// Right edge in pixels
    pub right: i32,
    /// Top edge in pixels
    pub top: i32,
    /// Bottom edge in pixels
    pub bottom: i32,
    /// Texture page index
    pub page: u32,
    /// Unicode scalar value
    pub codepoint: u32,
}

/// Parsed contents of a text font descriptor.
///
/// ```text
/// <font name>
/// <tile_w> <tile_h> <blend_mode>
/// <left> <right> <top> <bottom> <page> <codepoint>   anything after is a comment
/// ...
/// ```
///
/// Glyph lines are read until the first line that does not start with six
/// integers; anything after it is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Font name from the first line
    pub name: CompactString,
    /// Tile size in pixels
    pub tile_wh: (u32, u32),
    /// Blend mode keyword, stored verbatim
    pub blend_mode: CompactString,
    /// Glyph lines in file order
    pub glyphs: Vec<GlyphEntry>,
}

impl FontDescriptor {
    /// Parses descriptor text.
    ///
    /// # Errors
    /// Returns [`FontError::Parse`] if the name or the tile size line is
    /// missing or malformed.
    pub fn parse(text: &str) -> Result<Self, FontError> {
        let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));

        let name = match lines.next() {
            Some((_, line)) => line.trim_end_matches('\r').to_compact_string(),
            None => return Err(FontError::parse(1, "missing font name")),
        };

        let (header_line, header) = lines
            .by_ref()
            .find(|(_, line)| !line.trim().is_empty())
            .ok_or_else(|| FontError::parse(2, "missing tile size and blend mode"))?;

        let mut fields = header.split_whitespace();
        let tile_w = parse_field::<u32>(fields.next(), header_line, "tile width")?;
        let tile_h = parse_field::<u32>(fields.next(), header_line, "tile height")?;
        let blend_mode = fields
            .next()
            .ok_or_else(|| FontError::parse(header_line, "missing blend mode"))?
            .to_compact_string();

        let mut glyphs = Vec::new();
        for (line_no, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            match parse_glyph_line(line) {
                Some(entry) => glyphs.push(entry),
                None => {
                    tracing::debug!(line = line_no, "glyph list ends at unparseable line");
                    break;
                },
            }
        }

        Ok(Self { name, tile_wh: (tile_w, tile_h), blend_mode, glyphs })
    }
}

fn parse_field<T: std::str::FromStr>(
    field: Option<&str>,
    line: usize,
    what: &str,
) -> Result<T, FontError> {
    let field = field.ok_or_else(|| FontError::parse(line, format!("missing {what}")))?;
    field
        .parse()
        .map_err(|_| FontError::parse(line, format!("invalid {what}: {field:?}")))
}

fn parse_glyph_line(line: &str) -> Option<GlyphEntry> {
    let mut fields = line.split_whitespace();
    let mut int = || fields.next()?.parse::<i64>().ok();

    let (left, right, top, bottom, page, codepoint) =
        (int()?, int()?, int()?, int()?, int()?, int()?);

    Some(GlyphEntry {
        left: i32::try_from(left).ok()?,
        right: i32::try_from(right).ok()?,
        top: i32::try_from(top).ok()?,
        bottom: i32::try_from(bottom).ok()?,
        page: u32::try_from(page).ok()?,
        codepoint: u32::try_from(codepoint).ok()?,
    })
}

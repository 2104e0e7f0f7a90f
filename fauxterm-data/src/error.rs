use std::path::PathBuf;

/// Failures while loading a font descriptor, its image pages, or building
/// its glyph table. Loading fails closed: no partially built font is
/// returned alongside any of these.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Reading a descriptor or image file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A page image could not be decoded.
    #[error("failed to decode png {path}: {source}")]
    Png {
        /// File being decoded
        path: PathBuf,
        /// Underlying decoder error
        #[source]
        source: png::DecodingError,
    },

    /// The descriptor text is malformed.
    #[error("descriptor line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// A font needs at least one image page.
    #[error("font has no image pages")]
    NoPages,

    /// All pages must match the first page's dimensions.
    #[error("page {page} is {actual_w}x{actual_h}, expected {expected_w}x{expected_h}")]
    PageSizeMismatch {
        /// Index of the offending page
        page: usize,
        /// Width of the first page
        expected_w: u32,
        /// Height of the first page
        expected_h: u32,
        /// Width of the offending page
        actual_w: u32,
        /// Height of the offending page
        actual_h: u32,
    },

    /// Raw page pixels do not cover exactly `width * height` RGBA8 texels.
    #[error("page pixels hold {actual} bytes, expected {expected}")]
    PixelLengthMismatch {
        /// `width * height * 4`
        expected: usize,
        /// Length of the supplied buffer
        actual: usize,
    },

    /// A decoded page would not fit in memory.
    #[error("png {path} is too large to decode ({width}x{height})")]
    ImageTooLarge {
        /// File being decoded
        path: PathBuf,
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },

    /// A glyph references a page beyond the loaded image pages.
    #[error("glyph U+{codepoint:04X} references page {page}, but only {pages} page(s) loaded")]
    PageOutOfRange {
        /// Codepoint of the offending glyph
        codepoint: u32,
        /// Page it references
        page: u32,
        /// Number of pages available
        pages: usize,
    },

    /// The same codepoint appears twice in the glyph list.
    #[error("duplicate glyph for codepoint U+{0:04X}")]
    DuplicateCodepoint(u32),

    /// A buffer allocation was refused.
    #[error("allocation of {0} failed")]
    AllocationFailed(&'static str),
}

impl FontError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse { line, message: message.into() }
    }
}

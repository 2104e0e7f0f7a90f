use std::{fs::File, io::BufReader, path::Path};

use crate::FontError;

/// One decoded RGBA8 texture page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row-major RGBA8 pixels
    pub pixels: Vec<u8>,
}

impl ImagePage {
    /// Wraps already decoded RGBA8 pixels.
    ///
    /// # Errors
    /// Returns [`FontError::PixelLengthMismatch`] if `pixels` does not hold
    /// exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, FontError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(FontError::PixelLengthMismatch { expected, actual: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    /// Decodes a PNG file into RGBA8, expanding palette, gray and RGB
    /// images and stripping 16-bit channels.
    ///
    /// # Errors
    /// Returns [`FontError::Io`] if the file cannot be opened,
    /// [`FontError::ImageTooLarge`] if its decoded size overflows, or
    /// [`FontError::Png`] if it cannot be decoded.
    pub fn load_png(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| FontError::io(path, e))?;

        let mut decoder = png::Decoder::new(BufReader::new(file));
        decoder.set_transformations(png::Transformations::normalize_to_color8());

        let png_error = |source| FontError::Png { path: path.to_path_buf(), source };
        let mut reader = decoder.read_info().map_err(png_error)?;

        let (width, height) = (reader.info().width, reader.info().height);
        let buf_size = reader.output_buffer_size().ok_or_else(|| FontError::ImageTooLarge {
            path: path.to_path_buf(),
            width,
            height,
        })?;
        let mut buf = vec![0; buf_size];
        let frame = reader.next_frame(&mut buf).map_err(png_error)?;

        let pixels = expand_to_rgba(&buf, frame.color_type, frame.line_size, width, height);
        tracing::debug!(path = %path.display(), width, height, "decoded font page");

        Ok(Self { width, height, pixels })
    }
}

fn expand_to_rgba(
    buf: &[u8],
    color_type: png::ColorType,
    line_size: usize,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let channels = match color_type {
        png::ColorType::Grayscale | png::ColorType::Indexed => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
    };

    let mut out = Vec::with_capacity(width as usize * height as usize * 4);
    for row in buf.chunks(line_size).take(height as usize) {
        for px in row.chunks_exact(channels).take(width as usize) {
            let rgba = match *px {
                [v] => [v, v, v, 255],
                [v, a] => [v, v, v, a],
                [r, g, b] => [r, g, b, 255],
                [r, g, b, a] => [r, g, b, a],
                _ => [0, 0, 0, 0],
            };
            out.extend_from_slice(&rgba);
        }
    }

    out
}

/// All texture pages of a font, concatenated into one RGBA8 buffer of
/// `width * height * 4 * pages` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontImage {
    width: u32,
    height: u32,
    pages: usize,
    pixels: Vec<u8>,
}

impl FontImage {
    /// Concatenates equally sized pages.
    ///
    /// # Errors
    /// Returns [`FontError::NoPages`] for an empty page list, or
    /// [`FontError::PageSizeMismatch`] if any page differs in size from
    /// the first.
    pub fn from_pages(pages: Vec<ImagePage>) -> Result<Self, FontError> {
        let first = pages.first().ok_or(FontError::NoPages)?;
        let (width, height) = (first.width, first.height);

        if let Some((page, bad)) = pages
            .iter()
            .enumerate()
            .find(|(_, p)| p.width != width || p.height != height)
        {
            return Err(FontError::PageSizeMismatch {
                page,
                expected_w: width,
                expected_h: height,
                actual_w: bad.width,
                actual_h: bad.height,
            });
        }

        let page_count = pages.len();
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(width as usize * height as usize * 4 * page_count)
            .map_err(|_| FontError::AllocationFailed("font image"))?;
        for page in &pages {
            pixels.extend_from_slice(&page.pixels);
        }

        Ok(Self { width, height, pages: page_count, pixels })
    }

    /// Decodes and concatenates PNG pages.
    ///
    /// # Errors
    /// Propagates decoding errors from [`ImagePage::load_png`] and the
    /// validation errors of [`FontImage::from_pages`].
    pub fn load_png_pages<P: AsRef<Path>>(paths: &[P]) -> Result<Self, FontError> {
        let pages = paths
            .iter()
            .map(ImagePage::load_png)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_pages(pages)
    }

    /// Page width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Page height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pages.
    #[must_use]
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Concatenated RGBA8 pixels of all pages.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(w: u32, h: u32, fill: u8) -> ImagePage {
        ImagePage::from_rgba(w, h, vec![fill; (w * h * 4) as usize]).unwrap()
    }

    #[test]
    fn test_pages_concatenate_in_order() {
        let image = FontImage::from_pages(vec![page(2, 2, 1), page(2, 2, 2)]).unwrap();
        assert_eq!(image.pages(), 2);
        assert_eq!(image.pixels().len(), 32);
        assert!(image.pixels()[..16].iter().all(|&b| b == 1));
        assert!(image.pixels()[16..].iter().all(|&b| b == 2));
    }

    #[test]
    fn test_mismatched_page_fails_closed() {
        let result = FontImage::from_pages(vec![page(4, 4, 0), page(4, 4, 0), page(4, 2, 0)]);
        assert!(matches!(
            result,
            Err(FontError::PageSizeMismatch { page: 2, actual_h: 2, .. })
        ));
    }

    #[test]
    fn test_no_pages_is_error() {
        assert!(matches!(FontImage::from_pages(vec![]), Err(FontError::NoPages)));
    }

    #[test]
    fn test_pixel_length_is_validated() {
        assert!(matches!(
            ImagePage::from_rgba(2, 2, vec![0; 15]),
            Err(FontError::PixelLengthMismatch { expected: 16, actual: 15 })
        ));
    }

    #[test]
    fn test_expand_gray_alpha() {
        let buf = [10, 20, 30, 40];
        let rgba = expand_to_rgba(&buf, png::ColorType::GrayscaleAlpha, 4, 2, 1);
        assert_eq!(rgba, vec![10, 10, 10, 20, 30, 30, 30, 40]);
    }

    #[test]
    fn test_missing_png_is_io_error() {
        let result = ImagePage::load_png("/nonexistent/page.png");
        assert!(matches!(result, Err(FontError::Io { .. })));
    }
}

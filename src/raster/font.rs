//! Font handles for raster output
//!
//! A scalable TrueType face is preferred; when none can be loaded the
//! built-in 8x8 bitmap font is used instead, scaled by an integer factor.
//! Both faces measure text, so centring and wrapping work either way.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ab_glyph::{FontVec, PxScale};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};

/// Well-known locations of a sans-serif TrueType font
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const BITMAP_CELL: u32 = 8;

/// Title, heading and body sizes in pixels
pub const DEFAULT_SIZES: [f32; 3] = [40.0, 28.0, 20.0];

/// A loaded font face
#[derive(Clone)]
pub enum FontFace {
    Scalable(Arc<FontVec>),
    Bitmap,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFace::Scalable(_) => write!(f, "FontFace::Scalable"),
            FontFace::Bitmap => write!(f, "FontFace::Bitmap"),
        }
    }
}

impl FontFace {
    /// Load the explicit font if given, else the first readable system font,
    /// else fall back to the bitmap font
    pub fn load(explicit: Option<&Path>) -> Self {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(path) = explicit {
            candidates.push(path.to_path_buf());
        }
        candidates.extend(SYSTEM_FONT_PATHS.iter().map(PathBuf::from));

        for path in &candidates {
            match Self::from_file(path) {
                Ok(face) => {
                    tracing::debug!(font = %path.display(), "loaded scalable font");
                    return face;
                }
                Err(message) if explicit == Some(path.as_path()) => {
                    tracing::warn!(font = %path.display(), %message, "configured font could not be loaded");
                }
                Err(_) => {}
            }
        }

        tracing::warn!("no scalable font found, using built-in bitmap font");
        FontFace::Bitmap
    }

    /// Parse a TrueType/OpenType file
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| e.to_string())?;
        Ok(FontFace::Scalable(Arc::new(font)))
    }

    pub fn is_scalable(&self) -> bool {
        matches!(self, FontFace::Scalable(_))
    }

    pub(crate) fn draw(&self, image: &mut RgbImage, x: i32, y: i32, size: f32, text: &str, color: Rgb<u8>) {
        match self {
            FontFace::Scalable(font) => {
                draw_text_mut(image, color, x, y, PxScale::from(size), &**font, text);
            }
            FontFace::Bitmap => draw_bitmap_text(image, x, y, bitmap_scale(size), text, color),
        }
    }

    pub(crate) fn text_width(&self, size: f32, text: &str) -> u32 {
        match self {
            FontFace::Scalable(font) => text_size(PxScale::from(size), &**font, text).0,
            FontFace::Bitmap => text.chars().count() as u32 * BITMAP_CELL * bitmap_scale(size),
        }
    }
}

/// A face at a fixed pixel size
#[derive(Debug, Clone)]
pub struct TextStyle {
    face: FontFace,
    size: f32,
}

impl TextStyle {
    pub fn new(face: FontFace, size: f32) -> Self {
        Self { face, size }
    }

    pub fn face(&self) -> &FontFace {
        &self.face
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn text_width(&self, text: &str) -> u32 {
        self.face.text_width(self.size, text)
    }

    /// Vertical advance between consecutive lines
    pub fn line_height(&self) -> u32 {
        match self.face {
            FontFace::Scalable(_) => (self.size * 1.3).ceil() as u32,
            FontFace::Bitmap => BITMAP_CELL * bitmap_scale(self.size) + bitmap_scale(self.size) * 3,
        }
    }
}

/// The three text styles of a raster document
#[derive(Debug, Clone)]
pub struct FontSet {
    pub title: TextStyle,
    pub heading: TextStyle,
    pub normal: TextStyle,
}

impl FontSet {
    pub fn new(face: FontFace, sizes: [f32; 3]) -> Self {
        let [title, heading, normal] = sizes;
        Self {
            title: TextStyle::new(face.clone(), title),
            heading: TextStyle::new(face.clone(), heading),
            normal: TextStyle::new(face, normal),
        }
    }

    /// Resolve a face (see [`FontFace::load`]) at the default sizes
    pub fn load(font_path: Option<&Path>) -> Self {
        Self::new(FontFace::load(font_path), DEFAULT_SIZES)
    }

    /// Bitmap-only set; never touches the filesystem
    pub fn bitmap() -> Self {
        Self::new(FontFace::Bitmap, DEFAULT_SIZES)
    }

    pub fn is_scalable(&self) -> bool {
        self.normal.face().is_scalable()
    }
}

fn bitmap_scale(size: f32) -> u32 {
    ((size / BITMAP_CELL as f32).floor() as u32).max(1)
}

fn bitmap_glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| match c {
            '•' => BASIC_FONTS.get('*'),
            '–' | '—' => BASIC_FONTS.get('-'),
            _ => None,
        })
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_bitmap_text(image: &mut RgbImage, x: i32, y: i32, scale: u32, text: &str, color: Rgb<u8>) {
    let (width, height) = (image.width() as i64, image.height() as i64);
    let scale = scale as i64;
    let cell = BITMAP_CELL as i64 * scale;

    for (index, c) in text.chars().enumerate() {
        let origin_x = x as i64 + index as i64 * cell;
        if origin_x >= width {
            break;
        }
        for (row, bits) in bitmap_glyph(c).iter().enumerate() {
            for col in 0..8 {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = origin_x + col as i64 * scale;
                let py = y as i64 + row as i64 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        let (tx, ty) = (px + dx, py + dy);
                        if tx >= 0 && ty >= 0 && tx < width && ty < height {
                            image.put_pixel(tx as u32, ty as u32, color);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_width_scales_with_size() {
        let small = TextStyle::new(FontFace::Bitmap, 8.0);
        let large = TextStyle::new(FontFace::Bitmap, 24.0);
        assert_eq!(small.text_width("abcd"), 32);
        assert_eq!(large.text_width("abcd"), 96);
        assert_eq!(small.text_width(""), 0);
    }

    #[test]
    fn test_bitmap_covers_document_symbols() {
        for c in ['°', '±', '•', '$', 'A', '7'] {
            assert_ne!(bitmap_glyph(c), [0; 8], "{c}");
        }
    }

    #[test]
    fn test_bitmap_text_draws_and_clips() {
        let mut image = RgbImage::from_pixel(40, 20, Rgb([255, 255, 255]));
        draw_bitmap_text(&mut image, 2, 2, 1, "H", Rgb([0, 0, 0]));
        assert!(image.pixels().any(|p| *p == Rgb([0, 0, 0])));
        draw_bitmap_text(&mut image, -50, -50, 3, "clipped text", Rgb([0, 0, 0]));
        draw_bitmap_text(&mut image, 35, 15, 4, "edge", Rgb([0, 0, 0]));
    }

    #[test]
    fn test_missing_explicit_font_falls_back() {
        let face = FontFace::load(Some(Path::new("/nonexistent/font.ttf")));
        // either a system font or the bitmap face; never a panic
        let style = TextStyle::new(face, 20.0);
        assert!(style.text_width("Component") > 0);
    }
}

//! Shared raster canvas
//!
//! Thin layer over `imageproc` used by the raster document backend, the
//! hardware image generator and the data-plot renderer. Coordinates follow
//! the usual image convention (origin top-left, y grows downward) and
//! rectangles/ellipses are given by inclusive bounding boxes.

pub mod font;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageError, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_ellipse_mut, draw_filled_rect_mut, draw_hollow_ellipse_mut, draw_hollow_rect_mut,
    draw_line_segment_mut, draw_polygon_mut,
};
use imageproc::point::Point;
use imageproc::rect::Rect;

pub use font::{FontFace, FontSet, TextStyle};

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

const JPEG_QUALITY: u8 = 90;

/// Encoded raster file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Jpeg,
    Png,
}

/// Fill and outline for a closed shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    pub fill: Option<Rgb<u8>>,
    pub outline: Option<Rgb<u8>>,
}

impl Paint {
    pub fn fill(color: Rgb<u8>) -> Self {
        Self {
            fill: Some(color),
            outline: None,
        }
    }

    pub fn outline(color: Rgb<u8>) -> Self {
        Self {
            fill: None,
            outline: Some(color),
        }
    }

    /// Filled with a black outline
    pub fn solid(color: Rgb<u8>) -> Self {
        Self {
            fill: Some(color),
            outline: Some(BLACK),
        }
    }
}

/// An RGB drawing surface
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width.max(1), height.max(1), background),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Rectangle over the inclusive box `(x1, y1)..=(x2, y2)`
    pub fn rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, paint: Paint) {
        let Some(rect) = bounding_rect(x1, y1, x2, y2) else {
            return;
        };
        if let Some(fill) = paint.fill {
            draw_filled_rect_mut(&mut self.image, rect, fill);
        }
        if let Some(outline) = paint.outline {
            draw_hollow_rect_mut(&mut self.image, rect, outline);
        }
    }

    /// Rectangle outline `width` pixels thick, drawn inward
    pub fn frame(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgb<u8>, width: u32) {
        for i in 0..width as i32 {
            self.rect(x1 + i, y1 + i, x2 - i, y2 - i, Paint::outline(color));
        }
    }

    /// Ellipse inscribed in the inclusive box `(x1, y1)..=(x2, y2)`
    pub fn ellipse(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, paint: Paint) {
        let (left, right) = (x1.min(x2), x1.max(x2));
        let (top, bottom) = (y1.min(y2), y1.max(y2));
        let center = ((left + right) / 2, (top + bottom) / 2);
        let rx = ((right - left) / 2).max(1);
        let ry = ((bottom - top) / 2).max(1);
        if let Some(fill) = paint.fill {
            draw_filled_ellipse_mut(&mut self.image, center, rx, ry, fill);
        }
        if let Some(outline) = paint.outline {
            draw_hollow_ellipse_mut(&mut self.image, center, rx, ry, outline);
        }
    }

    /// Ellipse outline `width` pixels thick, drawn inward
    pub fn ring(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgb<u8>, width: u32) {
        for i in 0..width as i32 {
            if x2 - x1 <= 2 * i || y2 - y1 <= 2 * i {
                break;
            }
            self.ellipse(x1 + i, y1 + i, x2 - i, y2 - i, Paint::outline(color));
        }
    }

    /// Closed polygon through `points`; fewer than three distinct points draw nothing
    pub fn polygon(&mut self, points: &[(i32, i32)], paint: Paint) {
        let mut poly: Vec<Point<i32>> = Vec::with_capacity(points.len());
        for &(x, y) in points {
            if poly.last().is_some_and(|p| p.x == x && p.y == y) {
                continue;
            }
            poly.push(Point::new(x, y));
        }
        while poly.len() > 1 && poly.first() == poly.last() {
            poly.pop();
        }
        if poly.len() < 3 {
            return;
        }
        if let Some(fill) = paint.fill {
            draw_polygon_mut(&mut self.image, &poly, fill);
        }
        if let Some(outline) = paint.outline {
            for (i, start) in poly.iter().enumerate() {
                let end = poly[(i + 1) % poly.len()];
                self.line((start.x, start.y), (end.x, end.y), outline, 1);
            }
        }
    }

    /// Line segment `width` pixels thick
    pub fn line(&mut self, from: (i32, i32), to: (i32, i32), color: Rgb<u8>, width: u32) {
        let (x0, y0) = (from.0 as f32, from.1 as f32);
        let (x1, y1) = (to.0 as f32, to.1 as f32);
        let width = width.max(1) as i32;
        if width == 1 {
            draw_line_segment_mut(&mut self.image, (x0, y0), (x1, y1), color);
            return;
        }

        let (dx, dy) = (x1 - x0, y1 - y0);
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 {
            let half = width / 2;
            self.rect(from.0 - half, from.1 - half, from.0 + half, from.1 + half, Paint::fill(color));
            return;
        }
        // unit normal
        let (nx, ny) = (-dy / length, dx / length);
        for step in 0..width {
            let offset = step as f32 - (width - 1) as f32 / 2.0;
            let (ox, oy) = (nx * offset, ny * offset);
            draw_line_segment_mut(&mut self.image, (x0 + ox, y0 + oy), (x1 + ox, y1 + oy), color);
        }
    }

    /// Elliptical arc between two angles in degrees (0 = +x, clockwise on screen)
    pub fn arc(
        &mut self,
        bounds: (i32, i32, i32, i32),
        start_deg: f32,
        end_deg: f32,
        color: Rgb<u8>,
        width: u32,
    ) {
        let (x1, y1, x2, y2) = bounds;
        let cx = (x1 + x2) as f32 / 2.0;
        let cy = (y1 + y2) as f32 / 2.0;
        let rx = (x2 - x1) as f32 / 2.0;
        let ry = (y2 - y1) as f32 / 2.0;
        let end = if end_deg < start_deg { end_deg + 360.0 } else { end_deg };

        let steps = 90;
        let mut prev: Option<(i32, i32)> = None;
        for i in 0..=steps {
            let angle = (start_deg + (end - start_deg) * i as f32 / steps as f32).to_radians();
            let point = (
                (cx + rx * angle.cos()).round() as i32,
                (cy + ry * angle.sin()).round() as i32,
            );
            if let Some(p) = prev {
                self.line(p, point, color, width);
            }
            prev = Some(point);
        }
    }

    /// Uniform border around the whole canvas
    pub fn border(&mut self, color: Rgb<u8>, width: u32) {
        let (w, h) = (self.width() as i32, self.height() as i32);
        self.frame(0, 0, w - 1, h - 1, color, width);
    }

    /// Draw `text` with its top-left corner at `(x, y)`
    pub fn text(&mut self, x: i32, y: i32, text: &str, style: &TextStyle, color: Rgb<u8>) {
        style.face().draw(&mut self.image, x, y, style.size(), text, color);
    }

    /// Draw `text` horizontally centred on `cx`
    pub fn centered_text(&mut self, cx: i32, y: i32, text: &str, style: &TextStyle, color: Rgb<u8>) {
        let width = style.text_width(text) as i32;
        self.text(cx - width / 2, y, text, style, color);
    }

    /// Encode to `path`, creating or truncating the file
    pub fn save(&self, path: &Path, format: RasterFormat) -> Result<(), ImageError> {
        match format {
            RasterFormat::Jpeg => {
                let file = File::create(path).map_err(ImageError::IoError)?;
                let mut writer = BufWriter::new(file);
                JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY).encode_image(&self.image)?;
                writer.flush().map_err(ImageError::IoError)
            }
            RasterFormat::Png => self.image.save_with_format(path, ImageFormat::Png),
        }
    }
}

fn bounding_rect(x1: i32, y1: i32, x2: i32, y2: i32) -> Option<Rect> {
    let (left, right) = (x1.min(x2), x1.max(x2));
    let (top, bottom) = (y1.min(y2), y1.max(y2));
    let width = (right - left + 1) as u32;
    let height = (bottom - top + 1) as u32;
    if width == 0 || height == 0 {
        return None;
    }
    Some(Rect::at(left, top).of_size(width, height))
}

/// Scale a color's channels by a signed offset, clamped to `0..=255`
pub fn shade(color: Rgb<u8>, offset: i32) -> Rgb<u8> {
    let Rgb([r, g, b]) = color;
    let adjust = |c: u8| (c as i32 + offset).clamp(0, 255) as u8;
    Rgb([adjust(r), adjust(g), adjust(b)])
}

/// Greedy word wrap: each line stays within `max_width` unless a single word is wider
pub fn wrap_text(text: &str, style: &TextStyle, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if style.text_width(&candidate) <= max_width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_rect_fills_inclusive_box() {
        let mut canvas = Canvas::new(20, 20, WHITE);
        canvas.rect(2, 3, 5, 7, Paint::fill(BLACK));
        assert_eq!(*canvas.image().get_pixel(2, 3), BLACK);
        assert_eq!(*canvas.image().get_pixel(5, 7), BLACK);
        assert_eq!(*canvas.image().get_pixel(6, 7), WHITE);
    }

    #[test]
    fn test_polygon_tolerates_closed_and_degenerate_input() {
        let mut canvas = Canvas::new(50, 50, WHITE);
        canvas.polygon(&[(5, 5), (40, 5), (40, 40), (5, 5)], Paint::solid(BLACK));
        canvas.polygon(&[(1, 1), (1, 1)], Paint::solid(BLACK));
        canvas.polygon(&[], Paint::solid(BLACK));
        assert_eq!(*canvas.image().get_pixel(35, 10), BLACK);
    }

    #[test]
    fn test_thick_line_and_offscreen_shapes() {
        let mut canvas = Canvas::new(40, 40, WHITE);
        canvas.line((0, 20), (39, 20), BLACK, 5);
        assert_eq!(*canvas.image().get_pixel(20, 18), BLACK);
        assert_eq!(*canvas.image().get_pixel(20, 22), BLACK);
        canvas.rect(-100, -100, -50, -50, Paint::solid(BLACK));
        canvas.ellipse(100, 100, 200, 300, Paint::solid(BLACK));
        canvas.arc((-10, -10, 60, 60), 180.0, 0.0, BLACK, 3);
    }

    #[test]
    fn test_border() {
        let mut canvas = Canvas::new(30, 20, WHITE);
        canvas.border(BLACK, 2);
        assert_eq!(*canvas.image().get_pixel(0, 0), BLACK);
        assert_eq!(*canvas.image().get_pixel(1, 10), BLACK);
        assert_eq!(*canvas.image().get_pixel(29, 19), BLACK);
        assert_eq!(*canvas.image().get_pixel(15, 10), WHITE);
    }

    #[test]
    fn test_wrap_text_respects_width() {
        let style = FontSet::bitmap().normal;
        let text = "the quick brown fox jumps over the lazy dog again and again";
        let max = style.text_width("the quick brown fox");
        let lines = wrap_text(text, &style, max);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(style.text_width(line) <= max);
        }
        assert_eq!(lines.join(" "), text);
        assert!(wrap_text("", &style, 100).is_empty());
    }

    #[test]
    fn test_save_jpeg_and_png() {
        let dir = tempdir().unwrap();
        let canvas = Canvas::new(16, 16, WHITE);
        let jpg = dir.path().join("a.jpg");
        let png = dir.path().join("a.png");
        canvas.save(&jpg, RasterFormat::Jpeg).unwrap();
        canvas.save(&png, RasterFormat::Png).unwrap();
        assert_eq!(image::open(&jpg).unwrap().width(), 16);
        assert_eq!(image::open(&png).unwrap().height(), 16);
    }

    #[test]
    fn test_shade_clamps() {
        assert_eq!(shade(Rgb([10, 250, 128]), 20), Rgb([30, 255, 148]));
        assert_eq!(shade(Rgb([10, 250, 128]), -20), Rgb([0, 230, 108]));
    }
}

//! Raster (JPEG/PNG) backend
//!
//! A document becomes one tall page image. Layout runs first and records
//! draw operations with their positions; the canvas is then sized to fit
//! the content (never shorter than a letter-proportioned page) and the
//! operations are painted onto it.

use std::path::Path;

use image::{ImageError, Rgb};

use crate::content::{Approvals, Contact, ContentGenerator, ContentTree, SectionBody, Table};
use crate::raster::{wrap_text, Canvas, FontSet, Paint, RasterFormat, TextStyle};
use crate::render::{
    cell_tone, output_path, split_indent, CellTone, DocumentRenderer, OutputFormat,
    RenderError, RenderedDocument,
};

const PAGE_WIDTH: u32 = 1700;
const MIN_PAGE_HEIGHT: u32 = 2200;
const MARGIN: i32 = 100;
const BODY_INDENT: i32 = 130;
const CELL_PAD: i32 = 10;

const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const ACCENT: Rgb<u8> = Rgb([200, 200, 200]);
const GRID: Rgb<u8> = Rgb([128, 128, 128]);
const PASS_GREEN: Rgb<u8> = Rgb([0, 128, 0]);
const FAIL_RED: Rgb<u8> = Rgb([204, 0, 0]);

/// Raster document backend
#[derive(Debug, Clone)]
pub struct RasterRenderer<'c> {
    content: ContentGenerator<'c>,
    format: OutputFormat,
    fonts: FontSet,
}

impl<'c> RasterRenderer<'c> {
    /// Resolve fonts once (explicit path, system fonts, then bitmap)
    pub fn new(content: ContentGenerator<'c>, format: OutputFormat, font_path: Option<&Path>) -> Self {
        Self::with_fonts(content, format, FontSet::load(font_path))
    }

    pub fn with_fonts(content: ContentGenerator<'c>, format: OutputFormat, fonts: FontSet) -> Self {
        let format = match format {
            OutputFormat::Pdf => {
                tracing::warn!("raster renderer cannot write PDF, using jpg");
                OutputFormat::Jpg
            }
            other => other,
        };
        Self {
            content,
            format,
            fonts,
        }
    }

    fn raster_format(&self) -> RasterFormat {
        match self.format {
            OutputFormat::Png => RasterFormat::Png,
            _ => RasterFormat::Jpeg,
        }
    }

    fn layout(&self, tree: &ContentTree, record: &mut RenderedDocument) -> Layout<'_> {
        let mut layout = Layout::new(&self.fonts);

        layout.centered(PAGE_WIDTH as i32 / 2, &tree.title, Style::Title, TEXT_COLOR);
        layout.space(30);
        for line in &tree.metadata {
            layout.paragraph(MARGIN, line, Style::Normal);
        }
        layout.space(20);

        for section in &tree.sections {
            layout.paragraph(MARGIN, &section.name, Style::Heading);
            layout.space(6);
            record.headings.push(section.name.clone());
            match &section.body {
                SectionBody::Lines(lines) => {
                    for line in lines {
                        if line.is_empty() {
                            layout.space(self.fonts.normal.line_height() as i32 / 2);
                            continue;
                        }
                        let (indent, text) = split_indent(line);
                        let x = BODY_INDENT + indent as i32 * self.fonts.normal.text_width(" ").max(1) as i32;
                        layout.paragraph(x, text, Style::Normal);
                    }
                }
                SectionBody::Table(table) => {
                    layout.table(table);
                    record.tables.push(table.clone());
                }
            }
            layout.space(20);
        }

        layout.space(30);
        layout.approvals(&tree.approvals);
        record.signers = tree.approvals.signers.clone();

        if let Some(contact) = &tree.contact {
            layout.space(40);
            layout.contact(contact);
        }
        layout
    }
}

impl DocumentRenderer for RasterRenderer<'_> {
    fn format(&self) -> OutputFormat {
        self.format
    }

    fn content(&self) -> ContentGenerator<'_> {
        self.content
    }

    fn render(&self, tree: &ContentTree, dir: &Path, stem: &str) -> Result<RenderedDocument, RenderError> {
        let path = output_path(dir, stem, self.format);
        let mut record = RenderedDocument::new(path.clone(), &tree.title);

        let layout = self.layout(tree, &mut record);
        let height = (layout.y + MARGIN).max(MIN_PAGE_HEIGHT as i32) as u32;
        let mut canvas = Canvas::new(PAGE_WIDTH, height, BACKGROUND);
        layout.paint(&mut canvas);

        canvas
            .save(&path, self.raster_format())
            .map_err(|err| match err {
                ImageError::IoError(source) => RenderError::Io {
                    path: path.clone(),
                    source,
                },
                source => RenderError::Image {
                    path: path.clone(),
                    source,
                },
            })?;

        tracing::debug!(path = %path.display(), kind = %tree.kind, height, "wrote raster document");
        Ok(record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Title,
    Heading,
    Normal,
}

#[derive(Debug, Clone)]
enum Op {
    Text {
        x: i32,
        y: i32,
        text: String,
        style: Style,
        color: Rgb<u8>,
    },
    Rect {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        paint: Paint,
    },
    Line {
        from: (i32, i32),
        to: (i32, i32),
    },
}

/// Positioned draw operations; `y` is the next free row
struct Layout<'f> {
    fonts: &'f FontSet,
    ops: Vec<Op>,
    y: i32,
}

impl<'f> Layout<'f> {
    fn new(fonts: &'f FontSet) -> Self {
        Self {
            fonts,
            ops: Vec::new(),
            y: MARGIN,
        }
    }

    fn style(&self, style: Style) -> &'f TextStyle {
        match style {
            Style::Title => &self.fonts.title,
            Style::Heading => &self.fonts.heading,
            Style::Normal => &self.fonts.normal,
        }
    }

    fn space(&mut self, pixels: i32) {
        self.y += pixels;
    }

    fn text(&mut self, x: i32, y: i32, text: &str, style: Style, color: Rgb<u8>) {
        self.ops.push(Op::Text {
            x,
            y,
            text: text.to_string(),
            style,
            color,
        });
    }

    fn centered(&mut self, cx: i32, text: &str, style: Style, color: Rgb<u8>) {
        let font = self.style(style);
        let max = PAGE_WIDTH - 2 * MARGIN as u32;
        for line in wrap_text(text, font, max) {
            let width = font.text_width(&line) as i32;
            self.text(cx - width / 2, self.y, &line, style, color);
            self.y += font.line_height() as i32;
        }
    }

    fn paragraph(&mut self, x: i32, text: &str, style: Style) {
        let font = self.style(style);
        let max = (PAGE_WIDTH as i32 - MARGIN - x).max(1) as u32;
        for line in wrap_text(text, font, max) {
            self.text(x, self.y, &line, style, TEXT_COLOR);
            self.y += font.line_height() as i32;
        }
    }

    fn table(&mut self, table: &Table) {
        let font = self.fonts.normal.clone();
        let columns = table.columns().max(1) as i32;
        let width = (PAGE_WIDTH as i32 - 2 * MARGIN) / columns;
        let line_height = font.line_height() as i32;

        let header = std::iter::once((true, &table.headers));
        let body = table.rows.iter().map(|row| (false, row));
        for (is_header, row) in header.chain(body) {
            let wrapped: Vec<Vec<String>> = row
                .iter()
                .map(|cell| wrap_text(cell, &font, (width - 2 * CELL_PAD).max(1) as u32))
                .collect();
            let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1) as i32;
            let row_height = lines * line_height + 2 * CELL_PAD;
            let top = self.y;

            for (col, cell_lines) in wrapped.iter().enumerate() {
                let x = MARGIN + col as i32 * width;
                let paint = if is_header {
                    Paint {
                        fill: Some(ACCENT),
                        outline: Some(GRID),
                    }
                } else {
                    Paint::outline(GRID)
                };
                self.ops.push(Op::Rect {
                    x1: x,
                    y1: top,
                    x2: x + width,
                    y2: top + row_height,
                    paint,
                });
                let color = match cell_tone(&row[col]) {
                    CellTone::Pass => PASS_GREEN,
                    CellTone::Fail => FAIL_RED,
                    CellTone::Plain => TEXT_COLOR,
                };
                for (i, line) in cell_lines.iter().enumerate() {
                    let tx = x + ((width - font.text_width(line) as i32) / 2).max(CELL_PAD);
                    let ty = top + CELL_PAD + i as i32 * line_height;
                    self.text(tx, ty, line, Style::Normal, color);
                }
            }
            self.y += row_height;
        }
        self.y += 10;
    }

    fn approvals(&mut self, approvals: &Approvals) {
        self.paragraph(MARGIN, &approvals.title, Style::Heading);
        self.space(20);

        let columns = approvals.signers.len().max(1) as i32;
        let width = (PAGE_WIDTH as i32 - 2 * MARGIN) / columns;
        let line_height = self.fonts.normal.line_height() as i32;
        let centre = |col: usize| MARGIN + col as i32 * width + width / 2;

        for (col, signer) in approvals.signers.iter().enumerate() {
            let w = self.fonts.normal.text_width(signer) as i32;
            self.text(centre(col) - w / 2, self.y, signer, Style::Normal, TEXT_COLOR);
        }
        self.y += line_height + 40;

        for col in 0..approvals.signers.len() {
            let x = MARGIN + col as i32 * width;
            self.ops.push(Op::Line {
                from: (x + 50, self.y),
                to: (x + width - 50, self.y),
            });
        }
        self.y += 15;

        let extra_rows = [
            approvals.roles.clone(),
            approvals
                .dates
                .as_ref()
                .map(|dates| dates.iter().map(|d| format!("Date: {}", d)).collect()),
        ];
        for row in extra_rows.into_iter().flatten() {
            for (col, cell) in row.iter().enumerate() {
                let w = self.fonts.normal.text_width(cell) as i32;
                self.text(centre(col) - w / 2, self.y, cell, Style::Normal, TEXT_COLOR);
            }
            self.y += line_height + 10;
        }
    }

    fn contact(&mut self, contact: &Contact) {
        self.paragraph(MARGIN, &contact.title, Style::Heading);
        self.space(10);
        for line in &contact.details {
            self.paragraph(BODY_INDENT, line, Style::Normal);
        }
    }

    fn paint(&self, canvas: &mut Canvas) {
        for op in &self.ops {
            match op {
                Op::Text {
                    x,
                    y,
                    text,
                    style,
                    color,
                } => canvas.text(*x, *y, text, self.style(*style), *color),
                Op::Rect { x1, y1, x2, y2, paint } => canvas.rect(*x1, *y1, *x2, *y2, *paint),
                Op::Line { from, to } => canvas.line(*from, *to, TEXT_COLOR, 1),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use crate::core::context::GenerationContext;
    use tempfile::tempdir;

    fn bitmap_renderer(content: ContentGenerator<'_>, format: OutputFormat) -> RasterRenderer<'_> {
        RasterRenderer::with_fonts(content, format, FontSet::bitmap())
    }

    #[test]
    fn test_jpg_and_png_outputs() {
        let catalog = Catalog::load().unwrap();
        let content = ContentGenerator::new(&catalog);
        let dir = tempdir().unwrap();
        let mut ctx = GenerationContext::seeded(81);
        let theme = &catalog.themes()[4];

        let jpg = bitmap_renderer(content, OutputFormat::Jpg)
            .create_purchase_order(&mut ctx, dir.path(), "PO555555", theme)
            .unwrap();
        let png = bitmap_renderer(content, OutputFormat::Png)
            .create_quote(&mut ctx, dir.path(), "Quote555555", theme)
            .unwrap();

        assert_eq!(jpg.path, dir.path().join("PO555555.jpg"));
        assert_eq!(png.path, dir.path().join("Quote555555.png"));
        let img = image::open(&png.path).unwrap();
        assert_eq!(img.width(), PAGE_WIDTH);
        assert!(img.height() >= MIN_PAGE_HEIGHT);
    }

    #[test]
    fn test_long_documents_grow_the_page() {
        let catalog = Catalog::load().unwrap();
        let content = ContentGenerator::new(&catalog);
        let renderer = bitmap_renderer(content, OutputFormat::Png);
        let mut ctx = GenerationContext::seeded(82);

        let tree = content.specification(&mut ctx, "spec000001", &catalog.themes()[0]);
        let mut record = RenderedDocument::new("unused.png".into(), &tree.title);
        let layout = renderer.layout(&tree, &mut record);
        assert!(layout.y > MARGIN);
        assert_eq!(record.headings, tree.section_names());
        // every op lies on the canvas horizontally
        for op in &layout.ops {
            if let Op::Text { x, .. } = op {
                assert!(*x >= 0 && *x < PAGE_WIDTH as i32);
            }
        }
    }

    #[test]
    fn test_pdf_request_falls_back_to_jpg() {
        let catalog = Catalog::load().unwrap();
        let content = ContentGenerator::new(&catalog);
        assert_eq!(bitmap_renderer(content, OutputFormat::Pdf).format(), OutputFormat::Jpg);
    }
}

//! PDF backend
//!
//! US Letter pages set in the built-in Helvetica faces. Layout is a simple
//! top-down flow: a cursor advances through title, metadata, sections,
//! approvals and contact block, starting a new page whenever the next item
//! would cross the bottom margin.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use printpdf::lopdf::{self, Object, StringFormat};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, OffsetDateTime, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rect, Rgb,
};

use crate::content::{Approvals, ContentGenerator, ContentTree, SectionBody, Table};
use crate::render::{
    cell_tone, output_path, split_indent, CellTone, DocumentRenderer, OutputFormat,
    RenderError, RenderedDocument,
};

const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN: f32 = 19.05;
const PT_TO_MM: f32 = 0.3528;
const CELL_PAD: f32 = 1.5;
const INDENT_STEP: f32 = 1.4;
const LAYER: &str = "Layer 1";

const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);
const GREY: (f32, f32, f32) = (0.5, 0.5, 0.5);
const HEADER_SHADE: (f32, f32, f32) = (0.83, 0.83, 0.83);
const PASS_GREEN: (f32, f32, f32) = (0.0, 0.5, 0.0);
const FAIL_RED: (f32, f32, f32) = (0.8, 0.0, 0.0);

/// Named paragraph style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
    /// Font size in points
    pub size: f32,
    pub bold: bool,
    pub centered: bool,
    /// Space below the paragraph in millimetres
    pub space_after: f32,
}

impl ParagraphStyle {
    fn line_height(&self) -> f32 {
        self.size * PT_TO_MM * 1.35
    }
}

/// PDF document backend
#[derive(Debug, Clone, Copy)]
pub struct PdfRenderer<'c> {
    content: ContentGenerator<'c>,
    title: ParagraphStyle,
    section: ParagraphStyle,
    normal: ParagraphStyle,
}

impl<'c> PdfRenderer<'c> {
    pub fn new(content: ContentGenerator<'c>) -> Self {
        Self {
            content,
            title: ParagraphStyle {
                size: 16.0,
                bold: true,
                centered: true,
                space_after: 6.0,
            },
            section: ParagraphStyle {
                size: 12.0,
                bold: true,
                centered: false,
                space_after: 2.5,
            },
            normal: ParagraphStyle {
                size: 10.0,
                bold: false,
                centered: false,
                space_after: 1.0,
            },
        }
    }

    fn write(&self, tree: &ContentTree, record: &mut RenderedDocument) -> Result<PdfDocumentReference, printpdf::Error> {
        let mut page = PageWriter::new(&tree.title, tree.issued, document_id(&record.path, tree))?;

        page.paragraph(&tree.title, &self.title, 0);
        for line in &tree.metadata {
            page.paragraph(line, &self.normal, 0);
        }
        page.space(4.0);

        for section in &tree.sections {
            page.keep_with_next(self.section.line_height() + self.normal.line_height() * 2.0);
            page.paragraph(&section.name, &self.section, 0);
            record.headings.push(section.name.clone());
            match &section.body {
                SectionBody::Lines(lines) => {
                    for line in lines {
                        if line.is_empty() {
                            page.space(self.normal.line_height() * 0.6);
                            continue;
                        }
                        let (indent, text) = split_indent(line);
                        page.paragraph(text, &self.normal, indent);
                    }
                }
                SectionBody::Table(table) => {
                    page.table(table, &self.normal);
                    record.tables.push(table.clone());
                }
            }
            page.space(3.0);
        }

        page.space(4.0);
        self.approvals(&mut page, &tree.approvals);
        record.signers = tree.approvals.signers.clone();

        if let Some(contact) = &tree.contact {
            page.space(6.0);
            page.paragraph(&contact.title, &self.section, 0);
            for line in &contact.details {
                page.paragraph(line, &self.normal, 0);
            }
        }

        Ok(page.doc)
    }

    fn approvals(&self, page: &mut PageWriter, approvals: &Approvals) {
        let columns = approvals.signers.len().max(1);
        let mut rows: Vec<Vec<String>> = vec![
            approvals.signers.clone(),
            vec!["________________".to_string(); columns],
        ];
        if let Some(roles) = &approvals.roles {
            rows.push(roles.clone());
        }
        if let Some(dates) = &approvals.dates {
            rows.push(dates.iter().map(|d| format!("Date: {}", d)).collect());
        }

        let row_height = self.normal.line_height() + 2.0 * CELL_PAD + 2.0;
        page.keep_with_next(self.section.line_height() + row_height * rows.len() as f32);
        page.paragraph(&approvals.title, &self.section, 0);

        let width = (PAGE_WIDTH - 2.0 * MARGIN) / columns as f32;
        for (index, row) in rows.iter().enumerate() {
            let top = page.cursor;
            for (col, cell) in row.iter().enumerate() {
                let x = MARGIN + col as f32 * width;
                page.outline_box(x, top, width, row_height);
                let text_width = estimate_width(cell, self.normal.size, index == 0);
                let tx = x + ((width - text_width) / 2.0).max(CELL_PAD);
                page.text(tx, top + CELL_PAD + 1.0, cell, self.normal.size, index == 0, BLACK);
            }
            page.cursor += row_height;
        }
    }
}

impl DocumentRenderer for PdfRenderer<'_> {
    fn format(&self) -> OutputFormat {
        OutputFormat::Pdf
    }

    fn content(&self) -> ContentGenerator<'_> {
        self.content
    }

    fn render(&self, tree: &ContentTree, dir: &Path, stem: &str) -> Result<RenderedDocument, RenderError> {
        let path = output_path(dir, stem, OutputFormat::Pdf);
        let mut record = RenderedDocument::new(path.clone(), &tree.title);

        let bytes = self
            .write(tree, &mut record)
            .and_then(PdfDocumentReference::save_to_bytes)
            .map_err(|e| pdf_error(&path, e))?;
        let bytes = stamp_trailer_id(&bytes, &document_id(&path, tree)).map_err(|e| pdf_error(&path, e))?;

        std::fs::write(&path, bytes).map_err(|source| RenderError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), kind = %tree.kind, "wrote PDF document");
        Ok(record)
    }
}

/// Flowing writer over a growing document; `cursor` is millimetres from the page top
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor: f32,
}

impl PageWriter {
    fn new(title: &str, issued: NaiveDate, id: String) -> Result<Self, printpdf::Error> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
        let stamp = timestamp(issued);
        let doc = doc
            .with_document_id(id)
            .with_creation_date(stamp)
            .with_mod_date(stamp)
            .with_metadata_date(stamp);
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);
        layer.set_outline_thickness(0.5);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor: MARGIN,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.layer.set_outline_thickness(0.5);
        self.cursor = MARGIN;
    }

    /// Start a new page unless `height` more millimetres fit
    fn keep_with_next(&mut self, height: f32) {
        if self.cursor + height > PAGE_HEIGHT - MARGIN {
            self.new_page();
        }
    }

    fn space(&mut self, height: f32) {
        self.cursor += height;
        if self.cursor > PAGE_HEIGHT - MARGIN {
            self.new_page();
        }
    }

    fn text(&self, x: f32, top: f32, text: &str, size: f32, bold: bool, color: (f32, f32, f32)) {
        let font = if bold { &self.bold } else { &self.regular };
        let baseline = PAGE_HEIGHT - top - size * PT_TO_MM;
        self.layer.set_fill_color(rgb(color));
        self.layer.use_text(text, size, Mm(x), Mm(baseline), font);
    }

    fn paragraph(&mut self, text: &str, style: &ParagraphStyle, indent: usize) {
        let left = MARGIN + indent as f32 * INDENT_STEP;
        let available = PAGE_WIDTH - MARGIN - left;
        for line in wrap_estimated(text, style.size, style.bold, available) {
            self.keep_with_next(style.line_height());
            let x = if style.centered {
                (PAGE_WIDTH - estimate_width(&line, style.size, style.bold)) / 2.0
            } else {
                left
            };
            self.text(x.max(MARGIN), self.cursor, &line, style.size, style.bold, BLACK);
            self.cursor += style.line_height();
        }
        self.cursor += style.space_after;
    }

    fn table(&mut self, table: &Table, style: &ParagraphStyle) {
        let columns = table.columns().max(1);
        let width = (PAGE_WIDTH - 2.0 * MARGIN) / columns as f32;
        let line_height = style.line_height();

        let header = std::iter::once((true, &table.headers));
        let body = table.rows.iter().map(|row| (false, row));
        for (is_header, row) in header.chain(body) {
            let wrapped: Vec<Vec<String>> = row
                .iter()
                .map(|cell| wrap_estimated(cell, style.size, is_header, width - 2.0 * CELL_PAD))
                .collect();
            let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
            let row_height = lines as f32 * line_height + 2.0 * CELL_PAD;
            self.keep_with_next(row_height);

            let top = self.cursor;
            if is_header {
                self.fill_box(MARGIN, top, width * columns as f32, row_height, HEADER_SHADE);
            }
            for (col, cell_lines) in wrapped.iter().enumerate() {
                let x = MARGIN + col as f32 * width;
                self.outline_box(x, top, width, row_height);
                let tone = cell_tone(&row[col]);
                let (color, bold) = match tone {
                    CellTone::Pass => (PASS_GREEN, true),
                    CellTone::Fail => (FAIL_RED, true),
                    CellTone::Plain => (BLACK, is_header),
                };
                for (i, line) in cell_lines.iter().enumerate() {
                    let y = top + CELL_PAD + i as f32 * line_height;
                    self.text(x + CELL_PAD, y, line, style.size, bold, color);
                }
            }
            self.cursor += row_height;
        }
        self.cursor += style.space_after;
    }

    fn outline_box(&self, x: f32, top: f32, width: f32, height: f32) {
        let (bottom_y, top_y) = (PAGE_HEIGHT - top - height, PAGE_HEIGHT - top);
        let points = vec![
            (Point::new(Mm(x), Mm(top_y)), false),
            (Point::new(Mm(x + width), Mm(top_y)), false),
            (Point::new(Mm(x + width), Mm(bottom_y)), false),
            (Point::new(Mm(x), Mm(bottom_y)), false),
        ];
        self.layer.set_outline_color(rgb(GREY));
        self.layer.add_line(Line {
            points,
            is_closed: true,
        });
    }

    fn fill_box(&self, x: f32, top: f32, width: f32, height: f32, color: (f32, f32, f32)) {
        let rect = Rect::new(
            Mm(x),
            Mm(PAGE_HEIGHT - top - height),
            Mm(x + width),
            Mm(PAGE_HEIGHT - top),
        )
        .with_mode(PaintMode::Fill);
        self.layer.set_fill_color(rgb(color));
        self.layer.add_rect(rect);
    }
}

fn pdf_error(path: &Path, e: impl fmt::Display) -> RenderError {
    RenderError::Pdf {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Midnight UTC on the issue date
fn timestamp(issued: NaiveDate) -> OffsetDateTime {
    issued
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| OffsetDateTime::from_unix_timestamp(midnight.and_utc().timestamp()).ok())
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// 32 hex digits derived from the file name, title and issue date
fn document_id(path: &Path, tree: &ContentTree) -> String {
    let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    let seed = format!("{}|{}|{}", name, tree.title, tree.issued);
    let seed = seed.as_bytes();
    format!(
        "{:016x}{:016x}",
        fnv1a(seed, 0xcbf2_9ce4_8422_2325),
        fnv1a(seed, 0x8422_2325_cbf2_9ce4)
    )
}

fn fnv1a(bytes: &[u8], basis: u64) -> u64 {
    bytes.iter().fold(basis, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3))
}

/// printpdf fills the trailer `/ID` from a process-wide counter; pin it to `id`
fn stamp_trailer_id(bytes: &[u8], id: &str) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = lopdf::Document::load_mem(bytes)?;
    let id = Object::String(id.as_bytes().to_vec(), StringFormat::Literal);
    doc.trailer.set("ID", Object::Array(vec![id.clone(), id]));
    let mut out = Vec::with_capacity(bytes.len());
    doc.save_to(&mut out)?;
    Ok(out)
}

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// Approximate Helvetica advance width in millimetres
fn estimate_width(text: &str, size: f32, bold: bool) -> f32 {
    let em = if bold { 0.56 } else { 0.5 };
    text.chars().count() as f32 * size * em * PT_TO_MM
}

fn wrap_estimated(text: &str, size: f32, bold: bool, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if current.is_empty() || estimate_width(&candidate, size, bold) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use crate::core::context::GenerationContext;
    use tempfile::tempdir;

    #[test]
    fn test_wrap_estimated_keeps_words() {
        let text = "Analysis shows that the deviation is within acceptable margins for safe operation";
        let lines = wrap_estimated(text, 10.0, false, 40.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), text);
        for line in &lines[..lines.len() - 1] {
            assert!(estimate_width(line, 10.0, false) <= 40.0);
        }
        assert_eq!(wrap_estimated("", 10.0, false, 40.0), vec![String::new()]);
    }

    #[test]
    fn test_pdf_file_is_written() {
        let catalog = Catalog::load().unwrap();
        let content = ContentGenerator::new(&catalog);
        let renderer = PdfRenderer::new(content);
        let dir = tempdir().unwrap();
        let mut ctx = GenerationContext::seeded(71);

        let rendered = renderer
            .create_specification(&mut ctx, dir.path(), "spec424242", &catalog.themes()[5])
            .unwrap();
        let bytes = std::fs::read(&rendered.path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(rendered.headings.len(), 7);
        assert_eq!(rendered.signers, vec!["Prepared By", "Reviewed By", "Approved By"]);
    }

    #[test]
    fn test_same_content_gives_identical_bytes() {
        let catalog = Catalog::load().unwrap();
        let content = ContentGenerator::new(&catalog);
        let renderer = PdfRenderer::new(content);
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let mut ctx = GenerationContext::seeded(73).with_today(today);
        let tree = content.purchase_order(&mut ctx, "PO135790", &catalog.themes()[2]);
        assert_eq!(tree.issued, today);

        let (a, b) = (tempdir().unwrap(), tempdir().unwrap());
        let first = renderer.render(&tree, a.path(), "PO135790").unwrap();
        let second = renderer.render(&tree, b.path(), "PO135790").unwrap();
        let bytes = std::fs::read(&first.path).unwrap();
        assert!(bytes == std::fs::read(&second.path).unwrap());

        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("D:20240615000000"));
        assert!(text.contains(&document_id(&first.path, &tree)));
    }

    #[test]
    fn test_unwritable_directory_is_an_io_error() {
        let catalog = Catalog::load().unwrap();
        let content = ContentGenerator::new(&catalog);
        let renderer = PdfRenderer::new(content);
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let mut ctx = GenerationContext::seeded(72);

        let err = renderer
            .create_purchase_order(&mut ctx, &missing, "PO000000", &catalog.themes()[0])
            .unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }
}

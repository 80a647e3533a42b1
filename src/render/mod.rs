//! Document rendering
//!
//! [`DocumentRenderer`] turns a [`ContentTree`] into exactly one file. The
//! five `create_*` operations obtain content from the [`ContentGenerator`]
//! and hand it to the backend's [`DocumentRenderer::render`]. Backends only
//! differ in presentation: every backend draws the same section headings
//! in the same order, the same table cells and the same approval signers,
//! and reports what it drew in a [`RenderedDocument`].

pub mod pdf;
pub mod raster;

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use thiserror::Error;

use crate::content::{ContentError, ContentGenerator, ContentTree, Table};
use crate::core::catalog::Theme;
use crate::core::context::GenerationContext;

pub use pdf::PdfRenderer;
pub use raster::RasterRenderer;

/// Output format for generated documents
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Vector PDF (US Letter)
    #[default]
    Pdf,
    /// Raster JPEG page
    Jpg,
    /// Raster PNG page
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// What a backend put into a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub path: PathBuf,
    pub title: String,
    /// Section headings in drawing order
    pub headings: Vec<String>,
    /// Every table drawn, header row included
    pub tables: Vec<Table>,
    /// Approval signers in drawing order
    pub signers: Vec<String>,
}

impl RenderedDocument {
    pub(crate) fn new(path: PathBuf, title: &str) -> Self {
        Self {
            path,
            title: title.to_string(),
            headings: Vec::new(),
            tables: Vec::new(),
            signers: Vec::new(),
        }
    }
}

/// Errors raised while rendering a document
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF generation failed for {path:?}: {message}")]
    Pdf { path: PathBuf, message: String },

    #[error("image encoding failed for {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// A document backend
///
/// Implementors provide [`render`](DocumentRenderer::render); the five
/// document operations are shared.
pub trait DocumentRenderer {
    fn format(&self) -> OutputFormat;

    /// Source of document content
    fn content(&self) -> ContentGenerator<'_>;

    /// Write `tree` to `<dir>/<stem>.<ext>`
    fn render(&self, tree: &ContentTree, dir: &Path, stem: &str) -> Result<RenderedDocument, RenderError>;

    fn create_purchase_order(
        &self,
        ctx: &mut GenerationContext,
        dir: &Path,
        stem: &str,
        theme: &Theme,
    ) -> Result<RenderedDocument, RenderError> {
        let tree = self.content().purchase_order(ctx, stem, theme);
        self.render(&tree, dir, stem)
    }

    fn create_quote(
        &self,
        ctx: &mut GenerationContext,
        dir: &Path,
        stem: &str,
        theme: &Theme,
    ) -> Result<RenderedDocument, RenderError> {
        let tree = self.content().quote(ctx, stem, theme);
        self.render(&tree, dir, stem)
    }

    fn create_specification(
        &self,
        ctx: &mut GenerationContext,
        dir: &Path,
        stem: &str,
        theme: &Theme,
    ) -> Result<RenderedDocument, RenderError> {
        let tree = self.content().specification(ctx, stem, theme);
        self.render(&tree, dir, stem)
    }

    /// Fails with [`RenderError::Content`] when `stem` has no valid NOD date
    fn create_nod(
        &self,
        ctx: &mut GenerationContext,
        dir: &Path,
        stem: &str,
        theme: &Theme,
    ) -> Result<RenderedDocument, RenderError> {
        let tree = self.content().nod(ctx, stem, theme)?;
        self.render(&tree, dir, stem)
    }

    /// The filename is derived from the generated log's own choices
    fn create_test_log(
        &self,
        ctx: &mut GenerationContext,
        dir: &Path,
        test_type: &str,
        theme: &Theme,
    ) -> Result<RenderedDocument, RenderError> {
        let log = self.content().test_log(ctx, test_type, theme);
        self.render(&log.tree, dir, &log.stem)
    }
}

/// Build the backend for `format`
///
/// Raster backends resolve their fonts here, once; `font_path` is tried
/// before the system font locations.
pub fn renderer_for<'c>(
    format: OutputFormat,
    content: ContentGenerator<'c>,
    font_path: Option<&Path>,
) -> Box<dyn DocumentRenderer + 'c> {
    match format {
        OutputFormat::Pdf => Box::new(PdfRenderer::new(content)),
        OutputFormat::Jpg | OutputFormat::Png => {
            Box::new(RasterRenderer::new(content, format, font_path))
        }
    }
}

/// Target path `<dir>/<stem>.<ext>`
pub(crate) fn output_path(dir: &Path, stem: &str, format: OutputFormat) -> PathBuf {
    dir.join(format!("{}.{}", stem, format.extension()))
}

/// Leading-space count and the remaining text of a prose line
pub(crate) fn split_indent(line: &str) -> (usize, &str) {
    let trimmed = line.trim_start_matches(' ');
    (line.len() - trimmed.len(), trimmed)
}

/// Table cell color hint for pass/fail columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellTone {
    Plain,
    Pass,
    Fail,
}

pub(crate) fn cell_tone(cell: &str) -> CellTone {
    match cell {
        "PASS" => CellTone::Pass,
        "FAIL" => CellTone::Fail,
        _ => CellTone::Plain,
    }
}

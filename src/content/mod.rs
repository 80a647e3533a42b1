//! Format-agnostic document content
//!
//! Each document kind produces a [`ContentTree`]: title, metadata lines,
//! an ordered list of named sections (prose lines or a table) and an
//! approval block. Section names and order are fixed per kind; values are
//! drawn fresh from the theme and vocabularies on every call. Nothing here
//! touches the filesystem or a rendering library.

pub mod nod;
pub mod purchase_order;
pub mod quote;
pub mod specification;
pub mod test_log;

use chrono::NaiveDate;
use thiserror::Error;

use crate::core::catalog::{BusinessTerms, Catalog, Theme};
use crate::core::context::GenerationContext;

pub use test_log::TestLog;

/// Section names of a purchase order, in order
pub const PO_SECTIONS: [&str; 6] = [
    "Purchase Order Information",
    "Vendor Information",
    "Technical Requirements",
    "Quality Assurance Requirements",
    "Shipping Instructions",
    "Terms and Conditions",
];

/// Section names of a quote, in order
pub const QUOTE_SECTIONS: [&str; 6] = [
    "Executive Summary",
    "Scope of Work",
    "Technical Approach",
    "Schedule",
    "Cost Breakdown",
    "Terms and Conditions",
];

/// Section names of a specification, in order
pub const SPEC_SECTIONS: [&str; 7] = [
    "Scope",
    "Applicable Documents",
    "Requirements",
    "Verification",
    "Materials and Processes",
    "Quality Assurance",
    "Testing and Acceptance",
];

/// Section names of a notice of deviation, in order
pub const NOD_SECTIONS: [&str; 6] = [
    "Notice Of Deviation",
    "Affected Requirements",
    "Description of Deviation",
    "Technical Justification",
    "Impact Assessment",
    "Disposition and Approval",
];

/// Section names of a test log, in order
pub const TEST_LOG_SECTIONS: [&str; 6] = [
    "TEST INFORMATION",
    "TEST SETUP",
    "TEST PROCEDURE SUMMARY",
    "TEST RESULTS",
    "KEY MEASUREMENTS",
    "CONCLUSION",
];

/// Placeholder for an unsigned date cell
pub const BLANK_DATE: &str = "__/__/____";

/// The five document kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    PurchaseOrder,
    Quote,
    Specification,
    Nod,
    TestLog,
}

impl DocumentKind {
    /// Fixed, ordered section names for this kind
    pub fn sections(&self) -> &'static [&'static str] {
        match self {
            DocumentKind::PurchaseOrder => &PO_SECTIONS,
            DocumentKind::Quote => &QUOTE_SECTIONS,
            DocumentKind::Specification => &SPEC_SECTIONS,
            DocumentKind::Nod => &NOD_SECTIONS,
            DocumentKind::TestLog => &TEST_LOG_SECTIONS,
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::PurchaseOrder => write!(f, "purchase order"),
            DocumentKind::Quote => write!(f, "quote"),
            DocumentKind::Specification => write!(f, "specification"),
            DocumentKind::Nod => write!(f, "notice of deviation"),
            DocumentKind::TestLog => write!(f, "test log"),
        }
    }
}

/// Tabular section content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Number of columns (header width)
    pub fn columns(&self) -> usize {
        self.headers.len()
    }
}

/// Body of one section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Lines(Vec<String>),
    Table(Table),
}

/// One named section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub body: SectionBody,
}

/// Signature block closing a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approvals {
    pub title: String,
    pub signers: Vec<String>,
    pub dates: Option<Vec<String>>,
    pub roles: Option<Vec<String>>,
}

impl Approvals {
    pub fn new<S: Into<String>>(title: &str, signers: impl IntoIterator<Item = S>) -> Self {
        Self {
            title: title.to_string(),
            signers: signers.into_iter().map(Into::into).collect(),
            dates: None,
            roles: None,
        }
    }
}

/// Titled block of contact lines printed after the approvals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub title: String,
    pub details: Vec<String>,
}

/// The structured content of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTree {
    pub kind: DocumentKind,
    pub title: String,
    /// Date the document is issued; PDF metadata is stamped with it
    pub issued: NaiveDate,
    pub metadata: Vec<String>,
    pub sections: Vec<Section>,
    pub approvals: Approvals,
    pub contact: Option<Contact>,
}

impl ContentTree {
    pub(crate) fn new(
        kind: DocumentKind,
        title: String,
        issued: NaiveDate,
        metadata: Vec<String>,
        approvals: Approvals,
    ) -> Self {
        Self {
            kind,
            title,
            issued,
            metadata,
            sections: Vec::new(),
            approvals,
            contact: None,
        }
    }

    pub(crate) fn push_lines(&mut self, name: &str, lines: Vec<String>) {
        self.sections.push(Section {
            name: name.to_string(),
            body: SectionBody::Lines(lines),
        });
    }

    pub(crate) fn push_table(&mut self, name: &str, table: Table) {
        self.sections.push(Section {
            name: name.to_string(),
            body: SectionBody::Table(table),
        });
    }

    /// Section names, in document order
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// Look up a section by name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// True when the sections are exactly the fixed list for this kind
    pub fn has_canonical_sections(&self) -> bool {
        self.section_names() == self.kind.sections()
    }
}

/// Errors raised while generating content
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("NOD filename '{stem}' does not embed a valid MM.DD.YYYY date after 'NOD_'")]
    InvalidNodStem { stem: String },
}

/// Theme-aware content generator; one operation per document kind
#[derive(Debug, Clone, Copy)]
pub struct ContentGenerator<'c> {
    catalog: &'c Catalog,
}

impl<'c> ContentGenerator<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub(crate) fn terms(&self) -> &'c BusinessTerms {
        self.catalog.business_terms()
    }

    pub fn purchase_order(&self, ctx: &mut GenerationContext, stem: &str, theme: &Theme) -> ContentTree {
        purchase_order::generate(self, ctx, stem, theme)
    }

    pub fn quote(&self, ctx: &mut GenerationContext, stem: &str, theme: &Theme) -> ContentTree {
        quote::generate(self, ctx, stem, theme)
    }

    pub fn specification(&self, ctx: &mut GenerationContext, stem: &str, theme: &Theme) -> ContentTree {
        specification::generate(self, ctx, stem, theme)
    }

    /// Fails when `stem` does not embed a valid `NOD_MM.DD.YYYY` date
    pub fn nod(&self, ctx: &mut GenerationContext, stem: &str, theme: &Theme) -> Result<ContentTree, ContentError> {
        nod::generate(self, ctx, stem, theme)
    }

    /// Picks component, procedure and date; returns them with the content
    pub fn test_log(&self, ctx: &mut GenerationContext, test_type: &str, theme: &Theme) -> TestLog {
        test_log::generate(ctx, test_type, theme)
    }
}

/// `March 05, 2024`
pub(crate) fn long_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// `03/05/2024`
pub(crate) fn short_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// `$1,234,000`
pub fn format_usd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("${}", out)
}

pub(crate) fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(chrono::Duration::days(days))
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0), "$0");
        assert_eq!(format_usd(999), "$999");
        assert_eq!(format_usd(1000), "$1,000");
        assert_eq!(format_usd(45000), "$45,000");
        assert_eq!(format_usd(1_234_000), "$1,234,000");
    }

    #[test]
    fn test_date_formats() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(long_date(d), "March 05, 2024");
        assert_eq!(short_date(d), "03/05/2024");
    }

    #[test]
    fn test_kind_section_lists() {
        assert_eq!(DocumentKind::PurchaseOrder.sections().len(), 6);
        assert_eq!(DocumentKind::Specification.sections().len(), 7);
        assert_eq!(DocumentKind::Quote.sections()[4], "Cost Breakdown");
    }
}

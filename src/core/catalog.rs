//! Theme catalog - hardware themes, test types, and naming vocabularies
//!
//! The catalog is hand-authored YAML under `catalog/`, embedded into the
//! binary and parsed once. Every free-text field passes through
//! [`sanitize_path_component`] on load so that any value can be used as a
//! path token.

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Embed)]
#[folder = "catalog/"]
struct EmbeddedCatalog;

const THEMES_FILE: &str = "themes.yaml";
const VOCABULARY_FILE: &str = "vocabulary.yaml";

static SHARED: OnceLock<Result<Catalog, CatalogError>> = OnceLock::new();

/// A named hardware domain supplying the vocabulary for one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    /// Ordered component names
    pub components: Vec<String>,
    /// Measurable quantities ("data descriptions")
    pub data_descriptions: Vec<String>,
    pub specifications: Vec<String>,
    pub materials: Vec<String>,
    pub test_procedures: Vec<String>,
    pub stakeholders: Vec<String>,
}

impl Theme {
    fn lists(&self) -> [(&'static str, &Vec<String>); 6] {
        [
            ("components", &self.components),
            ("data_descriptions", &self.data_descriptions),
            ("specifications", &self.specifications),
            ("materials", &self.materials),
            ("test_procedures", &self.test_procedures),
            ("stakeholders", &self.stakeholders),
        ]
    }

    fn sanitize(&mut self) {
        self.name = sanitize_path_component(&self.name);
        for list in [
            &mut self.components,
            &mut self.data_descriptions,
            &mut self.specifications,
            &mut self.materials,
            &mut self.test_procedures,
            &mut self.stakeholders,
        ] {
            sanitize_all(list);
        }
    }

    fn check(&self) -> Result<(), CatalogError> {
        for (field, list) in self.lists() {
            if list.is_empty() {
                return Err(CatalogError::EmptyList {
                    owner: self.name.clone(),
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// A test discipline folder (e.g. "Dynamics") and its measurement names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestType {
    pub name: String,
    pub measurements: Vec<String>,
}

/// Company name fragments
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompanyNames {
    pub prefixes: Vec<String>,
    pub mids: Vec<String>,
    pub suffixes: Vec<String>,
}

/// Contract boilerplate used by purchase orders and quotes
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BusinessTerms {
    pub payment_terms: Vec<String>,
    pub delivery_terms: Vec<String>,
    pub quality_standards: Vec<String>,
    pub acceptance_criteria: Vec<String>,
    pub warranty_periods: Vec<String>,
}

#[derive(Deserialize)]
struct ThemesFile {
    themes: Vec<Theme>,
    test_types: Vec<TestType>,
}

#[derive(Deserialize)]
struct VocabularyFile {
    company_names: CompanyNames,
    business_terms: BusinessTerms,
}

/// The complete static dataset
#[derive(Debug, Clone)]
pub struct Catalog {
    themes: Vec<Theme>,
    test_types: Vec<TestType>,
    company_names: CompanyNames,
    business_terms: BusinessTerms,
}

impl Catalog {
    /// Parse and sanitize the embedded catalog
    pub fn load() -> Result<Self, CatalogError> {
        let themes: ThemesFile = parse_embedded(THEMES_FILE)?;
        let vocabulary: VocabularyFile = parse_embedded(VOCABULARY_FILE)?;
        Self::from_parts(
            themes.themes,
            themes.test_types,
            vocabulary.company_names,
            vocabulary.business_terms,
        )
    }

    /// The process-wide catalog, loaded on first use
    pub fn shared() -> Result<&'static Catalog, CatalogError> {
        SHARED.get_or_init(Self::load).as_ref().map_err(Clone::clone)
    }

    /// Build a catalog from already-parsed parts, sanitizing and checking it
    pub fn from_parts(
        mut themes: Vec<Theme>,
        mut test_types: Vec<TestType>,
        company_names: CompanyNames,
        business_terms: BusinessTerms,
    ) -> Result<Self, CatalogError> {
        if themes.is_empty() {
            return Err(CatalogError::EmptyList {
                owner: "catalog".to_string(),
                field: "themes".to_string(),
            });
        }
        if test_types.is_empty() {
            return Err(CatalogError::EmptyList {
                owner: "catalog".to_string(),
                field: "test_types".to_string(),
            });
        }

        for theme in &mut themes {
            theme.sanitize();
            theme.check()?;
        }
        for test_type in &mut test_types {
            test_type.name = sanitize_path_component(&test_type.name);
            sanitize_all(&mut test_type.measurements);
            if test_type.measurements.is_empty() {
                return Err(CatalogError::EmptyList {
                    owner: test_type.name.clone(),
                    field: "measurements".to_string(),
                });
            }
        }

        let vocabularies = [
            ("company_names.prefixes", &company_names.prefixes),
            ("company_names.mids", &company_names.mids),
            ("company_names.suffixes", &company_names.suffixes),
            ("business_terms.payment_terms", &business_terms.payment_terms),
            ("business_terms.delivery_terms", &business_terms.delivery_terms),
            ("business_terms.quality_standards", &business_terms.quality_standards),
            ("business_terms.acceptance_criteria", &business_terms.acceptance_criteria),
            ("business_terms.warranty_periods", &business_terms.warranty_periods),
        ];
        for (field, list) in vocabularies {
            if list.is_empty() {
                return Err(CatalogError::EmptyList {
                    owner: "vocabulary".to_string(),
                    field: field.to_string(),
                });
            }
        }

        Ok(Self {
            themes,
            test_types,
            company_names,
            business_terms,
        })
    }

    /// All themes, in catalog order
    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// All test types, in folder order
    pub fn test_types(&self) -> &[TestType] {
        &self.test_types
    }

    /// Test type folder names, in order
    pub fn test_type_names(&self) -> Vec<&str> {
        self.test_types.iter().map(|t| t.name.as_str()).collect()
    }

    /// Measurement names for a test type (empty for an unknown type)
    pub fn measurement_names(&self, test_type: &str) -> &[String] {
        self.test_types
            .iter()
            .find(|t| t.name == test_type)
            .map(|t| t.measurements.as_slice())
            .unwrap_or(&[])
    }

    pub fn company_names(&self) -> &CompanyNames {
        &self.company_names
    }

    pub fn business_terms(&self) -> &BusinessTerms {
        &self.business_terms
    }

    /// Look up a theme by zero-based index or case-insensitive name
    pub fn theme(&self, selector: &str) -> Option<&Theme> {
        let selector = selector.trim();
        if let Ok(index) = selector.parse::<usize>() {
            return self.themes.get(index);
        }
        self.themes
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(selector))
    }

    /// Resolve a list of selectors, silently dropping unknown ones
    pub fn select(&self, selectors: &[String]) -> Vec<Theme> {
        selectors
            .iter()
            .filter_map(|s| self.theme(s))
            .cloned()
            .collect()
    }
}

fn parse_embedded<T: serde::de::DeserializeOwned + 'static>(file: &str) -> Result<T, CatalogError> {
    let asset = EmbeddedCatalog::get(file).ok_or_else(|| CatalogError::Missing(file.to_string()))?;
    let text = std::str::from_utf8(&asset.data).map_err(|e| CatalogError::Parse {
        file: file.to_string(),
        message: e.to_string(),
    })?;
    serde_yml::from_str(text).map_err(|e| CatalogError::Parse {
        file: file.to_string(),
        message: e.to_string(),
    })
}

fn sanitize_all(list: &mut [String]) {
    for value in list.iter_mut() {
        *value = sanitize_path_component(value);
    }
}

/// Replace path separators so a value can be used as a single path token.
///
/// Idempotent: `sanitize_path_component(sanitize_path_component(x)) == sanitize_path_component(x)`.
pub fn sanitize_path_component(value: &str) -> String {
    value.replace(['/', '\\'], "-")
}

/// Make a value safe to embed in a filename.
///
/// Replaces characters that are invalid on common filesystems with `-`,
/// collapses runs of whitespace, and never returns an empty string.
pub fn sanitize_filename(value: &str) -> String {
    const INVALID: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
    let replaced = value.replace(INVALID, "-");
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        "unnamed".to_string()
    } else {
        collapsed
    }
}

/// Errors raised while loading the embedded catalog
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("catalog file '{0}' is not embedded in this build")]
    Missing(String),

    #[error("catalog file '{file}' is malformed: {message}")]
    Parse { file: String, message: String },

    #[error("catalog list '{field}' of '{owner}' is empty")]
    EmptyList { owner: String, field: String },
}

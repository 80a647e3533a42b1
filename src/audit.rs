//! Directory auditor
//!
//! Checks generated project trees against the folder schema and filename
//! conventions of [`crate::core::layout`]. Errors mark structural problems
//! (missing folders, empty critical folders, trees without files); warnings
//! mark content that downstream report assembly would trip over.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::core::catalog::Catalog;
use crate::core::layout::{
    AdminDocument, ArtifactName, DATA_DIR, DOCUMENT_EXTENSIONS, PHB_FOLDERS, PHOTOGRAPHS_DIR,
    RECEIVING_DIR, TESTING_DIR, WORKSHEETS_DIR,
};
use crate::core::naming::{PHB_PREFIX, PROJECT_PREFIX};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    MissingFolder,
    EmptyFolder,
    NoFiles,
    NoDocument,
    MultipleDocuments,
    NoImage,
    NoData,
    UnrecognizedFile,
}

impl FindingKind {
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::MissingFolder | FindingKind::EmptyFolder | FindingKind::NoFiles => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

/// One problem found in a project tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub kind: FindingKind,
    /// Path relative to the audited root
    pub path: PathBuf,
    pub message: String,
}

impl Finding {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.path.display())
    }
}

/// Findings for one or more projects
#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    pub projects: Vec<String>,
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity() == Severity::Warning)
    }

    pub fn passed(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn has(&self, kind: FindingKind) -> bool {
        self.findings.iter().any(|f| f.kind == kind)
    }

    pub fn merge(&mut self, other: AuditReport) {
        self.projects.extend(other.projects);
        self.findings.extend(other.findings);
    }
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("directory not found: {0}")]
    NotFound(PathBuf),

    #[error("no project matching '{id}' under {root:?}")]
    ProjectNotFound { id: String, root: PathBuf },
}

/// Audits project trees under one root directory
#[derive(Debug, Clone)]
pub struct DirectoryAuditor {
    root: PathBuf,
    test_types: Vec<String>,
}

impl DirectoryAuditor {
    pub fn new(root: impl Into<PathBuf>, test_types: Vec<String>) -> Self {
        Self {
            root: root.into(),
            test_types,
        }
    }

    /// Auditor expecting the catalog's test-type folders
    pub fn from_catalog(root: impl Into<PathBuf>, catalog: &Catalog) -> Self {
        let test_types = catalog.test_type_names().into_iter().map(String::from).collect();
        Self::new(root, test_types)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Audit every `PD*` directory directly under the root, in name order
    pub fn audit_tree(&self) -> Result<AuditReport, AuditError> {
        if !self.root.is_dir() {
            return Err(AuditError::NotFound(self.root.clone()));
        }
        let mut report = AuditReport::default();
        for project in self.project_dirs() {
            report.merge(self.audit_project(&project));
        }
        Ok(report)
    }

    /// Locate a project by ID, with or without the `PD` prefix
    pub fn find_project(&self, id: &str) -> Result<PathBuf, AuditError> {
        let id = id.trim();
        let prefix = if id.starts_with(PROJECT_PREFIX) {
            id.to_string()
        } else {
            format!("{}{}", PROJECT_PREFIX, id)
        };
        self.project_dirs()
            .into_iter()
            .find(|p| file_name(p).starts_with(&prefix))
            .ok_or_else(|| AuditError::ProjectNotFound {
                id: id.to_string(),
                root: self.root.clone(),
            })
    }

    /// Audit a single project directory
    pub fn audit_project(&self, project: &Path) -> AuditReport {
        let mut audit = ProjectAudit {
            root: &self.root,
            findings: Vec::new(),
        };
        debug!(project = %project.display(), "auditing project");

        audit.schema(project, &self.test_types);
        audit.empty_critical_folders(project, &self.test_types);
        audit.files_present(project, &self.test_types);
        audit.admin_documents(project);
        audit.receiving_images(project);
        audit.phb_contents(project, &self.test_types);
        audit.filenames(project);

        AuditReport {
            projects: vec![file_name(project)],
            findings: audit.findings,
        }
    }

    fn project_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = list(&self.root)
            .into_iter()
            .filter(|p| p.is_dir() && file_name(p).starts_with(PROJECT_PREFIX))
            .collect();
        dirs.sort();
        dirs
    }
}

struct ProjectAudit<'a> {
    root: &'a Path,
    findings: Vec<Finding>,
}

impl ProjectAudit<'_> {
    fn push(&mut self, kind: FindingKind, path: &Path, message: impl Into<String>) {
        let relative = path.strip_prefix(self.root).unwrap_or(path).to_path_buf();
        self.findings.push(Finding {
            kind,
            path: relative,
            message: message.into(),
        });
    }

    fn schema(&mut self, project: &Path, test_types: &[String]) {
        let mut required: Vec<PathBuf> = AdminDocument::all()
            .iter()
            .map(|kind| project.join(kind.relative_dir()))
            .collect();
        required.extend(test_types.iter().map(|t| project.join(TESTING_DIR).join(t)));
        required.push(project.join(RECEIVING_DIR));
        for phb in phb_dirs(project, test_types) {
            required.extend(PHB_FOLDERS.iter().map(|f| phb.join(f)));
        }

        for path in required {
            if !path.is_dir() {
                self.push(FindingKind::MissingFolder, &path, "Missing folder");
            }
        }
    }

    fn empty_critical_folders(&mut self, project: &Path, test_types: &[String]) {
        let mut critical: Vec<PathBuf> = vec![project.join(RECEIVING_DIR)];
        critical.extend(AdminDocument::all().iter().map(|kind| project.join(kind.relative_dir())));
        for phb in phb_dirs(project, test_types) {
            critical.push(phb.join(PHOTOGRAPHS_DIR));
            critical.push(phb.join(WORKSHEETS_DIR));
        }

        for path in critical {
            if path.is_dir() && list(&path).is_empty() {
                self.push(FindingKind::EmptyFolder, &path, "Empty folder");
            }
        }
    }

    fn files_present(&mut self, project: &Path, test_types: &[String]) {
        if !contains_files(project) {
            self.push(FindingKind::NoFiles, project, "No files in any subdirectories");
        }
        for phb in phb_dirs(project, test_types) {
            if !contains_files(&phb) {
                self.push(FindingKind::NoFiles, &phb, "No files in any subdirectories");
            }
        }
    }

    fn admin_documents(&mut self, project: &Path) {
        for kind in AdminDocument::all() {
            let folder = project.join(kind.relative_dir());
            if !folder.is_dir() {
                continue;
            }
            let documents = count_documents(&folder);
            debug!(folder = %folder.display(), documents, "admin folder");
            match documents {
                0 => self.push(FindingKind::NoDocument, &folder, "No document"),
                1 => {}
                _ => self.push(FindingKind::MultipleDocuments, &folder, "Multiple files"),
            }
        }
    }

    fn receiving_images(&mut self, project: &Path) {
        let receiving = project.join(RECEIVING_DIR);
        if !receiving.is_dir() {
            return;
        }
        let images = list(&receiving)
            .into_iter()
            .filter(|p| p.is_file() && has_extension(p, &["jpeg", "jpg"]))
            .count();
        if images == 0 {
            self.push(FindingKind::NoImage, &receiving, "No jpeg file");
        }
    }

    fn phb_contents(&mut self, project: &Path, test_types: &[String]) {
        for phb in phb_dirs(project, test_types) {
            let worksheets = phb.join(WORKSHEETS_DIR);
            if worksheets.is_dir() && count_documents(&worksheets) == 0 {
                self.push(FindingKind::NoDocument, &worksheets, "No document");
            }
            let data = phb.join(DATA_DIR);
            if data.is_dir() && list(&data).is_empty() {
                self.push(FindingKind::NoData, &data, "No files");
            }
        }
    }

    fn filenames(&mut self, project: &Path) {
        for entry in WalkDir::new(project)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            let parent = path.parent().map(file_name).unwrap_or_default();
            let placed = ArtifactName::from_path(path)
                .map(|artifact| artifact.expected_folder() == parent)
                .unwrap_or(false);
            if !placed {
                self.push(
                    FindingKind::UnrecognizedFile,
                    path,
                    format!("File does not follow the naming convention for '{}'", parent),
                );
            }
        }
    }
}

fn phb_dirs(project: &Path, test_types: &[String]) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for test_type in test_types {
        let folder = project.join(TESTING_DIR).join(test_type);
        dirs.extend(
            list(&folder)
                .into_iter()
                .filter(|p| p.is_dir() && file_name(p).starts_with(PHB_PREFIX)),
        );
    }
    dirs.sort();
    dirs
}

fn count_documents(dir: &Path) -> usize {
    list(dir)
        .into_iter()
        .filter(|p| p.is_file() && has_extension(p, &DOCUMENT_EXTENSIONS))
        .count()
}

fn contains_files(dir: &Path) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .any(|e| e.file_type().is_file())
}

/// Entries of a directory; empty when it cannot be read
fn list(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.contains(&e.to_ascii_lowercase().as_str()))
}

//! Directory generator
//!
//! Builds `N` project trees under a base directory. Each project runs
//! through the same stages in order: pick a theme, create the project root,
//! then the `admin`, `testing` and `receiving` branches. Every creation
//! attempt yields an [`Outcome`]; failures are logged and recorded in the
//! project's [`ProjectReport`] and never stop sibling work. A project whose
//! root cannot be created is counted as failed in the [`RunSummary`].

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::content::ContentGenerator;
use crate::core::catalog::{sanitize_filename, Catalog, Theme};
use crate::core::context::GenerationContext;
use crate::core::layout::{
    admin_stem, data_plot_filename, draw_unused, nod_stem, AdminDocument, ADMIN_DIR, DATA_DIR,
    NODS_DIR, PHB_FOLDERS, PHOTOGRAPHS_DIR, RECEIVING_DIR, TESTING_DIR, WORKSHEETS_DIR,
};
use crate::core::naming::{
    generate_company_name, generate_document_number, generate_phb_id, generate_project_id,
    generate_random_past_date, DOCUMENT_NUMBER_DIGITS,
};
use crate::hardware::HardwareImageGenerator;
use crate::plot::PlotRenderer;
use crate::raster::FontFace;
use crate::render::{
    output_path, renderer_for, DocumentRenderer, OutputFormat, RenderError, RenderedDocument,
};

const NAME_TAKEN: &str = "no unused file name left";

/// What a creation attempt was trying to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Directory,
    PurchaseOrder,
    Quote,
    Specification,
    Nod,
    TestLog,
    DataPlot,
    Photograph,
    HardwareImage,
}

impl ArtifactKind {
    fn admin(kind: AdminDocument) -> Self {
        match kind {
            AdminDocument::PurchaseOrder => ArtifactKind::PurchaseOrder,
            AdminDocument::Quote => ArtifactKind::Quote,
            AdminDocument::Specification => ArtifactKind::Specification,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Directory => "directory",
            ArtifactKind::PurchaseOrder => "purchase order",
            ArtifactKind::Quote => "quote",
            ArtifactKind::Specification => "specification",
            ArtifactKind::Nod => "NOD",
            ArtifactKind::TestLog => "test log",
            ArtifactKind::DataPlot => "data plot",
            ArtifactKind::Photograph => "photograph",
            ArtifactKind::HardwareImage => "hardware image",
        };
        write!(f, "{}", name)
    }
}

/// A failed creation attempt, with enough context to reproduce it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: ArtifactKind,
    pub target: PathBuf,
    pub theme: String,
    pub message: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {} (theme {}): {}",
            self.kind,
            self.target.display(),
            self.theme,
            self.message
        )
    }
}

/// Result of one creation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created { kind: ArtifactKind, path: PathBuf },
    Failed(Failure),
}

/// Everything attempted for one project
#[derive(Debug, Clone, Default)]
pub struct ProjectReport {
    pub name: String,
    pub path: PathBuf,
    pub theme: String,
    pub outcomes: Vec<Outcome>,
}

impl ProjectReport {
    fn new(name: String, path: PathBuf, theme: &Theme) -> Self {
        Self {
            name,
            path,
            theme: theme.name.clone(),
            outcomes: Vec::new(),
        }
    }

    fn created(&mut self, kind: ArtifactKind, path: PathBuf) {
        debug!(%kind, path = %path.display(), "created");
        self.outcomes.push(Outcome::Created { kind, path });
    }

    fn failed(&mut self, kind: ArtifactKind, target: &Path, message: impl fmt::Display) {
        let failure = Failure {
            kind,
            target: target.to_path_buf(),
            theme: self.theme.clone(),
            message: message.to_string(),
        };
        error!(
            kind = %failure.kind,
            target = %failure.target.display(),
            theme = %failure.theme,
            "{}",
            failure.message
        );
        self.outcomes.push(Outcome::Failed(failure));
    }

    /// Create a directory, recording the outcome; `false` when it failed
    fn dir(&mut self, path: &Path) -> bool {
        match std::fs::create_dir_all(path) {
            Ok(()) => {
                debug!(path = %path.display(), "directory ready");
                true
            }
            Err(e) => {
                self.failed(ArtifactKind::Directory, path, e);
                false
            }
        }
    }

    fn document(&mut self, kind: ArtifactKind, target: &Path, result: Result<RenderedDocument, RenderError>) {
        match result {
            Ok(doc) => self.created(kind, doc.path),
            Err(e) => self.failed(kind, target, e),
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &Failure> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Failed(f) => Some(f),
            Outcome::Created { .. } => None,
        })
    }

    /// Paths of created files (directories are not recorded)
    pub fn created_files(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Created { path, .. } => Some(path.as_path()),
            Outcome::Failed(_) => None,
        })
    }

    pub fn count(&self, kind: ArtifactKind) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Created { kind: k, .. } if *k == kind))
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Totals for a whole run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub attempted: usize,
    pub projects: Vec<ProjectReport>,
    /// Projects that could not be started, one message each
    pub aborted: Vec<String>,
}

impl RunSummary {
    pub fn completed(&self) -> usize {
        self.projects.iter().filter(|p| p.is_complete()).count()
    }

    pub fn partial(&self) -> usize {
        self.projects.iter().filter(|p| !p.is_complete()).count()
    }

    pub fn failed(&self) -> usize {
        self.aborted.len()
    }

    pub fn files_created(&self) -> usize {
        self.projects.iter().map(|p| p.created_files().count()).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Failure> {
        self.projects.iter().flat_map(|p| p.failures())
    }
}

/// Errors that stop a project (or the whole run) from starting
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("cannot create base directory {path:?}: {source}")]
    BaseDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create project directory {path:?}: {source}")]
    ProjectDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no themes available")]
    NoThemes,
}

/// Builds project trees under one base directory
pub struct DirectoryGenerator<'c> {
    base_dir: PathBuf,
    catalog: &'c Catalog,
    themes: Vec<Theme>,
    renderer: Box<dyn DocumentRenderer + 'c>,
    hardware: HardwareImageGenerator,
    plots: PlotRenderer,
}

impl<'c> DirectoryGenerator<'c> {
    /// Create the base directory and the collaborators for `format`
    ///
    /// An empty `themes` list means every catalog theme.
    pub fn new(
        catalog: &'c Catalog,
        base_dir: impl Into<PathBuf>,
        themes: Vec<Theme>,
        format: OutputFormat,
        font_path: Option<&Path>,
    ) -> Result<Self, GenerateError> {
        let base_dir = base_dir.into();
        let themes = if themes.is_empty() {
            catalog.themes().to_vec()
        } else {
            themes
        };
        if themes.is_empty() {
            return Err(GenerateError::NoThemes);
        }

        std::fs::create_dir_all(&base_dir).map_err(|source| GenerateError::BaseDirectory {
            path: base_dir.clone(),
            source,
        })?;
        info!(path = %base_dir.display(), "base directory ready");

        let face = FontFace::load(font_path);
        Ok(Self {
            base_dir,
            catalog,
            themes,
            renderer: renderer_for(format, ContentGenerator::new(catalog), font_path),
            hardware: HardwareImageGenerator::with_face(face.clone()),
            plots: PlotRenderer::with_face(face),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Generate `count` projects; a failing project never stops the next one
    pub fn generate_structure(&self, ctx: &mut GenerationContext, count: usize) -> RunSummary {
        let mut summary = RunSummary {
            attempted: count,
            ..RunSummary::default()
        };
        for i in 0..count {
            info!("creating project {} of {}", i + 1, count);
            match self.create_project(ctx) {
                Ok(report) => summary.projects.push(report),
                Err(e) => {
                    error!(project = i + 1, error = %e, "project failed");
                    summary.aborted.push(e.to_string());
                }
            }
        }
        summary
    }

    /// Build one project tree
    pub fn create_project(&self, ctx: &mut GenerationContext) -> Result<ProjectReport, GenerateError> {
        let theme = ctx.choose(&self.themes).ok_or(GenerateError::NoThemes)?;

        let project_id = generate_project_id(ctx);
        let company = generate_company_name(ctx, self.catalog.company_names());
        let name = sanitize_filename(&format!("{} {}", project_id, company));
        let root = self.base_dir.join(&name);
        info!(project = %name, theme = %theme.name, "creating project");

        // IDs are not checked for uniqueness; a repeated ID reuses the folder
        std::fs::create_dir_all(&root).map_err(|source| GenerateError::ProjectDirectory {
            path: root.clone(),
            source,
        })?;

        let mut report = ProjectReport::new(name, root.clone(), theme);
        self.build_admin(ctx, &mut report, &root.join(ADMIN_DIR), theme);
        self.build_testing(ctx, &mut report, &root.join(TESTING_DIR), theme);
        self.build_receiving(ctx, &mut report, &root.join(RECEIVING_DIR), theme);
        Ok(report)
    }

    fn build_admin(&self, ctx: &mut GenerationContext, report: &mut ProjectReport, admin: &Path, theme: &Theme) {
        if !report.dir(admin) {
            return;
        }
        let chance = ctx.config().admin_document_chance;
        for &kind in AdminDocument::all() {
            let folder = admin.join(kind.folder());
            if !report.dir(&folder) {
                continue;
            }
            if !ctx.chance(chance) {
                debug!(folder = %folder.display(), "admin folder left empty");
                continue;
            }
            let stem = match draw_unused(
                || admin_stem(kind, &generate_document_number(ctx, DOCUMENT_NUMBER_DIGITS)),
                |stem| output_path(&folder, stem, self.renderer.format()),
            ) {
                Ok(stem) => stem,
                Err(taken) => {
                    report.failed(ArtifactKind::admin(kind), &taken, NAME_TAKEN);
                    continue;
                }
            };
            let result = match kind {
                AdminDocument::PurchaseOrder => self.renderer.create_purchase_order(ctx, &folder, &stem, theme),
                AdminDocument::Quote => self.renderer.create_quote(ctx, &folder, &stem, theme),
                AdminDocument::Specification => self.renderer.create_specification(ctx, &folder, &stem, theme),
            };
            report.document(ArtifactKind::admin(kind), &folder.join(&stem), result);
        }
    }

    fn build_testing(&self, ctx: &mut GenerationContext, report: &mut ProjectReport, testing: &Path, theme: &Theme) {
        if !report.dir(testing) {
            return;
        }
        let max_phb = ctx.config().max_phb_per_test_type;
        for test_type in self.catalog.test_type_names() {
            let type_dir = testing.join(test_type);
            if !report.dir(&type_dir) {
                continue;
            }
            let phb_count = ctx.count(0, max_phb);
            for _ in 0..phb_count {
                // a fresh PHB folder keeps index-named plots and photographs unique
                match draw_unused(|| type_dir.join(generate_phb_id(ctx)), |phb| phb.clone()) {
                    Ok(phb) => self.build_phb(ctx, report, &phb, test_type, theme),
                    Err(taken) => report.failed(ArtifactKind::Directory, &taken, NAME_TAKEN),
                }
            }
        }
    }

    fn build_phb(
        &self,
        ctx: &mut GenerationContext,
        report: &mut ProjectReport,
        phb: &Path,
        test_type: &str,
        theme: &Theme,
    ) {
        debug!(phb = %phb.display(), test_type, "building PHB");
        // all four subfolders exist before any content is attempted
        if !PHB_FOLDERS.iter().all(|folder| report.dir(&phb.join(folder))) {
            warn!(phb = %phb.display(), "skipping PHB contents");
            return;
        }
        let config = ctx.config().clone();

        let data = phb.join(DATA_DIR);
        let measurements = self.catalog.measurement_names(test_type);
        for i in 0..ctx.count(0, config.max_data_plots) {
            let component = sanitize_filename(&ctx.pick(&theme.components));
            let data_type = sanitize_filename(&ctx.pick(&theme.data_descriptions));
            let test_specific = sanitize_filename(&ctx.pick(measurements));
            let filename = data_plot_filename(i + 1, &component, &data_type, &test_specific);
            let description = format!("{}_{}_{}", component, data_type, test_specific);
            match self.plots.create_data_plot(ctx, &data, &filename, &description) {
                Ok(path) => report.created(ArtifactKind::DataPlot, path),
                Err(e) => report.failed(ArtifactKind::DataPlot, &data.join(&filename), e),
            }
        }

        let format = self.renderer.format();
        let nods = phb.join(NODS_DIR);
        if ctx.chance(config.nod_chance) {
            for _ in 0..ctx.count(1, config.max_nods) {
                match draw_unused(
                    || nod_stem(generate_random_past_date(ctx, config.nod_max_days_back)),
                    |stem| output_path(&nods, stem, format),
                ) {
                    Ok(stem) => {
                        let result = self.renderer.create_nod(ctx, &nods, &stem, theme);
                        report.document(ArtifactKind::Nod, &nods.join(&stem), result);
                    }
                    Err(taken) => report.failed(ArtifactKind::Nod, &taken, NAME_TAKEN),
                }
            }
        }

        let photographs = phb.join(PHOTOGRAPHS_DIR);
        for i in 0..ctx.count(1, config.max_photographs) {
            let component = ctx.pick(&theme.components);
            match self.hardware.save_photograph(ctx, &photographs, i + 1, &component) {
                Ok(path) => report.created(ArtifactKind::Photograph, path),
                Err(e) => report.failed(ArtifactKind::Photograph, &photographs, e),
            }
        }

        let worksheets = phb.join(WORKSHEETS_DIR);
        for _ in 0..ctx.count(1, config.max_test_logs) {
            match draw_unused(
                || self.renderer.content().test_log(ctx, test_type, theme),
                |log| output_path(&worksheets, &log.stem, format),
            ) {
                Ok(log) => {
                    let result = self.renderer.render(&log.tree, &worksheets, &log.stem);
                    report.document(ArtifactKind::TestLog, &worksheets.join(&log.stem), result);
                }
                Err(taken) => report.failed(ArtifactKind::TestLog, &taken, NAME_TAKEN),
            }
        }
    }

    fn build_receiving(&self, ctx: &mut GenerationContext, report: &mut ProjectReport, receiving: &Path, theme: &Theme) {
        if !report.dir(receiving) {
            return;
        }
        let wanted = ctx.count(1, ctx.config().max_receiving_images);
        match self
            .hardware
            .generate_multiple_images(ctx, receiving, &theme.components, wanted)
        {
            Ok(paths) => {
                let made = paths.len();
                for path in paths {
                    report.created(ArtifactKind::HardwareImage, path);
                }
                if made < wanted {
                    report.failed(
                        ArtifactKind::HardwareImage,
                        receiving,
                        format!("{} of {} images could not be created", wanted - made, wanted),
                    );
                }
                info!(count = made, "hardware images created in receiving");
            }
            Err(e) => report.failed(ArtifactKind::HardwareImage, receiving, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GeneratorConfig;
    use crate::core::layout::ArtifactName;
    use chrono::NaiveDate;
    use std::collections::{BTreeMap, BTreeSet};
    use tempfile::tempdir;
    use walkdir::WalkDir;

    fn small_config() -> GeneratorConfig {
        GeneratorConfig {
            max_phb_per_test_type: 2,
            max_data_plots: 2,
            max_nods: 2,
            nod_chance: 0.5,
            max_photographs: 2,
            max_test_logs: 1,
            max_receiving_images: 2,
            ..GeneratorConfig::default()
        }
    }

    fn context(seed: u64) -> GenerationContext {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        GenerationContext::new(Some(seed), small_config()).with_today(today)
    }

    fn subdirs(path: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(path)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect()
    }

    fn relative_tree(root: &Path) -> BTreeSet<String> {
        WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.path().strip_prefix(root).unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_every_project_has_the_full_schema() {
        let catalog = Catalog::load().unwrap();
        let dir = tempdir().unwrap();
        let generator =
            DirectoryGenerator::new(&catalog, dir.path(), Vec::new(), OutputFormat::Pdf, None).unwrap();
        let mut ctx = context(201);

        let summary = generator.generate_structure(&mut ctx, 2);
        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.failed(), 0);

        let projects = subdirs(dir.path());
        assert!(!projects.is_empty());
        for project in projects {
            for required in [
                "admin/PO",
                "admin/quotes",
                "admin/specification",
                "testing/Dynamics",
                "testing/EMIEMC",
                "testing/Environmental",
                "receiving",
            ] {
                assert!(project.join(required).is_dir(), "{required} missing in {project:?}");
            }
            for test_type in subdirs(&project.join("testing")) {
                for phb in subdirs(&test_type) {
                    for folder in PHB_FOLDERS {
                        assert!(phb.join(folder).is_dir());
                    }
                }
            }
        }
    }

    #[test]
    fn test_rocket_engine_scenario() {
        let catalog = Catalog::load().unwrap();
        let dir = tempdir().unwrap();
        let themes = catalog.select(&["Rocket Engine".to_string()]);
        let generator =
            DirectoryGenerator::new(&catalog, dir.path(), themes, OutputFormat::Pdf, None).unwrap();
        let mut ctx = context(202);

        let summary = generator.generate_structure(&mut ctx, 1);
        assert_eq!(summary.projects.len(), 1);
        assert_eq!(summary.projects[0].theme, "Rocket Engine");

        let projects = subdirs(dir.path());
        assert_eq!(projects.len(), 1);
        let name = projects[0].file_name().unwrap().to_string_lossy().to_string();
        let (id, company) = name.split_once(' ').unwrap();
        assert_eq!(id.len(), 10);
        assert!(id.starts_with("PD") && id[2..].chars().all(|c| c.is_ascii_digit()));
        assert!(!company.is_empty());

        assert!(std::fs::read_dir(projects[0].join("admin/PO")).unwrap().count() <= 1);
        for test_type in subdirs(&projects[0].join("testing")) {
            for phb in subdirs(&test_type) {
                assert!(phb.file_name().unwrap().to_string_lossy().starts_with("PHB"));
                let photos = std::fs::read_dir(phb.join("photographs")).unwrap().count();
                assert!(photos >= 1);
            }
        }
    }

    fn file_bytes(root: &Path) -> BTreeMap<String, Vec<u8>> {
        WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let name = e.path().strip_prefix(root).unwrap().to_string_lossy().to_string();
                (name, std::fs::read(e.path()).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let catalog = Catalog::load().unwrap();
        for format in [OutputFormat::Pdf, OutputFormat::Png] {
            let a = tempdir().unwrap();
            let b = tempdir().unwrap();
            for dir in [&a, &b] {
                let generator =
                    DirectoryGenerator::new(&catalog, dir.path(), Vec::new(), format, None).unwrap();
                generator.generate_structure(&mut context(203), 2);
            }
            let tree_a = relative_tree(a.path());
            assert!(tree_a.len() > 10);
            assert_eq!(tree_a, relative_tree(b.path()));

            let files_a = file_bytes(a.path());
            let files_b = file_bytes(b.path());
            assert!(files_a.keys().any(|name| name.ends_with(format.extension())));
            for (name, bytes) in &files_a {
                assert!(files_b[name] == *bytes, "{name} differs between runs ({format:?})");
            }
        }
    }

    #[test]
    fn test_colliding_names_are_redrawn_not_overwritten() {
        let catalog = Catalog::load().unwrap();
        let dir = tempdir().unwrap();
        let generator =
            DirectoryGenerator::new(&catalog, dir.path(), Vec::new(), OutputFormat::Jpg, None).unwrap();
        let config = GeneratorConfig {
            nod_chance: 1.0,
            max_nods: 5,
            nod_max_days_back: 2,
            ..small_config()
        };
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let mut ctx = GenerationContext::new(Some(11), config).with_today(today);
        let summary = generator.generate_structure(&mut ctx, 3);

        let mut reported = 0;
        for report in &summary.projects {
            reported += report.count(ArtifactKind::Nod);
            let created: BTreeSet<&Path> = report.created_files().collect();
            assert_eq!(created.len(), report.created_files().count(), "a file was reported twice");
            for failure in report.failures() {
                assert_eq!(failure.message, NAME_TAKEN);
                assert!(failure.target.exists());
            }
        }
        let on_disk = WalkDir::new(dir.path())
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && e.file_name().to_string_lossy().starts_with("NOD_"))
            .count();
        assert!(reported > 0);
        assert_eq!(reported, on_disk);
    }

    #[test]
    fn test_rerun_into_same_directory_keeps_earlier_files() {
        let catalog = Catalog::load().unwrap();
        let dir = tempdir().unwrap();
        let generator =
            DirectoryGenerator::new(&catalog, dir.path(), Vec::new(), OutputFormat::Jpg, None).unwrap();
        generator.generate_structure(&mut context(207), 1);
        let first = file_bytes(dir.path());

        // the same seed draws the same project ID, so every name clashes
        let summary = generator.generate_structure(&mut context(207), 1);
        let second = file_bytes(dir.path());
        for (name, bytes) in &first {
            assert!(second[name] == *bytes, "{name} was rewritten");
        }
        assert_eq!(second.len(), first.len() + summary.files_created());
    }

    #[test]
    fn test_generated_filenames_follow_conventions() {
        let catalog = Catalog::load().unwrap();
        let dir = tempdir().unwrap();
        let generator =
            DirectoryGenerator::new(&catalog, dir.path(), Vec::new(), OutputFormat::Jpg, None).unwrap();
        let summary = generator.generate_structure(&mut context(204), 1);

        let report = &summary.projects[0];
        assert!(report.count(ArtifactKind::HardwareImage) >= 1);
        for path in report.created_files() {
            let parsed = ArtifactName::from_path(path)
                .unwrap_or_else(|| panic!("unrecognised filename {path:?}"));
            let parent = path.parent().unwrap().file_name().unwrap().to_string_lossy().to_string();
            assert_eq!(parsed.expected_folder(), parent);
        }
    }

    #[test]
    fn test_admin_chance_zero_leaves_admin_folders_empty() {
        let catalog = Catalog::load().unwrap();
        let dir = tempdir().unwrap();
        let generator =
            DirectoryGenerator::new(&catalog, dir.path(), Vec::new(), OutputFormat::Pdf, None).unwrap();
        let config = GeneratorConfig {
            admin_document_chance: 0.0,
            max_phb_per_test_type: 0,
            ..small_config()
        };
        let mut ctx = GenerationContext::new(Some(205), config);
        let summary = generator.generate_structure(&mut ctx, 1);

        let report = &summary.projects[0];
        assert!(report.is_complete());
        assert_eq!(report.count(ArtifactKind::PurchaseOrder), 0);
        for kind in AdminDocument::all() {
            assert_eq!(std::fs::read_dir(report.path.join(kind.relative_dir())).unwrap().count(), 0);
        }
        assert_eq!(summary.completed(), 1);
        assert_eq!(summary.partial(), 0);
    }

    #[test]
    fn test_unwritable_branch_is_recorded_not_fatal() {
        let catalog = Catalog::load().unwrap();
        let dir = tempdir().unwrap();
        let generator =
            DirectoryGenerator::new(&catalog, dir.path(), Vec::new(), OutputFormat::Pdf, None).unwrap();
        let mut report = ProjectReport::new("PD00000000 Test".into(), dir.path().into(), &catalog.themes()[0]);

        // a regular file where the receiving folder should be
        let blocked = dir.path().join("receiving");
        std::fs::write(&blocked, b"not a directory").unwrap();
        generator.build_receiving(&mut context(206), &mut report, &blocked, &catalog.themes()[0]);

        assert!(!report.is_complete());
        let failure = report.failures().next().unwrap();
        assert_eq!(failure.kind, ArtifactKind::Directory);
        assert_eq!(failure.theme, catalog.themes()[0].name);
    }

    #[test]
    fn test_empty_selection_uses_every_theme() {
        let catalog = Catalog::load().unwrap();
        let dir = tempdir().unwrap();
        let generator =
            DirectoryGenerator::new(&catalog, dir.path(), Vec::new(), OutputFormat::Pdf, None).unwrap();
        assert_eq!(generator.themes().len(), catalog.themes().len());
        assert_eq!(generator.base_dir(), dir.path());
    }
}

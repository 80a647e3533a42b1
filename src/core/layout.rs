//! Folder schema and filename conventions
//!
//! Downstream tooling (report assembly, the auditor) locates artifacts by
//! these names alone, so every builder here has a matching parser and the
//! two must stay in lockstep.
//!
//! ```text
//! <project>/admin/{PO,quotes,specification}/
//! <project>/testing/<test type>/PHB<8 digits>/{data,NODs,photographs,worksheets}/
//! <project>/receiving/
//! ```

use chrono::NaiveDate;
use std::fmt;
use std::path::{Path, PathBuf};

pub const ADMIN_DIR: &str = "admin";
pub const TESTING_DIR: &str = "testing";
pub const RECEIVING_DIR: &str = "receiving";

pub const DATA_DIR: &str = "data";
pub const NODS_DIR: &str = "NODs";
pub const PHOTOGRAPHS_DIR: &str = "photographs";
pub const WORKSHEETS_DIR: &str = "worksheets";

/// PHB subfolders, always created even when empty
pub const PHB_FOLDERS: [&str; 4] = [DATA_DIR, NODS_DIR, PHOTOGRAPHS_DIR, WORKSHEETS_DIR];

/// Extension of data plots
pub const PLOT_EXTENSION: &str = "jpg";
/// Extension of photographs and hardware images
pub const PHOTO_EXTENSION: &str = "jpeg";
/// Extensions a rendered document may carry
pub const DOCUMENT_EXTENSIONS: [&str; 3] = ["pdf", "jpg", "png"];

const NOD_PREFIX: &str = "NOD_";
const NOD_DATE_FORMAT: &str = "%m.%d.%Y";
const TEST_LOG_PREFIX: &str = "TestLog_";
const TEST_LOG_DATE_FORMAT: &str = "%Y%m%d";
const PHOTO_PREFIX: &str = "photo_";
const HARDWARE_PREFIX: &str = "hardware_";

/// The three admin document folders and their single document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminDocument {
    PurchaseOrder,
    Quote,
    Specification,
}

impl AdminDocument {
    pub fn all() -> &'static [AdminDocument] {
        &[
            AdminDocument::PurchaseOrder,
            AdminDocument::Quote,
            AdminDocument::Specification,
        ]
    }

    /// Folder under `admin/`
    pub fn folder(&self) -> &'static str {
        match self {
            AdminDocument::PurchaseOrder => "PO",
            AdminDocument::Quote => "quotes",
            AdminDocument::Specification => "specification",
        }
    }

    /// Filename prefix preceding the document number
    pub fn prefix(&self) -> &'static str {
        match self {
            AdminDocument::PurchaseOrder => "PO",
            AdminDocument::Quote => "Quote",
            AdminDocument::Specification => "spec",
        }
    }

    /// Relative path `admin/<folder>`
    pub fn relative_dir(&self) -> String {
        format!("{}/{}", ADMIN_DIR, self.folder())
    }
}

impl fmt::Display for AdminDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminDocument::PurchaseOrder => write!(f, "purchase order"),
            AdminDocument::Quote => write!(f, "quote"),
            AdminDocument::Specification => write!(f, "specification"),
        }
    }
}

/// Candidates drawn by [`draw_unused`] before giving up
pub const NAME_ATTEMPTS: usize = 32;

/// Draw candidates until one maps to a path that does not exist yet
///
/// Output is append-only, so a clash is redrawn rather than overwritten.
/// When every attempt clashes the last taken path is returned as the error.
pub fn draw_unused<T>(mut draw: impl FnMut() -> T, path_of: impl Fn(&T) -> PathBuf) -> Result<T, PathBuf> {
    let mut taken = PathBuf::new();
    for _ in 0..NAME_ATTEMPTS {
        let candidate = draw();
        let path = path_of(&candidate);
        if !path.exists() {
            return Ok(candidate);
        }
        taken = path;
    }
    Err(taken)
}

/// `PO123456`, `Quote123456`, `spec123456`
pub fn admin_stem(kind: AdminDocument, number: &str) -> String {
    format!("{}{}", kind.prefix(), number)
}

/// `NOD_MM.DD.YYYY`
pub fn nod_stem(date: NaiveDate) -> String {
    format!("{}{}", NOD_PREFIX, date.format(NOD_DATE_FORMAT))
}

/// Extract the date embedded in a NOD filename stem (`NOD_MM.DD.YYYY`)
pub fn parse_nod_date(stem: &str) -> Option<NaiveDate> {
    let rest = stem.strip_prefix(NOD_PREFIX)?;
    let token = rest.split('_').next()?;
    if token.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(token, NOD_DATE_FORMAT).ok()
}

/// `<index:03>_<component>_<data type>_<test specific>.jpg`
pub fn data_plot_filename(index: usize, component: &str, data_type: &str, test_specific: &str) -> String {
    format!(
        "{:03}_{}_{}_{}.{}",
        index, component, data_type, test_specific, PLOT_EXTENSION
    )
}

/// `photo_<index:03>_<component>.jpeg`
pub fn photograph_filename(index: usize, component: &str) -> String {
    format!("{}{:03}_{}.{}", PHOTO_PREFIX, index, component, PHOTO_EXTENSION)
}

/// `hardware_<component>_<4 digits>.jpeg`
pub fn hardware_filename(component: &str, disambiguator: u16) -> String {
    format!(
        "{}{}_{:04}.{}",
        HARDWARE_PREFIX, component, disambiguator, PHOTO_EXTENSION
    )
}

/// `TestLog_<component>_<procedure>_<YYYYMMDD>`
pub fn test_log_stem(component: &str, procedure: &str, date: NaiveDate) -> String {
    format!(
        "{}{}_{}_{}",
        TEST_LOG_PREFIX,
        component,
        procedure,
        date.format(TEST_LOG_DATE_FORMAT)
    )
}

/// A filename recognised as one of the generated artifact kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactName {
    Admin {
        kind: AdminDocument,
        number: String,
        extension: String,
    },
    Nod {
        date: NaiveDate,
        extension: String,
    },
    DataPlot {
        index: u32,
        component: String,
        data_type: String,
        test_specific: String,
    },
    Photograph {
        index: u32,
        component: String,
    },
    Hardware {
        component: String,
        disambiguator: u16,
    },
    TestLog {
        component: String,
        procedure: String,
        date: NaiveDate,
        extension: String,
    },
}

impl ArtifactName {
    /// Classify a bare filename; `None` when it follows no known convention
    pub fn parse(filename: &str) -> Option<Self> {
        let (stem, extension) = filename.rsplit_once('.')?;
        if stem.is_empty() || extension.is_empty() {
            return None;
        }

        if let Some(rest) = stem.strip_prefix(TEST_LOG_PREFIX) {
            return Self::parse_test_log(rest, extension);
        }
        if stem.starts_with(NOD_PREFIX) {
            if !is_document_extension(extension) {
                return None;
            }
            return parse_nod_date(stem)
                .filter(|date| nod_stem(*date) == stem)
                .map(|date| ArtifactName::Nod {
                    date,
                    extension: extension.to_string(),
                });
        }
        if let Some(rest) = stem.strip_prefix(PHOTO_PREFIX) {
            return Self::parse_photograph(rest, extension);
        }
        if let Some(rest) = stem.strip_prefix(HARDWARE_PREFIX) {
            return Self::parse_hardware(rest, extension);
        }
        if let Some(plot) = Self::parse_data_plot(stem, extension) {
            return Some(plot);
        }
        Self::parse_admin(stem, extension)
    }

    /// Classify the final component of a path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(Self::parse)
    }

    /// The folder (relative to its parent PHB or project) this artifact belongs in
    pub fn expected_folder(&self) -> &'static str {
        match self {
            ArtifactName::Admin { kind, .. } => kind.folder(),
            ArtifactName::Nod { .. } => NODS_DIR,
            ArtifactName::DataPlot { .. } => DATA_DIR,
            ArtifactName::Photograph { .. } => PHOTOGRAPHS_DIR,
            ArtifactName::Hardware { .. } => RECEIVING_DIR,
            ArtifactName::TestLog { .. } => WORKSHEETS_DIR,
        }
    }

    fn parse_test_log(rest: &str, extension: &str) -> Option<Self> {
        if !is_document_extension(extension) {
            return None;
        }
        let (head, date) = rest.rsplit_once('_')?;
        if date.len() != 8 {
            return None;
        }
        let date = NaiveDate::parse_from_str(date, TEST_LOG_DATE_FORMAT).ok()?;
        let parts: Vec<&str> = head.split('_').collect();
        match parts.as_slice() {
            [component, procedure] if !component.is_empty() && !procedure.is_empty() => {
                Some(ArtifactName::TestLog {
                    component: component.to_string(),
                    procedure: procedure.to_string(),
                    date,
                    extension: extension.to_string(),
                })
            }
            _ => None,
        }
    }

    fn parse_photograph(rest: &str, extension: &str) -> Option<Self> {
        if extension != PHOTO_EXTENSION {
            return None;
        }
        let (index, component) = rest.split_once('_')?;
        if index.len() != 3 || component.is_empty() || component.contains('_') {
            return None;
        }
        Some(ArtifactName::Photograph {
            index: parse_digits(index)?,
            component: component.to_string(),
        })
    }

    fn parse_hardware(rest: &str, extension: &str) -> Option<Self> {
        if extension != PHOTO_EXTENSION {
            return None;
        }
        let (component, digits) = rest.rsplit_once('_')?;
        if digits.len() != 4 || component.is_empty() {
            return None;
        }
        Some(ArtifactName::Hardware {
            component: component.to_string(),
            disambiguator: parse_digits(digits)? as u16,
        })
    }

    fn parse_data_plot(stem: &str, extension: &str) -> Option<Self> {
        if extension != PLOT_EXTENSION {
            return None;
        }
        let parts: Vec<&str> = stem.split('_').collect();
        match parts.as_slice() {
            [index, component, data_type, test_specific]
                if index.len() == 3
                    && !component.is_empty()
                    && !data_type.is_empty()
                    && !test_specific.is_empty() =>
            {
                Some(ArtifactName::DataPlot {
                    index: parse_digits(index)?,
                    component: component.to_string(),
                    data_type: data_type.to_string(),
                    test_specific: test_specific.to_string(),
                })
            }
            _ => None,
        }
    }

    fn parse_admin(stem: &str, extension: &str) -> Option<Self> {
        if !is_document_extension(extension) {
            return None;
        }
        for kind in AdminDocument::all() {
            if let Some(number) = stem.strip_prefix(kind.prefix()) {
                if number.len() == 6 && number.chars().all(|c| c.is_ascii_digit()) {
                    return Some(ArtifactName::Admin {
                        kind: *kind,
                        number: number.to_string(),
                        extension: extension.to_string(),
                    });
                }
            }
        }
        None
    }
}

fn is_document_extension(extension: &str) -> bool {
    DOCUMENT_EXTENSIONS.contains(&extension)
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_nod_round_trip() {
        for d in [date(2024, 1, 5), date(2023, 12, 31), date(2022, 2, 28)] {
            let stem = nod_stem(d);
            let parsed = parse_nod_date(&stem).unwrap();
            assert_eq!(nod_stem(parsed), stem);
        }
        assert_eq!(nod_stem(date(2024, 1, 5)), "NOD_01.05.2024");
    }

    #[test]
    fn test_nod_invalid_calendar_date() {
        assert!(parse_nod_date("NOD_13.45.2024").is_none());
        assert!(parse_nod_date("NOD_02.30.2024").is_none());
        assert!(parse_nod_date("NOD_").is_none());
        assert!(parse_nod_date("PO123456").is_none());
    }

    #[test]
    fn test_builders_follow_conventions() {
        assert_eq!(admin_stem(AdminDocument::Quote, "012345"), "Quote012345");
        assert_eq!(
            data_plot_filename(7, "Nozzle", "Thrust", "Vibration"),
            "007_Nozzle_Thrust_Vibration.jpg"
        );
        assert_eq!(photograph_filename(12, "Igniter"), "photo_012_Igniter.jpeg");
        assert_eq!(hardware_filename("Turbopump", 42), "hardware_Turbopump_0042.jpeg");
        assert_eq!(
            test_log_stem("Strut", "Drop Test", date(2024, 7, 9)),
            "TestLog_Strut_Drop Test_20240709"
        );
    }

    #[test]
    fn test_parse_recognises_every_kind() {
        assert_eq!(
            ArtifactName::parse("PO123456.pdf"),
            Some(ArtifactName::Admin {
                kind: AdminDocument::PurchaseOrder,
                number: "123456".into(),
                extension: "pdf".into()
            })
        );
        assert!(matches!(
            ArtifactName::parse("spec000001.png"),
            Some(ArtifactName::Admin { kind: AdminDocument::Specification, .. })
        ));
        assert!(matches!(
            ArtifactName::parse("NOD_03.04.2024.pdf"),
            Some(ArtifactName::Nod { .. })
        ));
        assert!(matches!(
            ArtifactName::parse("001_Combustion Chamber_Flow Rate_Sine Sweep.jpg"),
            Some(ArtifactName::DataPlot { index: 1, .. })
        ));
        assert!(matches!(
            ArtifactName::parse("photo_010_PV Array.jpeg"),
            Some(ArtifactName::Photograph { index: 10, .. })
        ));
        assert!(matches!(
            ArtifactName::parse("hardware_Fill-Drain Valve_0815.jpeg"),
            Some(ArtifactName::Hardware { disambiguator: 815, .. })
        ));
        assert_eq!(
            ArtifactName::parse("TestLog_Seals_Leak Test_20240101.jpg"),
            Some(ArtifactName::TestLog {
                component: "Seals".into(),
                procedure: "Leak Test".into(),
                date: date(2024, 1, 1),
                extension: "jpg".into()
            })
        );
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        for name in [
            "notes.txt",
            "PO12345.pdf",
            "Quote1234567.pdf",
            "NOD_13.45.2024.pdf",
            "photo_1_Nozzle.jpeg",
            "hardware_Nozzle_12.jpeg",
            "TestLog_Nozzle_20240101.pdf",
            "01_Nozzle_Thrust_Vibration.jpg",
            "README",
        ] {
            assert!(ArtifactName::parse(name).is_none(), "{name}");
        }
    }

    #[test]
    fn test_expected_folder() {
        let plot = ArtifactName::parse("003_Strut_Load Test_Shock.jpg").unwrap();
        assert_eq!(plot.expected_folder(), DATA_DIR);
        let nod = ArtifactName::parse("NOD_11.30.2023.png").unwrap();
        assert_eq!(nod.expected_folder(), NODS_DIR);
    }

    #[test]
    fn test_draw_unused_skips_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("NOD_01.01.2024.pdf"), b"x").unwrap();

        let mut candidates = vec![date(2024, 1, 2), date(2024, 1, 1)];
        let stem = draw_unused(
            || nod_stem(candidates.pop().unwrap()),
            |stem| dir.path().join(format!("{}.pdf", stem)),
        )
        .unwrap();
        assert_eq!(stem, "NOD_01.02.2024");

        let taken = draw_unused(|| "NOD_01.01.2024".to_string(), |stem| dir.path().join(format!("{}.pdf", stem)));
        assert_eq!(taken, Err(dir.path().join("NOD_01.01.2024.pdf")));
    }
}

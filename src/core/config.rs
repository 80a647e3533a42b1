//! Generator configuration with layered hierarchy
//!
//! The randomization policy (counts and probabilities per folder) is data,
//! not code: every bound can be overridden from a config file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project-local config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "testbed.yaml";

/// Randomization policy and output settings for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Probability that each admin folder receives its document
    pub admin_document_chance: f64,

    /// PHB folders per test type, uniform in `0..=max`
    pub max_phb_per_test_type: usize,

    /// Data plots per PHB, uniform in `0..=max`
    pub max_data_plots: usize,

    /// Probability that a PHB contains NODs
    pub nod_chance: f64,

    /// NODs per PHB when present, uniform in `1..=max`
    pub max_nods: usize,

    /// Photographs per PHB, uniform in `1..=max`
    pub max_photographs: usize,

    /// Test logs per PHB, uniform in `1..=max`
    pub max_test_logs: usize,

    /// Hardware images in `receiving`, uniform in `1..=max`
    pub max_receiving_images: usize,

    /// NOD dates fall within this many days before the run date
    pub nod_max_days_back: u32,

    /// Test-log dates fall within this many days before the run date
    pub test_log_max_days_back: u32,

    /// Scalable font used by raster output (system fonts are tried otherwise)
    pub font_path: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            admin_document_chance: 0.8,
            max_phb_per_test_type: 5,
            max_data_plots: 20,
            nod_chance: 0.2,
            max_nods: 5,
            max_photographs: 25,
            max_test_logs: 2,
            max_receiving_images: 5,
            nod_max_days_back: 3 * 365,
            test_log_max_days_back: 365,
            font_path: None,
        }
    }
}

/// Partial config as read from a file; absent keys leave the lower layer intact
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigLayer {
    admin_document_chance: Option<f64>,
    max_phb_per_test_type: Option<usize>,
    max_data_plots: Option<usize>,
    nod_chance: Option<f64>,
    max_nods: Option<usize>,
    max_photographs: Option<usize>,
    max_test_logs: Option<usize>,
    max_receiving_images: Option<usize>,
    nod_max_days_back: Option<u32>,
    test_log_max_days_back: Option<u32>,
    font_path: Option<PathBuf>,
}

impl GeneratorConfig {
    /// Load configuration from all sources, merging in priority order
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        // 1. Built-in defaults
        let mut config = GeneratorConfig::default();

        // 2. Global user config (~/.config/testbed/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config.merge(read_layer(&global_path)?);
            }
        }

        // 3. Working-directory config (./testbed.yaml)
        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            config.merge(read_layer(&local_path)?);
        }

        // 4. Explicit --config file (must exist)
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            config.merge(read_layer(path)?);
        }

        // 5. Environment variables
        if let Ok(font) = std::env::var("TESTBED_FONT") {
            if !font.trim().is_empty() {
                config.font_path = Some(PathBuf::from(font));
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Read a single config file on top of the defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config = GeneratorConfig::default();
        config.merge(read_layer(path)?);
        config.validate()?;
        Ok(config)
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "testbed")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge a file layer into this config (layer takes precedence)
    fn merge(&mut self, other: ConfigLayer) {
        if let Some(v) = other.admin_document_chance {
            self.admin_document_chance = v;
        }
        if let Some(v) = other.max_phb_per_test_type {
            self.max_phb_per_test_type = v;
        }
        if let Some(v) = other.max_data_plots {
            self.max_data_plots = v;
        }
        if let Some(v) = other.nod_chance {
            self.nod_chance = v;
        }
        if let Some(v) = other.max_nods {
            self.max_nods = v;
        }
        if let Some(v) = other.max_photographs {
            self.max_photographs = v;
        }
        if let Some(v) = other.max_test_logs {
            self.max_test_logs = v;
        }
        if let Some(v) = other.max_receiving_images {
            self.max_receiving_images = v;
        }
        if let Some(v) = other.nod_max_days_back {
            self.nod_max_days_back = v;
        }
        if let Some(v) = other.test_log_max_days_back {
            self.test_log_max_days_back = v;
        }
        if other.font_path.is_some() {
            self.font_path = other.font_path;
        }
    }

    /// Reject probabilities outside `[0, 1]` and empty one-based ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("admin_document_chance", self.admin_document_chance),
            ("nod_chance", self.nod_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    key: key.to_string(),
                    message: format!("{} is not a probability in [0, 1]", value),
                });
            }
        }
        for (key, value) in [
            ("max_nods", self.max_nods),
            ("max_photographs", self.max_photographs),
            ("max_test_logs", self.max_test_logs),
            ("max_receiving_images", self.max_receiving_images),
        ] {
            if value < 1 {
                return Err(ConfigError::Invalid {
                    key: key.to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        for (key, value) in [
            ("nod_max_days_back", self.nod_max_days_back),
            ("test_log_max_days_back", self.test_log_max_days_back),
        ] {
            if value < 1 {
                return Err(ConfigError::Invalid {
                    key: key.to_string(),
                    message: "must be at least 1 day".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn read_layer(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if contents.trim().is_empty() {
        return Ok(ConfigLayer::default());
    }
    serde_yml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("cannot read config file {path:?}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("malformed config file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid config value '{key}': {message}")]
    Invalid { key: String, message: String },
}

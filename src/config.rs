use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::DEFAULT_TOP_N;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Catalog files to load instead of the built-in copies
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSettings {
    pub classic_path: Option<PathBuf>,
    pub proposals_path: Option<PathBuf>,
    pub debate_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

fn default_top_n() -> usize { DEFAULT_TOP_N }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with VOTO__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., VOTO__SCORING__TOP_N -> scoring.top_n
            .add_source(environment())
            .build()?;

        settings.try_deserialize::<Settings>().map(Settings::with_data_dir)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize::<Settings>().map(Settings::with_data_dir)
    }

    /// Resolve relative catalog paths against `VOTO_DATA_DIR` when it is set
    fn with_data_dir(mut self) -> Self {
        if let Ok(dir) = std::env::var("VOTO_DATA_DIR") {
            let dir = PathBuf::from(dir);
            for path in [
                &mut self.catalog.classic_path,
                &mut self.catalog.proposals_path,
                &mut self.catalog.debate_path,
            ]
            .into_iter()
            .flatten()
            {
                if path.is_relative() {
                    *path = dir.join(&*path);
                }
            }
        }
        self
    }
}

fn environment() -> Environment {
    Environment::with_prefix("VOTO")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

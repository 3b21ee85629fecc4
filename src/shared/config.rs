//! Application configuration. Data paths and log level.

use serde::Deserialize;
use std::path::PathBuf;

use crate::adapters::persistence::json_repo::{DEFAULT_CSV_FILE, DEFAULT_DB_FILE};

/// Data directory used when none is configured.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Log filter used when neither RUST_LOG nor LEAD_TRACKER_LOG_LEVEL is set.
/// Kept quiet so log lines do not interleave with the interactive menu.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Directory holding leads.json and the default CSV export. Read from LEAD_TRACKER_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Storage file override. Read from LEAD_TRACKER_DB_FILE.
    #[serde(default)]
    pub db_file: Option<String>,

    /// CSV export path override. Read from LEAD_TRACKER_CSV_FILE.
    #[serde(default)]
    pub csv_file: Option<String>,

    /// tracing filter directive (e.g. "info", "lead_tracker=debug"). Read from LEAD_TRACKER_LOG_LEVEL.
    #[serde(default)]
    pub log_level: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("LEAD_TRACKER"));
        if let Ok(path) = std::env::var("LEAD_TRACKER_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    pub fn data_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR))
    }

    /// Storage file. Defaults to `<data_dir>/leads.json`.
    pub fn db_path(&self) -> PathBuf {
        self.db_file
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.data_dir_or_default().join(DEFAULT_DB_FILE))
    }

    /// Default CSV export path. Defaults to `<data_dir>/leads.csv`.
    pub fn csv_path(&self) -> PathBuf {
        self.csv_file
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.data_dir_or_default().join(DEFAULT_CSV_FILE))
    }

    pub fn log_level_or_default(&self) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }
}

use crate::error::{Result, TriageError};
use crate::view::SortOrder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DEBOUNCE_MS: u64 = 1500;

/// Configuration for termfix, stored in .termfix/config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriageConfig {
    /// Input file used when `--input` is not given
    #[serde(default)]
    pub input: Option<PathBuf>,

    /// Quiet period before edits are saved to the remote store
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Sort order for `list` and the exports ("impact", "alphabetical", "category", "id")
    #[serde(default = "default_sort")]
    pub default_sort: String,

    #[serde(default = "default_csv_filename")]
    pub csv_filename: String,

    #[serde(default = "default_sql_filename")]
    pub sql_filename: String,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_sort() -> String {
    "impact".to_string()
}

fn default_csv_filename() -> String {
    "search_terms_cleanup.csv".to_string()
}

fn default_sql_filename() -> String {
    "search_terms_cleanup.sql".to_string()
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            input: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            default_sort: default_sort(),
            csv_filename: default_csv_filename(),
            sql_filename: default_sql_filename(),
        }
    }
}

impl TriageConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(TriageError::Io)?;
        let config: TriageConfig =
            serde_json::from_str(&content).map_err(TriageError::Serialization)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(TriageError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(TriageError::Serialization)?;
        fs::write(config_path, content).map_err(TriageError::Io)?;
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The configured sort order; an unrecognized value is an error rather
    /// than a silent fallback.
    pub fn sort_order(&self) -> Result<SortOrder> {
        self.default_sort.parse()
    }
}

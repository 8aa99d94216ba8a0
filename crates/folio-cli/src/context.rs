//! Shared command context: data directory, page configuration and the
//! durable preference store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use folio_core::{PageConfig, PreferenceStore, RedbPreferenceStore};
use tracing::debug;

/// File name of the preference database inside the data directory
pub const PREFERENCES_FILE: &str = "preferences.redb";

/// Default data directory (`<platform data dir>/folio`)
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folio")
}

pub struct CliContext {
    data_dir: PathBuf,
    config: PageConfig,
}

impl CliContext {
    /// Resolve the data directory and load the optional JSON config.
    pub fn load(data_dir: Option<PathBuf>, config_path: Option<&Path>) -> Result<Self> {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let config = match config_path {
            Some(path) => PageConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => PageConfig::default(),
        };
        debug!(data_dir = %data_dir.display(), "Context loaded");
        Ok(Self { data_dir, config })
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Open the preference database, creating it on first use.
    pub fn preferences(&self) -> Result<Arc<dyn PreferenceStore>> {
        let path = self.data_dir.join(PREFERENCES_FILE);
        let store = RedbPreferenceStore::new(&path)
            .with_context(|| format!("Failed to open preferences at {}", path.display()))?;
        Ok(Arc::new(store))
    }
}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DirectoryError, DirectoryResult};
use crate::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub const DIRECTORY_CONFIG_FILENAME: &str = "directory.json";
pub const DIRECTORY_CONFIG_VERSION: &str = "1.0.0";
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryConfig {
    pub version: String,
    pub store_file: String,
    pub listing: ListingPreferences,
    pub view: ViewPreferences,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPreferences {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPreferences {
    pub page_size: usize,
    pub expand_roots: bool,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            version: DIRECTORY_CONFIG_VERSION.to_string(),
            store_file: "employees.json".to_string(),
            listing: ListingPreferences {
                default_page_size: DEFAULT_PAGE_SIZE,
                max_page_size: MAX_PAGE_SIZE,
            },
            view: ViewPreferences {
                page_size: 5,
                expand_roots: false,
            },
        }
    }
}

impl DirectoryConfig {
    pub fn store_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.store_file)
    }
}

pub fn directory_config_path(dir: &Path) -> PathBuf {
    dir.join(DIRECTORY_CONFIG_FILENAME)
}

/// Data directory from the command line (which also carries the
/// `DIRECTORY_DATA_DIR` fallback), or `./data`.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn load_or_create_directory_config(dir: &Path) -> DirectoryResult<DirectoryConfig> {
    std::fs::create_dir_all(dir).map_err(|error| {
        DirectoryError::Internal(format!(
            "failed to create data directory {}: {error}",
            dir.display()
        ))
    })?;

    let path = directory_config_path(dir);
    if !path.exists() {
        let config = DirectoryConfig::default();
        write_directory_config(&path, &config)?;
        tracing::info!(path = %path.display(), "created default directory config");
        return Ok(config);
    }

    let data = std::fs::read_to_string(&path).map_err(|error| {
        DirectoryError::Internal(format!(
            "failed to read directory config {}: {error}",
            path.display()
        ))
    })?;
    let config: DirectoryConfig = serde_json::from_str(&data).map_err(|error| {
        DirectoryError::Internal(format!(
            "failed to parse directory config {}: {error}",
            path.display()
        ))
    })?;
    if config.version != DIRECTORY_CONFIG_VERSION {
        tracing::warn!(
            found = %config.version,
            expected = DIRECTORY_CONFIG_VERSION,
            "directory config version mismatch"
        );
    }
    if config.store_file.trim().is_empty() {
        return Err(DirectoryError::InvalidInput(
            "directory config storeFile is empty".to_string(),
        ));
    }
    Ok(config)
}

pub fn write_directory_config(path: &Path, config: &DirectoryConfig) -> DirectoryResult<()> {
    let data = serde_json::to_string_pretty(config).map_err(|error| {
        DirectoryError::Internal(format!("failed to serialize directory config: {error}"))
    })?;
    std::fs::write(path, data).map_err(|error| {
        DirectoryError::Internal(format!(
            "failed to write directory config {}: {error}",
            path.display()
        ))
    })
}

mod file_config;

pub use file_config::FileConfig;

use crate::extract::DEFAULT_DATA_EXTENSION;
use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "sparkify.db";
pub const DEFAULT_SONG_DATA: &str = "data/song_data";
pub const DEFAULT_LOG_DATA: &str = "data/log_data";

/// CLI arguments that can be used for config resolution.
/// Values set in the TOML file take precedence over these.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub data_extension: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            song_data: PathBuf::from(DEFAULT_SONG_DATA),
            log_data: PathBuf::from(DEFAULT_LOG_DATA),
            data_extension: DEFAULT_DATA_EXTENSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Root of the song catalog files.
    pub song_data: PathBuf,
    /// Root of the activity log files.
    pub log_data: PathBuf,
    pub data_extension: String,
}

impl AppConfig {
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.db_path.clone());
        let song_data = file
            .song_data
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.song_data.clone());
        let log_data = file
            .log_data
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.log_data.clone());
        let data_extension = normalize_extension(
            file.data_extension
                .as_deref()
                .unwrap_or(&cli.data_extension),
        )?;

        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }

        Ok(Self {
            db_path,
            song_data,
            log_data,
            data_extension,
        })
    }
}

/// Accepts "json" or ".json"; rejects empty or dotted-compound extensions.
fn normalize_extension(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let extension = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if extension.is_empty() {
        bail!("data_extension must not be empty");
    }
    if extension.contains('.') {
        bail!(
            "data_extension must be a single extension, got {:?}",
            raw
        );
    }
    Ok(extension.to_string())
}

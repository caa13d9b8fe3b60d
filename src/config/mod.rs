//! Configuration module for the job agent
//!
//! Settings are loaded once at startup from a YAML file and environment
//! variables, then handed to each component explicitly. There is no global
//! settings instance.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_ENV: &str = "JOB_AGENT_SETTINGS_PATH";

/// Candidate settings file locations, in lookup order
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("job-agent/settings.yml"));
    }
    paths
}

/// Load settings from the first existing file, then overlay the environment
pub fn load() -> Result<Settings> {
    let explicit = std::env::var(SETTINGS_PATH_ENV).ok().map(PathBuf::from);
    let mut settings = match explicit.iter().chain(default_paths().iter()).find(|p| p.exists()) {
        Some(path) => load_file(path)?,
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}

fn load_file(path: &Path) -> Result<Settings> {
    info!("Loading settings from: {}", path.display());
    Settings::from_file(path)
}

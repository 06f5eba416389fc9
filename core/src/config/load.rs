use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default atelier data directory: ~/.atelier
pub fn get_atelier_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".atelier"))
}

/// Default location of the credential file when `auth.credential_path` is
/// unset.
pub fn get_credential_file_path() -> anyhow::Result<PathBuf> {
    let atelier_dir = get_atelier_data_dir()?;
    Ok(atelier_dir.join("credential"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.atelier/config.toml (highest)
    let atelier_dir = get_atelier_data_dir()?;
    let atelier_config = atelier_dir.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg: AppConfig = if atelier_config.exists() {
        let s = std::fs::read_to_string(&atelier_config)?;
        toml::from_str::<AppConfig>(&s)?
    } else if local_config.exists() {
        let s = std::fs::read_to_string(local_config)?;
        toml::from_str::<AppConfig>(&s)?
    } else {
        AppConfig::default()
    };

    // Update logging directory to use atelier data directory if not set
    if cfg.logging.directory.is_none()
        || cfg
            .logging
            .directory
            .as_ref()
            .map(|s| s.trim().is_empty())
            .unwrap_or(false)
    {
        let logs_dir = atelier_dir.join("logs");
        std::fs::create_dir_all(&logs_dir)?;
        cfg.logging.directory = Some(logs_dir.to_string_lossy().to_string());
    }

    // Environment variable overrides (Priority 0: highest)
    if let Ok(v) = std::env::var("ATELIER_API_BASE_URL") {
        if !v.trim().is_empty() {
            cfg.api.base_url = v;
        }
    }
    if let Ok(v) = std::env::var("ATELIER_CREDENTIAL_PATH") {
        if !v.trim().is_empty() {
            cfg.auth.credential_path = Some(v);
        }
    }
    if let Ok(v) = std::env::var("ATELIER_CONTRIBUTORS_URL") {
        if !v.trim().is_empty() {
            cfg.bootstrap.contributors_url = v;
        }
    }

    Ok(cfg)
}

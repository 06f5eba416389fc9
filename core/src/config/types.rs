use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            api: ApiConfig::default(),
            auth: AuthConfig::default(),
            bootstrap: BootstrapConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "atelier_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Atelier REST API.
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    #[serde(default = "default_api_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_base_url() -> String {
    "https://api.atelier.dev".to_string()
}

fn default_api_timeout_ms() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_ms: default_api_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Path of the credential file. If unset, `<data dir>/credential` is used.
    #[serde(default)]
    pub credential_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Contributor roster fetched once startup has finished. Empty disables
    /// the fetch.
    #[serde(default = "default_contributors_url")]
    pub contributors_url: String,
}

fn default_contributors_url() -> String {
    "https://raw.githubusercontent.com/atelier-app/atelier/main/.all-contributorsrc".to_string()
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            contributors_url: default_contributors_url(),
        }
    }
}

use thiserror::Error;

/// Top-level CLI error; variants map onto process exit codes.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("action failed: {0}")]
    Action(#[from] ActionError),
    #[error("effect failed: {0}")]
    Effect(#[from] EffectError),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Errors produced while orchestrating actions over the store and effects.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("effect failed: {0}")]
    Effect(#[from] EffectError),
    #[error("modal error: {0}")]
    Modal(#[from] crate::modal::ModalError),
    #[error("no workspace is loaded")]
    NoWorkspace,
}

/// Errors surfaced by effect implementations (HTTP, credential storage,
/// realtime transport).
#[derive(Error, Debug)]
pub enum EffectError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("http error: status {0}")]
    Http(u16),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("effect error: {0}")]
    Other(#[from] anyhow::Error),
}

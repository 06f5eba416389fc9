//! Side-effect seams.
//!
//! Every interaction with the outside world (HTTP, credential files, the
//! realtime channel, the window system) goes through one of these traits so
//! actions stay deterministic under test. `atelier-effects` carries the
//! production implementations.

use crate::error::EffectError;
use crate::state::{AuthToken, Keybinding, User, Workspace, WorkspaceId};
use serde::{Deserialize, Serialize};

/// Callback invoked when connectivity flips.
pub type ConnectivityListener = Box<dyn Fn(bool) + Send + Sync>;

/// Callback invoked for every message on the client transport.
pub type TransportListener = Box<dyn Fn(TransportMessage) + Send + Sync>;

/// Message on the client transport bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportMessage {
    pub kind: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl TransportMessage {
    pub fn new(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

/// Persisted credential storage.
///
/// Absence of a credential is not an error; `get` returns `None` for the
/// anonymous case.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self) -> Result<Option<AuthToken>, EffectError>;
    async fn reset(&self) -> Result<(), EffectError>;
}

/// User-facing REST endpoints.
#[async_trait::async_trait]
pub trait UserApi: Send + Sync {
    /// Resolve the user behind a stored credential.
    /// `EffectError::Unauthorized` means the credential is expired or revoked.
    async fn get_current_user(&self, token: &AuthToken) -> Result<User, EffectError>;

    /// Warm server-side template caches. Callers never observe failures.
    async fn preload_templates(&self);
}

/// Connectivity change notifications.
pub trait Connectivity: Send + Sync {
    fn add_listener(&self, listener: ConnectivityListener);
}

/// Realtime presence/collaboration channel.
#[async_trait::async_trait]
pub trait Realtime: Send + Sync {
    async fn connect(&self) -> Result<(), EffectError>;
}

/// In-client message transport.
pub trait Transport: Send + Sync {
    fn listen(&self, listener: TransportListener);
    fn publish(&self, message: TransportMessage);
}

/// Keybinding engine for the editor surface.
pub trait Keybindings: Send + Sync {
    fn set(&self, bindings: Vec<Keybinding>);
    fn start(&self);
}

/// User-visible notifications.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Plain JSON-over-HTTP fetches outside the main API (e.g. the contributor
/// roster).
#[async_trait::async_trait]
pub trait HttpGateway: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, EffectError>;
}

/// Workspace lifecycle endpoints.
#[async_trait::async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// Fork `id` into a workspace owned by the signed-in user.
    async fn fork(&self, id: &WorkspaceId) -> Result<Workspace, EffectError>;
}

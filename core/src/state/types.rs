//! State type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque authentication token as stored by the credential effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken(pub String);

impl AuthToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Workspace identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceId(pub String);

impl WorkspaceId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signed-in user as returned by the user API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Present when the user pays for a subscription.
    #[serde(default)]
    pub subscription: Option<Subscription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Monthly amount in cents.
    pub amount_cents: u32,
}

/// Billing tier derived from the user record at sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
}

/// Workspace visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Public,
    Unlisted,
    Private,
}

/// A single keybinding entry from user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keybinding {
    pub command: String,
    pub chord: String,
}

/// The workspace currently open in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub privacy: Privacy,
    /// Whether the signed-in user owns this workspace.
    pub owned: bool,
    /// Whether edits to this workspace are frozen.
    pub frozen: bool,
}

/// Application shell state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellState {
    /// Set once the startup sequence has completed.
    pub has_loaded_app: bool,
    /// True while startup resolves credentials and identity.
    pub is_authenticating: bool,
    /// Connectivity as last reported by the connection effect.
    pub connected: bool,
    /// Contributor logins fetched after startup.
    pub contributors: Vec<String>,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            has_loaded_app: false,
            is_authenticating: false,
            // Assume online until the connection effect reports otherwise.
            connected: true,
            contributors: Vec::new(),
        }
    }
}

/// Session state for the (possibly anonymous) user.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionState {
    pub token: Option<AuthToken>,
    pub user: Option<User>,
    pub plan: PlanTier,
    /// Monthly plan price in cents; zero on the free tier.
    pub plan_price: u32,
    pub signed_in: bool,
    pub unread_notifications: u32,
}

/// Workspace slice of the application state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceState {
    pub current: Option<Workspace>,
    /// True while an ownership transfer is in flight.
    pub forking: bool,
    /// Session-level freeze restriction; re-armed whenever a workspace is
    /// loaded or frozen.
    pub session_frozen: bool,
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self {
            current: None,
            forking: false,
            session_frozen: true,
        }
    }
}

/// User preferences that affect startup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Preferences {
    pub keybindings: Vec<Keybinding>,
}

/// Root application state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppState {
    pub shell: ShellState,
    pub session: SessionState,
    pub workspace: WorkspaceState,
    pub preferences: Preferences,
}

/// State change notifications broadcast by the store.
#[derive(Debug, Clone, Serialize)]
pub enum StateEvent {
    BootstrapStarted {
        timestamp: DateTime<Utc>,
    },
    BootstrapFinished {
        timestamp: DateTime<Utc>,
    },
    SessionExpired {
        timestamp: DateTime<Utc>,
    },
    ConnectionChanged {
        connected: bool,
        timestamp: DateTime<Utc>,
    },
    WorkspaceForked {
        workspace_id: WorkspaceId,
        timestamp: DateTime<Utc>,
    },
    ModalOpened {
        name: &'static str,
        timestamp: DateTime<Utc>,
    },
    ModalClosed {
        name: &'static str,
        timestamp: DateTime<Utc>,
    },
}

impl StateEvent {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::BootstrapStarted { timestamp }
            | Self::BootstrapFinished { timestamp }
            | Self::SessionExpired { timestamp }
            | Self::ConnectionChanged { timestamp, .. }
            | Self::WorkspaceForked { timestamp, .. }
            | Self::ModalOpened { timestamp, .. }
            | Self::ModalClosed { timestamp, .. } => *timestamp,
        }
    }
}

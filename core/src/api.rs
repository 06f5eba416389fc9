//! Stable re-exports for consumers (`cli`, `effects`, and external crates).
//!
//! Prefer importing from `atelier_core::api` instead of reaching into
//! internal modules.

pub use crate::actions::{
    bootstrap, session, workspace, with_bootstrap_gate, with_ownership_guard,
    with_ownership_guard_or_else, ActionResult,
};
pub use crate::config::{
    get_atelier_data_dir, get_credential_file_path, load_default, ApiConfig, AppConfig,
    AuthConfig, BootstrapConfig, LoggingConfig,
};
pub use crate::context::{Context, Effects, EffectsFactory};
pub use crate::effects::{
    Connectivity, ConnectivityListener, CredentialStore, HttpGateway, Keybindings, Notifier,
    Realtime, Transport, TransportListener, TransportMessage, UserApi, WorkspaceApi,
};
pub use crate::error::{ActionError, CliError, EffectError};
pub use crate::modal::{
    AppModals, ForkFrozenModal, FrozenChoice, ModalError, ModalHandle, ModalRegistry, ModalSpec,
    RenameOutcome, RenameState, RenameWorkspaceModal,
};
pub use crate::state::{
    AppState, AuthToken, Keybinding, PlanTier, Preferences, Privacy, SessionState, ShellState,
    StateEvent, Store, Subscription, User, Workspace, WorkspaceId, WorkspaceState,
};

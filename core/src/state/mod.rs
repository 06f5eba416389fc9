//! # Application state
//!
//! Holds the client state shared by actions, modals and effect callbacks.
//!
//! ## Design rules
//!
//! 1. One store, many handles: `Store` is a cheap `Clone` over `Arc`.
//! 2. Mutations go through `Store::update`; reads take a `snapshot`.
//! 3. Cross-cutting changes are announced as `StateEvent`s on a broadcast
//!    channel so observers (logging, UI surfaces) stay decoupled.

pub mod store;
pub mod types;

pub use store::Store;
pub use types::{
    AppState, AuthToken, Keybinding, PlanTier, Preferences, Privacy, SessionState, ShellState,
    StateEvent, Subscription, User, Workspace, WorkspaceId, WorkspaceState,
};

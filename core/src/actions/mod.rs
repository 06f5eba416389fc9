//! Orchestrated actions over the store and effects.
//!
//! Two combinators wrap the business actions: [`with_bootstrap_gate`] makes
//! the startup sequence one-shot under concurrent entrypoints, and
//! [`with_ownership_guard`] settles workspace ownership before an edit
//! proceeds.

pub mod bootstrap;
pub mod guard;
pub mod session;
pub mod workspace;

pub use bootstrap::{bootstrap, with_bootstrap_gate};
pub use guard::{with_ownership_guard, with_ownership_guard_or_else};

use crate::error::ActionError;

/// Shorthand for action return types.
pub type ActionResult<T = ()> = Result<T, ActionError>;

//! # Modal coordination
//!
//! A modal open suspends the calling action until some other part of the
//! program (usually a UI event handler) closes the modal, at which point the
//! opener resumes with a typed result.
//!
//! ## Design rules
//!
//! 1. One modal on screen at a time. Opening supersedes whatever was showing;
//!    the superseded opener resumes with [`ModalError::Superseded`].
//! 2. Closing without a payload resolves with [`ModalSpec::default_result`],
//!    so dismissal is indistinguishable from an explicit "no".
//! 3. Modal state merges: an open patches the previous state slice instead of
//!    replacing it.

pub mod app;
pub mod registry;

use thiserror::Error;

pub use app::{
    AppModals, ForkFrozenModal, FrozenChoice, RenameOutcome, RenameState, RenameWorkspaceModal,
};
pub use registry::{ModalHandle, ModalRegistry};

/// A modal dialog type: its name, the state slice shown to the UI and the
/// result the opener suspends on.
pub trait ModalSpec: 'static {
    const NAME: &'static str;

    type State: Clone + Default + Send;
    type Result: Send;

    /// Result used when the modal closes without an explicit payload
    /// (dismissal, escape key, backdrop click).
    fn default_result() -> Self::Result;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    /// A later open replaced this modal before the user resolved it.
    #[error("modal '{0}' was superseded by a later open")]
    Superseded(&'static str),
}

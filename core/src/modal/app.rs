//! Modal declarations for the Atelier shell.

use crate::state::Store;

use super::{ModalHandle, ModalRegistry, ModalSpec};

/// Choice offered when an edit guard hits a frozen workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrozenChoice {
    /// Fork the workspace and edit the copy.
    Fork,
    /// Lift the freeze restriction for the rest of this session.
    Unfreeze,
    /// Leave the workspace untouched.
    Cancel,
}

/// Confirmation dialog shown before editing a frozen workspace.
pub struct ForkFrozenModal;

impl ModalSpec for ForkFrozenModal {
    const NAME: &'static str = "fork_frozen";

    type State = ();
    type Result = FrozenChoice;

    fn default_result() -> FrozenChoice {
        FrozenChoice::Cancel
    }
}

/// Editable state of the rename dialog.
#[derive(Debug, Clone, Default)]
pub struct RenameState {
    pub name: String,
}

/// `name` is `None` when the user dismissed the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    pub name: Option<String>,
}

/// Rename dialog for the current workspace.
pub struct RenameWorkspaceModal;

impl ModalSpec for RenameWorkspaceModal {
    const NAME: &'static str = "rename_workspace";

    type State = RenameState;
    type Result = RenameOutcome;

    fn default_result() -> RenameOutcome {
        RenameOutcome { name: None }
    }
}

/// All modals the shell can show, behind one registry.
pub struct AppModals {
    registry: ModalRegistry,
    pub fork_frozen: ModalHandle<ForkFrozenModal>,
    pub rename_workspace: ModalHandle<RenameWorkspaceModal>,
}

impl AppModals {
    pub fn new(store: Store) -> Self {
        let registry = ModalRegistry::new(store);
        let fork_frozen = registry.handle();
        let rename_workspace = registry.handle();
        Self {
            registry,
            fork_frozen,
            rename_workspace,
        }
    }

    /// Name of the modal currently on screen, if any.
    pub fn current(&self) -> Option<&'static str> {
        self.registry.current()
    }
}

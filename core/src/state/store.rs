//! Shared application store.

use super::types::{AppState, StateEvent, WorkspaceId};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Cloneable handle to the application state and its event channel.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: RwLock<AppState>,
    event_tx: broadcast::Sender<StateEvent>,
}

impl Store {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(1000);

        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(AppState::default()),
                event_tx,
            }),
        }
    }

    /// Clone of the current state.
    pub async fn snapshot(&self) -> AppState {
        self.inner.state.read().await.clone()
    }

    /// Apply a mutation under the write lock.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut AppState),
    {
        let mut state = self.inner.state.write().await;
        f(&mut state);
    }

    /// Subscribe to state events.
    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.inner.event_tx.subscribe()
    }

    fn emit(&self, event: StateEvent) {
        let _ = self.inner.event_tx.send(event);
    }

    pub fn emit_bootstrap_started(&self) {
        self.emit(StateEvent::BootstrapStarted {
            timestamp: Utc::now(),
        });
    }

    pub fn emit_bootstrap_finished(&self) {
        self.emit(StateEvent::BootstrapFinished {
            timestamp: Utc::now(),
        });
    }

    pub fn emit_session_expired(&self) {
        self.emit(StateEvent::SessionExpired {
            timestamp: Utc::now(),
        });
    }

    pub fn emit_connection_changed(&self, connected: bool) {
        self.emit(StateEvent::ConnectionChanged {
            connected,
            timestamp: Utc::now(),
        });
    }

    pub fn emit_workspace_forked(&self, workspace_id: WorkspaceId) {
        self.emit(StateEvent::WorkspaceForked {
            workspace_id,
            timestamp: Utc::now(),
        });
    }

    pub(crate) fn emit_modal_opened(&self, name: &'static str) {
        self.emit(StateEvent::ModalOpened {
            name,
            timestamp: Utc::now(),
        });
    }

    pub(crate) fn emit_modal_closed(&self, name: &'static str) {
        self.emit(StateEvent::ModalClosed {
            name,
            timestamp: Utc::now(),
        });
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

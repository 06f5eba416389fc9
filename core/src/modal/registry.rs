//! Typed modal registry.

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::state::Store;
use crate::util::lock;

use super::{ModalError, ModalSpec};

/// Tracks which modal is on screen and how to cancel its pending resolution.
pub struct ModalRegistry {
    shared: Arc<Shared>,
}

struct Shared {
    store: Store,
    core: Mutex<Core>,
}

#[derive(Default)]
struct Core {
    current: Option<&'static str>,
    /// Drops the pending resolution sender of whichever modal is on screen.
    cancel_pending: Option<Box<dyn FnOnce() + Send>>,
}

impl ModalRegistry {
    pub fn new(store: Store) -> Self {
        Self {
            shared: Arc::new(Shared {
                store,
                core: Mutex::new(Core::default()),
            }),
        }
    }

    /// Name of the modal currently on screen, if any.
    pub fn current(&self) -> Option<&'static str> {
        lock(&self.shared.core).current
    }

    /// Create the handle for one modal. Call once per spec while assembling
    /// the registry; every call makes an independent slot.
    pub fn handle<M: ModalSpec>(&self) -> ModalHandle<M> {
        ModalHandle {
            shared: Arc::clone(&self.shared),
            slot: Arc::new(Slot {
                state: Mutex::new(M::State::default()),
                pending: Mutex::new(None),
            }),
        }
    }
}

/// Typed handle for a single modal.
pub struct ModalHandle<M: ModalSpec> {
    shared: Arc<Shared>,
    slot: Arc<Slot<M>>,
}

struct Slot<M: ModalSpec> {
    state: Mutex<M::State>,
    pending: Mutex<Option<oneshot::Sender<M::Result>>>,
}

impl<M: ModalSpec> Clone for ModalHandle<M> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<M: ModalSpec> ModalHandle<M> {
    /// Open with state carried over from the previous showing.
    pub async fn open(&self) -> Result<M::Result, ModalError> {
        self.open_with(|_| {}).await
    }

    /// Open after applying `patch` to the modal's state slice. Fields the
    /// patch does not touch keep their previous values.
    pub async fn open_with<F>(&self, patch: F) -> Result<M::Result, ModalError>
    where
        F: FnOnce(&mut M::State),
    {
        let rx = {
            let mut core = lock(&self.shared.core);

            // Supersede whatever is on screen, possibly an earlier showing of
            // this same modal.
            if let Some(cancel) = core.cancel_pending.take() {
                cancel();
            }

            {
                let mut state = lock(&self.slot.state);
                patch(&mut state);
            }

            let (tx, rx) = oneshot::channel();
            *lock(&self.slot.pending) = Some(tx);

            let slot = Arc::clone(&self.slot);
            core.cancel_pending = Some(Box::new(move || {
                let _ = lock(&slot.pending).take();
            }));
            core.current = Some(M::NAME);
            rx
        };

        self.shared.store.emit_modal_opened(M::NAME);

        rx.await.map_err(|_| ModalError::Superseded(M::NAME))
    }

    /// Close, resolving the suspended opener with [`ModalSpec::default_result`].
    pub fn close(&self) {
        self.resolve(M::default_result());
    }

    /// Close, resolving the suspended opener with `result`.
    pub fn close_with(&self, result: M::Result) {
        self.resolve(result);
    }

    fn resolve(&self, result: M::Result) {
        let sender = {
            let mut core = lock(&self.shared.core);
            let sender = lock(&self.slot.pending).take();
            if sender.is_some() {
                // A live pending sender means this modal is the one on
                // screen, so the registry bookkeeping is ours to clear.
                core.current = None;
                core.cancel_pending = None;
            }
            sender
        };

        match sender {
            Some(tx) => {
                // The opener may have been dropped; resolution is then moot.
                let _ = tx.send(result);
                self.shared.store.emit_modal_closed(M::NAME);
            }
            None => {
                tracing::warn!(modal = M::NAME, "close ignored: modal is not open");
            }
        }
    }

    /// State slice as of the last open/patch.
    pub fn state(&self) -> M::State {
        lock(&self.slot.state).clone()
    }

    /// Whether this modal is the one currently on screen.
    pub fn is_current(&self) -> bool {
        lock(&self.shared.core).current == Some(M::NAME)
    }

    pub fn name(&self) -> &'static str {
        M::NAME
    }
}

//! In-process transport bus.
//!
//! Fan-out is synchronous: `publish` invokes every listener on the calling
//! thread. Listeners that need the runtime are expected to spawn.

use std::sync::{Arc, Mutex};

use atelier_core::api::{Transport, TransportListener, TransportMessage};

#[derive(Default)]
pub struct LocalTransport {
    listeners: Mutex<Vec<Arc<TransportListener>>>,
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Transport for LocalTransport {
    fn listen(&self, listener: TransportListener) {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::new(listener));
    }

    fn publish(&self, message: TransportMessage) {
        let listeners: Vec<_> = self
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect();
        tracing::trace!(
            target: "atelier.transport",
            kind = %message.kind,
            listeners = listeners.len(),
            "publish"
        );
        for listener in listeners {
            listener(message.clone());
        }
    }
}

//! Connectivity reporting.
//!
//! The desktop shell feeds online/offline transitions in from the window
//! system; embedders (and the demo) drive [`ManualConnectivity::set_online`]
//! directly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use atelier_core::api::{Connectivity, ConnectivityListener};

pub struct ManualConnectivity {
    online: AtomicBool,
    listeners: Mutex<Vec<Arc<ConnectivityListener>>>,
}

impl Default for ManualConnectivity {
    fn default() -> Self {
        Self {
            // Matches the store default: assume online until told otherwise.
            online: AtomicBool::new(true),
            listeners: Mutex::new(Vec::new()),
        }
    }
}

impl ManualConnectivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Record a transition; listeners only fire when the value changes.
    pub fn set_online(&self, online: bool) {
        if self.online.swap(online, Ordering::SeqCst) == online {
            return;
        }
        tracing::debug!(target: "atelier.connectivity", online, "connectivity changed");
        let listeners: Vec<_> = self
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect();
        for listener in listeners {
            listener(online);
        }
    }
}

impl Connectivity for ManualConnectivity {
    fn add_listener(&self, listener: ConnectivityListener) {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::new(listener));
    }
}

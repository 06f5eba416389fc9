//! Keybinding engine for the editor surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use atelier_core::api::{Keybinding, Keybindings};

#[derive(Default)]
pub struct KeybindingEngine {
    bindings: Mutex<Vec<Keybinding>>,
    running: AtomicBool,
}

impl KeybindingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Chord bound to `command`, if any.
    pub fn chord_for(&self, command: &str) -> Option<String> {
        self.bindings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|b| b.command == command)
            .map(|b| b.chord.clone())
    }
}

impl Keybindings for KeybindingEngine {
    fn set(&self, bindings: Vec<Keybinding>) {
        tracing::debug!(target: "atelier.keybindings", count = bindings.len(), "bindings replaced");
        *self.bindings.lock().unwrap_or_else(|e| e.into_inner()) = bindings;
    }

    fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
        tracing::debug!(target: "atelier.keybindings", "engine started");
    }
}

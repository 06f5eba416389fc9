//! Realtime collaboration channel.
//!
//! The full presence protocol lives server-side; this client only tracks the
//! connection handshake.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use atelier_core::api::{EffectError, Realtime};

#[derive(Default)]
pub struct LocalRealtime {
    connected: AtomicBool,
}

impl LocalRealtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Realtime for LocalRealtime {
    async fn connect(&self) -> Result<(), EffectError> {
        self.connected.store(true, Ordering::SeqCst);
        tracing::debug!(target: "atelier.realtime", "channel connected");
        Ok(())
    }
}

//! User-visible notifications.

use tokio::sync::mpsc;

use atelier_core::api::Notifier;

/// Forwards notifications to a channel for the embedding surface to render,
/// mirroring each one into the log.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn error(&self, message: &str) {
        tracing::error!(target: "atelier.notify", "{message}");
        // The receiver may already be gone during shutdown.
        let _ = self.tx.send(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_messages_arrive_on_the_channel() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.error("session expired");

        assert_eq!(rx.recv().await.as_deref(), Some("session expired"));
    }

    #[test]
    fn test_dropped_receiver_is_tolerated() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.error("nobody listening");
    }
}

//! Delivery of new-recall notifications.

use tokio::sync::mpsc;

use crate::models::NewRecallEvent;

/// Receives one event per newly observed recall.
pub trait RecallNotifier: Send + Sync {
    fn notify(&self, event: &NewRecallEvent);
}

/// Writes each event to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl RecallNotifier for LogNotifier {
    fn notify(&self, event: &NewRecallEvent) {
        log::info!(
            "New recall {}: {} ({})",
            event.recall_id,
            display(&event.product_name),
            display(&event.brand)
        );
    }
}

fn display(value: &Option<serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "-".to_string(),
    }
}

/// Forwards events to a channel consumed elsewhere.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<NewRecallEvent>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NewRecallEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl RecallNotifier for ChannelNotifier {
    fn notify(&self, event: &NewRecallEvent) {
        if self.sender.send(event.clone()).is_err() {
            log::debug!("Dropped event for recall {}: receiver closed", event.recall_id);
        }
    }
}

//! # Application Events
//!
//! Explicit in-process broadcast channel for cross-component triggers.
//!
//! Components that need to react to one another subscribe here rather
//! than reaching into each other's state or any ambient global signal.
//! A slow subscriber can lag and miss events (broadcast semantics);
//! every event is a trigger, not a record, so that's acceptable.

use serde::Serialize;
use tokio::sync::broadcast;

/// Cross-component triggers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum AppEvent {
    /// Ask the UI to open the add-product form, optionally prefilled
    /// with a scanned serial that matched no row.
    OpenAddProduct { prefill_serial: Option<String> },

    /// Inventory rows changed; list views should refresh.
    InventoryChanged,

    /// A bill was finalized.
    BillFinalized { invoice_number: String },
}

/// Broadcast channel wrapper.
#[derive(Debug, Clone)]
pub struct AppEvents {
    tx: broadcast::Sender<AppEvent>,
}

impl AppEvents {
    /// Creates the channel. Capacity 64 comfortably exceeds any realistic
    /// burst in a single-till app.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        AppEvents { tx }
    }

    /// Emits an event to all current subscribers.
    ///
    /// An event with no subscribers is dropped silently.
    pub fn emit(&self, event: AppEvent) {
        let _ = self.tx.send(event);
    }

    /// Subscribes to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }
}

impl Default for AppEvents {
    fn default() -> Self {
        AppEvents::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let events = AppEvents::new();
        let mut rx = events.subscribe();

        events.emit(AppEvent::OpenAddProduct {
            prefill_serial: Some("IMEI-1".to_string()),
        });

        match rx.recv().await.unwrap() {
            AppEvent::OpenAddProduct { prefill_serial } => {
                assert_eq!(prefill_serial.as_deref(), Some("IMEI-1"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_is_silent() {
        let events = AppEvents::new();
        events.emit(AppEvent::InventoryChanged); // must not panic
    }
}

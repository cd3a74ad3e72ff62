//! # Scan State
//!
//! Barcode-scan cooldown.
//!
//! A continuously-running scanner decodes the same label many times per
//! second while it stays in frame. Each decoded payload is a plain text
//! string treated as a serial-number lookup key; this state suppresses
//! repeats of the SAME payload within a short window so one physical
//! scan triggers one lookup.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  t=0.0s  "IMEI-1"  ──► accepted (first sighting)                        │
//! │  t=0.3s  "IMEI-1"  ──► suppressed (within 3s window)                    │
//! │  t=1.0s  "IMEI-2"  ──► accepted (different payload)                     │
//! │  t=4.0s  "IMEI-1"  ──► accepted (window expired)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use cellshop_core::SCAN_COOLDOWN_SECS;

/// Cooldown state for scanned payloads.
///
/// Uses a monotonic clock (tokio's, so paused-time tests work), never
/// wall time.
#[derive(Debug, Clone, Default)]
pub struct ScanState {
    last: Arc<Mutex<Option<(String, Instant)>>>,
}

impl ScanState {
    pub fn new() -> Self {
        ScanState::default()
    }

    /// Decides whether a decoded payload should trigger a lookup.
    ///
    /// ## Returns
    /// * `true` - First sighting, or a repeat after the cooldown expired;
    ///   the sighting is recorded
    /// * `false` - Same payload within the cooldown window; suppressed
    pub fn accept(&self, payload: &str) -> bool {
        let now = Instant::now();
        let cooldown = Duration::from_secs(SCAN_COOLDOWN_SECS);

        let mut last = self.last.lock().expect("scan lock poisoned");

        if let Some((prev, at)) = last.as_ref() {
            if prev == payload && now.duration_since(*at) < cooldown {
                return false;
            }
        }

        *last = Some((payload.to_string(), now));
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

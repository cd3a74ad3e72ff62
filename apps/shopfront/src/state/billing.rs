//! # Billing State
//!
//! One draft bill per till, built line by line and finalized into an
//! immutable invoice.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Billing Session                                      │
//! │                                                                         │
//! │  set customer ──► add/update/remove lines ──► totals (live)            │
//! │                            │                                            │
//! │                            ▼                                            │
//! │                     finalize (validate, stamp number + date)           │
//! │                            │                                            │
//! │              ┌─────────────┴─────────────┐                             │
//! │              ▼                           ▼                             │
//! │       share message + link        printable invoice                    │
//! │              │                           │                             │
//! │              └─────────────┬─────────────┘                             │
//! │                            ▼                                            │
//! │                     reset() ──► fresh empty draft                      │
//! │                                                                         │
//! │  Line names are free text: any line can reference a product or be      │
//! │  ad-hoc (a repair fee, an old-stock accessory). Billing never reads    │
//! │  or writes inventory.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cellshop_core::invoice::{
    compute_totals, invoice_number_from, validate_invoice, validate_line, InvoiceTotals,
};
use cellshop_core::{BillLineItem, CoreError, CoreResult, Invoice, ValidationError, MAX_BILL_LINES};

/// The in-progress bill.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftBill {
    pub customer_name: String,
    pub customer_phone: String,
    pub lines: Vec<BillLineItem>,
}

/// Draft bill behind a mutex.
///
/// Commands mutate one line at a time; the lock is held only for the
/// in-memory edit, never across a store call (billing makes none).
#[derive(Debug, Clone, Default)]
pub struct BillingState {
    draft: Arc<Mutex<DraftBill>>,

    /// The last finalized invoice, kept so share and print render the
    /// SAME stamped number and date.
    finalized: Arc<Mutex<Option<Invoice>>>,
}

impl BillingState {
    pub fn new() -> Self {
        BillingState::default()
    }

    /// Sets the customer block on the draft.
    pub fn set_customer(&self, name: String, phone: String) {
        let mut draft = self.draft.lock().expect("billing lock poisoned");
        draft.customer_name = name;
        draft.customer_phone = phone;
    }

    /// Appends a validated line.
    pub fn add_line(&self, line: BillLineItem) -> CoreResult<()> {
        validate_line(&line)?;

        let mut draft = self.draft.lock().expect("billing lock poisoned");
        if draft.lines.len() >= MAX_BILL_LINES {
            return Err(CoreError::BillTooLarge {
                max: MAX_BILL_LINES,
            });
        }
        draft.lines.push(line);
        Ok(())
    }

    /// Replaces the line at `index`.
    pub fn update_line(&self, index: usize, line: BillLineItem) -> CoreResult<()> {
        validate_line(&line)?;

        let mut draft = self.draft.lock().expect("billing lock poisoned");
        let len = draft.lines.len();
        let slot = draft
            .lines
            .get_mut(index)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "line index".to_string(),
                min: 0,
                max: len.saturating_sub(1) as i64,
            })?;
        *slot = line;
        Ok(())
    }

    /// Removes the line at `index`.
    pub fn remove_line(&self, index: usize) -> CoreResult<()> {
        let mut draft = self.draft.lock().expect("billing lock poisoned");
        if index >= draft.lines.len() {
            return Err(ValidationError::OutOfRange {
                field: "line index".to_string(),
                min: 0,
                max: draft.lines.len().saturating_sub(1) as i64,
            }
            .into());
        }
        draft.lines.remove(index);
        Ok(())
    }

    /// Snapshot of the current draft.
    pub fn draft(&self) -> DraftBill {
        self.draft.lock().expect("billing lock poisoned").clone()
    }

    /// Live aggregate totals over the draft lines.
    pub fn totals(&self) -> InvoiceTotals {
        let draft = self.draft.lock().expect("billing lock poisoned");
        compute_totals(&draft.lines)
    }

    /// Finalizes the draft into an invoice stamped at `now`.
    ///
    /// Validation failures leave the draft untouched and editable; the
    /// draft survives until an explicit `reset()` after the invoice has
    /// been shared or printed.
    pub fn finalize(&self, now: DateTime<Utc>) -> CoreResult<Invoice> {
        let draft = self.draft.lock().expect("billing lock poisoned");

        let invoice = Invoice {
            customer_name: draft.customer_name.trim().to_string(),
            customer_phone: draft.customer_phone.trim().to_string(),
            invoice_number: invoice_number_from(now),
            date: now,
            lines: draft.lines.clone(),
        };
        validate_invoice(&invoice)?;

        *self.finalized.lock().expect("billing lock poisoned") = Some(invoice.clone());
        Ok(invoice)
    }

    /// The last finalized invoice, if any.
    ///
    /// Share and print both read this so they carry identical stamps.
    pub fn finalized(&self) -> Option<Invoice> {
        self.finalized.lock().expect("billing lock poisoned").clone()
    }

    /// Clears the draft and the finalized invoice for the next customer.
    pub fn reset(&self) {
        *self.draft.lock().expect("billing lock poisoned") = DraftBill::default();
        *self.finalized.lock().expect("billing lock poisoned") = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, qty: i64, price_paise: i64, discount_bps: u32) -> BillLineItem {
        BillLineItem {
            name: name.to_string(),
            quantity: qty,
            unit_price_paise: price_paise,
            discount_bps,
        }
    }

    #[test]
    fn test_session_lifecycle() {
        let billing = BillingState::new();
        billing.set_customer("Asha".to_string(), "9876543210".to_string());

        billing.add_line(line("iPhone 15", 1, 7990000, 500)).unwrap();
        billing.add_line(line("Repair fee", 1, 50000, 0)).unwrap();

        let totals = billing.totals();
        assert!(totals.grand_total.paise() > 0);

        let invoice = billing.finalize(Utc::now()).unwrap();
        assert!(invoice.invoice_number.starts_with("INV-"));
        assert_eq!(invoice.lines.len(), 2);

        // Share and print read the same stamp
        assert_eq!(
            billing.finalized().unwrap().invoice_number,
            invoice.invoice_number
        );

        // Draft survives finalize, dies on reset
        assert_eq!(billing.draft().lines.len(), 2);
        billing.reset();
        assert!(billing.draft().lines.is_empty());
        assert!(billing.draft().customer_name.is_empty());
        assert!(billing.finalized().is_none());
    }

    #[test]
    fn test_invalid_line_leaves_draft_untouched() {
        let billing = BillingState::new();
        assert!(billing.add_line(line("", 1, 100, 0)).is_err());
        assert!(billing.add_line(line("x", 0, 100, 0)).is_err());
        assert!(billing.draft().lines.is_empty());
    }

    #[test]
    fn test_update_and_remove_by_index() {
        let billing = BillingState::new();
        billing.add_line(line("Case", 1, 29900, 0)).unwrap();

        billing.update_line(0, line("Case", 2, 29900, 0)).unwrap();
        assert_eq!(billing.draft().lines[0].quantity, 2);

        assert!(billing.update_line(5, line("Case", 1, 29900, 0)).is_err());

        billing.remove_line(0).unwrap();
        assert!(billing.remove_line(0).is_err());
    }

    #[test]
    fn test_finalize_requires_customer_and_lines() {
        let billing = BillingState::new();
        billing.add_line(line("Case", 1, 29900, 0)).unwrap();

        // Missing customer block
        assert!(billing.finalize(Utc::now()).is_err());

        billing.set_customer("Asha".to_string(), "9876543210".to_string());
        assert!(billing.finalize(Utc::now()).is_ok());

        // Failed finalize earlier left the draft editable throughout
        assert_eq!(billing.draft().lines.len(), 1);
    }

    #[test]
    fn test_line_cap() {
        let billing = BillingState::new();
        for i in 0..MAX_BILL_LINES {
            billing
                .add_line(line(&format!("item {i}"), 1, 100, 0))
                .unwrap();
        }
        let err = billing.add_line(line("one too many", 1, 100, 0)).unwrap_err();
        assert!(matches!(err, CoreError::BillTooLarge { .. }));
    }
}

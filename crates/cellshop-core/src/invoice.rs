//! # Invoice Computation Engine
//!
//! Per-line and aggregate discount/GST arithmetic.
//!
//! ## The Computation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Per line:                                                              │
//! │    item_total      = quantity × unit_price                              │
//! │    discount_amount = item_total × discount% / 100                       │
//! │    after_discount  = item_total - discount_amount                       │
//! │    gst_amount      = after_discount × 18%     ← GST on DISCOUNTED amt   │
//! │    line_final      = after_discount + gst_amount                        │
//! │                                                                         │
//! │  Aggregate:                                                             │
//! │    subtotal   = Σ after_discount          (GST-exclusive)               │
//! │    total_gst  = subtotal × 18%            (ONE rounding, on the sum)    │
//! │    grand_total = subtotal + total_gst                                   │
//! │                                                                         │
//! │  The aggregate GST is computed on the summed subtotal, never by         │
//! │  re-summing individually rounded per-line GST figures - that would      │
//! │  accumulate double-rounding drift.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module is the ONLY computation path. Both renderings (share
//! message and printable invoice) consume these results, so they cannot
//! drift from each other numerically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{BillLineItem, Invoice};
use crate::validation::{
    validate_customer_name, validate_discount_bps, validate_line_name, validate_phone,
    validate_price_paise, validate_quantity,
};
use crate::{GST_RATE, MAX_BILL_LINES};

// =============================================================================
// Line Totals
// =============================================================================

/// The computed figures for one bill line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineTotals {
    /// quantity × unit price.
    pub item_total: Money,

    /// Percentage discount taken off the item total.
    pub discount_amount: Money,

    /// item_total - discount_amount. The taxable value.
    pub after_discount: Money,

    /// 18% of the discounted amount.
    pub gst_amount: Money,

    /// after_discount + gst_amount.
    pub line_final: Money,
}

/// Computes the per-line figures.
///
/// GST is applied to the discounted amount, not the pre-discount amount,
/// at the single fixed shop rate.
pub fn compute_line(item: &BillLineItem) -> LineTotals {
    let item_total = item.unit_price().multiply_quantity(item.quantity);
    let discount_amount = item_total.percent_of(item.discount_bps);
    let after_discount = item_total - discount_amount;
    let gst_amount = after_discount.percent_of(GST_RATE.bps());
    let line_final = after_discount + gst_amount;

    LineTotals {
        item_total,
        discount_amount,
        after_discount,
        gst_amount,
        line_final,
    }
}

// =============================================================================
// Invoice Totals
// =============================================================================

/// The computed aggregate figures for a whole bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceTotals {
    /// Σ after_discount over all lines (GST-exclusive).
    pub subtotal: Money,

    /// 18% of the subtotal, rounded once at the aggregate.
    pub total_gst: Money,

    /// subtotal + total_gst.
    pub grand_total: Money,
}

/// Computes the aggregate figures over all lines.
pub fn compute_totals(lines: &[BillLineItem]) -> InvoiceTotals {
    let subtotal = lines
        .iter()
        .map(|line| compute_line(line).after_discount)
        .fold(Money::zero(), |acc, m| acc + m);
    let total_gst = subtotal.percent_of(GST_RATE.bps());

    InvoiceTotals {
        subtotal,
        total_gst,
        grand_total: subtotal + total_gst,
    }
}

// =============================================================================
// Invoice Number
// =============================================================================

/// Derives a short, human-legible invoice number from a timestamp.
///
/// Truncates the millisecond timestamp to its last six digits. For a
/// single-till, low-volume shop the collision risk is accepted as
/// negligible - this is a documented assumption, NOT a uniqueness
/// guarantee.
pub fn invoice_number_from(ts: DateTime<Utc>) -> String {
    let millis = ts.timestamp_millis();
    format!("INV-{:06}", millis.rem_euclid(1_000_000))
}

// =============================================================================
// Validation
// =============================================================================

/// Validates one bill line before it is accepted onto the draft.
///
/// A failed validation aborts before any state changes.
pub fn validate_line(item: &BillLineItem) -> Result<(), ValidationError> {
    validate_line_name(&item.name)?;
    validate_quantity(item.quantity)?;
    validate_price_paise(item.unit_price_paise)?;
    validate_discount_bps(item.discount_bps)?;
    Ok(())
}

/// Validates a complete invoice before finalize/share/print.
pub fn validate_invoice(invoice: &Invoice) -> CoreResult<()> {
    validate_customer_name(&invoice.customer_name)?;
    validate_phone(&invoice.customer_phone)?;

    if invoice.lines.is_empty() {
        return Err(ValidationError::Required {
            field: "line items".to_string(),
        }
        .into());
    }
    if invoice.lines.len() > MAX_BILL_LINES {
        return Err(crate::error::CoreError::BillTooLarge {
            max: MAX_BILL_LINES,
        });
    }
    for line in &invoice.lines {
        validate_line(line)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

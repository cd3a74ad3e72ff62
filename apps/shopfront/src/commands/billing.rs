//! # Billing Commands
//!
//! Draft bill lifecycle: lines in, totals out, finalize, share, print.
//!
//! All arithmetic lives in the core invoice engine; these commands only
//! orchestrate the session and hand the engine's output to the two
//! renderers, which therefore can never disagree on a figure.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::state::{AppEvent, AppEvents, BillingState, ConfigState};
use cellshop_core::invoice::{compute_line, compute_totals};
use cellshop_core::render;
use cellshop_core::{BillLineItem, Invoice};

// =============================================================================
// DTOs
// =============================================================================

/// One bill line as entered in the UI.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillLineInput {
    pub name: String,
    pub quantity: i64,
    pub unit_price_paise: i64,
    /// Percentage discount in basis points (500 = 5%).
    pub discount_bps: u32,
}

impl From<BillLineInput> for BillLineItem {
    fn from(input: BillLineInput) -> Self {
        BillLineItem {
            name: input.name.trim().to_string(),
            quantity: input.quantity,
            unit_price_paise: input.unit_price_paise,
            discount_bps: input.discount_bps,
        }
    }
}

/// Live totals for the bill screen, all in paise.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillTotalsDto {
    pub subtotal_paise: i64,
    pub total_gst_paise: i64,
    pub grand_total_paise: i64,
    /// Per-line final amounts, index-aligned with the draft lines.
    pub line_finals_paise: Vec<i64>,
}

/// A finalized invoice summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
    pub invoice_number: String,
    pub date: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub line_count: usize,
    pub grand_total_paise: i64,
}

impl From<&Invoice> for InvoiceDto {
    fn from(invoice: &Invoice) -> Self {
        let totals = compute_totals(&invoice.lines);
        InvoiceDto {
            invoice_number: invoice.invoice_number.clone(),
            date: invoice.date.to_rfc3339(),
            customer_name: invoice.customer_name.clone(),
            customer_phone: invoice.customer_phone.clone(),
            line_count: invoice.lines.len(),
            grand_total_paise: totals.grand_total.paise(),
        }
    }
}

/// Share payload: the message text and the messaging deep link.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareDto {
    pub message: String,
    pub link: String,
}

// =============================================================================
// Draft Editing
// =============================================================================

/// Sets the customer block on the draft.
pub async fn set_bill_customer(
    billing: &BillingState,
    name: String,
    phone: String,
) -> Result<(), ApiError> {
    billing.set_customer(name, phone);
    Ok(())
}

/// Appends a line to the draft.
pub async fn add_bill_line(billing: &BillingState, line: BillLineInput) -> Result<(), ApiError> {
    billing.add_line(line.into())?;
    Ok(())
}

/// Replaces the draft line at `index`.
pub async fn update_bill_line(
    billing: &BillingState,
    index: usize,
    line: BillLineInput,
) -> Result<(), ApiError> {
    billing.update_line(index, line.into())?;
    Ok(())
}

/// Removes the draft line at `index`.
pub async fn remove_bill_line(billing: &BillingState, index: usize) -> Result<(), ApiError> {
    billing.remove_line(index)?;
    Ok(())
}

/// Live totals over the draft.
pub async fn bill_totals(billing: &BillingState) -> Result<BillTotalsDto, ApiError> {
    let draft = billing.draft();
    let totals = compute_totals(&draft.lines);

    Ok(BillTotalsDto {
        subtotal_paise: totals.subtotal.paise(),
        total_gst_paise: totals.total_gst.paise(),
        grand_total_paise: totals.grand_total.paise(),
        line_finals_paise: draft
            .lines
            .iter()
            .map(|l| compute_line(l).line_final.paise())
            .collect(),
    })
}

// =============================================================================
// Finalize / Share / Print
// =============================================================================

/// Validates the draft and stamps invoice number and date.
pub async fn finalize_invoice(
    billing: &BillingState,
    events: &AppEvents,
) -> Result<InvoiceDto, ApiError> {
    let invoice = billing.finalize(Utc::now())?;

    info!(number = %invoice.invoice_number, lines = invoice.lines.len(), "Invoice finalized");

    events.emit(AppEvent::BillFinalized {
        invoice_number: invoice.invoice_number.clone(),
    });
    Ok(InvoiceDto::from(&invoice))
}

/// Renders the share message and its messaging deep link.
///
/// Requires a prior `finalize_invoice` so the shared document carries
/// the stamped number.
pub async fn share_invoice(billing: &BillingState) -> Result<ShareDto, ApiError> {
    let invoice = billing
        .finalized()
        .ok_or_else(|| ApiError::validation("no finalized invoice to share"))?;

    let lines: Vec<_> = invoice.lines.iter().map(compute_line).collect();
    let totals = compute_totals(&invoice.lines);

    let message = render::share_message(&invoice, &lines, &totals);
    let link = render::share_link(&invoice.customer_phone, &message);

    Ok(ShareDto { message, link })
}

/// Renders the printable HTML invoice.
pub async fn print_invoice(
    billing: &BillingState,
    config: &ConfigState,
) -> Result<String, ApiError> {
    let invoice = billing
        .finalized()
        .ok_or_else(|| ApiError::validation("no finalized invoice to print"))?;

    let lines: Vec<_> = invoice.lines.iter().map(compute_line).collect();
    let totals = compute_totals(&invoice.lines);

    Ok(render::invoice_html(&invoice, config.seller(), &lines, &totals))
}

/// Clears the session for the next customer.
pub async fn reset_bill(billing: &BillingState) -> Result<(), ApiError> {
    billing.reset();
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, qty: i64, price_paise: i64, discount_bps: u32) -> BillLineInput {
        BillLineInput {
            name: name.to_string(),
            quantity: qty,
            unit_price_paise: price_paise,
            discount_bps,
        }
    }

    #[tokio::test]
    async fn test_totals_follow_the_draft() {
        let billing = BillingState::new();

        add_bill_line(&billing, line("Case", 2, 10000, 1000))
            .await
            .unwrap();
        add_bill_line(&billing, line("Glass", 1, 5000, 0))
            .await
            .unwrap();

        // after_discount: 18000 + 5000 = 23000; GST 4140; grand 27140
        let totals = bill_totals(&billing).await.unwrap();
        assert_eq!(totals.subtotal_paise, 23000);
        assert_eq!(totals.total_gst_paise, 4140);
        assert_eq!(totals.grand_total_paise, 27140);
        assert_eq!(totals.line_finals_paise.len(), 2);

        remove_bill_line(&billing, 0).await.unwrap();
        let totals = bill_totals(&billing).await.unwrap();
        assert_eq!(totals.subtotal_paise, 5000);
    }

    #[tokio::test]
    async fn test_finalize_share_print_are_consistent() {
        let billing = BillingState::new();
        let events = AppEvents::new();
        let config = ConfigState::from_env();
        let mut rx = events.subscribe();

        set_bill_customer(&billing, "Asha".to_string(), "+919876543210".to_string())
            .await
            .unwrap();
        add_bill_line(&billing, line("iPhone 15", 1, 7990000, 500))
            .await
            .unwrap();

        let summary = finalize_invoice(&billing, &events).await.unwrap();
        assert!(summary.invoice_number.starts_with("INV-"));
        match rx.recv().await.unwrap() {
            AppEvent::BillFinalized { invoice_number } => {
                assert_eq!(invoice_number, summary.invoice_number);
            }
            other => panic!("unexpected event: {:?}", other),
        }

        let share = share_invoice(&billing).await.unwrap();
        assert!(share.message.contains(&summary.invoice_number));
        assert!(share.link.starts_with("https://wa.me/919876543210?text="));

        let html = print_invoice(&billing, &config).await.unwrap();
        assert!(html.contains(&summary.invoice_number));

        reset_bill(&billing).await.unwrap();
        assert!(share_invoice(&billing).await.is_err());
    }

    #[tokio::test]
    async fn test_share_before_finalize_is_rejected() {
        let billing = BillingState::new();
        let err = share_invoice(&billing).await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
    }
}

//! # Invoice Rendering
//!
//! Turns one computed invoice into its two outbound forms: the share
//! message (URL-escaped for a messaging deep link) and the printable
//! HTML tax invoice.
//!
//! Both renderings take the SAME `LineTotals`/`InvoiceTotals` values
//! produced by the invoice engine - there is no second computation path
//! that could drift.

use crate::invoice::{InvoiceTotals, LineTotals};
use crate::types::{Invoice, SellerIdentity};
use crate::GST_RATE;

// =============================================================================
// Share Message
// =============================================================================

/// Renders the plain-text share message: header, customer block,
/// itemized lines, and the three aggregate figures.
pub fn share_message(
    invoice: &Invoice,
    lines: &[LineTotals],
    totals: &InvoiceTotals,
) -> String {
    let mut out = String::new();

    out.push_str("*TAX INVOICE*\n");
    out.push_str(&format!("Invoice No: {}\n", invoice.invoice_number));
    out.push_str(&format!("Date: {}\n", invoice.date.format("%d-%m-%Y")));
    out.push('\n');
    out.push_str(&format!("Customer: {}\n", invoice.customer_name));
    out.push_str(&format!("Phone: {}\n", invoice.customer_phone));
    out.push('\n');

    for (item, computed) in invoice.lines.iter().zip(lines) {
        out.push_str(&format!(
            "{} x{} @ {}",
            item.name,
            item.quantity,
            item.unit_price()
        ));
        if item.discount_bps > 0 {
            out.push_str(&format!(
                " (-{}%)",
                item.discount_bps as f64 / 100.0
            ));
        }
        out.push_str(&format!(" = {}\n", computed.line_final));
    }

    out.push('\n');
    out.push_str(&format!("Subtotal: {}\n", totals.subtotal));
    out.push_str(&format!(
        "GST ({}%): {}\n",
        GST_RATE.percentage(),
        totals.total_gst
    ));
    out.push_str(&format!("*Total: {}*\n", totals.grand_total));

    out
}

/// Builds the messaging deep link for a rendered message.
///
/// The message body is URL-escaped; the phone number is expected to be
/// pre-validated digits (optionally with a leading "+", which is dropped
/// since the service wants a bare international number).
pub fn share_link(phone: &str, message: &str) -> String {
    let phone = phone.trim().trim_start_matches('+');
    format!("https://wa.me/{}?text={}", phone, urlencoding::encode(message))
}

// =============================================================================
// Printable Invoice
// =============================================================================

/// Renders the self-contained printable tax invoice (HTML/CSS).
///
/// Layout: header, seller identity block, customer block, line table,
/// aggregate block, signature area - suitable for a print-to-PDF action
/// by the hosting shell.
pub fn invoice_html(
    invoice: &Invoice,
    seller: &SellerIdentity,
    lines: &[LineTotals],
    totals: &InvoiceTotals,
) -> String {
    let mut rows = String::new();
    for (i, (item, computed)) in invoice.lines.iter().zip(lines).enumerate() {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}%</td><td>{}</td><td>{}</td></tr>\n",
            i + 1,
            escape_html(&item.name),
            item.quantity,
            item.unit_price(),
            item.discount_bps as f64 / 100.0,
            computed.gst_amount,
            computed.line_final,
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Invoice {number}</title>
<style>
  body {{ font-family: sans-serif; margin: 24px; color: #222; }}
  h1 {{ text-align: center; font-size: 20px; margin-bottom: 4px; }}
  .seller, .customer {{ margin: 12px 0; font-size: 13px; }}
  .meta {{ text-align: right; font-size: 13px; }}
  table {{ width: 100%; border-collapse: collapse; margin-top: 12px; }}
  th, td {{ border: 1px solid #999; padding: 6px 8px; font-size: 13px; text-align: left; }}
  th {{ background: #f0f0f0; }}
  .totals {{ margin-top: 12px; width: 40%; margin-left: auto; }}
  .totals td {{ border: none; text-align: right; }}
  .grand {{ font-weight: bold; border-top: 2px solid #222; }}
  .sign {{ margin-top: 64px; text-align: right; font-size: 13px; }}
</style>
</head>
<body>
<h1>TAX INVOICE</h1>
<div class="seller">
  <strong>{shop}</strong><br>
  {address}<br>
  Phone: {seller_phone}<br>
  GSTIN: {gstin}
</div>
<div class="meta">
  Invoice No: {number}<br>
  Date: {date}
</div>
<div class="customer">
  <strong>Billed To</strong><br>
  {customer}<br>
  {customer_phone}
</div>
<table>
<thead>
<tr><th>#</th><th>Item</th><th>Qty</th><th>Rate</th><th>Disc</th><th>GST</th><th>Amount</th></tr>
</thead>
<tbody>
{rows}</tbody>
</table>
<table class="totals">
<tr><td>Subtotal</td><td>{subtotal}</td></tr>
<tr><td>GST ({gst_rate}%)</td><td>{gst}</td></tr>
<tr class="grand"><td>Grand Total</td><td>{grand}</td></tr>
</table>
<div class="sign">Authorised Signatory</div>
</body>
</html>
"#,
        number = escape_html(&invoice.invoice_number),
        shop = escape_html(&seller.shop_name),
        address = escape_html(&seller.address),
        seller_phone = escape_html(&seller.phone),
        gstin = escape_html(&seller.gstin),
        date = invoice.date.format("%d-%m-%Y"),
        customer = escape_html(&invoice.customer_name),
        customer_phone = escape_html(&invoice.customer_phone),
        rows = rows,
        subtotal = totals.subtotal,
        gst_rate = GST_RATE.percentage(),
        gst = totals.total_gst,
        grand = totals.grand_total,
    )
}

/// Minimal HTML escaping for user-entered text.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{compute_line, compute_totals};
    use crate::types::BillLineItem;
    use chrono::{TimeZone, Utc};

    fn sample_invoice() -> Invoice {
        Invoice {
            customer_name: "Asha".to_string(),
            customer_phone: "+919876543210".to_string(),
            invoice_number: "INV-483920".to_string(),
            date: Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap(),
            lines: vec![
                BillLineItem {
                    name: "Apple iPhone 15".to_string(),
                    quantity: 1,
                    unit_price_paise: 7990000,
                    discount_bps: 500, // 5%
                },
                BillLineItem {
                    name: "Tempered Glass".to_string(),
                    quantity: 2,
                    unit_price_paise: 29900,
                    discount_bps: 0,
                },
            ],
        }
    }

    fn computed(invoice: &Invoice) -> (Vec<LineTotals>, InvoiceTotals) {
        let lines: Vec<LineTotals> = invoice.lines.iter().map(compute_line).collect();
        let totals = compute_totals(&invoice.lines);
        (lines, totals)
    }

    #[test]
    fn test_share_message_contains_all_figures() {
        let invoice = sample_invoice();
        let (lines, totals) = computed(&invoice);
        let msg = share_message(&invoice, &lines, &totals);

        assert!(msg.contains("INV-483920"));
        assert!(msg.contains("Customer: Asha"));
        assert!(msg.contains("Apple iPhone 15 x1"));
        assert!(msg.contains(&format!("Subtotal: {}", totals.subtotal)));
        assert!(msg.contains(&format!("GST (18%): {}", totals.total_gst)));
        assert!(msg.contains(&format!("Total: {}", totals.grand_total)));
    }

    #[test]
    fn test_share_link_is_escaped() {
        let link = share_link("+919876543210", "Total: ₹100.00 & thanks");
        assert!(link.starts_with("https://wa.me/919876543210?text="));
        assert!(!link.contains(' '));
        assert!(!link.contains('&') || link.find('&').unwrap() > link.find("text=").unwrap());
        assert!(link.contains("%20"));
    }

    #[test]
    fn test_html_invoice_layout_blocks() {
        let invoice = sample_invoice();
        let (lines, totals) = computed(&invoice);
        let seller = SellerIdentity {
            shop_name: "Shree Mobiles".to_string(),
            address: "12 Market Road".to_string(),
            phone: "0123456789".to_string(),
            gstin: "29ABCDE1234F1Z5".to_string(),
        };
        let html = invoice_html(&invoice, &seller, &lines, &totals);

        assert!(html.contains("TAX INVOICE"));
        assert!(html.contains("Shree Mobiles"));
        assert!(html.contains("29ABCDE1234F1Z5"));
        assert!(html.contains("Billed To"));
        assert!(html.contains("Authorised Signatory"));
        assert!(html.contains("Apple iPhone 15"));
    }

    #[test]
    fn test_renderings_are_numerically_consistent() {
        // Same totals object feeds both renderings; the figures printed
        // in each must be string-identical.
        let invoice = sample_invoice();
        let (lines, totals) = computed(&invoice);
        let seller = SellerIdentity {
            shop_name: "Shree Mobiles".to_string(),
            address: "12 Market Road".to_string(),
            phone: "0123456789".to_string(),
            gstin: "29ABCDE1234F1Z5".to_string(),
        };

        let msg = share_message(&invoice, &lines, &totals);
        let html = invoice_html(&invoice, &seller, &lines, &totals);

        for figure in [
            totals.subtotal.to_string(),
            totals.total_gst.to_string(),
            totals.grand_total.to_string(),
        ] {
            assert!(msg.contains(&figure));
            assert!(html.contains(&figure));
        }
    }

    #[test]
    fn test_html_escapes_user_text() {
        let mut invoice = sample_invoice();
        invoice.customer_name = "<script>alert(1)</script>".to_string();
        let (lines, totals) = computed(&invoice);
        let seller = SellerIdentity {
            shop_name: "Shop".to_string(),
            address: "Addr".to_string(),
            phone: "0".to_string(),
            gstin: "G".to_string(),
        };
        let html = invoice_html(&invoice, &seller, &lines, &totals);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}

//! # Domain Types
//!
//! Core domain types used throughout Cellshop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  BillLineItem   │   │    Invoice      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  name           │   │  invoice_number │       │
//! │  │  brand/model    │   │  quantity       │   │  customer       │       │
//! │  │  stock_quantity │   │  unit price     │   │  date           │       │
//! │  │  location       │   │  discount (bps) │   │  lines          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Product is persisted in the record store.                              │
//! │  BillLineItem and Invoice are EPHEMERAL: they exist only for the        │
//! │  duration of one billing session and are reset after send.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Location Type
// =============================================================================

/// Where a product is physically stored in the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    /// Display floor stock.
    Floor,
    /// Boxed stock in a lettered bundle (e.g. "A-14").
    Bundle,
    /// Open rack storage.
    Rack,
    /// Serial-tracked unit (one row per handset).
    Serial,
}

impl Default for LocationType {
    fn default() -> Self {
        LocationType::Floor
    }
}

// =============================================================================
// Product
// =============================================================================

/// A stocked catalog item.
///
/// ## Invariant
/// `stock_quantity >= 0` always. Quantity is mutated only through explicit
/// increment/decrement/set operations; the store rejects any delta that
/// would take it negative.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Manufacturer brand (e.g. "Apple").
    pub brand: String,

    /// Model name (e.g. "iPhone 15").
    pub model: String,

    /// Serial/IMEI number for serial-tracked units.
    pub serial_number: Option<String>,

    /// Purchase price in paise (for margin visibility).
    pub purchase_price_paise: Option<i64>,

    /// Selling price in paise.
    pub selling_price_paise: Option<i64>,

    /// On-hand quantity. Never negative.
    pub stock_quantity: i64,

    /// Storage category (floor / bundle / rack / serial).
    pub location_type: LocationType,

    /// Free-text location code (e.g. "A-14", "B7").
    /// All structure is derived through the location-key parser; this
    /// field itself stays free text for storage compatibility.
    pub location_number: String,

    /// Identity that recorded the row (present when a user was signed in).
    pub created_by: Option<String>,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the selling price as Money, zero when unpriced.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_paise(self.selling_price_paise.unwrap_or(0))
    }

    /// Whether stock is at or below the low-stock threshold (5 units).
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= LOW_STOCK_THRESHOLD
    }
}

// =============================================================================
// Bill Line Item
// =============================================================================

/// One line on a draft bill.
///
/// Ephemeral: held only while composing one invoice, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillLineItem {
    /// Item description as printed (usually "Brand Model").
    pub name: String,

    /// Units sold. Must be positive.
    pub quantity: i64,

    /// Unit price in paise. Must be non-negative.
    pub unit_price_paise: i64,

    /// Percentage discount in basis points (1000 = 10%). Range 0-10000.
    pub discount_bps: u32,
}

impl BillLineItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A finalized invoice, ready to share or print.
///
/// Created fresh per billing session and destroyed after send; there is no
/// invoice ledger in the store.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Invoice {
    /// Customer display name.
    pub customer_name: String,

    /// Customer phone (digits, used for the messaging deep link).
    pub customer_phone: String,

    /// Short invoice number derived from the finalize timestamp.
    pub invoice_number: String,

    /// Invoice date.
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    /// Ordered line items.
    pub lines: Vec<BillLineItem>,
}

// =============================================================================
// Seller Identity
// =============================================================================

/// Shop identity printed on the tax invoice header.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SellerIdentity {
    pub shop_name: String,
    pub address: String,
    pub phone: String,
    /// GST registration number shown on the formal invoice.
    pub gstin: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

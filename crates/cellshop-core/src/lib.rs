//! # cellshop-core: Pure Business Logic for Cellshop
//!
//! This crate is the **heart** of Cellshop. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cellshop Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Shop UI (external)                           │   │
//! │  │    Search ──► Bundles ──► Billing ──► Share/Print               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    shopfront commands                           │   │
//! │  │    search_products, add_product, share_invoice, etc.            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cellshop-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌──────────┐            │   │
//! │  │   │  money  │ │ invoice │ │ location │ │ grouping │            │   │
//! │  │   │  GST    │ │ totals  │ │  parser  │ │ bundles  │            │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └──────────┘            │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    cellshop-db (Record Store)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, BillLineItem, Invoice)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`location`] - Bundle location-key parser and natural-sort comparator
//! - [`grouping`] - Bundle grouping, duplicate detection, filter composition
//! - [`invoice`] - Invoice computation engine (discount + GST rollups)
//! - [`render`] - Share-message and printable tax-invoice rendering
//! - [`search`] - Search plan construction for the record store
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod grouping;
pub mod invoice;
pub mod location;
pub mod money;
pub mod render;
pub mod search;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use cellshop_core::Money` instead of
// `use cellshop_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use location::LocationKey;
pub use money::{GstRate, Money};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// GST rate applied to every bill line (1800 bps = 18%).
///
/// ## Why a constant?
/// The shop sells in a single tax category; there is no per-item rate
/// variation. GST is always computed on the discounted amount.
pub const GST_RATE: GstRate = GstRate::from_bps(1800);

/// Stock level at or below which a product counts as "low stock".
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Minimum characters before a search query is dispatched to the store.
///
/// Shorter input yields an empty result set without any lookup.
pub const MIN_SEARCH_CHARS: usize = 2;

/// Upper bound on search result volume (bounds latency and payload size).
pub const SEARCH_RESULT_LIMIT: u32 = 50;

/// Quiet period for coalescing keystrokes before a search is issued.
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Cooldown window for suppressing repeated barcode payloads.
///
/// Continuous camera scanning re-decodes the same serial several times a
/// second; without this window every frame would trigger a lookup.
pub const SCAN_COOLDOWN_SECS: u64 = 3;

/// Maximum line items on a single bill.
///
/// ## Business Reason
/// Prevents runaway bills and keeps the printed invoice to one page.
pub const MAX_BILL_LINES: usize = 50;

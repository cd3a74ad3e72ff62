//! # Search Plan Construction
//!
//! Builds the query parameters handed to the record store for product
//! search. The plan captures the whole contract in one value:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  raw input "  ip "  ──► trim ──► len < 2 ──► None (no store call)       │
//! │                                                                         │
//! │  raw input "iphone" ──► SearchPlan {                                    │
//! │      needle: "iphone",      case-insensitive CONTAINS                   │
//! │      fields: brand OR model,                                            │
//! │      order:  brand, model, location_type, location_number,              │
//! │      limit:  50,                                                        │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The deterministic multi-key sort makes repeated runs of the same query
//! stable, and keeps multiple location-rows of the same model grouped and
//! ordered in the result list.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{MIN_SEARCH_CHARS, SEARCH_RESULT_LIMIT};

/// A searchable product field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Brand,
    Model,
}

impl SearchField {
    /// Column name in the record store.
    pub fn column(&self) -> &'static str {
        match self {
            SearchField::Brand => "brand",
            SearchField::Model => "model",
        }
    }
}

/// An orderable column in the deterministic result sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Brand,
    Model,
    LocationType,
    LocationNumber,
}

impl SortField {
    /// Column name in the record store.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Brand => "brand",
            SortField::Model => "model",
            SortField::LocationType => "location_type",
            SortField::LocationNumber => "location_number",
        }
    }
}

/// A fully-specified product search handed to the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SearchPlan {
    /// Trimmed search text, matched case-insensitively as a substring.
    pub needle: String,

    /// Fields matched with logical OR.
    pub fields: Vec<SearchField>,

    /// Ordered sort keys, all ascending.
    pub order_by: Vec<SortField>,

    /// Hard cap on result volume.
    pub limit: u32,
}

impl SearchPlan {
    /// Builds a plan from raw query input.
    ///
    /// ## Contract
    /// - Trims the input.
    /// - Input shorter than `MIN_SEARCH_CHARS` (2) yields `None`: the
    ///   caller must produce an empty result set WITHOUT contacting the
    ///   store.
    pub fn build(raw: &str) -> Option<SearchPlan> {
        let needle = raw.trim();
        if needle.len() < MIN_SEARCH_CHARS {
            return None;
        }

        Some(SearchPlan {
            needle: needle.to_string(),
            fields: vec![SearchField::Brand, SearchField::Model],
            order_by: vec![
                SortField::Brand,
                SortField::Model,
                SortField::LocationType,
                SortField::LocationNumber,
            ],
            limit: SEARCH_RESULT_LIMIT,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Location Key Parser
//!
//! Derives structured bundle-location keys from the free-text
//! `location_number` field, and provides the natural-sort comparator used
//! everywhere bundle labels are ordered.
//!
//! ## The Location Scheme
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Free text in the store          Derived LocationKey                    │
//! │  ──────────────────────          ─────────────────────                  │
//! │  "A14"   ──────────────────────► { prefix: 'A', dashed: false, 14 }     │
//! │  "a-14"  ──► uppercase ────────► { prefix: 'A', dashed: true,  14 }     │
//! │  "B7"    ──────────────────────► { prefix: 'B', dashed: false,  7 }     │
//! │  "XYZ"   ──────────────────────► None (excluded from prefix views)      │
//! │                                                                         │
//! │  "A" and "A-" are DISTINCT filter buckets: both forms can coexist in    │
//! │  the data and each is surfaced as its own selectable filter.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module is the ONLY place the pattern lives. Every consumer
//! (filtering, grouping, sorting) shares this one normalization rule -
//! never duplicate the matching logic at a call site.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Product;

/// One letter, optional single dash, one or more digits.
/// Input is uppercased before matching, so only A-Z appears here.
static LOCATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z])(-?)([0-9]+)$").expect("location pattern is valid"));

// =============================================================================
// LocationKey
// =============================================================================

/// A structured bundle-location key, derived (never persisted).
///
/// Absence of a key means the product is excluded from bundle-prefix
/// grouping views - an unparseable location is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LocationKey {
    /// Single uppercase prefix letter.
    pub prefix_letter: char,

    /// Whether the dash form ("A-14" rather than "A14") was used.
    pub dashed: bool,

    /// Numeric suffix, compared numerically (so 2 < 10).
    pub numeric_suffix: u32,

    /// The full location string, uppercased. Exact-bundle filters match
    /// on this value.
    pub raw_upper: String,
}

impl LocationKey {
    /// Parses a free-text location string into a structured key.
    ///
    /// ## Contract
    /// - Normalizes to uppercase, then matches "letter, optional dash,
    ///   digits".
    /// - `None` on no match; callers exclude such records from
    ///   prefix-based filtering rather than erroring.
    ///
    /// ## Example
    /// ```rust
    /// use cellshop_core::location::LocationKey;
    ///
    /// let key = LocationKey::parse("b-7").unwrap();
    /// assert_eq!(key.prefix_letter, 'B');
    /// assert!(key.dashed);
    /// assert_eq!(key.numeric_suffix, 7);
    /// ```
    pub fn parse(location: &str) -> Option<LocationKey> {
        let raw_upper = location.trim().to_uppercase();
        let captures = LOCATION_PATTERN.captures(&raw_upper)?;

        let prefix_letter = captures.get(1)?.as_str().chars().next()?;
        let dashed = !captures.get(2)?.as_str().is_empty();
        // Suffixes longer than u32 are junk data, treated as unparseable
        let numeric_suffix: u32 = captures.get(3)?.as_str().parse().ok()?;

        Some(LocationKey {
            prefix_letter,
            dashed,
            numeric_suffix,
            raw_upper,
        })
    }

    /// The filter bucket this key belongs to: "A" or "A-".
    pub fn filter_prefix(&self) -> String {
        if self.dashed {
            format!("{}-", self.prefix_letter)
        } else {
            self.prefix_letter.to_string()
        }
    }
}

// =============================================================================
// Natural Sort
// =============================================================================

/// Compares two location strings "naturally".
///
/// Extracts the first run of digits from each string and compares
/// numerically when both extract; otherwise falls back to lexicographic
/// comparison of the uppercased strings. Guarantees "A2" sorts before
/// "A10" (unlike plain lexicographic sort).
///
/// Equal numeric suffixes tie-break lexicographically so the order is
/// total and repeated runs are stable.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a_upper = a.trim().to_uppercase();
    let b_upper = b.trim().to_uppercase();

    match (first_digit_run(&a_upper), first_digit_run(&b_upper)) {
        (Some(na), Some(nb)) => na.cmp(&nb).then_with(|| a_upper.cmp(&b_upper)),
        _ => a_upper.cmp(&b_upper),
    }
}

/// Returns the first contiguous run of ASCII digits as a number.
fn first_digit_run(s: &str) -> Option<u64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    // Absurdly long runs overflow u64; treat them as non-numeric
    digits.parse().ok()
}

// =============================================================================
// Filter-Prefix Enumeration
// =============================================================================

/// Enumerates the selectable prefix filters present in a product set.
///
/// Per letter, detects whether the plain and dashed forms both occur and
/// surfaces each occurring form as an independent filter ("A" and "A-"
/// are separate entries when both exist in the data). Output is sorted
/// by letter, plain form before dashed form.
///
/// Products whose location doesn't parse contribute nothing.
pub fn enumerate_prefixes(products: &[Product]) -> Vec<String> {
    let mut prefixes: Vec<String> = products
        .iter()
        .filter_map(|p| LocationKey::parse(&p.location_number))
        .map(|key| key.filter_prefix())
        .collect();

    prefixes.sort();
    prefixes.dedup();
    prefixes
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LocationType, Product};
    use chrono::Utc;

    fn product_at(location: &str) -> Product {
        Product {
            id: uuid::Uuid::new_v4().to_string(),
            brand: "Apple".to_string(),
            model: "iPhone 15".to_string(),
            serial_number: None,
            purchase_price_paise: None,
            selling_price_paise: None,
            stock_quantity: 1,
            location_type: LocationType::Bundle,
            location_number: location.to_string(),
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_dashed() {
        let key = LocationKey::parse("B-7").unwrap();
        assert_eq!(key.prefix_letter, 'B');
        assert!(key.dashed);
        assert_eq!(key.numeric_suffix, 7);
        assert_eq!(key.raw_upper, "B-7");
        assert_eq!(key.filter_prefix(), "B-");
    }

    #[test]
    fn test_parse_lowercase_normalized() {
        let key = LocationKey::parse("c3").unwrap();
        assert_eq!(key.prefix_letter, 'C');
        assert!(!key.dashed);
        assert_eq!(key.numeric_suffix, 3);
        assert_eq!(key.filter_prefix(), "C");
    }

    #[test]
    fn test_parse_rejects_junk() {
        assert!(LocationKey::parse("XYZ").is_none());
        assert!(LocationKey::parse("").is_none());
        assert!(LocationKey::parse("14A").is_none());
        assert!(LocationKey::parse("A--14").is_none());
        assert!(LocationKey::parse("A-").is_none());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let key = LocationKey::parse("  a14 ").unwrap();
        assert_eq!(key.raw_upper, "A14");
    }

    #[test]
    fn test_natural_sort_order() {
        let mut labels = vec!["A10", "A2", "A1"];
        labels.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(labels, vec!["A1", "A2", "A10"]);
    }

    #[test]
    fn test_natural_sort_falls_back_to_lexicographic() {
        // No digits on one side: plain string comparison
        assert_eq!(natural_cmp("AA", "AB"), Ordering::Less);
        assert_eq!(natural_cmp("A2", "AA"), Ordering::Less);
    }

    #[test]
    fn test_natural_sort_ties_are_deterministic() {
        // Same numeric suffix, different letters
        assert_eq!(natural_cmp("A5", "B5"), Ordering::Less);
        assert_eq!(natural_cmp("B5", "A5"), Ordering::Greater);
        assert_eq!(natural_cmp("a5", "A5"), Ordering::Equal);
    }

    #[test]
    fn test_enumerate_prefixes_both_forms() {
        let products = vec![
            product_at("A1"),
            product_at("A-3"),
            product_at("A2"),
            product_at("B7"),
            product_at("loose box"), // unparseable, contributes nothing
        ];

        let prefixes = enumerate_prefixes(&products);
        assert_eq!(prefixes, vec!["A", "A-", "B"]);
    }

    #[test]
    fn test_enumerate_prefixes_empty() {
        assert!(enumerate_prefixes(&[]).is_empty());
        assert!(enumerate_prefixes(&[product_at("back room")]).is_empty());
    }
}

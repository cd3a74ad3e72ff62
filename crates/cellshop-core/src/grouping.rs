//! # Grouping / Duplicate-Detection Engine
//!
//! Two independent groupings over the same product collection:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. By exact uppercased location ── "bundle view"                       │
//! │     [iPhone@A1, Nord@A1]  [iPhone@B2]  [S23@B-4]                        │
//! │     clusters labeled by location, ordered naturally (A1 < A2 < A10)     │
//! │                                                                         │
//! │  2. By (brand, model) identity ── "multi-location report"               │
//! │     Apple iPhone 15: A1 (qty 5) + B2 (qty 3) ──► total 8, 2 locations   │
//! │     A group is interesting precisely when it has ≥ 2 members.           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both groupings are derived on every call - aggregates are never cached,
//! so a quantity change is reflected the next time the pipeline runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::location::{natural_cmp, LocationKey};
use crate::types::Product;

// =============================================================================
// Bundle Grouping (by exact location)
// =============================================================================

/// All products physically stored at one location, labeled by the
/// uppercased location string.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BundleGroup {
    /// Uppercased location string (e.g. "A-14").
    pub label: String,

    /// Products stored at this location.
    pub products: Vec<Product>,
}

impl BundleGroup {
    /// Total units stored at this location.
    pub fn total_stock(&self) -> i64 {
        self.products.iter().map(|p| p.stock_quantity).sum()
    }
}

/// Clusters products by exact uppercased location string.
///
/// Clusters are ordered by the natural-sort comparator over their labels.
/// Rows with an empty location are skipped (nothing to cluster under);
/// rows whose location doesn't parse as a bundle key still cluster here
/// under their raw uppercased string - only PREFIX-filtered views exclude
/// them.
pub fn group_by_location(products: &[Product]) -> Vec<BundleGroup> {
    let mut by_location: BTreeMap<String, Vec<Product>> = BTreeMap::new();

    for product in products {
        let label = product.location_number.trim().to_uppercase();
        if label.is_empty() {
            continue;
        }
        by_location.entry(label).or_default().push(product.clone());
    }

    let mut groups: Vec<BundleGroup> = by_location
        .into_iter()
        .map(|(label, products)| BundleGroup { label, products })
        .collect();

    groups.sort_by(|a, b| natural_cmp(&a.label, &b.label));
    groups
}

// =============================================================================
// Duplicate Detection (by brand + model identity)
// =============================================================================

/// One catalog identity (brand + model) found at multiple locations.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DuplicateGroup {
    /// Brand as recorded on the first member.
    pub brand: String,

    /// Model as recorded on the first member.
    pub model: String,

    /// All rows sharing this identity, in input order.
    pub members: Vec<Product>,
}

impl DuplicateGroup {
    /// Total stock across all member rows.
    ///
    /// Recomputed from members on every call, so it always reflects the
    /// latest quantity edits.
    pub fn total_stock(&self) -> i64 {
        self.members.iter().map(|p| p.stock_quantity).sum()
    }

    /// Number of distinct location codes holding this item.
    pub fn location_count(&self) -> usize {
        let mut locations: Vec<String> = self
            .members
            .iter()
            .map(|p| p.location_number.trim().to_uppercase())
            .collect();
        locations.sort();
        locations.dedup();
        locations.len()
    }
}

/// Finds catalog items split across multiple physical rows.
///
/// Groups by case-insensitive (brand, model); a group is "multi-location"
/// precisely when it has ≥ 2 members. Single-row identities are not
/// reported. Output is ordered by brand then model.
pub fn find_multi_location(products: &[Product]) -> Vec<DuplicateGroup> {
    let mut by_identity: BTreeMap<(String, String), Vec<Product>> = BTreeMap::new();

    for product in products {
        let key = (
            product.brand.trim().to_uppercase(),
            product.model.trim().to_uppercase(),
        );
        by_identity.entry(key).or_default().push(product.clone());
    }

    by_identity
        .into_values()
        .filter(|members| members.len() >= 2)
        .map(|members| DuplicateGroup {
            brand: members[0].brand.clone(),
            model: members[0].model.clone(),
            members,
        })
        .collect()
}

// =============================================================================
// Filter Composition
// =============================================================================

/// A prefix filter bucket ("A" or "A-").
///
/// `dashed: None` matches both forms of the letter; the buckets surfaced
/// by filter enumeration always specify the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PrefixFilter {
    pub letter: char,
    pub dashed: Option<bool>,
}

impl PrefixFilter {
    /// Parses a filter string as surfaced by prefix enumeration:
    /// "A" selects the plain form, "A-" the dashed form.
    pub fn parse(filter: &str) -> Option<PrefixFilter> {
        let upper = filter.trim().to_uppercase();
        let mut chars = upper.chars();
        let letter = chars.next()?;
        if !letter.is_ascii_uppercase() {
            return None;
        }
        match chars.next() {
            None => Some(PrefixFilter {
                letter,
                dashed: Some(false),
            }),
            Some('-') if chars.next().is_none() => Some(PrefixFilter {
                letter,
                dashed: Some(true),
            }),
            _ => None,
        }
    }

    /// A filter matching both forms of a letter.
    pub fn letter_only(letter: char) -> PrefixFilter {
        PrefixFilter {
            letter: letter.to_ascii_uppercase(),
            dashed: None,
        }
    }

    fn matches(&self, key: &LocationKey) -> bool {
        key.prefix_letter == self.letter && self.dashed.map_or(true, |d| key.dashed == d)
    }
}

/// Composable bundle-view filter state.
///
/// Prefix and specific-bundle filters compose by intersection. The filter
/// is re-applied (not re-fetched) against the locally patched collection
/// after any mutation, so the displayed set stays consistent without a
/// full reload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BundleFilter {
    /// Restrict to one prefix bucket.
    pub prefix: Option<PrefixFilter>,

    /// Restrict to one exact location string (uppercased comparison).
    pub bundle: Option<String>,
}

impl BundleFilter {
    /// Applies the filter to a product collection.
    ///
    /// - Prefix filter: product must have a parseable LocationKey whose
    ///   letter (and dash form, when the filter specifies one) matches.
    ///   Unparseable locations are excluded, never an error.
    /// - Bundle filter: exact uppercased location equality.
    /// - Both set: intersection.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect()
    }

    fn matches(&self, product: &Product) -> bool {
        if let Some(prefix) = &self.prefix {
            match LocationKey::parse(&product.location_number) {
                Some(key) if prefix.matches(&key) => {}
                _ => return false,
            }
        }

        if let Some(bundle) = &self.bundle {
            let label = product.location_number.trim().to_uppercase();
            if label != bundle.trim().to_uppercase() {
                return false;
            }
        }

        true
    }

    /// Whether any filter is active.
    pub fn is_active(&self) -> bool {
        self.prefix.is_some() || self.bundle.is_some()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LocationType;
    use chrono::Utc;

    fn product(brand: &str, model: &str, qty: i64, location: &str) -> Product {
        Product {
            id: uuid::Uuid::new_v4().to_string(),
            brand: brand.to_string(),
            model: model.to_string(),
            serial_number: None,
            purchase_price_paise: None,
            selling_price_paise: None,
            stock_quantity: qty,
            location_type: LocationType::Bundle,
            location_number: location.to_string(),
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_group_by_location_natural_order() {
        let products = vec![
            product("Apple", "iPhone 15", 2, "A10"),
            product("Samsung", "S23", 1, "A2"),
            product("OnePlus", "Nord", 3, "a2"), // same bundle, lowercase
            product("Xiaomi", "Note 12", 1, "A1"),
        ];

        let groups = group_by_location(&products);
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["A1", "A2", "A10"]);

        // "A2" and "a2" cluster together
        assert_eq!(groups[1].products.len(), 2);
        assert_eq!(groups[1].total_stock(), 4);
    }

    #[test]
    fn test_group_by_location_skips_empty() {
        let products = vec![product("Apple", "iPhone 15", 2, "  ")];
        assert!(group_by_location(&products).is_empty());
    }

    #[test]
    fn test_multi_location_detection() {
        let products = vec![
            product("Apple", "X", 3, "A1"),
            product("Apple", "X", 5, "B2"),
            product("Samsung", "S23", 4, "C1"), // single row, not reported
        ];

        let groups = find_multi_location(&products);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].brand, "Apple");
        assert_eq!(groups[0].model, "X");
        assert_eq!(groups[0].total_stock(), 8);
        assert_eq!(groups[0].location_count(), 2);
    }

    #[test]
    fn test_multi_location_identity_is_case_insensitive() {
        let products = vec![
            product("apple", "x", 1, "A1"),
            product("Apple", "X", 2, "B2"),
        ];
        let groups = find_multi_location(&products);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total_stock(), 3);
    }

    #[test]
    fn test_aggregate_reflects_quantity_change() {
        let mut products = vec![
            product("Apple", "X", 3, "A1"),
            product("Apple", "X", 5, "B2"),
        ];
        assert_eq!(find_multi_location(&products)[0].total_stock(), 8);

        // Edit a member quantity and re-run the pipeline
        products[0].stock_quantity = 1;
        assert_eq!(find_multi_location(&products)[0].total_stock(), 6);
    }

    #[test]
    fn test_prefix_filter_parse() {
        assert_eq!(
            PrefixFilter::parse("A"),
            Some(PrefixFilter {
                letter: 'A',
                dashed: Some(false)
            })
        );
        assert_eq!(
            PrefixFilter::parse("a-"),
            Some(PrefixFilter {
                letter: 'A',
                dashed: Some(true)
            })
        );
        assert_eq!(PrefixFilter::parse("AB"), None);
        assert_eq!(PrefixFilter::parse(""), None);
        assert_eq!(PrefixFilter::parse("7"), None);
    }

    #[test]
    fn test_prefix_filter_distinguishes_dash_forms() {
        let products = vec![
            product("Apple", "X", 1, "A1"),
            product("Apple", "Y", 1, "A-1"),
            product("Apple", "Z", 1, "B1"),
        ];

        let plain = BundleFilter {
            prefix: PrefixFilter::parse("A"),
            bundle: None,
        };
        let visible = plain.apply(&products);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].model, "X");

        let dashed = BundleFilter {
            prefix: PrefixFilter::parse("A-"),
            bundle: None,
        };
        let visible = dashed.apply(&products);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].model, "Y");

        let either = BundleFilter {
            prefix: Some(PrefixFilter::letter_only('A')),
            bundle: None,
        };
        assert_eq!(either.apply(&products).len(), 2);
    }

    #[test]
    fn test_filters_compose_by_intersection() {
        let products = vec![
            product("Apple", "X", 1, "A1"),
            product("Apple", "Y", 1, "A2"),
            product("Apple", "Z", 1, "B1"),
        ];

        let filter = BundleFilter {
            prefix: PrefixFilter::parse("A"),
            bundle: Some("a2".to_string()),
        };
        let visible = filter.apply(&products);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].model, "Y");
    }

    #[test]
    fn test_prefix_filter_excludes_unparseable() {
        let products = vec![
            product("Apple", "X", 1, "A1"),
            product("Apple", "Y", 1, "spare drawer"),
        ];
        let filter = BundleFilter {
            prefix: PrefixFilter::parse("A"),
            bundle: None,
        };
        assert_eq!(filter.apply(&products).len(), 1);
    }

    #[test]
    fn test_empty_filter_passes_everything() {
        let products = vec![
            product("Apple", "X", 1, "A1"),
            product("Apple", "Y", 1, "spare drawer"),
        ];
        let filter = BundleFilter::default();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&products).len(), 2);
    }
}

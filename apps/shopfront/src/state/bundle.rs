//! # Bundle View State
//!
//! Cached product rows plus the active bundle filter.
//!
//! ## Local Patch, Remote Truth
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  mutation command ──► record store (source of truth)                    │
//! │        │                     │                                          │
//! │        │       confirmed row ┘                                          │
//! │        ▼                                                                │
//! │  patch cached copy ──► re-run filter/group/sort pipeline                │
//! │                                                                         │
//! │  The cache mutates ONLY after the store confirms, and then applies      │
//! │  the same transformation locally - no full reload per edit. A slow or   │
//! │  failed store call leaves the cache untouched.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Aggregates (per-cluster totals, prefix buckets) are derived on every
//! `view()` call, never cached, so a quantity edit is reflected in the
//! very next read.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::debug;

use cellshop_core::grouping::{
    find_multi_location, group_by_location, BundleFilter, BundleGroup, DuplicateGroup,
    PrefixFilter,
};
use cellshop_core::location::enumerate_prefixes;
use cellshop_core::Product;
use cellshop_db::{Database, DbResult};

/// One rendering of the bundle screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleView {
    /// Location clusters after filtering, naturally ordered.
    pub groups: Vec<BundleGroup>,

    /// Prefix buckets available across the UNFILTERED collection, so the
    /// filter bar doesn't shrink as filters narrow the view.
    pub available_prefixes: Vec<String>,

    /// The filter that produced this view.
    pub filter: BundleFilter,
}

/// Cached rows + active filter behind one lock.
#[derive(Debug, Clone, Default)]
pub struct BundleViewState {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    products: Vec<Product>,
    filter: BundleFilter,
    loaded: bool,
}

impl BundleViewState {
    pub fn new() -> Self {
        BundleViewState::default()
    }

    /// Replaces the cache with a fresh load from the store.
    pub async fn reload(&self, db: &Database) -> DbResult<()> {
        let products = db.products().list_all().await?;
        debug!(count = products.len(), "Bundle cache reloaded");

        let mut inner = self.inner.lock().expect("bundle lock poisoned");
        inner.products = products;
        inner.loaded = true;
        Ok(())
    }

    /// Ensures the cache has been loaded at least once.
    pub async fn ensure_loaded(&self, db: &Database) -> DbResult<()> {
        let loaded = self.inner.lock().expect("bundle lock poisoned").loaded;
        if !loaded {
            self.reload(db).await?;
        }
        Ok(())
    }

    /// Runs the filter/group pipeline over the cached rows.
    pub fn view(&self) -> BundleView {
        let inner = self.inner.lock().expect("bundle lock poisoned");

        let visible = inner.filter.apply(&inner.products);

        BundleView {
            groups: group_by_location(&visible),
            available_prefixes: enumerate_prefixes(&inner.products),
            filter: inner.filter.clone(),
        }
    }

    /// Runs duplicate detection over the full (unfiltered) cache.
    pub fn duplicates(&self) -> Vec<DuplicateGroup> {
        let inner = self.inner.lock().expect("bundle lock poisoned");
        find_multi_location(&inner.products)
    }

    // =========================================================================
    // Filter mutations
    // =========================================================================

    /// Sets (or clears) the prefix filter.
    pub fn set_prefix(&self, prefix: Option<PrefixFilter>) {
        self.inner.lock().expect("bundle lock poisoned").filter.prefix = prefix;
    }

    /// Sets (or clears) the specific-bundle filter.
    pub fn set_bundle(&self, bundle: Option<String>) {
        self.inner.lock().expect("bundle lock poisoned").filter.bundle = bundle;
    }

    /// Clears both filters.
    pub fn clear_filters(&self) {
        self.inner.lock().expect("bundle lock poisoned").filter = BundleFilter::default();
    }

    // =========================================================================
    // Local patches (after store confirmation)
    // =========================================================================

    /// Appends a row the store just confirmed.
    pub fn apply_insert(&self, product: Product) {
        self.inner
            .lock()
            .expect("bundle lock poisoned")
            .products
            .push(product);
    }

    /// Replaces a row the store just confirmed.
    pub fn apply_update(&self, product: Product) {
        let mut inner = self.inner.lock().expect("bundle lock poisoned");
        if let Some(slot) = inner.products.iter_mut().find(|p| p.id == product.id) {
            *slot = product;
        }
    }

    /// Removes a row the store just confirmed deleted.
    pub fn apply_delete(&self, id: &str) {
        self.inner
            .lock()
            .expect("bundle lock poisoned")
            .products
            .retain(|p| p.id != id);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cellshop_core::LocationType;
    use chrono::Utc;

    fn product(id: &str, brand: &str, model: &str, qty: i64, location: &str) -> Product {
        Product {
            id: id.to_string(),
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

    fn seeded_state() -> BundleViewState {
        let state = BundleViewState::new();
        state.apply_insert(product("1", "Apple", "iPhone 15", 5, "A1"));
        state.apply_insert(product("2", "Apple", "iPhone 15", 3, "B2"));
        state.apply_insert(product("3", "Samsung", "S24", 2, "A-4"));
        state
    }

    #[test]
    fn test_filter_narrows_view_but_not_prefix_bar() {
        let state = seeded_state();

        state.set_prefix(PrefixFilter::parse("A"));
        let view = state.view();

        let labels: Vec<&str> = view.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["A1"]);

        // Prefix bar still shows everything present in the collection
        assert_eq!(view.available_prefixes, vec!["A", "A-", "B"]);
    }

    #[test]
    fn test_filter_reapplies_after_local_patch() {
        let state = seeded_state();
        state.set_prefix(PrefixFilter::parse("A"));

        // A confirmed edit moves product 2 into the A bucket
        let mut moved = product("2", "Apple", "iPhone 15", 3, "A7");
        moved.updated_at = Utc::now();
        state.apply_update(moved);

        let view = state.view();
        let labels: Vec<&str> = view.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["A1", "A7"]);
    }

    #[test]
    fn test_duplicates_reflect_patches() {
        let state = seeded_state();

        // iPhone 15 sits at A1 (5) and B2 (3)
        let dupes = state.duplicates();
        assert_eq!(dupes.len(), 1);
        assert_eq!(dupes[0].total_stock(), 8);
        assert_eq!(dupes[0].location_count(), 2);

        // Deleting one row dissolves the duplicate group
        state.apply_delete("2");
        assert!(state.duplicates().is_empty());
    }

    #[test]
    fn test_clear_filters() {
        let state = seeded_state();
        state.set_prefix(PrefixFilter::parse("A"));
        state.set_bundle(Some("A1".to_string()));
        assert!(state.view().filter.is_active());

        state.clear_filters();
        let view = state.view();
        assert!(!view.filter.is_active());
        assert_eq!(view.groups.len(), 3);
    }
}

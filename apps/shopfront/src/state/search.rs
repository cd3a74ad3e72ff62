//! # Search State
//!
//! Debounced, generation-tokened product search.
//!
//! ## Why Generations?
//! Async store calls complete in any order. Without a token, a slow
//! response for "ip" can land AFTER the response for "iphone" and
//! clobber the fresher results. Each keystroke bumps an atomic
//! generation; a resolving lookup re-checks its own generation before
//! publishing and discards itself silently if superseded.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Debounce + Stale Discard                             │
//! │                                                                         │
//! │  keystroke "ip"      gen=1 ──► sleep 300ms ─┐                           │
//! │  keystroke "iph"     gen=2 ──► sleep 300ms ─┤ gen≠latest → discarded    │
//! │  keystroke "iphone"  gen=3 ──► sleep 300ms ─┴─► still latest            │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                               store query runs                          │
//! │                                       │                                 │
//! │                     re-check gen (a newer keystroke may have            │
//! │                      arrived while the query was in flight)             │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                        publish results for "iphone" only                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only the latest query's results ever reach visible state. Discards are
//! internal; the caller sees `Ok(None)`, never an error.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use cellshop_core::search::SearchPlan;
use cellshop_core::{Product, SEARCH_DEBOUNCE_MS};
use cellshop_db::{Database, DbResult};

/// Debounce and staleness bookkeeping for the search box.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    generation: Arc<AtomicU64>,
}

impl SearchState {
    pub fn new() -> Self {
        SearchState::default()
    }

    /// Runs one debounced search request.
    ///
    /// ## Returns
    /// * `Ok(Some(products))` - This request is still the latest; its
    ///   results are the visible state (empty when the query is below
    ///   the minimum length - resolved without any store call)
    /// * `Ok(None)` - Superseded by a newer keystroke; discard silently
    /// * `Err(_)` - The store call itself failed
    pub async fn search(&self, db: &Database, raw_query: &str) -> DbResult<Option<Vec<Product>>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Below the minimum length the result set is empty BY DEFINITION,
        // no debounce wait and no store round-trip
        let Some(plan) = SearchPlan::build(raw_query) else {
            debug!(query = %raw_query, "Query below minimum length, empty result");
            return Ok(Some(Vec::new()));
        };

        // Quiet period: wait out further keystrokes
        tokio::time::sleep(Duration::from_millis(SEARCH_DEBOUNCE_MS)).await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Search superseded during debounce");
            return Ok(None);
        }

        let products = db.products().search(&plan).await?;

        // A newer keystroke may have arrived while the query was in flight
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Search response stale, discarding");
            return Ok(None);
        }

        Ok(Some(products))
    }

    /// Current generation (diagnostics only).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cellshop_core::LocationType;
    use cellshop_db::{DbConfig, NewProduct};

    async fn seeded_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        for (brand, model, location) in [
            ("Apple", "iPhone 15", "A1"),
            ("Samsung", "Galaxy S24", "B2"),
        ] {
            repo.insert(NewProduct {
                brand: brand.to_string(),
                model: model.to_string(),
                serial_number: None,
                purchase_price_paise: None,
                selling_price_paise: Some(7990000),
                stock_quantity: 3,
                location_type: LocationType::Floor,
                location_number: location.to_string(),
                created_by: None,
            })
            .await
            .unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_short_query_resolves_empty_without_waiting() {
        let db = seeded_db().await;
        let search = SearchState::new();

        let start = std::time::Instant::now();
        let result = search.search(&db, "i").await.unwrap();

        // Resolved with an empty set, no debounce wait, no store call
        assert!(result.expect("below-minimum query still publishes").is_empty());
        assert!(start.elapsed() < Duration::from_millis(SEARCH_DEBOUNCE_MS));
    }

    #[tokio::test]
    async fn test_latest_query_wins() {
        let db = seeded_db().await;
        let search = SearchState::new();

        // First request starts its quiet period...
        let first = tokio::spawn({
            let db = db.clone();
            let search = search.clone();
            async move { search.search(&db, "iphone").await.unwrap() }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;

        // ...then a newer keystroke arrives before it elapses
        let second = tokio::spawn({
            let db = db.clone();
            let search = search.clone();
            async move { search.search(&db, "galaxy").await.unwrap() }
        });

        let (first, second) = (first.await.unwrap(), second.await.unwrap());

        // The superseded request is discarded, the latest publishes
        assert!(first.is_none());
        let hits = second.expect("latest request must publish");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].brand, "Samsung");
    }

    #[tokio::test]
    async fn test_lone_query_publishes_after_debounce() {
        let db = seeded_db().await;
        let search = SearchState::new();

        let hits = search
            .search(&db, "iphone")
            .await
            .unwrap()
            .expect("uncontested request must publish");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].model, "iPhone 15");
    }
}

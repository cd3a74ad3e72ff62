//! # Bundle Commands
//!
//! Bundle view, filter manipulation, and the multi-location report.
//!
//! All reads go through `BundleViewState`'s cached rows; filters narrow
//! the cached collection, they never trigger a store round-trip.

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{BundleView, BundleViewState, DbState};
use cellshop_core::grouping::{DuplicateGroup, PrefixFilter};

/// Multi-location report entry for the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateDto {
    pub brand: String,
    pub model: String,
    pub total_stock: i64,
    pub location_count: usize,
    pub locations: Vec<String>,
}

impl From<DuplicateGroup> for DuplicateDto {
    fn from(group: DuplicateGroup) -> Self {
        DuplicateDto {
            total_stock: group.total_stock(),
            location_count: group.location_count(),
            locations: group
                .members
                .iter()
                .map(|p| p.location_number.trim().to_uppercase())
                .collect(),
            brand: group.brand,
            model: group.model,
        }
    }
}

/// Returns the bundle screen: filtered clusters plus the filter bar.
pub async fn bundle_view(db: &DbState, bundles: &BundleViewState) -> Result<BundleView, ApiError> {
    bundles.ensure_loaded(db.database()).await?;
    Ok(bundles.view())
}

/// Forces a fresh load from the store (e.g. pull-to-refresh).
pub async fn refresh_bundles(
    db: &DbState,
    bundles: &BundleViewState,
) -> Result<BundleView, ApiError> {
    bundles.reload(db.database()).await?;
    Ok(bundles.view())
}

/// Sets or clears the prefix filter ("A" / "A-" as surfaced by the
/// filter bar; `None` clears).
pub async fn set_prefix_filter(
    bundles: &BundleViewState,
    filter: Option<String>,
) -> Result<BundleView, ApiError> {
    let prefix = match filter {
        None => None,
        Some(raw) => Some(
            PrefixFilter::parse(&raw)
                .ok_or_else(|| ApiError::validation(format!("'{raw}' is not a prefix filter")))?,
        ),
    };

    debug!(?prefix, "Prefix filter set");
    bundles.set_prefix(prefix);
    Ok(bundles.view())
}

/// Sets or clears the specific-bundle filter.
pub async fn set_bundle_filter(
    bundles: &BundleViewState,
    bundle: Option<String>,
) -> Result<BundleView, ApiError> {
    debug!(?bundle, "Bundle filter set");
    bundles.set_bundle(bundle.map(|b| b.trim().to_uppercase()));
    Ok(bundles.view())
}

/// Clears both filters.
pub async fn clear_filters(bundles: &BundleViewState) -> Result<BundleView, ApiError> {
    bundles.clear_filters();
    Ok(bundles.view())
}

/// The multi-location report: catalog identities split across rows.
pub async fn duplicate_report(
    db: &DbState,
    bundles: &BundleViewState,
) -> Result<Vec<DuplicateDto>, ApiError> {
    bundles.ensure_loaded(db.database()).await?;
    Ok(bundles
        .duplicates()
        .into_iter()
        .map(DuplicateDto::from)
        .collect())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use cellshop_core::LocationType;
    use cellshop_db::{Database, DbConfig, NewProduct};

    async fn app_with_rows(rows: &[(&str, &str, i64, &str)]) -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for (brand, model, qty, location) in rows {
            db.products()
                .insert(NewProduct {
                    brand: brand.to_string(),
                    model: model.to_string(),
                    serial_number: None,
                    purchase_price_paise: None,
                    selling_price_paise: None,
                    stock_quantity: *qty,
                    location_type: LocationType::Bundle,
                    location_number: location.to_string(),
                    created_by: None,
                })
                .await
                .unwrap();
        }
        AppState::new(db)
    }

    #[tokio::test]
    async fn test_bundle_view_loads_and_filters() {
        let state = app_with_rows(&[
            ("Apple", "iPhone 15", 5, "A1"),
            ("Samsung", "S24", 2, "A-4"),
            ("Nokia", "3310", 1, "B2"),
        ])
        .await;

        let view = bundle_view(&state.db, &state.bundles).await.unwrap();
        assert_eq!(view.groups.len(), 3);
        assert_eq!(view.available_prefixes, vec!["A", "A-", "B"]);

        let view = set_prefix_filter(&state.bundles, Some("A".to_string()))
            .await
            .unwrap();
        assert_eq!(view.groups.len(), 1);
        assert_eq!(view.groups[0].label, "A1");

        // Filter bar keeps showing everything
        assert_eq!(view.available_prefixes, vec!["A", "A-", "B"]);

        let view = clear_filters(&state.bundles).await.unwrap();
        assert_eq!(view.groups.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_prefix_filter_rejected() {
        let state = app_with_rows(&[]).await;
        let err = set_prefix_filter(&state.bundles, Some("AB".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_duplicate_report_totals() {
        // Property: same identity in two locations reports summed stock
        let state = app_with_rows(&[
            ("Apple", "iPhone 15", 5, "A1"),
            ("Apple", "iPhone 15", 3, "B2"),
            ("Nokia", "3310", 1, "C1"),
        ])
        .await;

        let report = duplicate_report(&state.db, &state.bundles).await.unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].total_stock, 8);
        assert_eq!(report[0].location_count, 2);
        assert_eq!(report[0].locations, vec!["A1", "B2"]);
    }
}

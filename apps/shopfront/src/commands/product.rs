//! # Product Commands
//!
//! Search, CRUD, stock adjustment, scan lookup, and dashboard stats.
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Search Flow                                  │
//! │                                                                         │
//! │  User types "iphone"                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  search_products(query: "iphone")                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  < 2 chars?  Empty result, no store call  │                         │
//! │  │  else: debounce 300ms, generation check,  │                         │
//! │  │        LIKE over brand OR model, limit 50 │                         │
//! │  └───────────────────────────────────────────┘                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Some(Vec<ProductDto>) ── latest request, show these                   │
//! │  None ─────────────────── superseded, keep what's on screen            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Mutation Flow
//! Every confirmed mutation patches the bundle cache with the row the
//! store returned and emits `InventoryChanged`, so list views refresh
//! without a full reload.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{
    AppEvent, AppEvents, AuthState, BundleViewState, DbState, ScanState, SearchState,
};
use cellshop_core::{validation, LocationType, Product, LOW_STOCK_THRESHOLD};
use cellshop_db::NewProduct;

// =============================================================================
// DTOs
// =============================================================================

/// Product DTO (Data Transfer Object) for the UI.
///
/// ## Why DTO?
/// - Decouples internal domain model from API contract
/// - Adds derived flags (low stock) the UI renders directly
/// - Handles serde rename to camelCase for JS consumption
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub serial_number: Option<String>,
    pub purchase_price_paise: Option<i64>,
    pub selling_price_paise: Option<i64>,
    pub stock_quantity: i64,
    pub location_type: LocationType,
    pub location_number: String,
    /// Derived: stock at or below the reorder threshold.
    pub low_stock: bool,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        let low_stock = p.is_low_stock();
        ProductDto {
            id: p.id,
            brand: p.brand,
            model: p.model,
            serial_number: p.serial_number,
            purchase_price_paise: p.purchase_price_paise,
            selling_price_paise: p.selling_price_paise,
            stock_quantity: p.stock_quantity,
            location_type: p.location_type,
            location_number: p.location_number,
            low_stock,
        }
    }
}

/// Editable product fields supplied by the UI.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub brand: String,
    pub model: String,
    pub serial_number: Option<String>,
    pub purchase_price_paise: Option<i64>,
    pub selling_price_paise: Option<i64>,
    pub stock_quantity: i64,
    pub location_type: LocationType,
    pub location_number: String,
}

impl ProductInput {
    /// Validates every field before any store call.
    fn validate(&self) -> Result<(), ApiError> {
        validation::validate_brand(&self.brand).map_err(|e| ApiError::validation(e.to_string()))?;
        validation::validate_model(&self.model).map_err(|e| ApiError::validation(e.to_string()))?;
        validation::validate_location_number(&self.location_number)
            .map_err(|e| ApiError::validation(e.to_string()))?;
        validation::validate_stock_quantity(self.stock_quantity)
            .map_err(|e| ApiError::validation(e.to_string()))?;
        for price in [self.purchase_price_paise, self.selling_price_paise]
            .into_iter()
            .flatten()
        {
            validation::validate_price_paise(price)
                .map_err(|e| ApiError::validation(e.to_string()))?;
        }
        Ok(())
    }
}

/// Result of a scan lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum ScanOutcome {
    /// Same payload within the cooldown window; ignore.
    Suppressed,

    /// The serial matched exactly one row.
    Found { product: ProductDto },

    /// No row carries this serial; the add-product form was triggered
    /// with the payload prefilled.
    Unmatched,
}

/// Dashboard summary figures.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_stock: i64,
    pub low_stock_threshold: i64,
    pub low_stock: Vec<ProductDto>,
}

// =============================================================================
// Search
// =============================================================================

/// Searches products with debounce and stale-response discard.
///
/// ## Returns
/// * `Ok(Some(products))` - This request is the latest; render it
/// * `Ok(None)` - Superseded by a newer keystroke; keep current display
pub async fn search_products(
    db: &DbState,
    search: &SearchState,
    query: String,
) -> Result<Option<Vec<ProductDto>>, ApiError> {
    let start = Instant::now();

    let query = validation::validate_search_query(&query)
        .map_err(|e| ApiError::validation(e.to_string()))?;

    debug!(query = %query, "search_products command");

    let result = search.search(db.database(), &query).await?;

    let outcome = match result {
        Some(products) => {
            let dtos: Vec<ProductDto> = products.into_iter().map(ProductDto::from).collect();
            info!(
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                count = dtos.len(),
                query = %query,
                "search_products complete"
            );
            Some(dtos)
        }
        None => None,
    };

    Ok(outcome)
}

// =============================================================================
// CRUD
// =============================================================================

/// Creates a product, stamped with the signed-in user.
pub async fn add_product(
    db: &DbState,
    auth: &AuthState,
    bundles: &BundleViewState,
    events: &AppEvents,
    input: ProductInput,
) -> Result<ProductDto, ApiError> {
    let identity = auth.require().ok_or_else(ApiError::unauthorized)?;
    input.validate()?;

    let created = db
        .database()
        .products()
        .insert(NewProduct {
            brand: input.brand.trim().to_string(),
            model: input.model.trim().to_string(),
            serial_number: input.serial_number,
            purchase_price_paise: input.purchase_price_paise,
            selling_price_paise: input.selling_price_paise,
            stock_quantity: input.stock_quantity,
            location_type: input.location_type,
            location_number: input.location_number.trim().to_string(),
            created_by: Some(identity.username),
        })
        .await?;

    info!(id = %created.id, brand = %created.brand, model = %created.model, "Product added");

    bundles.apply_insert(created.clone());
    events.emit(AppEvent::InventoryChanged);
    Ok(ProductDto::from(created))
}

/// Updates a product's editable fields (last writer wins).
pub async fn update_product(
    db: &DbState,
    bundles: &BundleViewState,
    events: &AppEvents,
    id: String,
    input: ProductInput,
) -> Result<ProductDto, ApiError> {
    input.validate()?;

    let repo = db.database().products();
    let mut product = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    product.brand = input.brand.trim().to_string();
    product.model = input.model.trim().to_string();
    product.serial_number = input.serial_number;
    product.purchase_price_paise = input.purchase_price_paise;
    product.selling_price_paise = input.selling_price_paise;
    product.stock_quantity = input.stock_quantity;
    product.location_type = input.location_type;
    product.location_number = input.location_number.trim().to_string();

    let updated = repo.update(&product).await?;

    debug!(id = %updated.id, "Product updated");

    bundles.apply_update(updated.clone());
    events.emit(AppEvent::InventoryChanged);
    Ok(ProductDto::from(updated))
}

/// Deletes a product.
///
/// Removal from inventory is always this explicit action; stock hitting
/// zero never deletes a row.
pub async fn delete_product(
    db: &DbState,
    bundles: &BundleViewState,
    events: &AppEvents,
    id: String,
) -> Result<(), ApiError> {
    db.database().products().delete(&id).await?;

    info!(id = %id, "Product deleted");

    bundles.apply_delete(&id);
    events.emit(AppEvent::InventoryChanged);
    Ok(())
}

// =============================================================================
// Stock Adjustments
// =============================================================================

/// Increments stock by a positive amount.
pub async fn increment_stock(
    db: &DbState,
    bundles: &BundleViewState,
    events: &AppEvents,
    id: String,
    amount: i64,
) -> Result<ProductDto, ApiError> {
    ensure_positive_amount(amount)?;
    adjust(db, bundles, events, id, amount).await
}

/// Decrements stock by a positive amount.
///
/// A decrement that would go below zero is rejected; repeated clicks at
/// quantity 0 are absorbed, never applied.
pub async fn decrement_stock(
    db: &DbState,
    bundles: &BundleViewState,
    events: &AppEvents,
    id: String,
    amount: i64,
) -> Result<ProductDto, ApiError> {
    ensure_positive_amount(amount)?;
    adjust(db, bundles, events, id, -amount).await
}

/// Both adjustment directions take a positive magnitude; a zero or
/// negative amount would silently flip direction once negated, so it is
/// rejected before the delta is formed.
fn ensure_positive_amount(amount: i64) -> Result<(), ApiError> {
    if amount <= 0 {
        return Err(ApiError::validation("amount must be positive"));
    }
    Ok(())
}

async fn adjust(
    db: &DbState,
    bundles: &BundleViewState,
    events: &AppEvents,
    id: String,
    delta: i64,
) -> Result<ProductDto, ApiError> {
    validation::validate_quantity(delta.abs())
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let updated = db.database().products().adjust_stock(&id, delta).await?;

    debug!(id = %id, delta, stock = updated.stock_quantity, "Stock adjusted");

    bundles.apply_update(updated.clone());
    events.emit(AppEvent::InventoryChanged);
    Ok(ProductDto::from(updated))
}

// =============================================================================
// Scan Lookup
// =============================================================================

/// Resolves a scanned payload against serial numbers.
///
/// The decoded text is treated purely as a lookup key. On a miss, the
/// add-product trigger fires with the payload prefilled - the scan of an
/// unknown device flows straight into cataloging it.
pub async fn lookup_serial(
    db: &DbState,
    scan: &ScanState,
    events: &AppEvents,
    payload: String,
) -> Result<ScanOutcome, ApiError> {
    let payload = payload.trim().to_string();
    if payload.is_empty() {
        return Err(ApiError::validation("scan payload is empty"));
    }

    if !scan.accept(&payload) {
        debug!(payload = %payload, "Scan suppressed by cooldown");
        return Ok(ScanOutcome::Suppressed);
    }

    match db.database().products().find_by_serial(&payload).await? {
        Some(product) => {
            info!(payload = %payload, id = %product.id, "Scan matched product");
            Ok(ScanOutcome::Found {
                product: ProductDto::from(product),
            })
        }
        None => {
            info!(payload = %payload, "Scan unmatched, triggering add-product form");
            events.emit(AppEvent::OpenAddProduct {
                prefill_serial: Some(payload),
            });
            Ok(ScanOutcome::Unmatched)
        }
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Aggregate figures for the dashboard screen.
pub async fn dashboard_stats(db: &DbState) -> Result<DashboardStats, ApiError> {
    let repo = db.database().products();

    let total_products = repo.count().await?;
    let total_stock = repo.total_stock().await?;
    let low_stock: Vec<ProductDto> = repo
        .low_stock()
        .await?
        .into_iter()
        .map(ProductDto::from)
        .collect();

    Ok(DashboardStats {
        total_products,
        total_stock,
        low_stock_threshold: LOW_STOCK_THRESHOLD,
        low_stock,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

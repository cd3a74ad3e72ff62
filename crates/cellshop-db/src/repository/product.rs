//! # Product Repository
//!
//! Record store operations for products.
//!
//! ## Key Operations
//! - Plan-driven substring search over brand/model
//! - CRUD operations
//! - Guarded stock adjustments
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Plan-Driven Search Works                         │
//! │                                                                         │
//! │  SearchPlan { needle: "iphone", fields: [brand, model], ... }          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  WHERE brand LIKE '%iphone%' OR model LIKE '%iphone%'                  │
//! │  ORDER BY brand, model, location_type, location_number                 │
//! │  LIMIT 50                                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ Apple | iPhone 15 | floor  | A1         │ ← MATCH                   │
//! │  │ Apple | iPhone 15 | bundle | A-3        │ ← MATCH (same model,      │
//! │  │ Nokia | 3310      | rack   | R2         │    second location)       │
//! │  └─────────────────────────────────────────┘                           │
//! │                                                                         │
//! │  The multi-key sort keeps location-rows of one model adjacent, and     │
//! │  makes repeated runs of the same query return identical ordering.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use cellshop_core::search::SearchPlan;
use cellshop_core::{LocationType, Product, LOW_STOCK_THRESHOLD};

const PRODUCT_COLUMNS: &str = "id, brand, model, serial_number, purchase_price_paise, \
     selling_price_paise, stock_quantity, location_type, location_number, \
     created_by, created_at, updated_at";

/// Repository for product record store operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Search products
/// let plan = SearchPlan::build("iphone").unwrap();
/// let results = repo.search(&plan).await?;
///
/// // Get by ID
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Executes a fully-specified search plan.
    ///
    /// ## How It Works
    /// 1. The needle is wrapped in `%...%` for substring matching; LIKE
    ///    metacharacters in the needle are escaped so user input cannot
    ///    widen the match
    /// 2. Each plan field becomes one LIKE predicate, joined with OR
    /// 3. Ordering follows the plan's sort keys, all ascending, with
    ///    NOCASE collation on text columns
    ///
    /// The minimum-length gate lives in `SearchPlan::build` - by the time
    /// a plan exists, the query is dispatchable.
    pub async fn search(&self, plan: &SearchPlan) -> DbResult<Vec<Product>> {
        debug!(needle = %plan.needle, limit = plan.limit, "Searching products");

        let pattern = format!("%{}%", escape_like(&plan.needle));

        let predicates: Vec<String> = plan
            .fields
            .iter()
            .map(|f| format!("{} LIKE ? ESCAPE '\\' COLLATE NOCASE", f.column()))
            .collect();
        let order_keys: Vec<String> = plan
            .order_by
            .iter()
            .map(|k| format!("{} COLLATE NOCASE ASC", k.column()))
            .collect();

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE {} ORDER BY {} LIMIT ?",
            predicates.join(" OR "),
            order_keys.join(", "),
        );

        let mut query = sqlx::query_as::<_, Product>(&sql);
        for _ in &plan.fields {
            query = query.bind(&pattern);
        }
        query = query.bind(plan.limit);

        let products = query.fetch_all(&self.pool).await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists all products, ordered by brand then model.
    ///
    /// Used by the location/bundle views, which group and sort in memory.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             ORDER BY brand COLLATE NOCASE, model COLLATE NOCASE, \
                      location_type, location_number COLLATE NOCASE"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Finds a product by its serial number (exact match).
    ///
    /// Serial numbers carry a UNIQUE index, so at most one row matches.
    /// Used by the barcode-scan flow.
    pub async fn find_by_serial(&self, serial: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE serial_number = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(serial)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Inserts a new product.
    ///
    /// Generates the ID and timestamps here; callers supply only the
    /// domain fields.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(&self, new: NewProduct) -> DbResult<Product> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, brand = %new.brand, model = %new.model, "Inserting product");

        sqlx::query(
            "INSERT INTO products (id, brand, model, serial_number, purchase_price_paise, \
             selling_price_paise, stock_quantity, location_type, location_number, \
             created_by, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )
        .bind(&id)
        .bind(&new.brand)
        .bind(&new.model)
        .bind(&new.serial_number)
        .bind(new.purchase_price_paise)
        .bind(new.selling_price_paise)
        .bind(new.stock_quantity)
        .bind(new.location_type)
        .bind(&new.location_number)
        .bind(&new.created_by)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", &id))
    }

    /// Updates a product's editable fields (full-row replace).
    ///
    /// Last writer wins; there is no optimistic concurrency check.
    pub async fn update(&self, product: &Product) -> DbResult<Product> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET brand = ?1, model = ?2, serial_number = ?3, \
             purchase_price_paise = ?4, selling_price_paise = ?5, stock_quantity = ?6, \
             location_type = ?7, location_number = ?8, updated_at = ?9 \
             WHERE id = ?10",
        )
        .bind(&product.brand)
        .bind(&product.model)
        .bind(&product.serial_number)
        .bind(product.purchase_price_paise)
        .bind(product.selling_price_paise)
        .bind(product.stock_quantity)
        .bind(product.location_type)
        .bind(&product.location_number)
        .bind(now)
        .bind(&product.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        self.get_by_id(&product.id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", &product.id))
    }

    /// Deletes a product.
    ///
    /// Hard delete - removal from inventory is an explicit user action,
    /// never a side effect of stock reaching zero.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        debug!(id = %id, "Deleted product");
        Ok(())
    }

    /// Adjusts stock by a signed delta, rejecting negative results.
    ///
    /// ## The Guard
    /// The non-negativity check rides IN the UPDATE's WHERE clause, so a
    /// concurrent decrement cannot slip the quantity below zero between a
    /// read and a write. Zero rows affected means either the product is
    /// missing or the adjustment was rejected; a follow-up existence check
    /// tells the two apart.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<Product> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET stock_quantity = stock_quantity + ?1, updated_at = ?2 \
             WHERE id = ?3 AND stock_quantity + ?1 >= 0",
        )
        .bind(delta)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_by_id(id).await? {
                Some(product) => Err(DbError::ConstraintViolation(format!(
                    "stock for '{} {}' is {}, cannot adjust by {}",
                    product.brand, product.model, product.stock_quantity, delta
                ))),
                None => Err(DbError::not_found("Product", id)),
            };
        }

        debug!(id = %id, delta = delta, "Adjusted stock");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    // =========================================================================
    // Aggregates
    // =========================================================================

    /// Counts all product rows.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Sums stock across all rows.
    pub async fn total_stock(&self) -> DbResult<i64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(stock_quantity), 0) FROM products")
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }

    /// Lists products at or below the low-stock threshold.
    pub async fn low_stock(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE stock_quantity <= ?1 \
             ORDER BY stock_quantity ASC, brand COLLATE NOCASE, model COLLATE NOCASE"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(LOW_STOCK_THRESHOLD)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }
}

// =============================================================================
// New Product
// =============================================================================

/// Fields supplied by the caller when creating a product.
///
/// The repository owns ID and timestamp generation.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub brand: String,
    pub model: String,
    pub serial_number: Option<String>,
    pub purchase_price_paise: Option<i64>,
    pub selling_price_paise: Option<i64>,
    pub stock_quantity: i64,
    pub location_type: LocationType,
    pub location_number: String,
    pub created_by: Option<String>,
}

impl NewProduct {
    /// Minimal constructor used by tests and the scan flow.
    pub fn new(brand: impl Into<String>, model: impl Into<String>) -> Self {
        NewProduct {
            brand: brand.into(),
            model: model.into(),
            serial_number: None,
            purchase_price_paise: None,
            selling_price_paise: None,
            stock_quantity: 0,
            location_type: LocationType::Floor,
            location_number: String::new(),
            created_by: None,
        }
    }
}

/// Escapes LIKE metacharacters so user input matches literally.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn phone(brand: &str, model: &str, location: &str, stock: i64) -> NewProduct {
        NewProduct {
            brand: brand.to_string(),
            model: model.to_string(),
            serial_number: None,
            purchase_price_paise: Some(5000000),
            selling_price_paise: Some(7990000),
            stock_quantity: stock,
            location_type: LocationType::Floor,
            location_number: location.to_string(),
            created_by: Some("owner".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        let created = repo.insert(phone("Apple", "iPhone 15", "A1", 3)).await.unwrap();
        assert_eq!(created.brand, "Apple");
        assert_eq!(created.stock_quantity, 3);

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.model, "iPhone 15");

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_matches_brand_or_model_case_insensitively() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(phone("Apple", "iPhone 15", "A1", 1)).await.unwrap();
        repo.insert(phone("Samsung", "Galaxy S24", "B2", 1)).await.unwrap();
        repo.insert(phone("Nokia", "3310", "R1", 1)).await.unwrap();

        // Matches model field
        let plan = SearchPlan::build("IPHONE").unwrap();
        let hits = repo.search(&plan).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].brand, "Apple");

        // Matches brand field
        let plan = SearchPlan::build("sam").unwrap();
        let hits = repo.search(&plan).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].model, "Galaxy S24");

        // No match
        let plan = SearchPlan::build("pixel").unwrap();
        assert!(repo.search(&plan).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_ordering_is_deterministic() {
        let db = test_db().await;
        let repo = db.products();

        // Same model in two locations, plus another brand
        repo.insert(phone("Samsung", "Galaxy S24", "B2", 1)).await.unwrap();
        repo.insert(phone("Apple", "iPhone 15", "A-3", 2)).await.unwrap();
        repo.insert(phone("Apple", "iPhone 15", "A1", 1)).await.unwrap();

        let plan = SearchPlan::build("a1 OR whatever -- phone").unwrap();
        assert!(repo.search(&plan).await.unwrap().is_empty()); // literal, no injection

        let plan = SearchPlan::build("galaxy iphone").unwrap();
        assert!(repo.search(&plan).await.unwrap().is_empty()); // contains, not tokens

        let plan = SearchPlan::build("phone").unwrap();
        let hits = repo.search(&plan).await.unwrap();
        let order: Vec<&str> = hits.iter().map(|p| p.location_number.as_str()).collect();
        // brand, model, location_type, location_number - all ascending
        assert_eq!(order, vec!["A-3", "A1"]);
    }

    #[tokio::test]
    async fn test_search_escapes_like_metacharacters() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(phone("Oddity", "100%", "A1", 1)).await.unwrap();
        repo.insert(phone("Oddity", "100x", "A2", 1)).await.unwrap();

        let plan = SearchPlan::build("0%").unwrap();
        let hits = repo.search(&plan).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].model, "100%");
    }

    #[tokio::test]
    async fn test_serial_lookup() {
        let db = test_db().await;
        let repo = db.products();

        let mut new = phone("Apple", "iPhone 15", "S1", 1);
        new.serial_number = Some("IMEI-351234567890".to_string());
        repo.insert(new).await.unwrap();

        let found = repo.find_by_serial("IMEI-351234567890").await.unwrap();
        assert!(found.is_some());
        assert!(repo.find_by_serial("IMEI-000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_serial_rejected() {
        let db = test_db().await;
        let repo = db.products();

        let mut a = phone("Apple", "iPhone 15", "S1", 1);
        a.serial_number = Some("IMEI-1".to_string());
        repo.insert(a).await.unwrap();

        let mut b = phone("Apple", "iPhone 15", "S2", 1);
        b.serial_number = Some("IMEI-1".to_string());
        let err = repo.insert(b).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_adjust_stock_guard() {
        let db = test_db().await;
        let repo = db.products();

        let p = repo.insert(phone("Apple", "iPhone 15", "A1", 2)).await.unwrap();

        // Decrement within bounds
        let p = repo.adjust_stock(&p.id, -2).await.unwrap();
        assert_eq!(p.stock_quantity, 0);

        // Further decrement rejected, state unchanged
        let err = repo.adjust_stock(&p.id, -1).await.unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation(_)));
        let unchanged = repo.get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(unchanged.stock_quantity, 0);

        // Zero stock does NOT delete the row
        assert!(repo.get_by_id(&p.id).await.unwrap().is_some());

        // Missing product is NotFound, not a constraint failure
        let err = repo.adjust_stock("missing", -1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = test_db().await;
        let repo = db.products();

        let mut p = repo.insert(phone("Apple", "iPhone 15", "A1", 1)).await.unwrap();
        p.location_number = "A-7".to_string();
        p.location_type = LocationType::Bundle;
        let updated = repo.update(&p).await.unwrap();
        assert_eq!(updated.location_number, "A-7");
        assert_eq!(updated.location_type, LocationType::Bundle);

        repo.delete(&p.id).await.unwrap();
        assert!(repo.get_by_id(&p.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&p.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_aggregates_and_low_stock() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(phone("Apple", "iPhone 15", "A1", 10)).await.unwrap();
        repo.insert(phone("Nokia", "3310", "R1", 2)).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
        assert_eq!(repo.total_stock().await.unwrap(), 12);

        let low = repo.low_stock().await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].brand, "Nokia");
    }
}

//! # Error Types
//!
//! Domain-specific error types for cellshop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cellshop-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                           │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  cellshop-db errors (separate crate)                                    │
//! │  └── DbError          - Record store failures                           │
//! │                                                                         │
//! │  shopfront errors (in app)                                              │
//! │  └── ApiError         - What the UI sees (serialized)                   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → UI            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (brand/model, id, etc.)
//! 3. Errors are enum variants, never String
//! 4. No error here is fatal; every variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found (stale id, deleted row, unmatched serial).
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A stock decrement would take the quantity below zero.
    ///
    /// Decrementing a product at quantity 0 is a no-op at the UI and a
    /// rejection here; duplicate clicks beyond the actual delta are
    /// absorbed rather than applied.
    #[error("Stock for {product} cannot go below zero (current {current}, delta {delta})")]
    StockWouldGoNegative {
        product: String,
        current: i64,
        delta: i64,
    },

    /// Bill has exceeded maximum allowed line items.
    #[error("Bill cannot have more than {max} lines")]
    BillTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs - a failed
/// validation aborts the operation before any store call, so no state
/// is mutated.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid phone, invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

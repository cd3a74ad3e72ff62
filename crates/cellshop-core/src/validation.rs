//! # Validation Module
//!
//! Input validation utilities for Cellshop.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Shop UI                                                       │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command layer (Rust)                                          │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── THIS MODULE: Business rule validation                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Record store (SQLite)                                         │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  └── UNIQUE constraints (serial numbers)                                │
//! │                                                                         │
//! │  A failed validation aborts BEFORE any store call - no state mutates.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MIN_SEARCH_CHARS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product brand.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 100 characters
pub fn validate_brand(brand: &str) -> ValidationResult<()> {
    require_text("brand", brand, 100)
}

/// Validates a product model.
pub fn validate_model(model: &str) -> ValidationResult<()> {
    require_text("model", model, 100)
}

/// Validates a bill line description.
pub fn validate_line_name(name: &str) -> ValidationResult<()> {
    require_text("item name", name, 200)
}

/// Validates a customer name.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    require_text("customer name", name, 100)
}

/// Validates a customer phone number.
///
/// ## Rules
/// - Required
/// - Optional leading "+", then 10-15 digits
///
/// The number rides in a messaging deep link, so it must be plain digits.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if !(10..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be 10-15 digits with optional leading +".to_string(),
        });
    }

    Ok(())
}

/// Validates a free-text location code.
///
/// ## Rules
/// - May be empty (the row just stays out of bundle views)
/// - Must be at most 20 characters
///
/// Note: structure is NOT required here. Whether a location parses into a
/// bundle key is the location module's concern; an unstructured location
/// is stored as-is.
pub fn validate_location_number(location: &str) -> ValidationResult<()> {
    if location.trim().len() > 20 {
        return Err(ValidationError::TooLong {
            field: "location".to_string(),
            max: 20,
        });
    }
    Ok(())
}

/// Validates a search query.
///
/// ## Returns
/// The trimmed query string. Queries below the minimum length are not an
/// error - the search plan simply declines to dispatch them - but queries
/// over 100 characters are rejected outright.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a bill-line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed 999 per line
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > 999 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: 999,
        });
    }

    Ok(())
}

/// Validates a price in paise.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items, promotional lines)
pub fn validate_price_paise(paise: i64) -> ValidationResult<()> {
    if paise < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a discount in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_discount_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates a stock quantity being set directly.
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

/// Whether a trimmed query is long enough to dispatch.
pub fn query_is_dispatchable(query: &str) -> bool {
    query.trim().len() >= MIN_SEARCH_CHARS
}

fn require_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

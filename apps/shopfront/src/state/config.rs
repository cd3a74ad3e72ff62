//! # Shop Configuration State
//!
//! Read-only after startup: the seller identity printed on invoices.
//!
//! Values come from environment variables so a shop can brand its
//! invoices without a rebuild; the defaults keep development friction
//! low.

use cellshop_core::SellerIdentity;

/// Seller identity configuration.
#[derive(Debug, Clone)]
pub struct ConfigState {
    seller: SellerIdentity,
}

impl ConfigState {
    /// Loads configuration from the environment.
    ///
    /// ## Variables
    /// - `CELLSHOP_SHOP_NAME`
    /// - `CELLSHOP_SHOP_ADDRESS`
    /// - `CELLSHOP_SHOP_PHONE`
    /// - `CELLSHOP_SHOP_GSTIN`
    pub fn from_env() -> Self {
        let var = |key: &str, default: &str| {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        ConfigState {
            seller: SellerIdentity {
                shop_name: var("CELLSHOP_SHOP_NAME", "Cellshop Mobiles"),
                address: var("CELLSHOP_SHOP_ADDRESS", ""),
                phone: var("CELLSHOP_SHOP_PHONE", ""),
                gstin: var("CELLSHOP_SHOP_GSTIN", ""),
            },
        }
    }

    /// The seller block printed on invoices.
    pub fn seller(&self) -> &SellerIdentity {
        &self.seller
    }
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState::from_env()
    }
}

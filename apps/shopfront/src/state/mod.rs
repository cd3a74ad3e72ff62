//! # State Module
//!
//! Manages application state for the shopfront service.
//!
//! ## Why Multiple State Types?
//! Instead of a single `AppState` struct containing everything,
//! each concern gets its own focused state type:
//!
//! 1. **Better Separation of Concerns**: Each state type has a single responsibility
//! 2. **Easier Testing**: Individual states construct in isolation
//! 3. **Clearer Command Signatures**: Commands declare exactly what state they need
//! 4. **Reduced Contention**: Independent states don't block each other
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐  │
//! │  │   DbState    │ │ SearchState  │ │ BundleView   │ │ BillingState │  │
//! │  │              │ │              │ │ State        │ │              │  │
//! │  │  Database    │ │  AtomicU64   │ │  Mutex<rows  │ │  Mutex<draft │  │
//! │  │  (SQLite     │ │  generation  │ │   + filter>  │ │   bill>      │  │
//! │  │   pool)      │ │  + debounce  │ │              │ │              │  │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘  │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐                    │
//! │  │  AuthState   │ │  ScanState   │ │  AppEvents   │                    │
//! │  │              │ │              │ │              │                    │
//! │  │  RwLock<     │ │  Mutex<last  │ │  broadcast   │                    │
//! │  │   identity>  │ │   payload>   │ │  channel     │                    │
//! │  └──────────────┘ └──────────────┘ └──────────────┘                    │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • Mutable states: protected by Arc-cloneable locks                    │
//! │  • AppEvents: tokio broadcast, many subscribers                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod billing;
mod bundle;
mod config;
mod db;
mod events;
mod scan;
mod search;

pub use auth::{AuthState, Identity};
pub use billing::{BillingState, DraftBill};
pub use bundle::{BundleView, BundleViewState};
pub use config::ConfigState;
pub use db::DbState;
pub use events::{AppEvent, AppEvents};
pub use scan::ScanState;
pub use search::SearchState;

use cellshop_db::Database;

/// All shopfront state, constructed once at startup.
///
/// Commands take the individual state types they need; this aggregate
/// exists for wiring and tests.
pub struct AppState {
    pub db: DbState,
    pub auth: AuthState,
    pub config: ConfigState,
    pub search: SearchState,
    pub bundles: BundleViewState,
    pub billing: BillingState,
    pub scan: ScanState,
    pub events: AppEvents,
}

impl AppState {
    /// Builds the full state set over a connected database.
    pub fn new(db: Database) -> Self {
        AppState {
            db: DbState::new(db),
            auth: AuthState::new(),
            config: ConfigState::from_env(),
            search: SearchState::new(),
            bundles: BundleViewState::new(),
            billing: BillingState::new(),
            scan: ScanState::new(),
            events: AppEvents::new(),
        }
    }
}

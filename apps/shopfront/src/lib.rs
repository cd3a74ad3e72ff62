//! # Cellshop Shopfront Library
//!
//! Service layer for the Cellshop inventory and billing app. This is the
//! API surface a shop UI talks to: focused state types plus async command
//! functions over them.
//!
//! ## Module Organization
//! ```text
//! cellshop_shopfront/
//! ├── lib.rs          ◄─── You are here (startup & wiring)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports + AppState aggregate
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── auth.rs     ◄─── Signed-in identity
//! │   ├── config.rs   ◄─── Seller identity configuration
//! │   ├── search.rs   ◄─── Debounced search with stale discard
//! │   ├── bundle.rs   ◄─── Bundle view cache + filters
//! │   ├── billing.rs  ◄─── Draft bill session
//! │   ├── scan.rs     ◄─── Barcode scan cooldown
//! │   └── events.rs   ◄─── Cross-component broadcast channel
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── product.rs  ◄─── Search/CRUD/stock/scan/dashboard commands
//! │   ├── bundle.rs   ◄─── Bundle view and filter commands
//! │   ├── billing.rs  ◄─── Billing session commands
//! │   └── auth.rs     ◄─── Sign-in presence commands
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cellshop_db::{Database, DbConfig};
use state::AppState;

/// Runs the shopfront service.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Determine Database Path ──────────────────────────────────────────► │
/// │     • Platform data directory via `directories`                         │
/// │     • Development override: CELLSHOP_DB_PATH                            │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Initialize State Objects ─────────────────────────────────────────► │
/// │     • One AppState holding every focused state type                     │
/// │                                                                         │
/// │  5. Serve Until Shutdown ─────────────────────────────────────────────► │
/// │     • Commands run against the state; Ctrl-C closes the pool            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Cellshop shopfront");

    let db_path = get_database_path()?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    let state = AppState::new(db);
    state.bundles.ensure_loaded(state.db.database()).await?;
    info!("State initialized, ready for commands");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    state.db.database().close().await;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=cellshop=trace` - Show trace for cellshop crates only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cellshop=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.cellshop.shop/cellshop.db`
/// - **Windows**: `%APPDATA%\cellshop\shop\cellshop.db`
/// - **Linux**: `~/.local/share/cellshop-shop/cellshop.db`
///
/// ## Development Override
/// Set `CELLSHOP_DB_PATH` environment variable to use a custom path.
fn get_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(path) = std::env::var("CELLSHOP_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    let proj_dirs = ProjectDirs::from("com", "cellshop", "shop")
        .ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("cellshop.db"))
}

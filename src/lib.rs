// Pricebook - Core Library
// Price catalog + shopping list, shared by the CLI, the API server, and tests

pub mod catalog;
pub mod config;
pub mod ledger;
pub mod session;

// Re-export commonly used types
pub use catalog::{
    format_price, Catalog, CatalogEntry, CatalogError, CatalogRegistry, SharedCatalog,
};
pub use config::Config;
pub use ledger::{ShoppingList, DEFAULT_QUANTITY};
pub use session::run_shopping_session;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the stderr log subscriber used by the binaries (`RUST_LOG`, default `info`)
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

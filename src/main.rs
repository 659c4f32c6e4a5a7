// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use std::env;
use std::io;

use pricebook::{init_logging, run_shopping_session, CatalogRegistry, Config, ShoppingList};

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let config = Config::from_env();

    match args.get(1).map(String::as_str) {
        Some("shop") => run_shop()?,
        Some("browse") => run_browse(&config)?,
        Some("prices") | None => run_print(&config)?,
        Some(other) => {
            eprintln!("❌ Unknown command: {}", other);
            eprintln!("   Usage: pricebook [prices|shop|browse]");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn open_catalog(config: &Config) -> Result<pricebook::SharedCatalog> {
    let registry = CatalogRegistry::new(&config.data_dir);
    registry
        .open(&config.price_file)
        .with_context(|| format!("Failed to load {}", config.price_path().display()))
}

fn run_print(config: &Config) -> Result<()> {
    let catalog = open_catalog(config)?;
    let catalog = catalog.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    catalog.print_all();
    Ok(())
}

fn run_shop() -> Result<()> {
    let mut list = ShoppingList::new();
    let stdin = io::stdin();
    run_shopping_session(&mut list, stdin.lock(), io::stdout())
}

#[cfg(feature = "tui")]
fn run_browse(config: &Config) -> Result<()> {
    let catalog = open_catalog(config)?;
    let entries = catalog
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .sorted_entries();

    let mut app = ui::App::new(entries, config.price_file.clone());
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_browse(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin pricebook-server --features server");
    std::process::exit(1);
}

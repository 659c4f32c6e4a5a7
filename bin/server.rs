// Pricebook - Web Server
// JSON API over the shared price catalog

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use pricebook::{init_logging, CatalogEntry, CatalogRegistry, Config, SharedCatalog};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, MutexGuard, PoisonError};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
struct AppState {
    catalog: SharedCatalog,
    price_file: Arc<str>,
}

impl AppState {
    fn catalog(&self) -> MutexGuard<'_, pricebook::Catalog> {
        self.catalog.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Deserialize)]
struct PriceUpdate {
    price: f64,
}

#[derive(Serialize)]
struct SaveResponse {
    file: String,
    written: usize,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/prices - All entries, ordered by id
async fn list_prices(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.catalog().sorted_entries()))
}

/// GET /api/prices/:id - One entry
async fn get_price(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.catalog().entry(&id).cloned() {
        Some(entry) => (StatusCode::OK, Json(ApiResponse::ok(entry))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<CatalogEntry>::err(format!("Unknown product: {}", id))),
        )
            .into_response(),
    }
}

/// PUT /api/prices/:id - Update the price of an existing entry
async fn set_price(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<PriceUpdate>,
) -> impl IntoResponse {
    let mut catalog = state.catalog();

    if !catalog.set_price(&id, update.price) {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<CatalogEntry>::err(format!("Unknown product: {}", id))),
        )
            .into_response();
    }

    info!(id = %id, price = update.price, "price updated");
    let entry = catalog.entry(&id).cloned();
    (StatusCode::OK, Json(ApiResponse { success: true, data: entry, error: None })).into_response()
}

/// POST /api/save - Write the catalog back to the price file
async fn save_prices(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog();

    match catalog.save(&state.price_file) {
        Ok(written) => (
            StatusCode::OK,
            Json(ApiResponse::ok(SaveResponse {
                file: state.price_file.to_string(),
                written,
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to save price list");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<SaveResponse>::err(e.to_string())),
            )
                .into_response()
        }
    }
}

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/prices", get(list_prices))
        .route("/prices/:id", get(get_price).put(set_price))
        .route("/save", post(save_prices))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;

    init_logging();

    println!("🌐 Pricebook - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = Config::from_env();
    let registry = CatalogRegistry::new(&config.data_dir);
    let catalog = registry
        .open(&config.price_file)
        .with_context(|| format!("Failed to load {}", config.price_path().display()))?;
    println!("✓ Price list loaded: {:?}", config.price_path());

    let state = AppState {
        catalog,
        price_file: Arc::from(config.price_file.as_str()),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    println!("\n🚀 Server running on http://{}", config.bind_addr);
    println!("   API: http://{}/api/prices", config.bind_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}

//! # Krishi Node
//!
//! In-memory reference implementation of the Krishi order service, used for
//! local development and as the counterpart of the SDK's integration tests.

use axum::routing::{get, patch, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod api;
pub mod config;
pub mod error;
pub mod seed;
pub mod state;

pub use config::NodeConfig;
pub use error::ApiError;
pub use state::{Account, AppState};

/// Run the order service until the listener fails.
pub async fn run_server(config: NodeConfig) -> anyhow::Result<()> {
    let state = AppState::new();
    if config.seed_demo {
        seed::seed_demo_accounts(&state).await;
    }

    let app = create_router(state);
    let addr = config.listen_addr()?;

    info!("Listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(api::health::health_check))
        .route("/api/orders", post(api::orders::place_order))
        .route("/api/orders/my-orders", get(api::orders::my_orders))
        .route("/api/orders/seller/orders", get(api::orders::seller_orders))
        .route("/api/orders/:id", get(api::orders::get_order))
        .route(
            "/api/orders/:id/item/:index/status",
            patch(api::orders::update_item_status_by_index),
        )
        .route(
            "/api/orders/:id/items/:line_id/status",
            patch(api::orders::update_item_status_by_line),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

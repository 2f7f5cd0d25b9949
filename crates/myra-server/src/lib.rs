pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, put};
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(pool: PgPool) -> Router {
    let app_state = state::AppState::new(pool);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Agreements
        .route("/api/v1/agreements", get(routes::agreements::list_agreements))
        .route(
            "/api/v1/agreements/search",
            get(routes::agreements::search_agreements),
        )
        .route(
            "/api/v1/agreements/{id}",
            get(routes::agreements::get_agreement).put(routes::agreements::update_agreement),
        )
        .route(
            "/api/v1/agreements/{id}/zone",
            put(routes::agreements::update_agreement_zone),
        )
        .route(
            "/api/v1/agreements/{id}/status/{status_id}",
            put(routes::agreements::update_agreement_status),
        )
        // Livestock identifiers
        .route(
            "/api/v1/agreements/{id}/livestockidentifier",
            get(routes::livestock::list_livestock_identifiers)
                .post(routes::livestock::create_livestock_identifier),
        )
        .route(
            "/api/v1/agreements/{id}/livestockidentifier/{identifier_id}",
            put(routes::livestock::update_livestock_identifier),
        )
        // Zones
        .route("/api/v1/zones", get(routes::zones::list_zones))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the MyRA API server on `port`.
pub async fn serve(pool: PgPool, port: u16) -> anyhow::Result<()> {
    let app = build_router(pool);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("MyRA API server listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}

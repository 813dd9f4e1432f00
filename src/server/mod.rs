mod handlers;
mod state;
mod static_files;

use axum::Router;
use axum::routing::get;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::lookup::LookupResolver;

pub fn build_router(resolver: LookupResolver) -> Router {
    let state = Arc::new(AppState { resolver });

    Router::new()
        .route("/", get(handlers::index))
        .route("/style.css", get(handlers::style))
        .route("/app.js", get(handlers::script))
        .route("/health", get(handlers::health))
        .route("/api/lookup", get(handlers::lookup))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, resolver: LookupResolver) -> std::io::Result<()> {
    let app = build_router(resolver);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(%addr, "server listening");
    eprintln!("  iplookup listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app).await
}

//! Static frontend file server.
//!
//! Serves the frontend assets directory over plain HTTP with permissive
//! CORS headers on every response. Single-purpose and stateless; the chat
//! API runs as a separate serve mode.

use anyhow::{bail, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config::Config;

/// Build the static file router for the given root directory.
pub fn app(root: &std::path::Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .fallback_service(ServeDir::new(root))
        .layer(cors)
}

/// Start the frontend server on the configured bind address.
///
/// Fails at startup if the configured root directory does not exist.
pub async fn run_frontend(config: &Config) -> Result<()> {
    let root = &config.frontend.root;
    if !root.is_dir() {
        bail!(
            "Frontend root directory does not exist: {}",
            root.display()
        );
    }

    let bind_addr = config.frontend.bind.clone();
    let router = app(root);

    println!("Frontend server listening on http://{}", bind_addr);
    println!("Serving files from: {}", root.display());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

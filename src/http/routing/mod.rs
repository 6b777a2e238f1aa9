pub mod todos;

use axum::{routing::get, Router};

/// Mounts a resource router next to the liveness probe.
pub fn app(resources: Router) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(resources)
}

async fn health() -> &'static str { "ok" }

use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints that require no token. The menu listing deliberately exposes
/// only the short drink representation; full recipes stay behind the
/// `get:drinks-detail` permission on the authenticated router.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated liveness probe for monitoring and load balancers.
        .route("/health", get(|| async { "ok" }))
        // GET /drinks
        // The public menu: short representation, 404 when the menu is empty.
        .route("/drinks", get(handlers::get_drinks))
}

use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Authenticated Router Module
///
/// Every route here sits behind the bearer-token layer in `create_router`,
/// so handlers always run with verified claims. The required permission
/// string differs per route and is enforced inside each handler via
/// `Claims::require`.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /drinks-detail  (get:drinks-detail)
        // Full recipes, including ingredient names.
        .route("/drinks-detail", get(handlers::get_drink_details))
        // POST /drinks  (post:drinks)
        // Adds a drink; title uniqueness is checked before insert.
        .route("/drinks", post(handlers::create_drink))
        // PATCH /drinks/{id}  (patch:drinks)
        // Partial update; only supplied fields change.
        // DELETE /drinks/{id}  (delete:drinks)
        // Removes the drink and echoes its id.
        .route(
            "/drinks/{id}",
            patch(handlers::update_drink).delete(handlers::delete_drink),
        )
}

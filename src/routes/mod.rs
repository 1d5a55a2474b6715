pub mod admin;
pub mod auth;
pub mod cart;
pub mod favorites;
pub mod files;
pub mod home;
pub mod orders;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The complete application: every route, the upload size limit and request tracing.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .merge(home::router())
        .merge(auth::router())
        .merge(favorites::router())
        .merge(cart::router())
        .merge(orders::router())
        .merge(admin::router())
        .route("/uploads/{*path}", get(files::upload))
        .route("/assets/{*path}", get(files::asset))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

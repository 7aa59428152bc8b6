use axum::{
    Router,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod catalog;
mod error;
mod types;

pub use error::ApiError;
pub use types::*;

pub fn router(state: Arc<AppState>) -> Router {
    let admin_routes = create_admin_router(state.clone());

    Router::new()
        .route("/", get(catalog::home))
        .route("/movie/{id}", get(catalog::detail))
        .route("/movies", get(catalog::list_movies))
        .route("/series", get(catalog::list_series))
        .route("/category", get(catalog::by_category))
        .route("/request", post(catalog::submit_request))
        .route("/wait", get(catalog::wait))
        .route("/api/search", get(catalog::quick_search))
        .nest("/admin", admin_routes)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn create_admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/content", post(admin::create_content))
        .route("/content/{id}", put(admin::update_content))
        .route("/content/{id}", delete(admin::delete_content))
        .route("/content/bulk-delete", post(admin::bulk_delete_content))
        .route("/categories", post(admin::add_category))
        .route("/categories/{id}", delete(admin::delete_category))
        .route("/ads", put(admin::update_ads))
        .route("/requests/{id}/status", put(admin::update_request_status))
        .route("/requests/{id}", delete(admin::delete_request))
        .route("/api/search", get(admin::tmdb_search))
        .route("/api/details", get(admin::tmdb_details))
        .route("/api/resync", get(admin::tmdb_resync))
        .route("/api/live_search", get(admin::live_search))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::admin_auth_middleware,
        ))
}

use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod comments;
pub mod doc;
pub mod health;
pub mod params;

// Build the storefront router without binding state; it will be provided at the top level.
pub fn create_app_router() -> Router<AppState> {
    Router::new()
        .merge(catalog::router())
        .merge(auth::router())
        .merge(cart::router())
        .merge(comments::router())
        .nest("/admin", admin::router())
}

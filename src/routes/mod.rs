//! Route modules for the OTU loader

pub mod health;
pub mod pages;
pub mod search;

use axum::Router;

use crate::state::AppState;

/// All routes, without state
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/health", health::router())
        .merge(pages::router())
        .merge(search::router())
}

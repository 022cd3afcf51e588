use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod classes;
pub mod combinations;
pub mod common;
pub mod health;
pub mod notices;
pub mod response;
pub mod results;
pub mod students;
pub mod subjects;

/// Every API route, ready for state.
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .merge(health::create_route())
        .merge(auth::create_route())
        .merge(classes::create_route())
        .merge(subjects::create_route())
        .merge(combinations::create_route())
        .merge(students::create_route())
        .merge(results::create_route())
        .merge(notices::create_route())
}

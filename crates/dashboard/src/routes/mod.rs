//! Route handlers for the dashboard.

pub mod auth;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the dashboard's route table.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Session boundary
        .route("/login", get(auth::login))
        .route("/oauth2callback", get(auth::callback))
        .route("/logout", post(auth::logout))
        // Order API consumed by the presentation layer
        .route("/api/orders", get(orders::list))
        .route("/api/orders/check", post(orders::check))
        .route("/api/orders/{order_number}/discard", post(orders::discard))
        .route(
            "/api/orders/{order_number}/mark-returned",
            post(orders::mark_returned),
        )
}

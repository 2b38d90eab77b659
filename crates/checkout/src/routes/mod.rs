//! HTTP route handlers for the checkout.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to the checkout
//! GET  /health                 - Health check
//!
//! # Checkout
//! GET  /checkout               - Checkout form (fresh form state)
//! POST /checkout               - Submit, or press a widget button without JavaScript
//! POST /checkout/refresh       - Re-render the widget that triggered the request (HTMX)
//!
//! # Session
//! POST /session/owner          - Switch the demo owner
//! ```

pub mod checkout;
pub mod session;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::submit))
        .route("/refresh", post(checkout::refresh))
}

/// Create all routes for the checkout.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::index))
        .nest("/checkout", checkout_routes())
        .route("/session/owner", post(session::switch_owner))
}

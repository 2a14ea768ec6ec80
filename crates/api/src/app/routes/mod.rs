use axum::{Router, routing::get};

pub mod production;
pub mod session;
pub mod system;

/// Router for all session-authenticated endpoints.
pub fn protected_router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/production", production::router())
}

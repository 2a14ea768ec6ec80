//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: store wiring (in-memory vs persistent) and the operations
//!   routes call
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs (camelCase wire format)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(services: Arc<services::AppServices>) -> Router {
    let session_state = middleware::SessionState {
        resolver: services.resolver(),
    };

    // Protected routes: require a resolvable session.
    let protected = routes::protected_router().layer(axum::middleware::from_fn_with_state(
        session_state,
        middleware::session_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/auth", routes::session::router())
        .merge(protected)
        .layer(Extension(services))
        .layer(ServiceBuilder::new())
}

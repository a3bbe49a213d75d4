//! Notify HTTP Layer
//!
//! Axum handlers for the push endpoint.

mod handlers;
mod middleware;

pub use handlers::*;
pub use middleware::*;

use axum::Router;

/// Create the push router.
///
/// `POST /` is the function-style invoke path; `POST /push` is the same operation.
pub fn push_router<S>(service: S) -> Router
where
    S: notify_service::Push + Clone + 'static,
{
    use axum::routing::{get, post};

    Router::new()
        .route("/", post(handlers::push_handler::<S>))
        .route("/push", post(handlers::push_handler::<S>))
        .route("/health", get(handlers::health))
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .with_state(service)
}

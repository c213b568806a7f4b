//! Routers and the assembled application.

pub mod common;
pub mod explorer;

pub use common::common_routes;
pub use explorer::explorer_routes;

use crate::handlers::unknown_route;
use crate::state::AppState;
use axum::Router;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Full application: explorer and operational routes, body size limit, request tracing.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(explorer_routes(state))
        .fallback(unknown_route)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}

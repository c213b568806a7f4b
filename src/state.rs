//! Shared application state for all routes.

use crate::config::Pagination;
use crate::service::Backend;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub pagination: Pagination,
}

impl AppState {
    pub fn new(backend: Arc<dyn Backend>, pagination: Pagination) -> Self {
        AppState { backend, pagination }
    }
}

//! Shared state for the API handlers.

use std::sync::Arc;

use crate::service::AdvanceService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    service: Arc<AdvanceService>,
}

impl AppState {
    /// Wraps `service` for sharing across handlers.
    pub fn new(service: AdvanceService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Returns the advance service.
    pub fn service(&self) -> &AdvanceService {
        &self.service
    }
}

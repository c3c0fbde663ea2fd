use std::sync::Arc;

use services::Services;

use crate::metrics::Metrics;

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    pub metrics: Arc<Metrics>,
    /// Rows returned by `GET /api/ranking`
    pub ranking_limit: usize,
}

impl AppState {
    pub fn new(services: Services, ranking_limit: usize) -> Self {
        Self {
            services: Arc::new(services),
            metrics: Arc::new(Metrics::new()),
            ranking_limit,
        }
    }
}

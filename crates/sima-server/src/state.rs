//! Shared handler state.

use std::sync::Arc;

use sima_config::ServerConfig;
use sima_db::service::SimaService;

use crate::metrics::RequestMetrics;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SimaService>,
    pub config: Arc<ServerConfig>,
    pub metrics: Arc<RequestMetrics>,
}

impl AppState {
    #[must_use]
    pub fn new(service: Arc<SimaService>, config: ServerConfig) -> Self {
        Self {
            service,
            config: Arc::new(config),
            metrics: Arc::new(RequestMetrics::default()),
        }
    }
}

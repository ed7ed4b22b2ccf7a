//! Shared state for the exposition router.

use std::sync::Arc;

use crate::obs::DnsMetrics;

#[derive(Clone)]
pub struct AppState {
    metrics: Arc<DnsMetrics>,
}

impl AppState {
    pub fn new(metrics: Arc<DnsMetrics>) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &DnsMetrics {
        &self.metrics
    }
}

use std::sync::Arc;
use std::time::Duration;

use crate::recommendation::RecommendationEngine;
use crate::store::SchedulerStore;

/// Shared by every handler. The store is injected once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SchedulerStore>,
    pub engine: RecommendationEngine,
}

impl AppState {
    pub fn new(store: Arc<dyn SchedulerStore>, store_timeout: Duration) -> Self {
        let engine = RecommendationEngine::new(Arc::clone(&store), store_timeout);
        Self { store, engine }
    }
}

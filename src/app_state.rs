use std::sync::Arc;

use crate::services::{
    catalog::StoreCatalog,
    fetch::ImageFetcher,
    processor::{JobProcessor, ProcessingDelay},
    registry::JobRegistry,
};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<JobRegistry>,
    pub catalog: Arc<StoreCatalog>,
    pub processor: Arc<JobProcessor>,
}

impl AppState {
    pub fn new(
        catalog: StoreCatalog,
        fetcher: Arc<dyn ImageFetcher>,
        delay: ProcessingDelay,
    ) -> Self {
        let registry = Arc::new(JobRegistry::new());
        let catalog = Arc::new(catalog);
        let processor = Arc::new(JobProcessor::new(
            registry.clone(),
            catalog.clone(),
            fetcher,
            delay,
        ));

        Self {
            registry,
            catalog,
            processor,
        }
    }
}

use shelf_core::{CatalogService, Config, SanitizedConfig};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<CatalogService>,
}

impl AppState {
    pub fn new(config: Config, catalog: Arc<CatalogService>) -> Self {
        Self { config, catalog }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn catalog(&self) -> &CatalogService {
        self.catalog.as_ref()
    }
}

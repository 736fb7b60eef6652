// src/application/state.rs

use std::sync::Arc;

use crate::config::CatalogConfig;
use crate::error::AppResult;
use crate::events::EventBus;
use crate::integrations::catalog::{CatalogApi, CatalogClient};
use crate::services::{CatalogService, EpisodeReconciler};

/// Application state shared by every command.
/// All fields are Arc-wrapped for thread-safe sharing across commands.
pub struct AppState {
    pub config: CatalogConfig,
    pub event_bus: Arc<EventBus>,
    pub reconciler: Arc<EpisodeReconciler>,
    pub catalog_service: Arc<CatalogService>,
}

impl AppState {
    /// Wire the HTTP client, the default reconciliation policy and a fresh bus
    pub fn from_config(config: CatalogConfig) -> AppResult<Self> {
        let client = CatalogClient::new(&config)?;
        Ok(Self::with_api(config, Arc::new(client)))
    }

    /// Same wiring around any catalog implementation
    pub fn with_api(config: CatalogConfig, api: Arc<dyn CatalogApi>) -> Self {
        let event_bus = Arc::new(EventBus::new());
        let reconciler = Arc::new(EpisodeReconciler::default());
        let catalog_service = Arc::new(CatalogService::new(
            api,
            Arc::clone(&reconciler),
            Arc::clone(&event_bus),
        ));

        Self {
            config,
            event_bus,
            reconciler,
            catalog_service,
        }
    }
}

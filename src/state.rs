//! Shared application state for all routes. Config is reloadable at runtime.

use crate::config::ConfigStore;
use crate::error::AppError;
use crate::render::TemplateCache;
use crate::store::{connect, Db};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Swapped wholesale by `/api/reload`.
    pub config: ConfigStore,
    pub templates: Arc<TemplateCache>,
    /// `None` when no database is configured or it could not be reached at startup.
    pub db: Option<Db>,
}

impl AppState {
    pub fn new(config: ConfigStore, templates: TemplateCache, db: Option<Db>) -> Self {
        AppState {
            config,
            templates: Arc::new(templates),
            db,
        }
    }

    /// Startup sequence: config and template preload are fatal, the database is not.
    pub async fn load(config_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let config = ConfigStore::open(config_path).await?;
        let snapshot = config.snapshot();

        let templates = TemplateCache::new(snapshot.web_config.template_root());
        templates.preload().await?;

        let db = match connect(&snapshot.db_config).await {
            Ok(db) => db,
            Err(e) => {
                tracing::warn!(error = %e, "database unavailable, continuing without it");
                None
            }
        };
        Ok(Self::new(config, templates, db))
    }
}

//! Process-wide, hot-swappable site configuration.

use crate::config::{load_from_path, SiteConfig};
use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Holds the current `SiteConfig` snapshot. Readers copy out the `Arc`, so a
/// reload never exposes a half-updated value and never waits on file I/O.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    path: PathBuf,
    current: Arc<RwLock<Arc<SiteConfig>>>,
}

impl ConfigStore {
    /// Load the file at `path`. Any error here must stop startup.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = load_from_path(&path).await?;
        tracing::info!(path = %path.display(), tenants = config.domains.len(), "config loaded");
        Ok(Self::with_config(path, config))
    }

    /// Store seeded with an already-loaded config; `path` is used by `reload`.
    pub fn with_config(path: impl Into<PathBuf>, config: SiteConfig) -> Self {
        ConfigStore {
            path: path.into(),
            current: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> Arc<SiteConfig> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-read the file and swap it in. On error the previous snapshot stays active.
    pub async fn reload(&self) -> Result<Arc<SiteConfig>, ConfigError> {
        let fresh = match load_from_path(&self.path).await {
            Ok(config) => Arc::new(config),
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "config reload failed, keeping previous");
                return Err(e);
            }
        };
        self.replace(fresh.clone());
        tracing::info!(tenants = fresh.domains.len(), "config reloaded");
        Ok(fresh)
    }

    /// Swap in a new snapshot. The write lock covers the pointer store only.
    pub fn replace(&self, config: Arc<SiteConfig>) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = config;
    }
}

//! Config validation: tenant themes and database driver.

use crate::config::SiteConfig;
use crate::error::ConfigError;
use crate::store::Dialect;
use std::path::{Component, Path};

pub fn validate(config: &SiteConfig) -> Result<(), ConfigError> {
    for (id, tenant) in &config.domains {
        let theme = tenant.theme();
        if theme.is_empty() {
            return Err(ConfigError::Validation(format!("tenant {}: template is empty", id)));
        }
        if !is_plain_component(theme) {
            return Err(ConfigError::Validation(format!(
                "tenant {}: template must be a single directory name, got {:?}",
                id, theme
            )));
        }
        if !tenant.cid.is_empty() && tenant.cid != *id {
            tracing::warn!(tenant = %id, cid = %tenant.cid, "cid differs from domains key; key wins");
        }
    }

    let driver = &config.db_config.driver;
    if !driver.is_empty() {
        driver.parse::<Dialect>().map_err(ConfigError::Validation)?;
    }

    Ok(())
}

/// Theme names become path segments under the template and static roots.
fn is_plain_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

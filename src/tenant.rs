//! Tenant resolution: account header (or dev override) -> tenant config.

use crate::config::{SiteConfig, TenantConfig};
use crate::error::AppError;
use std::sync::Arc;

/// A request's tenant, pinned to the config snapshot it was resolved from.
#[derive(Clone, Debug)]
pub struct ResolvedTenant {
    pub account_id: String,
    pub tenant: Arc<TenantConfig>,
    pub site: Arc<SiteConfig>,
}

impl ResolvedTenant {
    pub fn theme(&self) -> &str {
        self.tenant.theme()
    }
}

/// Look up the tenant for `header`. The dev override, when active, replaces the header value.
pub fn resolve_tenant(site: Arc<SiteConfig>, header: Option<&str>) -> Result<ResolvedTenant, AppError> {
    let account_id = match site.dev_override() {
        Some(dev) => dev.to_string(),
        None => header.unwrap_or_default().to_string(),
    };
    let tenant = site
        .tenant(&account_id)
        .cloned()
        .ok_or_else(|| AppError::UnknownTenant(account_id.clone()))?;
    Ok(ResolvedTenant {
        account_id,
        tenant,
        site,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(dev_cid: &str) -> Arc<SiteConfig> {
        let mut config = SiteConfig {
            dev_cid: dev_cid.into(),
            ..Default::default()
        };
        for (id, theme) in [("acme", "dark"), ("globex", "light")] {
            config.domains.insert(
                id.into(),
                Arc::new(TenantConfig {
                    cid: id.into(),
                    template: theme.into(),
                    ..Default::default()
                }),
            );
        }
        Arc::new(config)
    }

    #[test]
    fn known_ids_resolve_to_their_config() {
        let site = site("");
        for id in ["acme", "globex"] {
            let resolved = resolve_tenant(site.clone(), Some(id)).unwrap();
            assert_eq!(resolved.account_id, id);
            assert!(Arc::ptr_eq(&resolved.tenant, site.tenant(id).unwrap()));
        }
    }

    #[test]
    fn unknown_or_missing_id_is_client_error() {
        let site = site("");
        for header in [Some("initech"), Some(""), None] {
            let err = resolve_tenant(site.clone(), header).unwrap_err();
            assert!(matches!(err, AppError::UnknownTenant(_)));
        }
    }

    #[cfg(debug_assertions)]
    #[test]
    fn dev_override_replaces_header() {
        let resolved = resolve_tenant(site("globex"), Some("acme")).unwrap();
        assert_eq!(resolved.account_id, "globex");
        assert_eq!(resolved.theme(), "light");
    }
}

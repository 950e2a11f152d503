//! Raw config types matching the YAML site file (camelCase keys).

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// One tenant: a site with its own theme and SEO text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenantConfig {
    /// Domain with scheme, e.g. `https://example.com`.
    pub full_domain: String,
    /// Domain without scheme.
    pub host: String,
    /// Tenant id as written in the file; the map key is authoritative.
    pub cid: String,
    /// Theme directory name under the template root.
    pub template: String,
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub copyright: String,
    /// Raw HTML injected into page heads.
    pub header_script: String,
    /// Raw HTML injected before `</body>`.
    pub footer_script: String,
    pub robots_txt: String,
    pub ads_txt: String,
    pub root_txt: String,
    /// File name Google requests for site verification, e.g. `google0123abcd.html`.
    pub google_site_verify: String,
    pub google_site_verify_text: String,
    /// Allowed crawler identifiers.
    pub spiders: Vec<String>,
}

impl TenantConfig {
    pub fn theme(&self) -> &str {
        &self.template
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebConfig {
    pub addr: String,
    #[serde(deserialize_with = "string_or_number")]
    pub port: String,
    pub static_root: String,
    pub template_root: String,
    /// Legacy location of the reload secret; the top-level `token` wins.
    pub token: String,
}

pub const DEFAULT_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "8080";
pub const DEFAULT_STATIC_ROOT: &str = "static";
pub const DEFAULT_TEMPLATE_ROOT: &str = "templates";

impl WebConfig {
    /// `addr:port` with defaults filled in.
    pub fn bind_addr(&self) -> String {
        let addr = if self.addr.is_empty() { DEFAULT_ADDR } else { &self.addr };
        let port = if self.port.is_empty() { DEFAULT_PORT } else { &self.port };
        format!("{}:{}", addr, port)
    }

    pub fn static_root(&self) -> &str {
        if self.static_root.is_empty() {
            DEFAULT_STATIC_ROOT
        } else {
            &self.static_root
        }
    }

    pub fn template_root(&self) -> &str {
        if self.template_root.is_empty() {
            DEFAULT_TEMPLATE_ROOT
        } else {
            &self.template_root
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DbConfig {
    /// `sqlite`/`sqlite3`, `mysql` or `postgres`. Empty means no database.
    pub driver: String,
    pub host: String,
    #[serde(deserialize_with = "string_or_number")]
    pub port: String,
    pub username: String,
    pub password: String,
    /// Database name, or file path for sqlite (empty = in-memory).
    pub database: String,
}

/// Whole site file. Immutable once loaded; reload builds a new one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    /// Forces every request onto this tenant. Debug builds only.
    pub dev_cid: String,
    pub token: String,
    pub web_config: WebConfig,
    pub db_config: DbConfig,
    /// Tenant id -> tenant.
    pub domains: BTreeMap<String, Arc<TenantConfig>>,
}

impl SiteConfig {
    pub fn tenant(&self, id: &str) -> Option<&Arc<TenantConfig>> {
        self.domains.get(id)
    }

    /// Tenant id every request is pinned to, if the override is active in this build.
    pub fn dev_override(&self) -> Option<&str> {
        if cfg!(debug_assertions) && !self.dev_cid.is_empty() {
            Some(&self.dev_cid)
        } else {
            None
        }
    }

    /// Shared secret for `/api/reload`. `None` disables the endpoint.
    pub fn reload_token(&self) -> Option<&str> {
        [self.token.as_str(), self.web_config.token.as_str()]
            .into_iter()
            .find(|t| !t.is_empty())
    }
}

/// Accepts `port: 8080` as well as `port: "8080"`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(u64),
        Null(()),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
        Raw::Null(()) => String::new(),
    })
}

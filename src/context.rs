//! Per-request context handed to page handlers and the renderer.

use crate::config::{SiteConfig, TenantConfig};
use crate::store::Db;
use crate::tenant::ResolvedTenant;
use axum::{
    body::Bytes,
    extract::Query,
    http::{request::Parts, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};
use minijinja::Value;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;

/// Data bag key seeded with the tenant's config.
pub const CONFIG_KEY: &str = "Config";

/// One request's view of its tenant plus the template data bag.
///
/// Owned by a single request; handlers get `&mut` access while they run and the
/// renderer reads the bag afterwards.
pub struct RequestContext {
    parts: Parts,
    body: Bytes,
    resolved: ResolvedTenant,
    data: BTreeMap<String, Value>,
    db: Option<Db>,
    response: Option<Response>,
}

impl RequestContext {
    pub fn new(parts: Parts, body: Bytes, resolved: ResolvedTenant, db: Option<Db>) -> Self {
        let mut data = BTreeMap::new();
        data.insert(
            CONFIG_KEY.to_string(),
            Value::from_serialize(&*resolved.tenant),
        );
        RequestContext {
            parts,
            body,
            resolved,
            data,
            db,
            response: None,
        }
    }

    /// Insert or overwrite a template variable. Last write wins.
    pub fn assign<V: Serialize>(&mut self, key: impl Into<String>, value: V) {
        self.data.insert(key.into(), Value::from_serialize(value));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }

    pub fn tenant(&self) -> &TenantConfig {
        &self.resolved.tenant
    }

    pub fn site(&self) -> &SiteConfig {
        &self.resolved.site
    }

    pub fn account_id(&self) -> &str {
        &self.resolved.account_id
    }

    pub fn theme(&self) -> &str {
        self.resolved.theme()
    }

    pub fn db(&self) -> Option<&Db> {
        self.db.as_ref()
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Deserialize the query string.
    pub fn query<T: DeserializeOwned>(&self) -> Option<T> {
        Query::<T>::try_from_uri(&self.parts.uri).ok().map(|Query(q)| q)
    }

    /// Deserialize a JSON request body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Write the response directly. Only used by routes registered without a template.
    pub fn respond(&mut self, response: impl IntoResponse) {
        self.response = Some(response.into_response());
    }

    pub fn take_response(&mut self) -> Option<Response> {
        self.response.take()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::http::Request;
    use std::sync::Arc;

    pub(crate) fn context(uri: &str) -> RequestContext {
        let tenant = Arc::new(TenantConfig {
            cid: "acme".into(),
            template: "dark".into(),
            title: "Acme".into(),
            ..Default::default()
        });
        let mut site = SiteConfig::default();
        site.domains.insert("acme".into(), tenant.clone());
        let resolved = ResolvedTenant {
            account_id: "acme".into(),
            tenant,
            site: Arc::new(site),
        };
        let (parts, ()) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        RequestContext::new(parts, Bytes::new(), resolved, None)
    }

    #[test]
    fn seeded_with_tenant_config() {
        let ctx = context("/");
        let config = ctx.get(CONFIG_KEY).unwrap();
        assert_eq!(config.get_attr("title").unwrap().as_str(), Some("Acme"));
        assert_eq!(ctx.theme(), "dark");
        assert_eq!(ctx.account_id(), "acme");
    }

    #[test]
    fn assign_is_last_write_wins() {
        let mut ctx = context("/");
        ctx.assign("n", 1);
        ctx.assign("n", "two");
        assert_eq!(ctx.get("n").unwrap().as_str(), Some("two"));
    }

    #[test]
    fn query_parsing() {
        #[derive(serde::Deserialize)]
        struct Q {
            tag: String,
        }
        let ctx = context("/list?tag=rust&page=2");
        assert_eq!(ctx.query::<Q>().unwrap().tag, "rust");
    }
}

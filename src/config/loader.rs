//! Read and parse the YAML site file.

use crate::config::{validate, SiteConfig};
use crate::error::ConfigError;
use std::path::Path;

/// Parse and validate a site file body.
pub fn parse(yaml: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = serde_yaml::from_str(yaml)?;
    validate(&config)?;
    Ok(config)
}

/// Read, parse and validate the site file at `path`. No locks are involved here.
pub async fn load_from_path(path: &Path) -> Result<SiteConfig, ConfigError> {
    let yaml = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let config = parse(&yaml)?;
    if !config.dev_cid.is_empty() && config.dev_override().is_none() {
        tracing::warn!(dev_cid = %config.dev_cid, "devCid is ignored in release builds");
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = r#"
devCid: ""
token: s3cret
webConfig:
  addr: 127.0.0.1
  port: 9000
  staticRoot: ./static
  templateRoot: ./templates
dbConfig:
  driver: sqlite
  database: ""
domains:
  acme:
    cid: acme
    host: acme.test
    template: dark
    title: Acme
    googleSiteVerify: google0123.html
    googleSiteVerifyText: "google-site-verification: google0123.html"
    spiders: [googlebot, bingbot]
"#;

    #[test]
    fn parses_site_file() {
        let config = parse(SITE).unwrap();
        assert_eq!(config.token, "s3cret");
        assert_eq!(config.web_config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.web_config.template_root(), "./templates");
        let acme = config.tenant("acme").unwrap();
        assert_eq!(acme.theme(), "dark");
        assert_eq!(acme.spiders, vec!["googlebot", "bingbot"]);
        assert_eq!(acme.robots_txt, "");
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let config = parse("domains: {}\n").unwrap();
        assert_eq!(config.web_config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.web_config.static_root(), "static");
        assert!(config.reload_token().is_none());
    }

    #[test]
    fn legacy_web_token_is_a_fallback() {
        let config = parse("webConfig:\n  token: abc\n").unwrap();
        assert_eq!(config.reload_token(), Some("abc"));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = parse("domains: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_path(&dir.path().join("nope.yaml")).await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

//! Template helper functions bound to the in-flight request.

use crate::context::RequestContext;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use minijinja::{Environment, Value};

/// URL prefix static assets are served under.
pub const STATIC_PREFIX: &str = "/static";

const DEFAULT_MOMENT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Helpers for one render, capturing the request values they need.
#[derive(Clone, Debug)]
pub struct TemplateHelpers {
    theme: String,
}

impl TemplateHelpers {
    pub fn for_request(ctx: &RequestContext) -> Self {
        Self::for_theme(ctx.theme())
    }

    pub fn for_theme(theme: impl Into<String>) -> Self {
        TemplateHelpers { theme: theme.into() }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// `css/app.css` or `/css/app.css` -> `/static/<theme>/css/app.css`.
    pub fn assets(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}/{}", STATIC_PREFIX, self.theme, path)
    }

    /// Register every helper as both a function and a filter.
    pub fn register(&self, env: &mut Environment<'_>) {
        let me = self.clone();
        // Asset URLs come from theme authors; skip escaping so `/` stays literal.
        let assets = move |path: String| Value::from_safe_string(me.assets(&path));
        env.add_function("assets", assets.clone());
        env.add_filter("assets", assets);

        env.add_function("base64", base64);
        env.add_filter("base64", base64);
        env.add_function("html", html);
        env.add_filter("html", html);
        env.add_function("moment", moment);
        env.add_filter("moment", moment);
        env.add_function("split", split);
        env.add_filter("split", split);
    }
}

/// Standard base64 of the UTF-8 bytes; empty stays empty.
pub fn base64(s: String) -> String {
    if s.is_empty() {
        return String::new();
    }
    STANDARD.encode(s.as_bytes())
}

/// Marks `s` as safe HTML. The caller must trust the content.
pub fn html(s: String) -> Value {
    Value::from_safe_string(s)
}

/// Format an RFC 3339 timestamp; anything else is returned unchanged.
pub fn moment(s: String, format: Option<String>) -> String {
    match chrono::DateTime::parse_from_rfc3339(&s) {
        Ok(t) => t
            .format(format.as_deref().unwrap_or(DEFAULT_MOMENT_FORMAT))
            .to_string(),
        Err(_) => s,
    }
}

pub fn split(s: String, sep: Option<String>) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }
    s.split(sep.as_deref().unwrap_or(","))
        .map(|p| p.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assets_strips_one_leading_slash() {
        let h = TemplateHelpers::for_theme("dark");
        assert_eq!(h.assets("/css/app.css"), "/static/dark/css/app.css");
        assert_eq!(h.assets("css/app.css"), "/static/dark/css/app.css");
    }

    #[test]
    fn base64_of_empty_is_empty() {
        assert_eq!(base64(String::new()), "");
        assert_eq!(base64("hello".into()), "aGVsbG8=");
        assert_eq!(base64("héllo".into()), "aMOpbGxv");
    }

    #[test]
    fn moment_formats_or_passes_through() {
        assert_eq!(moment("2024-03-05T10:20:30Z".into(), None), "2024-03-05 10:20");
        assert_eq!(
            moment("2024-03-05T10:20:30Z".into(), Some("%d/%m/%Y".into())),
            "05/03/2024"
        );
        assert_eq!(moment("yesterday".into(), None), "yesterday");
    }

    #[test]
    fn split_on_separator() {
        assert_eq!(split("a, b,c".into(), None), vec!["a", "b", "c"]);
        assert_eq!(split("a|b".into(), Some("|".into())), vec!["a", "b"]);
        assert!(split(String::new(), None).is_empty());
    }

    #[test]
    fn helpers_in_templates() {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| minijinja::AutoEscape::Html);
        TemplateHelpers::for_theme("dark").register(&mut env);
        let out = env
            .render_str(
                r#"{{ assets("/js/a.js") }}|{{ "hi"|base64 }}|{{ html("<b>x</b>") }}|{{ "<i>" }}"#,
                (),
            )
            .unwrap();
        assert_eq!(out, "/static/dark/js/a.js|aGk=|<b>x</b>|&lt;i&gt;");
    }
}

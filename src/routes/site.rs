//! Route registrar: pairs a path and template with a page handler and wraps
//! it in tenant resolution, rendering and error-page fallback.

use crate::context::RequestContext;
use crate::error::{AppError, HandlerError};
use crate::handlers::{ads_txt, favicon, reload, robots_txt, root_txt, site_verification, PageHandler};
use crate::render::{TemplateHelpers, ERROR_TEMPLATE, STATIC_PREFIX};
use crate::response;
use crate::routes::common_routes;
use crate::state::AppState;
use crate::tenant::ResolvedTenant;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{any, on, MethodFilter, MethodRouter},
    Router,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Request bodies above this are rejected before the handler runs.
pub const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Builder for a tenant site. Starts with the built-in endpoints
/// (`/favicon.ico`, `/root.txt`, `/ads.txt`, `/robots.txt`).
pub struct SiteRouter {
    state: AppState,
    routes: BTreeMap<String, MethodRouter<AppState>>,
}

impl SiteRouter {
    pub fn new(state: AppState) -> Self {
        SiteRouter {
            state,
            routes: BTreeMap::new(),
        }
        .get("/favicon.ico", "", favicon)
        .get("/root.txt", "", root_txt)
        .get("/ads.txt", "", ads_txt)
        .get("/robots.txt", "", robots_txt)
    }

    pub fn get<H: PageHandler>(self, path: &str, template: &str, handler: H) -> Self {
        self.handle(MethodFilter::GET, path, template, handler)
    }

    pub fn post<H: PageHandler>(self, path: &str, template: &str, handler: H) -> Self {
        self.handle(MethodFilter::POST, path, template, handler)
    }

    /// Register `handler` for `filter` on `path`. An empty `template` means the
    /// handler writes the response itself via `RequestContext::respond`.
    pub fn handle<H: PageHandler>(mut self, filter: MethodFilter, path: &str, template: &str, handler: H) -> Self {
        let handler: Arc<dyn PageHandler> = Arc::new(handler);
        let template: Arc<str> = Arc::from(template);
        let endpoint = move |State(state): State<AppState>, resolved: ResolvedTenant, request: Request| {
            let handler = Arc::clone(&handler);
            let template = Arc::clone(&template);
            async move { dispatch(state, resolved, handler, template, request).await }
        };
        let route = match self.routes.remove(path) {
            Some(existing) => existing.on(filter, endpoint),
            None => on(filter, endpoint),
        };
        self.routes.insert(path.to_string(), route);
        self
    }

    /// Final router with reload, health, static assets and the verification fallback.
    pub fn into_router(self) -> Router {
        let static_root = self.state.config.snapshot().web_config.static_root().to_string();
        let mut router = Router::new();
        for (path, route) in self.routes {
            router = router.route(&path, route);
        }
        router
            .route("/api/reload", any(reload))
            .merge(common_routes())
            .nest_service(STATIC_PREFIX, ServeDir::new(static_root))
            .fallback(site_verification)
            .with_state(self.state)
    }
}

/// Build the context, run the handler, then render.
///
/// Handler failures render the theme's error page with status 200 (except
/// `HandlerError::Abort`); template failures abort with 400.
async fn dispatch(
    state: AppState,
    resolved: ResolvedTenant,
    handler: Arc<dyn PageHandler>,
    template: Arc<str>,
    request: Request,
) -> Response {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, BODY_LIMIT).await {
        Ok(body) => body,
        Err(e) => return AppError::BadRequest(format!("read body: {}", e)).into_response(),
    };
    let mut ctx = RequestContext::new(parts, body, resolved, state.db.clone());

    let outcome = handler.call(&mut ctx).await;
    let template: &str = match outcome {
        Ok(()) if template.is_empty() => {
            return ctx
                .take_response()
                .unwrap_or_else(|| StatusCode::NO_CONTENT.into_response());
        }
        Ok(()) => &*template,
        Err(HandlerError::Abort(e)) => return e.into_response(),
        Err(e) => {
            tracing::warn!(
                tenant = %ctx.account_id(),
                path = %ctx.uri().path(),
                error = %e,
                "handler failed, rendering error page"
            );
            ERROR_TEMPLATE
        }
    };

    let helpers = TemplateHelpers::for_request(&ctx);
    let data = ctx.data();
    match state.templates.render(&helpers, template, data).await {
        Ok(html) => response::html(html),
        Err(e) => {
            tracing::warn!(theme = %helpers.theme(), template, error = %e, "render failed");
            AppError::from(e).into_response()
        }
    }
}

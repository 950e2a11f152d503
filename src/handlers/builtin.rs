//! Tenant-scoped endpoints registered without a template: favicon and text files.

use crate::context::RequestContext;
use crate::handlers::HandlerFuture;
use crate::response;
use axum::{body::Body, http::Request};
use std::path::Path;
use tower::ServiceExt;
use tower_http::services::ServeFile;

/// `<staticRoot>/<theme>/favicon.ico`.
pub fn favicon(ctx: &mut RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let path = Path::new(ctx.site().web_config.static_root())
            .join(ctx.theme())
            .join("favicon.ico");
        let mut request = Request::new(Body::empty());
        *request.headers_mut() = ctx.headers().clone();
        let served = match ServeFile::new(path).oneshot(request).await {
            Ok(resp) => resp,
            Err(never) => match never {},
        };
        ctx.respond(served);
        Ok(())
    })
}

pub fn root_txt(ctx: &mut RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let body = ctx.tenant().root_txt.clone();
        ctx.respond(response::text(body));
        Ok(())
    })
}

pub fn ads_txt(ctx: &mut RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let body = ctx.tenant().ads_txt.clone();
        ctx.respond(response::text(body));
        Ok(())
    })
}

pub fn robots_txt(ctx: &mut RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let body = ctx.tenant().robots_txt.clone();
        ctx.respond(response::text(body));
        Ok(())
    })
}

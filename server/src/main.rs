//! Site host: loads the site file, preloads themes and serves every tenant.
//!
//! Run from repo root: `cargo run -p tenant-pages-server -- -c config.yaml`

use clap::Parser;
use std::path::PathBuf;
use tenant_pages::{AppState, HandlerFuture, RequestContext, SiteRouter};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Parser, Debug)]
#[command(name = "tenant-pages-server", version, about = "Multi-tenant themed site host")]
struct Args {
    /// Site configuration file
    #[arg(short = 'c', long = "config", env = "CONFIG_PATH", default_value = "config.yaml")]
    config: PathBuf,
}

/// Home page: the theme's `index.html` with the request path available.
fn index(ctx: &mut RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let path = ctx.uri().path().to_string();
        ctx.assign("path", path);
        Ok(())
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tenant_pages=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let state = AppState::load(&args.config).await?;
    let bind_addr = state.config.snapshot().web_config.bind_addr();

    let app = SiteRouter::new(state)
        .get("/", "index.html", index)
        .into_router()
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;
    Ok(())
}

//! Tenant pages: multi-tenant themed HTML sites on axum.
//!
//! A request's `x-account-id` header picks a tenant from the YAML site file,
//! the tenant picks a theme directory, and a page handler fills the data bag
//! that the theme's template is rendered with.

pub mod config;
pub mod context;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod render;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;
pub mod tenant;

pub use config::{ConfigStore, SiteConfig, TenantConfig};
pub use context::RequestContext;
pub use error::{AppError, ConfigError, HandlerError, RenderError};
pub use extractors::ACCOUNT_ID_HEADER;
pub use handlers::{HandlerFuture, PageHandler, TOKEN_HEADER};
pub use render::{TemplateCache, TemplateHelpers, ERROR_TEMPLATE};
pub use routes::SiteRouter;
pub use service::{find_and_count, random, Pagination};
pub use sql::TableQuery;
pub use state::AppState;
pub use store::{connect, Db, Dialect};
pub use tenant::{resolve_tenant, ResolvedTenant};

//! Shared database handle: one `AnyPool` over the configured dialect.

use crate::config::DbConfig;
use crate::error::AppError;
use sqlx::any::AnyPoolOptions;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{AnyPool, ConnectOptions};
use std::sync::atomic::{AtomicU64, Ordering};

static MEMORY_DB_SEQ: AtomicU64 = AtomicU64::new(0);

/// Supported SQL backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Mysql,
    Postgres,
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "mysql" => Ok(Dialect::Mysql),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            _ => Err(format!(
                "unsupported database driver: {} (expected sqlite, mysql or postgres)",
                s
            )),
        }
    }
}

impl Dialect {
    /// Bind placeholder for the 1-based parameter `n`.
    pub fn placeholder(self, n: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", n),
            Dialect::Sqlite | Dialect::Mysql => "?".to_string(),
        }
    }

    pub fn quote_ident(self, name: &str) -> String {
        match self {
            Dialect::Mysql => format!("`{}`", name.replace('`', "``")),
            Dialect::Sqlite | Dialect::Postgres => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }

    pub fn random_fn(self) -> &'static str {
        match self {
            Dialect::Mysql => "RAND()",
            Dialect::Sqlite | Dialect::Postgres => "RANDOM()",
        }
    }
}

/// Connection URL for `cfg`, or `None` when no usable driver is configured.
pub fn connection_url(cfg: &DbConfig) -> Option<(Dialect, String)> {
    let dialect: Dialect = cfg.driver.parse().ok()?;
    let url = match dialect {
        Dialect::Sqlite => {
            if cfg.database.is_empty() {
                memory_url()
            } else {
                SqliteConnectOptions::new()
                    .filename(&cfg.database)
                    .create_if_missing(true)
                    .to_url_lossy()
                    .to_string()
            }
        }
        Dialect::Mysql => {
            let mut opts = sqlx::mysql::MySqlConnectOptions::new()
                .host(non_empty(&cfg.host).unwrap_or("localhost"))
                .username(&cfg.username)
                .database(&cfg.database)
                .charset("utf8mb4");
            if let Some(port) = parse_port(&cfg.port) {
                opts = opts.port(port);
            }
            if let Some(password) = non_empty(&cfg.password) {
                opts = opts.password(password);
            }
            opts.to_url_lossy().to_string()
        }
        Dialect::Postgres => {
            let mut opts = sqlx::postgres::PgConnectOptions::new()
                .host(non_empty(&cfg.host).unwrap_or("localhost"))
                .username(&cfg.username)
                .database(&cfg.database)
                .ssl_mode(sqlx::postgres::PgSslMode::Disable);
            if let Some(port) = parse_port(&cfg.port) {
                opts = opts.port(port);
            }
            if let Some(password) = non_empty(&cfg.password) {
                opts = opts.password(password);
            }
            opts.to_url_lossy().to_string()
        }
    };
    Some((dialect, url))
}

/// Named shared-cache in-memory database. The `Any` driver reparses the URL for
/// every new connection, so a bare `sqlite::memory:` would hand each one its own
/// empty database.
fn memory_url() -> String {
    let seq = MEMORY_DB_SEQ.fetch_add(1, Ordering::Relaxed);
    format!(
        "sqlite:file:tenant-pages-{}-{}?mode=memory&cache=shared",
        std::process::id(),
        seq
    )
}

fn is_memory_url(url: &str) -> bool {
    url.contains("mode=memory")
}

fn non_empty(s: &str) -> Option<&str> {
    Some(s).filter(|s| !s.is_empty())
}

fn parse_port(s: &str) -> Option<u16> {
    s.trim().parse().ok()
}

/// Long-lived pool shared by all requests; the driver's pool does the locking.
#[derive(Clone, Debug)]
pub struct Db {
    pool: AnyPool,
    dialect: Dialect,
    // Holds one connection open for the lifetime of an in-memory database.
    _anchor: Option<AnyPool>,
}

impl Db {
    pub fn new(pool: AnyPool, dialect: Dialect) -> Self {
        Db {
            pool,
            dialect,
            _anchor: None,
        }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Cheap liveness probe used by `/ready`.
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Open the pool described by `cfg`. `Ok(None)` when no driver is configured.
pub async fn connect(cfg: &DbConfig) -> Result<Option<Db>, AppError> {
    let Some((dialect, url)) = connection_url(cfg) else {
        if cfg.driver.is_empty() {
            tracing::info!("no database driver configured, skipping database");
        } else {
            tracing::warn!(driver = %cfg.driver, "unsupported database driver, skipping database");
        }
        return Ok(None);
    };
    sqlx::any::install_default_drivers();
    tracing::info!(?dialect, host = %cfg.host, database = %cfg.database, "connecting to database");
    if !is_memory_url(&url) {
        let pool = AnyPoolOptions::new().max_connections(5).connect(&url).await?;
        return Ok(Some(Db::new(pool, dialect)));
    }

    // The shared-cache database lives only while some connection has it open.
    let anchor = AnyPoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(&url)
        .await?;
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(&url)
        .await?;
    Ok(Some(Db {
        pool,
        dialect,
        _anchor: Some(anchor),
    }))
}

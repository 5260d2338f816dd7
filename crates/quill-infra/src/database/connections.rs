use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbConn, DbErr};

/// Stand-in for "no limit"; the pool only accepts finite durations.
const NEVER: Duration = Duration::from_secs(u32::MAX as u64);

/// Configuration for the blog database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Any URL SeaORM understands (`postgres://...`, `sqlite://...`, `sqlite::memory:`).
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    /// Age at which a pooled connection is closed and replaced.
    pub max_lifetime: Duration,
    /// Log every statement through sqlx.
    pub sqlx_logging: bool,
    /// Create missing tables from the entity definitions on startup.
    pub auto_create_schema: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 100,
            min_connections: 10,
            connect_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(30 * 60),
            sqlx_logging: true,
            auto_create_schema: false,
        }
    }

    /// A private in-memory SQLite database with its schema created on connect.
    ///
    /// Every connection to `sqlite::memory:` is its own database, so the pool
    /// is pinned to exactly one connection that is never recycled.
    pub fn in_memory() -> Self {
        Self {
            max_connections: 1,
            min_connections: 1,
            idle_timeout: NEVER,
            max_lifetime: NEVER,
            sqlx_logging: false,
            auto_create_schema: true,
            ..Self::new("sqlite::memory:")
        }
    }
}

/// Open the connection pool and, if configured, create the schema.
pub async fn connect(config: &DatabaseConfig) -> Result<DbConn, DbErr> {
    tracing::info!("Initializing database connection...");

    let opts = ConnectOptions::new(&config.url)
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .sqlx_logging(config.sqlx_logging)
        .to_owned();

    let db = Database::connect(opts).await?;
    tracing::info!(
        backend = ?db.get_database_backend(),
        pool = config.max_connections,
        "Database connected"
    );

    if config.auto_create_schema {
        super::schema::create_schema(&db).await?;
    }

    Ok(db)
}

//! Connection pool bootstrap and schema management for the SQLite store.
//!
//! Every pooled connection has `foreign_keys=ON` so that deleting a post or a
//! tag cascades to `post_tags`, and a busy timeout so that writers wait on the
//! database lock instead of failing immediately.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Result type returned by the bootstrap helpers.
pub type DbResult<T> = Result<T, DbError>;

/// Errors raised while building the pool or preparing the schema.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("migration error: {0}")]
    Migration(Box<dyn std::error::Error + Send + Sync>),
}

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

static MEMORY_DATABASES: AtomicUsize = AtomicUsize::new(0);

/// Pool sizing and timeout knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Maximum number of open connections.
    pub max_size: u32,
    /// Upper bound for checking out a connection and for waiting on a locked database.
    pub timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_size: 8,
            timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug)]
struct SqlitePragmas {
    busy_timeout: Duration,
    wal: bool,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        let mut pragmas = format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        );
        if self.wal {
            pragmas.push_str(" PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;");
        }

        conn.batch_execute(&pragmas)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url == ":memory:" || database_url.contains("mode=memory")
}

/// Every `:memory:` connection is its own private database, so a pool built
/// for it points all connections at one named shared-cache database instead.
fn pooled_database_url(database_url: &str) -> String {
    if database_url != ":memory:" {
        return database_url.to_string();
    }

    let n = MEMORY_DATABASES.fetch_add(1, Ordering::Relaxed);
    format!(
        "file:blog-posts-{}-{n}?mode=memory&cache=shared",
        std::process::id()
    )
}

/// Build an r2d2 pool for `database_url` with per-connection pragmas applied.
pub fn establish_connection_pool(database_url: &str, settings: &PoolSettings) -> DbResult<DbPool> {
    let in_memory = is_in_memory(database_url);
    let manager = ConnectionManager::<SqliteConnection>::new(pooled_database_url(database_url));
    let customizer = SqlitePragmas {
        busy_timeout: settings.timeout,
        wal: !in_memory,
    };

    let mut builder = Pool::builder()
        .max_size(settings.max_size)
        .connection_timeout(settings.timeout)
        .connection_customizer(Box::new(customizer));
    if in_memory {
        // The shared in-memory database is dropped with its last connection.
        builder = builder.idle_timeout(None).max_lifetime(None);
    }

    let pool = builder.build(manager)?;

    Ok(pool)
}

/// Apply any pending embedded migrations, creating `posts`, `tags` and
/// `post_tags` on a fresh database.
///
/// Safe to run on every start; applied migrations and existing rows are left untouched.
pub fn ensure_schema(conn: &mut SqliteConnection) -> DbResult<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(DbError::Migration)?;

    if applied.is_empty() {
        log::debug!("database schema up to date");
    } else {
        log::info!("applied {} database migration(s)", applied.len());
    }
    Ok(())
}

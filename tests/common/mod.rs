//! Helpers for integration tests.
#![allow(dead_code)]

use blog_posts::db::{DbPool, PoolSettings, ensure_schema, establish_connection_pool};
use blog_posts::repository::DieselRepository;
use tempfile::TempDir;

/// Temporary SQLite database with the schema applied.
pub struct TestDb {
    pool: DbPool,
    // Dropped after the pool so no connection outlives the files.
    dir: TempDir,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir.");
        let path = dir.path().join(filename);
        let url = path.to_str().expect("Temp path is not UTF-8.").to_string();

        let pool = establish_connection_pool(&url, &PoolSettings::default())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        ensure_schema(&mut conn).expect("Schema bootstrap failed");

        TestDb { pool, dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }
}

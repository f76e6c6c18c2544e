//! Shared database harness for integration tests.

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use cardstock::db::{DbPool, establish_connection_pool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Throwaway SQLite database: migrated on creation, deleted on drop along
/// with the sidecar files WAL mode leaves next to it.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        remove_db_files(filename); // stale files from an aborted run

        let pool = establish_connection_pool(filename).expect("Failed to open test database.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");

        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        remove_db_files(&self.filename);
    }
}

fn remove_db_files(filename: &str) {
    std::fs::remove_file(filename).ok();
    std::fs::remove_file(format!("{filename}-shm")).ok();
    std::fs::remove_file(format!("{filename}-wal")).ok();
}

use diesel::r2d2::{self, ConnectionManager};
use diesel::sqlite::SqliteConnection;

/// Shared r2d2 pool over SQLite connections.
pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
/// Single pooled connection handed out by [`DbPool`].
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

/// Build a connection pool for the given SQLite database URL.
///
/// WAL mode and a busy timeout are applied to every new connection so
/// concurrent workers do not trip over SQLite's default locking.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, r2d2::PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    r2d2::Pool::builder()
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)
}

#[derive(Debug)]
struct ConnectionOptions;

impl r2d2::CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        use diesel::connection::SimpleConnection;

        conn.batch_execute(
            "PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000; PRAGMA foreign_keys = ON;",
        )
        .map_err(r2d2::Error::QueryError)
    }
}

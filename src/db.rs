//! Database connection helpers.
//!
//! Wraps the Diesel r2d2 pool used by the directory. Connections are tuned for
//! a read-mostly SQLite file: WAL so readers never block on the seeding
//! writer, foreign keys so specialty rows cannot outlive their advocate. Every
//! connection also gets the `fold_case` function the search term relies on.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::expression::functions::declare_sql_function;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection};
use diesel::sql_types::Text;
use diesel::sqlite::SqliteConnection;
use log::error;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

#[declare_sql_function]
extern "SQL" {
    /// Unicode lowercase. SQLite's own `lower` and `LIKE` only fold ASCII.
    fn fold_case(value: Text) -> Text;
}

/// Installs the application SQL functions on `conn`.
pub fn register_functions(conn: &mut SqliteConnection) -> diesel::QueryResult<()> {
    fold_case_utils::register_impl(conn, |value: String| value.to_lowercase())
}

#[derive(Debug)]
/// Per-connection setup applied each time the pool opens a connection.
pub struct ConnectionOptions {
    pub enable_wal: bool,
    pub enable_foreign_keys: bool,
    /// How long a reader waits on the seeding writer's lock.
    pub busy_timeout: Option<Duration>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            enable_wal: true,
            enable_foreign_keys: true,
            busy_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ConnectionOptions {
    fn pragmas(&self) -> String {
        let mut pragmas = String::new();
        if self.enable_wal {
            pragmas.push_str("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;");
        }
        if self.enable_foreign_keys {
            pragmas.push_str("PRAGMA foreign_keys = ON;");
        }
        if let Some(timeout) = self.busy_timeout {
            pragmas.push_str(&format!("PRAGMA busy_timeout = {};", timeout.as_millis()));
        }
        pragmas
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&self.pragmas())
            .and_then(|()| register_functions(conn))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create a Diesel connection pool holding at most `max_size` connections.
pub fn establish_connection_pool(database_url: &str, max_size: u32) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size.max(1))
        .connection_customizer(Box::new(ConnectionOptions::default()))
        .build(manager)
}

/// Retrieve a connection from the pool
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, PoolError> {
    pool.get().inspect_err(|e| {
        error!("Failed to get connection from pool: {e}");
    })
}

#[cfg(test)]
mod tests {
    use diesel::prelude::*;

    use super::*;

    #[test]
    fn pragmas_follow_options() {
        let options = ConnectionOptions {
            enable_wal: false,
            enable_foreign_keys: true,
            busy_timeout: Some(Duration::from_millis(250)),
        };
        assert_eq!(
            options.pragmas(),
            "PRAGMA foreign_keys = ON;PRAGMA busy_timeout = 250;"
        );
    }

    #[test]
    fn fold_case_lowercases_beyond_ascii() {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();
        register_functions(&mut conn).unwrap();

        let folded = diesel::select(fold_case("ZÜRICH Straße"))
            .get_result::<String>(&mut conn)
            .unwrap();
        assert_eq!(folded, "zürich straße");
    }
}

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{debug, info};

use crate::config::DatabaseSettings;
use crate::error::{ShopError, ShopResult};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        configure(conn, self.busy_timeout).map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Per-connection pragmas. SQLite leaves foreign keys off unless asked.
pub fn configure(conn: &mut SqliteConnection, busy_timeout: Duration) -> diesel::QueryResult<()> {
    conn.batch_execute(&format!(
        "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
        busy_timeout.as_millis()
    ))
}

pub fn run_migrations(conn: &mut SqliteConnection) -> ShopResult<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| ShopError::Migration(e.to_string()))?;
    for version in applied {
        info!("applied migration {}", version);
    }
    Ok(())
}

/// The Entity Store: owns the connection pool from process start to shutdown.
pub struct Store {
    pool: DbPool,
}

impl Store {
    pub fn open(settings: &DatabaseSettings) -> ShopResult<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(&settings.url);
        let pool = Pool::builder()
            .max_size(settings.pool_size)
            .connection_customizer(Box::new(ConnectionOptions {
                busy_timeout: Duration::from_millis(settings.busy_timeout_ms),
            }))
            .build(manager)?;

        let store = Store { pool };
        run_migrations(&mut *store.conn()?)?;
        info!(url = %settings.url, pool_size = settings.pool_size, "store opened");
        Ok(store)
    }

    pub fn conn(&self) -> ShopResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    pub fn close(self) {
        debug!(idle = self.pool.state().idle_connections, "closing store");
        drop(self.pool);
        info!("store closed");
    }
}

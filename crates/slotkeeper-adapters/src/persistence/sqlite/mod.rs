mod availability;
mod booking;
mod event;
mod service;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use slotkeeper_ports::error::PortError;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
/// How long a write waits for other connections, including other processes,
/// to release the database.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct SqliteDb {
    pool: SqlitePool,
}

impl SqliteDb {
    pub async fn new(url: &str) -> Result<Self, PortError> {
        Self::connect(url, DEFAULT_MAX_CONNECTIONS).await
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, PortError> {
        // Every connection to an in-memory database opens a separate database.
        let max_connections = if url.contains(":memory:") {
            1
        } else {
            max_connections.max(1)
        };

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| PortError::Connection(e.to_string()))?
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| PortError::Connection(e.to_string()))?;

        let db = Self { pool };
        db.init_schema().await?;
        debug!(max_connections, "sqlite schema ready");
        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), PortError> {
        let statements = [
            "CREATE TABLE IF NOT EXISTS availability_rules (
                id TEXT PRIMARY KEY,
                provider_id TEXT NOT NULL,
                weekday INTEGER NOT NULL,
                active INTEGER NOT NULL,
                data TEXT NOT NULL
            )",
            "CREATE INDEX IF NOT EXISTS idx_availability_rules_provider_day
             ON availability_rules(provider_id, weekday)",
            "CREATE TABLE IF NOT EXISTS services (
                id TEXT PRIMARY KEY,
                provider_id TEXT NOT NULL,
                data TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS bookings (
                id TEXT PRIMARY KEY,
                provider_id TEXT NOT NULL,
                client_id TEXT NOT NULL,
                date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                status TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            "CREATE INDEX IF NOT EXISTS idx_bookings_provider_date
             ON bookings(provider_id, date, status)",
            "CREATE INDEX IF NOT EXISTS idx_bookings_client ON bookings(client_id)",
            "CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                event_type TEXT NOT NULL,
                booking_id TEXT NOT NULL,
                data TEXT NOT NULL,
                occurred_at TEXT NOT NULL
            )",
        ];

        for sql in statements {
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|e| PortError::Persistence(e.to_string()))?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

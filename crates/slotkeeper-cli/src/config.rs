use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://slotkeeper.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug)]
pub struct CliConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("SLOTKEEPER_DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_connections: env::var("SLOTKEEPER_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
        }
    }

    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.database_url = url;
        }
        self
    }
}

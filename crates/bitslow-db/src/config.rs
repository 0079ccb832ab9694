use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL (the database file is created if missing)
    #[serde(default = "default_url")]
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_url() -> String {
    "sqlite://bitslow.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("DATABASE_URL").unwrap_or_else(|_| default_url()),
            max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_max_connections),
            min_connections: std::env::var("DATABASE_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_min_connections),
            connect_timeout_secs: std::env::var("DATABASE_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_connect_timeout),
            idle_timeout_secs: std::env::var("DATABASE_IDLE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_idle_timeout),
        }
    }
}

/// Configuration for the startup seeder
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Seed synthetic data on startup (default: true)
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,

    /// Number of clients to create (default: 5)
    #[serde(default = "default_client_count")]
    pub client_count: usize,

    /// Number of coins to mint (default: 10)
    #[serde(default = "default_coin_count")]
    pub coin_count: usize,

    /// Number of transfers between clients, on top of the mints (default: 20)
    #[serde(default = "default_transaction_count")]
    pub transaction_count: usize,

    /// Wipe all tables before seeding (default: true)
    #[serde(default = "default_clear_existing")]
    pub clear_existing: bool,
}

fn default_seed_enabled() -> bool {
    true
}

fn default_client_count() -> usize {
    5
}

fn default_coin_count() -> usize {
    10
}

fn default_transaction_count() -> usize {
    20
}

fn default_clear_existing() -> bool {
    true
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_seed_enabled(),
            client_count: default_client_count(),
            coin_count: default_coin_count(),
            transaction_count: default_transaction_count(),
            clear_existing: default_clear_existing(),
        }
    }
}

impl SeedConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var("SEED_ENABLED")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or_else(|_| default_seed_enabled()),
            client_count: std::env::var("SEED_CLIENT_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_client_count),
            coin_count: std::env::var("SEED_COIN_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_coin_count),
            transaction_count: std::env::var("SEED_TRANSACTION_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_transaction_count),
            clear_existing: std::env::var("SEED_CLEAR_EXISTING")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or_else(|_| default_clear_existing()),
        }
    }
}

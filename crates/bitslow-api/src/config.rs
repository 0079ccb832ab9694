use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS (any origin, method and header)
    #[serde(default = "default_cors")]
    pub cors_enabled: bool,

    /// Client id used as buyer when a request carries no `X-User-Id` header
    #[serde(default = "default_buyer_id")]
    pub default_buyer_id: i64,

    /// Expose `GET /api/debug/users`
    #[serde(default)]
    pub debug_endpoints: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_cors() -> bool {
    true
}

fn default_buyer_id() -> i64 {
    1
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: default_cors(),
            default_buyer_id: default_buyer_id(),
            debug_endpoints: false,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| default_host()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_port),
            cors_enabled: std::env::var("API_CORS_ENABLED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_cors),
            default_buyer_id: std::env::var("API_DEFAULT_BUYER_ID")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_buyer_id),
            debug_endpoints: std::env::var("API_DEBUG_ENDPOINTS")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

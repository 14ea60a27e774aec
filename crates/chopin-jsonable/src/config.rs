use std::net::SocketAddr;

use crate::detect::{ConfiguredDetector, DetectorError, XRequestedWith};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL (e.g. sqlite::memory:, postgres://...)
    pub database_url: String,

    /// Server host (default: 127.0.0.1)
    pub server_host: String,

    /// Server port (default: 3000)
    pub server_port: u16,

    /// Environment: development, production, test
    pub environment: String,

    /// Header that marks a request as asynchronous (default: X-Requested-With)
    pub ajax_header: String,

    /// Value the header must carry (default: XMLHttpRequest)
    pub ajax_header_value: String,

    /// Also treat `Accept: application/json` requests as asynchronous
    pub ajax_accepts_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables (with .env support).
    pub fn from_env() -> Self {
        // Load .env file if present (ignore errors if missing)
        let _ = dotenvy::dotenv();

        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Config {
            database_url: var("DATABASE_URL", "sqlite::memory:"),
            server_host: var("SERVER_HOST", "127.0.0.1"),
            server_port: var("SERVER_PORT", "3000").parse().unwrap_or(3000),
            environment: var("ENVIRONMENT", "development"),
            ajax_header: var("AJAX_HEADER", XRequestedWith::DEFAULT_HEADER),
            ajax_header_value: var("AJAX_HEADER_VALUE", XRequestedWith::DEFAULT_VALUE),
            ajax_accepts_json: matches!(
                var("AJAX_ACCEPTS_JSON", "false").to_lowercase().as_str(),
                "true" | "1" | "yes"
            ),
        }
    }

    pub fn is_dev(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.server_addr().parse()
    }

    /// The request classifier described by the `AJAX_*` settings.
    pub fn detector(&self) -> Result<ConfiguredDetector, DetectorError> {
        Ok(ConfiguredDetector {
            header: XRequestedWith::matching(&self.ajax_header, &self.ajax_header_value)?,
            accepts_json: self.ajax_accepts_json,
        })
    }
}

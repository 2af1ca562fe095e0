// src/config.rs

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

// A struct to hold all client configuration, loaded once at startup from the
// .env file. Never mutated after construction.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the MCP gateway. The health probe hits `{base}/health`,
    /// JSON-RPC requests are POSTed to `{base}/rpc`.
    pub base_url: Url,

    // Request settings
    pub request_timeout: Duration,
    pub connect_retry_attempts: u32,
    pub connect_retry_delay: Duration,

    // Admission and caching
    pub rate_limit_per_minute: u32,
    pub rate_limit_window: Duration,
    pub cache_ttl: Duration,

    /// Network identifier sent with every operation unless the caller
    /// supplies one explicitly.
    pub default_network: String,

    pub debug: bool,
}

impl ClientConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        // The gateway URL is the one value with no fallback
        let base_url_str = env::var("MCP_SERVER_URL")
            .context("MCP_SERVER_URL must be set to the gateway base URL")?;
        let base_url = Url::parse(&base_url_str).context("MCP_SERVER_URL is not a valid URL")?;

        let request_timeout_ms = env::var("REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".to_string())
            .parse::<u64>()
            .context("REQUEST_TIMEOUT_MS must be a valid number")?;

        let connect_retry_attempts = env::var("CONNECT_RETRY_ATTEMPTS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u32>()
            .context("CONNECT_RETRY_ATTEMPTS must be a valid number")?;

        let connect_retry_delay_ms = env::var("CONNECT_RETRY_DELAY_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse::<u64>()
            .context("CONNECT_RETRY_DELAY_MS must be a valid number")?;

        let rate_limit_per_minute = env::var("RATE_LIMIT_PER_MINUTE")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u32>()
            .context("RATE_LIMIT_PER_MINUTE must be a valid number")?;

        let cache_ttl_seconds = env::var("CACHE_TTL_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("CACHE_TTL_SECONDS must be a valid number")?;

        let debug = env::var("DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(ClientConfig {
            base_url,
            request_timeout: Duration::from_millis(request_timeout_ms),
            connect_retry_attempts,
            connect_retry_delay: Duration::from_millis(connect_retry_delay_ms),
            rate_limit_per_minute,
            rate_limit_window: Duration::from_secs(60),
            cache_ttl: Duration::from_secs(cache_ttl_seconds),
            default_network: env::var("DEFAULT_NETWORK").unwrap_or_else(|_| "sei".to_string()),
            debug,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: Url::parse("http://localhost:3001").expect("static URL"),
            request_timeout: Duration::from_secs(30),
            connect_retry_attempts: 3,
            connect_retry_delay: Duration::from_secs(1),
            rate_limit_per_minute: 60,
            rate_limit_window: Duration::from_secs(60),
            cache_ttl: Duration::from_secs(30),
            default_network: "sei".to_string(),
            debug: false,
        }
    }
}

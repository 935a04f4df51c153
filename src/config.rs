//! Server configuration

use serde::{Deserialize, Serialize};

/// Rate limit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable per-client rate limiting
    pub enabled: bool,

    /// Sustained requests per minute per client
    pub requests_per_minute: u32,

    /// Burst size
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: 10,
            burst_size: 10,
        }
    }
}

/// InnerTube client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeConfig {
    /// Base URL of the InnerTube API host
    pub base_url: String,

    /// Client name reported in the request context
    pub client_name: String,

    /// Client version reported in the request context
    pub client_version: String,

    /// Interface language (`hl`)
    pub language: String,

    /// User-Agent header for outbound requests
    pub user_agent: String,

    /// Timeout for each outbound request in seconds
    pub timeout_secs: u64,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            client_name: "WEB".to_string(),
            client_version: "2.20250626.01.00".to_string(),
            language: "en".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
                .to_string(),
            timeout_secs: 15,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log output format (pretty, json)
    pub log_format: String,

    /// Request header carrying the client IP, used as the rate limit key
    pub client_ip_header: String,

    /// Rate limit configuration
    pub rate_limit: RateLimitConfig,

    /// InnerTube client configuration
    pub youtube: YoutubeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_enabled: true,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            client_ip_header: "cf-connecting-ip".to_string(),
            rate_limit: RateLimitConfig::default(),
            youtube: YoutubeConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

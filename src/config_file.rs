//! Configuration file support
//!
//! Loads server configuration from TOML files. Every section except
//! `[server]` is optional and falls back to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{RateLimitConfig, ServerConfig, YoutubeConfig};
use crate::error::{Result, ServerError};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    pub server: ServerSettings,
    /// Rate limit settings
    pub rate_limit: Option<RateLimitSettings>,
    /// InnerTube client settings
    pub youtube: Option<YoutubeSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: Option<bool>,
    /// Header carrying the client IP
    pub client_ip_header: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Enable rate limiting
    pub enabled: Option<bool>,
    /// Requests per minute per client
    pub requests_per_minute: Option<u32>,
    /// Burst size
    pub burst_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeSettings {
    pub base_url: Option<String>,
    pub client_name: Option<String>,
    pub client_version: Option<String>,
    pub language: Option<String>,
    pub user_agent: Option<String>,
    /// Outbound request timeout in seconds
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let defaults = ServerConfig::default();
        Self {
            server: ServerSettings {
                host: defaults.host,
                port: defaults.port,
                cors_enabled: Some(defaults.cors_enabled),
                client_ip_header: Some(defaults.client_ip_header),
            },
            rate_limit: Some(RateLimitSettings {
                enabled: Some(defaults.rate_limit.enabled),
                requests_per_minute: Some(defaults.rate_limit.requests_per_minute),
                burst_size: Some(defaults.rate_limit.burst_size),
            }),
            youtube: Some(YoutubeSettings {
                base_url: Some(defaults.youtube.base_url),
                client_name: Some(defaults.youtube.client_name),
                client_version: Some(defaults.youtube.client_version),
                language: Some(defaults.youtube.language),
                user_agent: Some(defaults.youtube.user_agent),
                timeout_secs: Some(defaults.youtube.timeout_secs),
            }),
            logging: Some(LoggingSettings {
                level: defaults.log_level,
                format: Some(defaults.log_format),
            }),
        }
    }

    /// Convert to ServerConfig
    pub fn into_server_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();

        let rate_limit = match self.rate_limit {
            Some(r) => RateLimitConfig {
                enabled: r.enabled.unwrap_or(defaults.rate_limit.enabled),
                requests_per_minute: r
                    .requests_per_minute
                    .unwrap_or(defaults.rate_limit.requests_per_minute),
                burst_size: r.burst_size.unwrap_or(defaults.rate_limit.burst_size),
            },
            None => defaults.rate_limit,
        };

        let youtube = match self.youtube {
            Some(y) => {
                let d = defaults.youtube;
                YoutubeConfig {
                    base_url: y.base_url.unwrap_or(d.base_url),
                    client_name: y.client_name.unwrap_or(d.client_name),
                    client_version: y.client_version.unwrap_or(d.client_version),
                    language: y.language.unwrap_or(d.language),
                    user_agent: y.user_agent.unwrap_or(d.user_agent),
                    timeout_secs: y.timeout_secs.unwrap_or(d.timeout_secs),
                }
            }
            None => defaults.youtube,
        };

        let (log_level, log_format) = match self.logging {
            Some(l) => (l.level, l.format.unwrap_or(defaults.log_format)),
            None => (defaults.log_level, defaults.log_format),
        };

        ServerConfig {
            host: self.server.host,
            port: self.server.port,
            cors_enabled: self.server.cors_enabled.unwrap_or(defaults.cors_enabled),
            log_level,
            log_format,
            client_ip_header: self
                .server
                .client_ip_header
                .unwrap_or(defaults.client_ip_header),
            rate_limit,
            youtube,
        }
    }
}

/// Load the server configuration from `path`.
///
/// A missing file yields the defaults.
pub fn load<P: AsRef<Path>>(path: P) -> Result<ServerConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(ServerConfig::default());
    }

    Ok(ConfigFile::from_file(path)?.into_server_config())
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    ConfigFile::default_config().to_file(path)
}

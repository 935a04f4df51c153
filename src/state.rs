//! Application state
//!
//! Holds the server configuration and the two injected collaborators: the
//! video client and the rate limiter. Nothing else is shared between requests.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::limits::RateLimiter;
use crate::youtube::VideoClient;

pub struct AppState {
    pub config: ServerConfig,
    pub client: Arc<dyn VideoClient>,
    pub limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        client: Arc<dyn VideoClient>,
        limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            config,
            client,
            limiter,
        }
    }
}

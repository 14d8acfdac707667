use serde::Deserialize;

use bookmarkd_core::config::Config;

/// Social service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct SocialConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL. When unset the response cache is disabled.
    #[serde(default)]
    pub redis_url: Option<String>,
    /// TCP port for the HTTP server (default 3114). Env var: `SOCIAL_PORT`.
    #[serde(default = "default_social_port")]
    pub social_port: u16,
}

fn default_social_port() -> u16 {
    3114
}

impl Config for SocialConfig {}

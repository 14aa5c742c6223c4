use std::sync::Arc;

use crate::config::AggregatorConfig;

pub type SharedState = Arc<AppState>;

/// Where each request gets its configuration from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Re-read the process environment on every request.
    Env,
    /// Always use this configuration.
    Fixed(AggregatorConfig),
}

impl ConfigSource {
    pub fn load(&self) -> AggregatorConfig {
        match self {
            ConfigSource::Env => AggregatorConfig::from_env(),
            ConfigSource::Fixed(config) => config.clone(),
        }
    }
}

pub struct AppState {
    pub config: ConfigSource,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(config: ConfigSource, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }
}

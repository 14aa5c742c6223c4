use clap::Parser;
use std::time::Duration;
use tracing::warn;

/// Serves a live GREEN/YELLOW/RED verdict over service probes, CI and deployments.
#[derive(Parser, Debug, Clone)]
#[command(name = "deploy-health")]
pub struct CliArgs {
    /// Address to bind the HTTP server to
    #[arg(long = "host", default_value = DEFAULT_HOST)]
    pub host: String,

    /// HTTP port
    #[arg(short = 'p', long = "port", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

// Server constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8787;
pub const SERVICE_NAME: &str = "deploy-health";
pub const USER_AGENT: &str = concat!("deploy-health/", env!("CARGO_PKG_VERSION"));

// Budget constants
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 6000;
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 10_000;

// Provider constants
pub const DEFAULT_CI_BRANCH: &str = "main";
pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const VERCEL_API_BASE: &str = "https://api.vercel.com";
pub const DEFAULT_STAMP: &str = "no_stamp_set";

// Environment keys
pub const ENV_TIMEOUT_MS: &str = "HEALTH_TIMEOUT_MS";
pub const ENV_PROBES: &str = "HEALTH_PROBES";
pub const ENV_GH_OWNER: &str = "HEALTH_GH_OWNER";
pub const ENV_GH_REPO: &str = "HEALTH_GH_REPO";
pub const ENV_GH_BRANCH: &str = "HEALTH_GH_BRANCH";
pub const ENV_GH_TOKEN: &str = "HEALTH_GH_TOKEN";
pub const ENV_GH_API_BASE: &str = "HEALTH_GH_API_BASE";
pub const ENV_VERCEL_TOKEN: &str = "HEALTH_VERCEL_TOKEN";
pub const ENV_VERCEL_PROJECT_ID: &str = "HEALTH_VERCEL_PROJECT_ID";
pub const ENV_VERCEL_TEAM_ID: &str = "HEALTH_VERCEL_TEAM_ID";
pub const ENV_VERCEL_API_BASE: &str = "HEALTH_VERCEL_API_BASE";
pub const ENV_PROVIDER_TIMEOUT_MS: &str = "HEALTH_PROVIDER_TIMEOUT_MS";
pub const ENV_STAMP: &str = "HEALTH_STAMP";

/// GitHub Actions coordinates for the CI adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct GithubConfig {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: String,
    pub token: Option<String>,
    pub api_base: String,
}

/// Vercel credential and scoping for the deployment adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct VercelConfig {
    pub token: Option<String>,
    pub project_id: Option<String>,
    pub team_id: Option<String>,
    pub api_base: String,
}

/// Everything one aggregate report needs. Loaded fresh per request and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorConfig {
    pub probe_timeout: Duration,
    pub provider_timeout: Duration,
    /// Raw `name=url;name=url` list, resolved by [`crate::targets::resolve_targets`].
    pub probes: Option<String>,
    pub github: GithubConfig,
    pub vercel: VercelConfig,
    pub stamp: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AggregatorConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).and_then(non_empty);

        AggregatorConfig {
            probe_timeout: millis_or(get(ENV_TIMEOUT_MS), ENV_TIMEOUT_MS, DEFAULT_PROBE_TIMEOUT_MS),
            provider_timeout: millis_or(
                get(ENV_PROVIDER_TIMEOUT_MS),
                ENV_PROVIDER_TIMEOUT_MS,
                DEFAULT_PROVIDER_TIMEOUT_MS,
            ),
            probes: get(ENV_PROBES),
            github: GithubConfig {
                owner: get(ENV_GH_OWNER),
                repo: get(ENV_GH_REPO),
                branch: get(ENV_GH_BRANCH).unwrap_or_else(|| DEFAULT_CI_BRANCH.to_string()),
                token: get(ENV_GH_TOKEN),
                api_base: get(ENV_GH_API_BASE).unwrap_or_else(|| GITHUB_API_BASE.to_string()),
            },
            vercel: VercelConfig {
                token: get(ENV_VERCEL_TOKEN),
                project_id: get(ENV_VERCEL_PROJECT_ID),
                team_id: get(ENV_VERCEL_TEAM_ID),
                api_base: get(ENV_VERCEL_API_BASE).unwrap_or_else(|| VERCEL_API_BASE.to_string()),
            },
            stamp: get(ENV_STAMP).unwrap_or_else(|| DEFAULT_STAMP.to_string()),
        }
    }

    pub fn probe_timeout_ms(&self) -> u64 {
        self.probe_timeout.as_millis() as u64
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a positive millisecond budget, falling back to `default_ms` on garbage or zero.
fn millis_or(raw: Option<String>, key: &str, default_ms: u64) -> Duration {
    let Some(raw) = raw else {
        return Duration::from_millis(default_ms);
    };
    match raw.parse::<u64>() {
        Ok(ms) if ms > 0 => Duration::from_millis(ms),
        _ => {
            warn!("Ignoring invalid {}={:?}, using {}ms", key, raw, default_ms);
            Duration::from_millis(default_ms)
        }
    }
}

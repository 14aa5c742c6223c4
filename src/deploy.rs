//! Vercel status of the most recent deployment.

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use crate::config::VercelConfig;
use crate::error::SourceError;
use crate::upstream::{api_url, bypass_caches, present, with_deadline};

const PROVIDER: &str = "vercel";

/// Deployment state. Unrecognized values are kept verbatim for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployState {
    Ready,
    Building,
    Error,
    Canceled,
    Queued,
    /// Sentinel: no reading was possible.
    Unknown,
    /// Sentinel: the provider could not be queried.
    Failed,
    Other(String),
}

impl DeployState {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "READY" => DeployState::Ready,
            "BUILDING" => DeployState::Building,
            "ERROR" => DeployState::Error,
            "CANCELED" => DeployState::Canceled,
            "QUEUED" => DeployState::Queued,
            "unknown" => DeployState::Unknown,
            "error" => DeployState::Failed,
            other => DeployState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DeployState::Ready => "READY",
            DeployState::Building => "BUILDING",
            DeployState::Error => "ERROR",
            DeployState::Canceled => "CANCELED",
            DeployState::Queued => "QUEUED",
            DeployState::Unknown => "unknown",
            DeployState::Failed => "error",
            DeployState::Other(s) => s,
        }
    }
}

impl Serialize for DeployState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployStatus {
    pub provider: &'static str,
    pub ok: bool,
    pub state: DeployState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeployStatus {
    /// Only a `READY` deployment counts as healthy.
    pub fn from_deployment(deployment: Deployment) -> Self {
        let state = DeployState::parse(
            present(deployment.state)
                .or(present(deployment.ready_state))
                .as_deref()
                .unwrap_or("unknown"),
        );

        DeployStatus {
            provider: PROVIDER,
            ok: state == DeployState::Ready,
            state,
            created_at: deployment.created_at,
            url: present(deployment.url).map(|host| format!("https://{}", host)),
            error: None,
        }
    }

    pub fn from_error(err: &SourceError) -> Self {
        DeployStatus {
            provider: PROVIDER,
            ok: false,
            state: if err.is_unknown() {
                DeployState::Unknown
            } else {
                DeployState::Failed
            },
            created_at: None,
            url: None,
            error: Some(err.to_string()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeploymentsPage {
    #[serde(default)]
    pub deployments: Vec<Deployment>,
}

/// The subset of a Vercel deployment we report on.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub state: Option<String>,
    pub ready_state: Option<String>,
    pub created_at: Option<i64>,
    /// Bare hostname, without scheme.
    pub url: Option<String>,
}

/// Fetch and normalize the newest deployment. Never fails: errors come back inside the status.
pub async fn fetch_deploy_status(
    client: &reqwest::Client,
    config: &VercelConfig,
    budget: Duration,
) -> DeployStatus {
    match with_deadline(budget, latest_deployment(client, config)).await {
        Ok(deployment) => {
            let status = DeployStatus::from_deployment(deployment);
            debug!(state = status.state.as_str(), "deployment status fetched");
            status
        }
        Err(e) => {
            warn!("Deployment status unavailable: {}", e);
            DeployStatus::from_error(&e)
        }
    }
}

async fn latest_deployment(
    client: &reqwest::Client,
    config: &VercelConfig,
) -> Result<Deployment, SourceError> {
    let Some(token) = &config.token else {
        return Err(SourceError::MissingCredential);
    };

    let mut url = api_url(&config.api_base, "/v6/deployments")?;
    {
        let mut query = url.query_pairs_mut();
        if let Some(project_id) = &config.project_id {
            query.append_pair("projectId", project_id);
        }
        query.append_pair("limit", "1");
        if let Some(team_id) = &config.team_id {
            query.append_pair("teamId", team_id);
        }
    }

    let resp = bypass_caches(client.get(url))
        .header(ACCEPT, "application/json")
        .bearer_auth(token)
        .send()
        .await?;
    if !resp.status().is_success() {
        return Err(SourceError::Http {
            provider: "Vercel",
            status: resp.status().as_u16(),
        });
    }

    let page: DeploymentsPage = resp.json().await?;
    page.deployments
        .into_iter()
        .next()
        .ok_or(SourceError::Empty("No deployments found"))
}

//! GitHub Actions status for the configured branch.

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use crate::config::GithubConfig;
use crate::error::SourceError;
use crate::upstream::{api_url, bypass_caches, present, with_deadline};

const PROVIDER: &str = "github";

/// Lifecycle of a workflow run as GitHub reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Queued,
    InProgress,
    Completed,
    Unknown,
    Error,
    /// Anything else GitHub reports (`waiting`, `requested`, `pending`, ...).
    Other(String),
}

impl RunState {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "queued" => RunState::Queued,
            "in_progress" => RunState::InProgress,
            "completed" => RunState::Completed,
            "unknown" => RunState::Unknown,
            "error" => RunState::Error,
            other => RunState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RunState::Queued => "queued",
            RunState::InProgress => "in_progress",
            RunState::Completed => "completed",
            RunState::Unknown => "unknown",
            RunState::Error => "error",
            RunState::Other(s) => s,
        }
    }
}

/// Final verdict of a completed workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conclusion {
    Success,
    Failure,
    Cancelled,
    Skipped,
    Neutral,
    TimedOut,
    ActionRequired,
    Stale,
    StartupFailure,
    Unknown,
    Error,
    Other(String),
}

impl Conclusion {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "success" => Conclusion::Success,
            "failure" => Conclusion::Failure,
            "cancelled" => Conclusion::Cancelled,
            "skipped" => Conclusion::Skipped,
            "neutral" => Conclusion::Neutral,
            "timed_out" => Conclusion::TimedOut,
            "action_required" => Conclusion::ActionRequired,
            "stale" => Conclusion::Stale,
            "startup_failure" => Conclusion::StartupFailure,
            "unknown" => Conclusion::Unknown,
            "error" => Conclusion::Error,
            other => Conclusion::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Conclusion::Success => "success",
            Conclusion::Failure => "failure",
            Conclusion::Cancelled => "cancelled",
            Conclusion::Skipped => "skipped",
            Conclusion::Neutral => "neutral",
            Conclusion::TimedOut => "timed_out",
            Conclusion::ActionRequired => "action_required",
            Conclusion::Stale => "stale",
            Conclusion::StartupFailure => "startup_failure",
            Conclusion::Unknown => "unknown",
            Conclusion::Error => "error",
            Conclusion::Other(s) => s,
        }
    }
}

impl Serialize for RunState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl Serialize for Conclusion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CiStatus {
    pub provider: &'static str,
    pub ok: bool,
    #[serde(rename = "status")]
    pub run_state: RunState,
    pub conclusion: Conclusion,
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_number: Option<u64>,
    #[serde(rename = "url", skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CiStatus {
    /// Normalize the latest run. An unfinished run is provisionally healthy.
    pub fn from_run(branch: &str, run: WorkflowRun) -> Self {
        let run_state = RunState::parse(present(run.status).as_deref().unwrap_or("unknown"));
        let conclusion =
            Conclusion::parse(present(run.conclusion).as_deref().unwrap_or("unknown"));
        let ok = match run_state {
            RunState::Completed => conclusion == Conclusion::Success,
            _ => true,
        };

        CiStatus {
            provider: PROVIDER,
            ok,
            run_state,
            conclusion,
            branch: branch.to_string(),
            updated_at: present(run.updated_at).or(present(run.run_started_at)),
            run_number: run.run_number,
            detail_url: present(run.html_url),
            error: None,
        }
    }

    pub fn from_error(branch: &str, err: &SourceError) -> Self {
        let (run_state, conclusion) = if err.is_unknown() {
            (RunState::Unknown, Conclusion::Unknown)
        } else {
            (RunState::Error, Conclusion::Error)
        };

        CiStatus {
            provider: PROVIDER,
            ok: false,
            run_state,
            conclusion,
            branch: branch.to_string(),
            updated_at: None,
            run_number: None,
            detail_url: None,
            error: Some(err.to_string()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkflowRunsPage {
    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}

/// The subset of a GitHub workflow run we report on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowRun {
    pub status: Option<String>,
    pub conclusion: Option<String>,
    pub updated_at: Option<String>,
    pub run_started_at: Option<String>,
    pub run_number: Option<u64>,
    pub html_url: Option<String>,
}

/// Fetch and normalize the latest run. Never fails: errors come back inside the status.
pub async fn fetch_ci_status(
    client: &reqwest::Client,
    config: &GithubConfig,
    budget: Duration,
) -> CiStatus {
    match with_deadline(budget, latest_run(client, config)).await {
        Ok(run) => {
            let status = CiStatus::from_run(&config.branch, run);
            debug!(
                branch = %config.branch,
                run_state = status.run_state.as_str(),
                conclusion = status.conclusion.as_str(),
                "CI status fetched"
            );
            status
        }
        Err(e) => {
            warn!("CI status unavailable for branch {}: {}", config.branch, e);
            CiStatus::from_error(&config.branch, &e)
        }
    }
}

async fn latest_run(
    client: &reqwest::Client,
    config: &GithubConfig,
) -> Result<WorkflowRun, SourceError> {
    let (Some(owner), Some(repo)) = (&config.owner, &config.repo) else {
        return Err(SourceError::MissingConfiguration);
    };

    let mut url = api_url(
        &config.api_base,
        &format!("/repos/{}/{}/actions/runs", owner, repo),
    )?;
    url.query_pairs_mut()
        .append_pair("per_page", "1")
        .append_pair("branch", &config.branch);

    let mut request =
        bypass_caches(client.get(url)).header(ACCEPT, "application/vnd.github+json");
    if let Some(token) = &config.token {
        request = request.bearer_auth(token);
    }

    let resp = request.send().await?;
    if !resp.status().is_success() {
        return Err(SourceError::Http {
            provider: "GitHub",
            status: resp.status().as_u16(),
        });
    }

    let page: WorkflowRunsPage = resp.json().await?;
    page.workflow_runs
        .into_iter()
        .next()
        .ok_or(SourceError::Empty("No workflow runs found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(status: Option<&str>, conclusion: Option<&str>) -> WorkflowRun {
        WorkflowRun {
            status: status.map(String::from),
            conclusion: conclusion.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_completed_success_is_ok() {
        let status = CiStatus::from_run("main", run(Some("completed"), Some("success")));
        assert!(status.ok);
        assert_eq!(status.run_state, RunState::Completed);
        assert_eq!(status.conclusion, Conclusion::Success);
        assert!(status.error.is_none());
    }

    #[test]
    fn test_completed_failure_is_not_ok() {
        for conclusion in ["failure", "cancelled", "timed_out", "startup_failure"] {
            let status = CiStatus::from_run("main", run(Some("completed"), Some(conclusion)));
            assert!(!status.ok, "{} should not be ok", conclusion);
        }
    }

    #[test]
    fn test_in_flight_run_is_provisionally_ok() {
        for state in ["queued", "in_progress", "waiting"] {
            let status = CiStatus::from_run("main", run(Some(state), None));
            assert!(status.ok, "{} should be provisionally ok", state);
            assert_eq!(status.conclusion, Conclusion::Unknown);
        }
    }

    #[test]
    fn test_completed_without_conclusion_is_not_ok() {
        let status = CiStatus::from_run("main", run(Some("completed"), None));
        assert!(!status.ok);
        assert_eq!(status.conclusion, Conclusion::Unknown);
    }

    #[test]
    fn test_empty_fields_read_as_unknown() {
        let status = CiStatus::from_run("main", run(Some(""), Some("")));
        assert_eq!(status.run_state, RunState::Unknown);
        assert_eq!(status.conclusion, Conclusion::Unknown);
        assert!(status.ok);

        let status = CiStatus::from_run("main", run(Some("completed"), Some("")));
        assert_eq!(status.conclusion, Conclusion::Unknown);
        assert!(!status.ok);
    }

    #[test]
    fn test_empty_updated_at_falls_back_to_run_started_at() {
        let status = CiStatus::from_run(
            "main",
            WorkflowRun {
                status: Some("completed".into()),
                conclusion: Some("success".into()),
                updated_at: Some(String::new()),
                run_started_at: Some("2026-01-02T03:04:05Z".into()),
                html_url: Some(String::new()),
                ..Default::default()
            },
        );
        assert_eq!(status.updated_at.as_deref(), Some("2026-01-02T03:04:05Z"));
        assert!(status.detail_url.is_none());
    }

    #[test]
    fn test_updated_at_falls_back_to_run_started_at() {
        let run = WorkflowRun {
            status: Some("completed".into()),
            conclusion: Some("success".into()),
            run_started_at: Some("2026-01-02T03:04:05Z".into()),
            run_number: Some(88),
            html_url: Some("https://github.com/acme/site/actions/runs/1".into()),
            ..Default::default()
        };
        let status = CiStatus::from_run("main", run);
        assert_eq!(status.updated_at.as_deref(), Some("2026-01-02T03:04:05Z"));
        assert_eq!(status.run_number, Some(88));
    }

    #[test]
    fn test_error_sentinels() {
        let missing = CiStatus::from_error("main", &SourceError::MissingConfiguration);
        assert!(!missing.ok);
        assert_eq!(missing.run_state, RunState::Unknown);
        assert_eq!(missing.conclusion, Conclusion::Unknown);
        assert_eq!(missing.error.as_deref(), Some("missing configuration"));

        let http = CiStatus::from_error(
            "main",
            &SourceError::Http {
                provider: "GitHub",
                status: 500,
            },
        );
        assert_eq!(http.run_state, RunState::Error);
        assert_eq!(http.conclusion, Conclusion::Error);
        assert_eq!(http.error.as_deref(), Some("GitHub API HTTP 500"));
    }

    #[test]
    fn test_serializes_wire_names() {
        let status = CiStatus::from_run(
            "main",
            WorkflowRun {
                status: Some("completed".into()),
                conclusion: Some("success".into()),
                updated_at: Some("2026-01-02T03:04:05Z".into()),
                run_number: Some(7),
                html_url: Some("https://github.com/acme/site/actions/runs/9".into()),
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["provider"], "github");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["conclusion"], "success");
        assert_eq!(json["updatedAt"], "2026-01-02T03:04:05Z");
        assert_eq!(json["runNumber"], 7);
        assert_eq!(json["url"], "https://github.com/acme/site/actions/runs/9");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_unrecognized_state_round_trips_literally() {
        assert_eq!(RunState::parse("requested").as_str(), "requested");
        assert_eq!(Conclusion::parse("mystery").as_str(), "mystery");
    }
}

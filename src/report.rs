use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::ci::{fetch_ci_status, CiStatus};
use crate::classify::{classify, OverallStatus};
use crate::config::AggregatorConfig;
use crate::deploy::{fetch_deploy_status, DeployStatus};
use crate::prober::{probe_all, ProbeResult};
use crate::targets::resolve_targets;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    /// Composition time, epoch milliseconds.
    pub ts: i64,
    pub status: OverallStatus,
    pub timeout_ms: u64,
    pub results: Vec<ProbeResult>,
    pub ci: CiStatus,
    pub deploy: DeployStatus,
}

/// Probe everything once and fold the readings into a report.
///
/// The probe group and both provider adapters run concurrently and are joined once.
/// Each branch bounds itself, so this never waits longer than the slowest budget.
pub async fn compose_report(client: &reqwest::Client, config: &AggregatorConfig) -> AggregateReport {
    let targets = resolve_targets(config.probes.as_deref());

    let (results, ci, deploy) = tokio::join!(
        probe_all(client, &targets, config.probe_timeout),
        fetch_ci_status(client, &config.github, config.provider_timeout),
        fetch_deploy_status(client, &config.vercel, config.provider_timeout),
    );

    let status = classify(&results, ci.ok, deploy.ok);
    info!(
        status = ?status,
        probes_ok = results.iter().filter(|r| r.ok).count(),
        probes_total = results.len(),
        ci_ok = ci.ok,
        deploy_ok = deploy.ok,
        "Health report composed"
    );

    AggregateReport {
        ts: Utc::now().timestamp_millis(),
        status,
        timeout_ms: config.probe_timeout_ms(),
        results,
        ci,
        deploy,
    }
}

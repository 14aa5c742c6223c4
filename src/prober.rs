//! Bounded-time HTTP probes against the configured targets.

use std::time::{Duration, Instant};

use futures::future::join_all;
use serde::Serialize;
use tracing::debug;

use crate::error::SourceError;
use crate::targets::ProbeTarget;
use crate::upstream::{bypass_caches, with_deadline};

/// Outcome of probing one target. `status` or `error` is always set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub name: String,
    pub url: String,
    pub ok: bool,
    pub status: Option<u16>,
    #[serde(rename = "ms")]
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Probe a single target. Every outcome, failures included, comes back as a value.
pub async fn probe_one(
    client: &reqwest::Client,
    target: &ProbeTarget,
    budget: Duration,
) -> ProbeResult {
    let started = Instant::now();
    let request = bypass_caches(client.get(&target.url));

    let outcome = with_deadline(budget, async move {
        let resp = request.send().await?;
        Ok::<_, SourceError>(resp.status())
    })
    .await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(status) => {
            debug!(
                probe = %target.name,
                status = status.as_u16(),
                elapsed_ms,
                "probe completed"
            );
            ProbeResult {
                name: target.name.clone(),
                url: target.url.clone(),
                ok: status.is_success(),
                status: Some(status.as_u16()),
                elapsed_ms,
                error: None,
            }
        }
        Err(e) => {
            debug!(probe = %target.name, error = %e, elapsed_ms, "probe failed");
            ProbeResult {
                name: target.name.clone(),
                url: target.url.clone(),
                ok: false,
                status: None,
                elapsed_ms,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Probe every target concurrently. Results come back in target order.
pub async fn probe_all(
    client: &reqwest::Client,
    targets: &[ProbeTarget],
    budget: Duration,
) -> Vec<ProbeResult> {
    join_all(targets.iter().map(|t| probe_one(client, t, budget))).await
}

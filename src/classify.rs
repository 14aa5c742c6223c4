use serde::Serialize;

use crate::prober::ProbeResult;

/// Overall verdict across every probed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallStatus {
    Green,
    Yellow,
    Red,
}

/// Determine the overall status from probe outcomes and the two provider readings.
///
/// GREEN needs every source healthy, RED needs every source down; anything in
/// between is YELLOW. GREEN is checked first, so an empty probe list with both
/// providers healthy is GREEN.
pub fn classify(results: &[ProbeResult], ci_ok: bool, deploy_ok: bool) -> OverallStatus {
    let healthy = results.iter().filter(|r| r.ok).count();

    if healthy == results.len() && ci_ok && deploy_ok {
        OverallStatus::Green
    } else if healthy == 0 && !ci_ok && !deploy_ok {
        OverallStatus::Red
    } else {
        OverallStatus::Yellow
    }
}

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::report::compose_report;
use crate::routes::no_store_headers;
use crate::state::SharedState;

/// GET /status: live aggregate report. Always 200, degradation is carried in the body.
pub async fn status(State(state): State<SharedState>) -> impl IntoResponse {
    let config = state.config.load();
    let report = compose_report(&state.http_client, &config).await;
    (no_store_headers(), Json(report))
}

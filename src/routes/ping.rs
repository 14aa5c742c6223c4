use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::config::SERVICE_NAME;
use crate::routes::no_store_headers;
use crate::state::SharedState;

#[derive(Serialize)]
pub struct PingResponse {
    pub ok: bool,
    pub service: &'static str,
    pub utc: String,
    pub stamp: String,
}

/// GET /ping: liveness of this service only, touches no upstream.
pub async fn ping(State(state): State<SharedState>) -> impl IntoResponse {
    let body = PingResponse {
        ok: true,
        service: SERVICE_NAME,
        utc: Utc::now().to_rfc3339(),
        stamp: state.config.load().stamp,
    };
    (no_store_headers(), Json(body))
}

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Aggregate report
        .route("/status", get(crate::routes::status::status))
        // Liveness
        .route("/ping", get(crate::routes::ping::ping))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

//! Fake upstreams for integration tests: real axum servers on ephemeral ports.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CACHE_CONTROL};
use axum::http::{HeaderMap, HeaderName, StatusCode, Uri};
use axum::routing::{get, MethodRouter};
use axum::{Json, Router};
use serde_json::Value;

use deploy_health::config::AggregatorConfig;

/// Serve `router` on 127.0.0.1 and return its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing is listening on.
pub async fn refused_base() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub cache_control: Option<String>,
}

/// Records every request a fake route receives.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<SeenRequest>>>);

impl Recorder {
    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<SeenRequest> {
        self.0.lock().unwrap().last().cloned()
    }
}

/// A GET route that records the request and answers `status` with `body`.
pub fn recorded(recorder: &Recorder, status: StatusCode, body: Value) -> MethodRouter {
    let recorder = recorder.clone();
    get(move |uri: Uri, headers: HeaderMap| {
        let recorder = recorder.clone();
        let body = body.clone();
        async move {
            let header = |name: HeaderName| {
                headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(String::from)
            };
            recorder.0.lock().unwrap().push(SeenRequest {
                query: uri.query().map(String::from),
                authorization: header(AUTHORIZATION),
                cache_control: header(CACHE_CONTROL),
            });
            (status, Json(body))
        }
    })
}

/// A GET route that answers `status` with a plain body.
pub fn plain(status: StatusCode) -> MethodRouter {
    get(move || async move { (status, "hello") })
}

/// A GET route that answers only after `delay`.
pub fn slow(delay: Duration) -> MethodRouter {
    get(move || async move {
        tokio::time::sleep(delay).await;
        "late"
    })
}

/// Configuration pointing both providers at `base`, with nothing else set.
pub fn config_for(base: &str) -> AggregatorConfig {
    let mut config = AggregatorConfig::default();
    config.github.api_base = base.to_string();
    config.vercel.api_base = base.to_string();
    config
}

pub fn workflow_runs(status: &str, conclusion: Option<&str>) -> Value {
    serde_json::json!({
        "total_count": 1,
        "workflow_runs": [{
            "id": 1,
            "status": status,
            "conclusion": conclusion,
            "run_number": 42,
            "updated_at": "2026-10-19T08:00:00Z",
            "html_url": "https://github.com/acme/site/actions/runs/1"
        }]
    })
}

pub fn deployments(state: &str) -> Value {
    serde_json::json!({
        "deployments": [{
            "uid": "dpl_1",
            "state": state,
            "createdAt": 1_760_000_000_000i64,
            "url": "site-abc.vercel.app"
        }]
    })
}

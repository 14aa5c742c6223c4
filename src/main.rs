use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use deploy_health::config::{AggregatorConfig, CliArgs};
use deploy_health::server;
use deploy_health::state::{AppState, ConfigSource};
use deploy_health::targets::resolve_targets;
use deploy_health::upstream;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deploy_health=info,tower_http=info".into()),
        )
        .init();

    let args = CliArgs::parse();
    info!("Starting deploy-health v{}", env!("CARGO_PKG_VERSION"));

    // Configuration is re-read per request; this snapshot only feeds the startup log.
    let startup = AggregatorConfig::from_env();
    let targets = resolve_targets(startup.probes.as_deref());
    info!(
        "Probing {} target(s) with a {}ms budget",
        targets.len(),
        startup.probe_timeout_ms()
    );
    info!(
        "CI: {}",
        match (&startup.github.owner, &startup.github.repo) {
            (Some(owner), Some(repo)) => format!("{}/{}@{}", owner, repo, startup.github.branch),
            _ => "not configured".to_string(),
        }
    );
    info!(
        "Deployments: {}",
        if startup.vercel.token.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );

    let http_client = upstream::build_client()?;
    let state = Arc::new(AppState::new(ConfigSource::Env, http_client));

    let router = server::build_router(state);
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("deploy-health listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("deploy-health shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

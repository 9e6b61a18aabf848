use std::sync::Arc;

use staff_onboard::config::WizardConfig;
use staff_onboard::sessions::{SessionRegistry, spawn_prune_task};
use staff_onboard::submit::{HttpSubmissionSink, LoggingSink, SubmissionSink};
use staff_onboard::wizard::{WizardRouteState, wizard_routes};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = WizardConfig::from_env();

    eprintln!("📋 Staff Onboard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://0.0.0.0:{}/api/wizard", config.port);
    match &config.submit_url {
        Some(url) => eprintln!("   Submit endpoint: {url}"),
        None => eprintln!("   Submit endpoint: none (completed records are logged)"),
    }
    eprintln!(
        "   Sessions: pruned after {}s idle\n",
        config.session_idle_timeout.as_secs()
    );

    let sessions = SessionRegistry::new();

    let sink: Arc<dyn SubmissionSink> = match &config.submit_url {
        Some(url) => Arc::new(HttpSubmissionSink::new(url.clone())),
        None => Arc::new(LoggingSink),
    };

    // Spawn idle-session sweep
    let _prune_handle = spawn_prune_task(
        Arc::clone(&sessions),
        config.prune_interval,
        config.session_idle_timeout,
    );

    // The wizard is driven by a browser frontend, so CORS stays open.
    let app = wizard_routes(WizardRouteState { sessions, sink }).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Wizard REST server started");
    axum::serve(listener, app).await?;

    Ok(())
}

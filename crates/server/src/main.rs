//! Lead readiness scorer server entry point

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use lead_scorer_config::{load_settings, ScoringProfile, Settings};
use lead_scorer_crm::HttpCrmConnector;
use lead_scorer_llm::LlmClassifier;
use lead_scorer_server::{create_router, init_metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from files and environment.
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("LEAD_SCORER_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized, use eprintln for early logging
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&config);

    tracing::info!("Starting lead readiness scorer v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?config.environment,
        config_path = env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let _handle = init_metrics();
        tracing::info!("Initialized Prometheus metrics at /metrics");
    }

    let profile = load_profile(&config.profile_path);

    let mut state = AppState::new(config.clone(), profile)
        .context("failed to build application state")?;

    if config.llm.enabled {
        let classifier = LlmClassifier::new(config.llm.clone())
            .context("failed to initialize LLM classifier")?;
        tracing::info!(model = %classifier.model(), "LLM classification enabled");
        state = state.with_llm(Arc::new(classifier));
    }

    if config.crm.enabled {
        let connector = HttpCrmConnector::new(config.crm.clone())
            .context("failed to initialize CRM connector")?;
        tracing::info!(endpoint = %config.crm.endpoint, "CRM updates enabled");
        state = state.with_crm(Arc::new(connector));
    }

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Load the scoring profile, falling back to the canonical defaults when no
/// file is present.
fn load_profile(path: &str) -> ScoringProfile {
    if Path::new(path).exists() {
        match ScoringProfile::load(path) {
            Ok(profile) => {
                tracing::info!(path = %path, "Loaded scoring profile");
                return profile;
            }
            Err(e) => {
                tracing::error!(path = %path, error = %e, "Failed to load scoring profile, using defaults");
            }
        }
    } else {
        tracing::info!(path = %path, "No scoring profile file, using defaults");
    }
    ScoringProfile::default()
}

/// Initialize tracing from the observability config
fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("{},tower_http=info", level).into()
    });

    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

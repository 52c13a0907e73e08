mod analysis;
mod config;
mod errors;
mod export;
mod extract;
mod generation;
mod llm_client;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{GenerationSettings, LlmClient};
use crate::routes::build_router;
use crate::session::store::{run_sweeper, SessionStore};
use crate::session::workflow::Assistant;
use crate::state::AppState;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Assistant API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.groq_api_url.clone(), config.groq_api_key.clone())?;
    let settings = GenerationSettings {
        model: config.groq_model.clone(),
        temperature: config.temperature,
    };
    info!(
        "LLM client initialized (model: {}, temperature: {})",
        settings.model, settings.temperature
    );

    // Session registry with idle expiry
    let idle_ttl = chrono::Duration::seconds(i64::from(config.session_ttl_secs));
    let sessions = SessionStore::new(idle_ttl);
    tokio::spawn(run_sweeper(sessions.clone(), SESSION_SWEEP_INTERVAL));
    info!("Sessions expire after {}s idle", config.session_ttl_secs);

    // Build app state
    let state = AppState {
        sessions,
        assistant: Arc::new(Assistant::new(Arc::new(llm), settings)),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

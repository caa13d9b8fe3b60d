//! Job Agent: evidence-backed job application drafting service
//!
//! This is the main entry point for the application.

use anyhow::Result;
use job_agent::{
    agent::Agent,
    config::{self, Settings},
    engines::EngineLoader,
    evidence::EvidenceCollector,
    llm::GeminiClient,
    mail::SmtpMailer,
    network::{HttpClient, PageFetcher},
    search::Search,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = config::load()?;

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting Job Agent v{}", job_agent::VERSION);

    let state = build_state(&settings)?;
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wire every component from its settings section
fn build_state(settings: &Settings) -> Result<AppState> {
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    let registry = Arc::new(EngineLoader::load(&settings.providers));
    info!(
        "Loaded {} search providers: {}",
        registry.len(),
        registry.names().join(", ")
    );

    let search =
        Search::new(client.clone(), registry.clone()).with_settings(settings.search.clone());
    let pages =
        PageFetcher::new(client.clone()).with_max_chars(settings.evidence.max_page_chars);
    let collector = EvidenceCollector::new(
        Arc::new(search),
        Arc::new(pages),
        settings.evidence.clone(),
    );

    if settings.llm.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
        warn!("GEMINI_API_KEY is not set; /apply will fail until it is configured");
    }
    let model = GeminiClient::new(client, settings.llm.clone())?;
    info!("Language model: {}", model.model());

    let agent = Agent::new(Arc::new(collector), Arc::new(model), settings.agent.clone());
    let mailer = Arc::new(SmtpMailer::new(settings.smtp.clone())?);

    Ok(AppState::new(agent, mailer, registry))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

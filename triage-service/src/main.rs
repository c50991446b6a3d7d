use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triage_service::{AppState, RigGateway, ServiceConfig, TriageConfig, create_app};

/// Structured JSON logs by default; `LOG_FORMAT=pretty` for development.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "triage_service=debug,tower_http=debug".into());

    match log_format.as_str() {
        "pretty" => {
            // Human-readable multi-line output for local runs
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        _ => {
            // One JSON object per event, carrying the request span's correlation_id
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // One gateway and engine shared by every request; turns carry their own state
    let gateway = Arc::new(RigGateway::from_config(&config));
    let app = create_app(AppState::new(gateway, TriageConfig::default()));

    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    let addr = listener.local_addr()?;

    info!(model = %config.model, "Symptom Triage Service starting on {}", addr);
    info!("Conversation endpoint: POST http://{}/api/conversation", addr);
    info!("Translation endpoint: POST http://{}/api/translate_report", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

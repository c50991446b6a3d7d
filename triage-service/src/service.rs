use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{Next, from_fn},
    response::{Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info};
use uuid::Uuid;

use crate::{
    config::TriageConfig,
    gateway::LlmGateway,
    models::{TranslateRequest, TranslateResponse, TurnRequest, TurnResult},
    translator::ReportTranslator,
    workflow::DecisionEngine,
};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn internal_error(message: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub engine: DecisionEngine,
    pub translator: ReportTranslator,
}

impl AppState {
    pub fn new(gateway: Arc<dyn LlmGateway>, config: TriageConfig) -> Self {
        Self {
            engine: DecisionEngine::new(gateway.clone(), config.clone()),
            translator: ReportTranslator::new(gateway, config),
        }
    }
}

pub fn create_app(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/conversation", post(conversation))
        .route("/api/translate_report", post(translate_report))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Tags every request span with a fresh correlation id and echoes it back in
/// the `x-correlation-id` response header.
async fn correlation_id_middleware(mut request: Request, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let header = HeaderValue::from_str(&correlation_id).ok();

    if let Some(value) = &header {
        request.headers_mut().insert("x-correlation-id", value.clone());
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    let mut response = next.run(request).instrument(span).await;

    if let Some(value) = header {
        response.headers_mut().insert("x-correlation-id", value);
    }
    response
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Symptom Triage Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Stateless multi-turn symptom triage with approval-gated reports",
        "endpoints": {
            "POST /api/conversation": "Run one triage turn",
            "POST /api/translate_report": "Translate a finished report",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn conversation(
    State(state): State<AppState>,
    Json(request): Json<TurnRequest>,
) -> ApiResult<TurnResult> {
    info!(
        history_len = request.history.len(),
        lang = %request.lang,
        approval = ?request.approval,
        refusal_times = request.refusal_times,
        "Received conversation turn"
    );

    match state.engine.decide(&request).await {
        Ok(result) => {
            info!(
                confidence_level = result.confidence_level,
                needs_approval = result.needs_approval,
                done = result.done,
                "Turn completed"
            );
            Ok(Json(result))
        }
        Err(e) => {
            error!("Turn failed: {}", e);
            Err(internal_error(&e.to_string()))
        }
    }
}

async fn translate_report(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> ApiResult<TranslateResponse> {
    info!(target_lang = %request.target_lang, "Received report translation request");

    state.translator.translate(&request).await.map(Json).map_err(|e| {
        error!("Translation failed: {}", e);
        internal_error(&e.to_string())
    })
}

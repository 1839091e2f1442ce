use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use mt_bridge::{
    BlockingService, BridgeError, ByteRange, ResponseOptions, ResponseView, SentenceAlignment,
    ServiceConfig, TranslationModel,
};

const ADDR_ENV_VAR: &str = "MT_BRIDGE_ADDR";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Serialize, Deserialize)]
pub struct TranslateRequest {
    pub model: String,
    pub texts: Vec<String>,
    #[serde(default)]
    pub options: Option<Vec<ResponseOptions>>,
}

#[derive(Serialize, Deserialize)]
pub struct PivotRequest {
    pub first: String,
    pub second: String,
    pub texts: Vec<String>,
    #[serde(default)]
    pub options: Option<Vec<ResponseOptions>>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct SentencePair {
    pub source: ByteRange,
    pub target: ByteRange,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TranslatedText {
    pub original: String,
    pub translated: String,
    pub sentences: Vec<SentencePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignments: Option<Vec<SentenceAlignment>>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ModelInfo {
    pub name: String,
    pub source: String,
    pub target: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BlockingService>,
    pub models: Arc<HashMap<String, Arc<TranslationModel>>>,
}

impl AppState {
    pub fn from_config(config: ServiceConfig) -> Result<Self, BridgeError> {
        let models = config.build_models()?;
        Ok(Self {
            service: Arc::new(BlockingService::new(config)),
            models: Arc::new(models),
        })
    }

    fn model(&self, name: &str) -> Result<Arc<TranslationModel>, ApiError> {
        self.models.get(name).cloned().ok_or_else(|| {
            api_error(
                StatusCode::NOT_FOUND,
                format!("Unknown model '{}'", name),
            )
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServiceConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let state = AppState::from_config(config)?;
    info!(
        engine = state.service.engine_name(),
        models = state.models.len(),
        "Starting mt-bridge web server"
    );

    let app = build_router(state);

    let addr = std::env::var(ADDR_ENV_VAR).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/models", get(list_models))
        .route("/api/translate", post(translate))
        .route("/api/pivot", post(pivot))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_error(status: StatusCode, error: String) -> ApiError {
    (status, Json(ErrorResponse { error }))
}

fn status_for(error: &BridgeError) -> StatusCode {
    match error {
        BridgeError::Engine(_) => StatusCode::BAD_GATEWAY,
        BridgeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        BridgeError::SentenceOutOfRange { .. }
        | BridgeError::WordOutOfRange { .. }
        | BridgeError::InvalidRange { .. }
        | BridgeError::InvalidAnnotation(_)
        | BridgeError::InvalidAlignment(_)
        | BridgeError::InvalidLanguage(_)
        | BridgeError::BatchSizeMismatch { .. } => StatusCode::BAD_REQUEST,
    }
}

fn bridge_error(error: BridgeError) -> ApiError {
    warn!("Translation failed: {}", error);
    api_error(status_for(&error), error.to_string())
}

fn resolve_options(options: Option<Vec<ResponseOptions>>, texts: usize) -> Vec<ResponseOptions> {
    options.unwrap_or_else(|| vec![ResponseOptions::default(); texts])
}

fn to_translated_text(view: &ResponseView, with_alignments: bool) -> Result<TranslatedText, BridgeError> {
    let sentences = (0..view.size())
        .map(|idx| {
            Ok(SentencePair {
                source: view.source_sentence_range(idx)?,
                target: view.target_sentence_range(idx)?,
            })
        })
        .collect::<Result<Vec<_>, BridgeError>>()?;

    Ok(TranslatedText {
        original: view.original_text().to_string(),
        translated: view.translated_text().to_string(),
        sentences,
        alignments: with_alignments.then(|| view.alignments()),
    })
}

/// Run a blocking translation off the async workers and shape the result
async fn run_blocking<F>(
    options: &[ResponseOptions],
    job: F,
) -> Result<Json<Vec<TranslatedText>>, ApiError>
where
    F: FnOnce() -> Result<Vec<ResponseView>, BridgeError> + Send + 'static,
{
    let views = tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Translation task failed: {}", e),
            )
        })?
        .map_err(bridge_error)?;

    let with_alignments = options.iter().any(|o| o.alignment);
    let body = views
        .iter()
        .map(|view| to_translated_text(view, with_alignments))
        .collect::<Result<Vec<_>, _>>()
        .map_err(bridge_error)?;

    Ok(Json(body))
}

async fn list_models(State(state): State<AppState>) -> Json<Vec<ModelInfo>> {
    let mut models: Vec<ModelInfo> = state
        .models
        .values()
        .map(|model| ModelInfo {
            name: model.name().to_string(),
            source: model.source_language().to_string(),
            target: model.target_language().to_string(),
        })
        .collect();
    models.sort_by(|a, b| a.name.cmp(&b.name));
    Json(models)
}

async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<Vec<TranslatedText>>, ApiError> {
    info!(
        "Translating {} texts with model '{}'",
        request.texts.len(),
        &request.model
    );

    let model = state.model(&request.model)?;
    let options = resolve_options(request.options, request.texts.len());
    let job_options = options.clone();
    let service = Arc::clone(&state.service);
    let texts = request.texts;

    run_blocking(&options, move || service.translate(&model, texts, &job_options)).await
}

async fn pivot(
    State(state): State<AppState>,
    Json(request): Json<PivotRequest>,
) -> Result<Json<Vec<TranslatedText>>, ApiError> {
    info!(
        "Translating {} texts via '{}' then '{}'",
        request.texts.len(),
        &request.first,
        &request.second
    );

    let first = state.model(&request.first)?;
    let second = state.model(&request.second)?;
    let options = resolve_options(request.options, request.texts.len());
    let job_options = options.clone();
    let service = Arc::clone(&state.service);
    let texts = request.texts;

    run_blocking(&options, move || {
        service.translate_via_pivoting(&first, &second, texts, &job_options)
    })
    .await
}

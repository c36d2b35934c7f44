//! HTTP boundary: two routes over the extraction and preprocessing pipeline.
//!
//! Thin by design — every route body is "parse the request, call one library
//! function, map the error". Policy lives in the library; this module only
//! decides status codes and the uniform `{"detail": ...}` error body, so
//! internal error kinds never leak as stack traces to the caller.
//!
//! | Route             | Success                      | Failure                      |
//! |-------------------|------------------------------|------------------------------|
//! | `POST /upload`    | `{status, kind, text}`       | 400 client / 500 extractor   |
//! | `POST /preprocess`| JSON array of segments       | 400 client / 502 generation  |
//! | `GET  /health`    | `{"status":"ok"}`            | —                            |

use crate::config::PipelineConfig;
use crate::error::{ExtractError, PreprocessError};
use crate::extract;
use crate::generate::{GeminiGenerator, TextGenerator};
use crate::preprocess::preprocess;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Upload size cap. Course documents run to a few MB; 25 MB covers scanned
/// PDFs without letting a stray video occupy memory.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared per-process state. No mutable state — concurrent requests are
/// naturally independent.
pub struct AppState {
    pub config: PipelineConfig,
    /// Injected generator, used by tests and embedders. `None` means build a
    /// [`GeminiGenerator`] from the environment per request, so the server
    /// can start (and serve uploads) before a credential exists.
    pub generator: Option<Arc<dyn TextGenerator>>,
}

impl AppState {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            generator: None,
        }
    }

    pub fn with_generator(config: PipelineConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            config,
            generator: Some(generator),
        }
    }
}

/// Build the application router.
///
/// `allowed_origin` restricts CORS to one frontend origin; `None` (or an
/// unparsable origin) falls back to allowing any origin, which suits local
/// development.
pub fn router(state: Arc<AppState>, allowed_origin: Option<&str>) -> Router {
    Router::new()
        .route("/upload", post(upload))
        .route("/preprocess", post(run_preprocess))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors_layer(allowed_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let exact = allowed_origin.and_then(|o| match o.parse::<HeaderValue>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring unparsable CORS origin {o:?}; allowing any origin");
            None
        }
    });
    match exact {
        Some(origin) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(origin))
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

// ── Routes ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct UploadResponse {
    status: &'static str,
    kind: crate::media::MediaKind,
    text: String,
}

async fn upload(
    State(_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        let is_file = field.name() == Some("file") || field.file_name().is_some();
        if !is_file {
            continue;
        }
        let filename = field
            .file_name()
            .map(|n| n.to_string())
            .ok_or_else(|| ApiError::bad_request("File field carries no filename"))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;
        upload = Some((filename, bytes.to_vec()));
        break;
    }

    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::bad_request("Multipart body carries no file field"))?;

    let extracted = extract::extract_document(&filename, bytes).await?;
    Ok(Json(UploadResponse {
        status: "success",
        kind: extracted.source_kind,
        text: extracted.content,
    }))
}

#[derive(Debug, Deserialize)]
struct PreprocessRequest {
    text: String,
}

async fn run_preprocess(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PreprocessRequest>,
) -> Result<Json<crate::segment::SegmentBatch>, ApiError> {
    let batch = match &state.generator {
        Some(generator) => preprocess(&request.text, generator.as_ref(), &state.config).await?,
        None => {
            let generator = GeminiGenerator::from_env(&state.config)
                .map_err(PreprocessError::from)
                .map_err(ApiError::from)?;
            preprocess(&request.text, &generator, &state.config).await?
        }
    };
    Ok(Json(batch))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

// ── Error mapping ────────────────────────────────────────────────────────

/// Uniform error response: a status code plus a human-readable detail string.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl From<PreprocessError> for ApiError {
    fn from(err: PreprocessError) -> Self {
        let status = match err {
            PreprocessError::EmptyInput => StatusCode::BAD_REQUEST,
            PreprocessError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PreprocessError::GenerationUnavailable { .. }
            | PreprocessError::GenerationTimeout { .. }
            | PreprocessError::MalformedGenerationOutput { .. } => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

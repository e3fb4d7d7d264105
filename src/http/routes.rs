use std::path::Path;
use std::str::FromStr;

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, Path as UrlPath, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::describe::{DescriptionFormat, DescriptionSet};
use crate::error::{AnalysisError, ErrorCode};
use crate::record::AnalysisRecord;

use super::HttpState;

/// Multipart field carrying the uploaded file
const UPLOAD_FIELD: &str = "audio";

/// HTTP error variants mapped to JSON responses.
#[derive(Debug)]
pub enum HttpServerError {
    BadRequest(String),
    Multipart(MultipartError),
    Analysis(AnalysisError),
    Internal(String),
}

impl IntoResponse for HttpServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Multipart(err) => (err.status(), err.body_text()),
            Self::Analysis(err) => {
                log::error!("[HTTP] Analysis failed: code={} {}", err.code(), err.message());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Analysis failed: {}", err.message()),
                )
            }
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<MultipartError> for HttpServerError {
    fn from(err: MultipartError) -> Self {
        Self::Multipart(err)
    }
}

/// Health endpoint response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Successful upload payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub analysis: AnalysisRecord,
    pub descriptions: DescriptionSet,
}

/// Download request payload. A missing description downloads an empty file.
#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub description: String,
}

/// Build the Axum router with all handlers.
pub fn build_router(state: HttpState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload))
        .route("/download/:format", post(download))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

pub async fn upload(
    State(state): State<HttpState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpServerError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        upload = Some((file_name, bytes.to_vec()));
        break;
    }

    let (raw_name, bytes) = upload
        .ok_or_else(|| HttpServerError::BadRequest("No audio file provided".to_string()))?;
    let file_name = sanitize_file_name(&raw_name)
        .ok_or_else(|| HttpServerError::BadRequest("No file selected".to_string()))?;

    let extension = Path::new(&file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_string();
    if !state.is_supported_extension(&extension) {
        return Err(HttpServerError::BadRequest("Invalid file type".to_string()));
    }
    if bytes.is_empty() {
        return Err(HttpServerError::BadRequest("Uploaded file is empty".to_string()));
    }

    log::info!("[HTTP] Upload {} ({} bytes)", file_name, bytes.len());

    let analyzer = state.analyzer.clone();
    let record = tokio::task::spawn_blocking(move || analyze_upload(&analyzer, &file_name, &bytes))
        .await
        .map_err(|err| HttpServerError::Internal(format!("analysis task failed: {}", err)))??;

    let descriptions = DescriptionSet::render_checked(&record)
        .map_err(|err| HttpServerError::Internal(err.to_string()))?;

    Ok(Json(UploadResponse {
        analysis: record,
        descriptions,
    }))
}

/// Persist the upload under its own name in a scratch directory and analyze it
fn analyze_upload(
    analyzer: &crate::analysis::Analyzer,
    file_name: &str,
    bytes: &[u8],
) -> Result<AnalysisRecord, HttpServerError> {
    let scratch = tempfile::tempdir()
        .map_err(|err| HttpServerError::Internal(format!("scratch dir: {}", err)))?;
    let path = scratch.path().join(file_name);
    std::fs::write(&path, bytes)
        .map_err(|err| HttpServerError::Internal(format!("saving upload: {}", err)))?;

    analyzer.analyze_file(&path).map_err(HttpServerError::Analysis)
}

/// Strip any directory components; `None` when nothing usable remains
fn sanitize_file_name(raw: &str) -> Option<String> {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if last.is_empty() || last == "." || last == ".." {
        None
    } else {
        Some(last.to_string())
    }
}

pub async fn download(
    UrlPath(format): UrlPath<String>,
    Json(request): Json<DownloadRequest>,
) -> Result<Response, HttpServerError> {
    let format = DescriptionFormat::from_str(&format).map_err(HttpServerError::BadRequest)?;

    let disposition = format!(
        "attachment; filename=\"music_description_{}.txt\"",
        format.as_str()
    );
    Ok((
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        request.description,
    )
        .into_response())
}

//! HTTP surface: a health probe and the multipart `/classify` endpoint.

mod error;
mod upload;

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{classifier::EmailClassifier, domain::Category};

pub use error::{ApiError, InputError};
use upload::UploadedFile;

const PREVIEW_CHARS: usize = 200;

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<EmailClassifier>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Serialize)]
struct ClassifyResponse {
    success: bool,
    category: Category,
    response: String,
    original_text: String,
}

pub fn router(state: AppState) -> Router {
    let max_upload_bytes = state.max_upload_bytes;
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/classify", post(classify_email))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "message": "Email Classifier API está online",
        "status": "active",
    }))
}

async fn classify_email(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let (text, file) = read_form(multipart, state.max_upload_bytes).await?;
    if text.is_none() && file.is_none() {
        return Err(InputError::MissingContent.into());
    }

    // The file is validated even when text is also supplied; text wins.
    let mut content = String::new();
    if let Some(file) = file {
        content = upload::extract_text(file).await?;
    }
    if let Some(text) = text {
        content = text;
    }

    if content.trim().is_empty() {
        return Err(InputError::EmptyContent.into());
    }

    let result = state.classifier.classify(&content).await?;

    Ok(Json(ClassifyResponse {
        success: true,
        category: result.category,
        response: result.response,
        original_text: preview(&content),
    }))
}

async fn read_form(
    mut multipart: Multipart,
    limit: usize,
) -> Result<(Option<String>, Option<UploadedFile>), InputError> {
    let rejected = |err: MultipartError| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            InputError::TooLarge { limit }
        } else {
            InputError::Malformed(err.body_text())
        }
    };

    let mut text = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(rejected)?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("text") => {
                let value = field
                    .text()
                    .await
                    .map_err(rejected)?;
                text = Some(value).filter(|v| !v.is_empty());
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(rejected)?;
                // Browsers send an empty part when no file was picked.
                if !(file_name.is_empty() && bytes.is_empty()) {
                    file = Some(UploadedFile { file_name, bytes });
                }
            }
            _ => {}
        }
    }

    Ok((text, file))
}

fn preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &content[..idx]),
        None => content.to_string(),
    }
}

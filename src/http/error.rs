use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::classifier::ClassifyError;

/// Request problems rejected before the classifier runs.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("É necessário fornecer texto ou arquivo")]
    MissingContent,
    #[error("Formato não suportado. Use .txt ou .pdf")]
    UnsupportedFormat,
    #[error("O conteúdo do email está vazio")]
    EmptyContent,
    #[error("O arquivo .txt não está codificado em UTF-8")]
    InvalidEncoding,
    #[error("Não foi possível ler o PDF: {0}")]
    UnreadablePdf(String),
    #[error("Arquivo ou texto excede o limite de {limit} bytes")]
    TooLarge { limit: usize },
    #[error("Requisição inválida: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("Erro ao processar email: {0}")]
    Classification(#[from] ClassifyError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Input(InputError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Input(_) => StatusCode::BAD_REQUEST,
            ApiError::Classification(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(target: "http", error = %self, "classification request failed");
        } else {
            tracing::info!(target: "http", error = %self, "classification request rejected");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

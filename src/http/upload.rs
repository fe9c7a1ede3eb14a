use axum::body::Bytes;

use super::error::InputError;

#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadKind {
    PlainText,
    Pdf,
}

impl UploadKind {
    fn from_file_name(name: &str) -> Option<Self> {
        let lowered = name.to_lowercase();
        if lowered.ends_with(".txt") {
            Some(UploadKind::PlainText)
        } else if lowered.ends_with(".pdf") {
            Some(UploadKind::Pdf)
        } else {
            None
        }
    }
}

/// Returns the email text carried by an uploaded `.txt` or `.pdf` file.
pub async fn extract_text(file: UploadedFile) -> Result<String, InputError> {
    match UploadKind::from_file_name(&file.file_name) {
        Some(UploadKind::PlainText) => {
            String::from_utf8(file.bytes.to_vec()).map_err(|_| InputError::InvalidEncoding)
        }
        Some(UploadKind::Pdf) => {
            // Extraction is CPU bound and may panic on malformed documents.
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&file.bytes))
                .await
                .map_err(|err| InputError::UnreadablePdf(err.to_string()))?
                .map_err(|err| InputError::UnreadablePdf(err.to_string()))
        }
        None => Err(InputError::UnsupportedFormat),
    }
}

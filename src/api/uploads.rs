use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::services::upload::secure_filename;

/// GET /uploads/{filename}
///
/// Only names that survive sanitizing unchanged are looked up, so a request
/// can never resolve outside the upload directory.
pub async fn serve_upload(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if secure_filename(&filename).as_deref() != Some(filename.as_str()) {
        return Err(ApiError::not_found("Upload", &filename));
    }

    let path = state.uploads().root().join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::not_found("Upload", &filename));
        }
        Err(e) => {
            return Err(ApiError::internal(format!(
                "Failed to read {}: {e}",
                path.display()
            )));
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&filename)),
            (header::CONTENT_DISPOSITION, "inline"),
        ],
        bytes,
    ))
}

fn content_type_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for_allowed_extensions() {
        assert_eq!(content_type_for("brief.PDF"), "application/pdf");
        assert_eq!(content_type_for("notes.txt"), "text/plain; charset=utf-8");
        assert!(content_type_for("order.docx").contains("wordprocessingml"));
        assert_eq!(content_type_for("README"), "application/octet-stream");
    }
}

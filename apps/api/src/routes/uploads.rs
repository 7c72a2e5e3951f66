use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::auth::resolve_user_id;
use crate::errors::AppError;
use crate::object_store::resume_key;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub key: String,
}

/// POST /api/upload-resume
/// Multipart upload; the file rides in a field named `resume`.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let user_id = resolve_user_id(state.sessions.as_ref()).await;

    let mut file: Option<(String, String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some("resume") {
            continue;
        }
        let filename = field.file_name().unwrap_or("resume").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Malformed upload: {e}")))?;
        file = Some((filename, content_type, data));
        break;
    }

    let Some((filename, content_type, data)) = file else {
        return Err(AppError::validation("No file uploaded"));
    };

    let key = resume_key(&user_id, &filename);
    let url = state.resumes.upload(&key, data, &content_type).await?;

    info!("Stored resume for user {user_id} at {key}");
    Ok(Json(UploadResponse { url, key }))
}

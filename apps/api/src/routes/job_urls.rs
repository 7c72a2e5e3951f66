use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::resolve_user_id;
use crate::errors::{AppError, FieldError};
use crate::models::{JobUrl, JobUrlStatus, NewJobUrl};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUrlPayload {
    pub url: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

impl JobUrlPayload {
    /// Schema check: `url` is required, `status` must be a member of the
    /// enumeration when present.
    fn into_new(self, user_id: String) -> Result<NewJobUrl, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.url.as_deref().map_or(true, |u| u.trim().is_empty()) {
            errors.push(FieldError::required("url"));
        }
        let status = match self.status.as_deref() {
            None => None,
            Some(s) => match JobUrlStatus::parse(s) {
                Some(status) => Some(status),
                None => {
                    errors.push(FieldError::new("status", "Invalid status"));
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewJobUrl {
            user_id,
            url: self.url.unwrap_or_default(),
            company: self.company,
            position: self.position,
            location: self.location,
            status,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: Option<String>,
}

/// GET /api/job-urls
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<JobUrl>>, AppError> {
    let user_id = resolve_user_id(state.sessions.as_ref()).await;
    let urls = state.storage.get_job_urls(&user_id).await?;
    Ok(Json(urls))
}

/// POST /api/job-urls
pub async fn handle_create(
    State(state): State<AppState>,
    Json(payload): Json<JobUrlPayload>,
) -> Result<Json<JobUrl>, AppError> {
    let user_id = resolve_user_id(state.sessions.as_ref()).await;
    let data = payload.into_new(user_id).map_err(AppError::invalid_data)?;
    let created = state.storage.create_job_url(data).await?;
    Ok(Json(created))
}

/// PATCH /api/job-urls/:id
/// Only the status may change, and only to a member of the enumeration.
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<JobUrl>, AppError> {
    let status = body
        .status
        .as_deref()
        .and_then(JobUrlStatus::parse)
        .ok_or_else(|| AppError::validation("Invalid status"))?;

    let updated = state.storage.update_job_url_status(id, status).await?;
    let updated = updated.ok_or_else(|| AppError::NotFound("Job URL not found".to_string()))?;
    Ok(Json(updated))
}

/// DELETE /api/job-urls/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let deleted = state.storage.delete_job_url(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Job URL not found".to_string()));
    }
    Ok(Json(json!({ "message": "Job URL deleted successfully" })))
}

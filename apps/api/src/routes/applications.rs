use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::resolve_user_id;
use crate::errors::{AppError, FieldError};
use crate::models::{Application, ApplicationStatus, ApplicationUpdate, NewApplication};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub work_type: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub job_url: Option<String>,
    pub resume_used: Option<String>,
}

impl ApplicationPayload {
    /// Schema check: `company` and `position` are required, `status` must
    /// be a member of the enumeration when present.
    fn into_new(self, user_id: String) -> Result<NewApplication, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.company.as_deref().map_or(true, |c| c.trim().is_empty()) {
            errors.push(FieldError::required("company"));
        }
        if self
            .position
            .as_deref()
            .map_or(true, |p| p.trim().is_empty())
        {
            errors.push(FieldError::required("position"));
        }
        let status = match self.status.as_deref() {
            None => None,
            Some(s) => match ApplicationStatus::parse(s) {
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

        Ok(NewApplication {
            user_id,
            company: self.company.unwrap_or_default(),
            position: self.position.unwrap_or_default(),
            location: self.location,
            job_type: self.job_type,
            work_type: self.work_type,
            status,
            notes: self.notes,
            job_url: self.job_url,
            resume_used: self.resume_used,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationUpdatePayload {
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub work_type: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub job_url: Option<String>,
    pub resume_used: Option<String>,
}

impl ApplicationUpdatePayload {
    /// A partial update carries no required fields, but a status outside
    /// the enumeration is still rejected before it reaches storage.
    fn into_update(self) -> Result<ApplicationUpdate, AppError> {
        let status = match self.status.as_deref() {
            None => None,
            Some(s) => Some(
                ApplicationStatus::parse(s)
                    .ok_or_else(|| AppError::validation("Invalid status"))?,
            ),
        };

        Ok(ApplicationUpdate {
            company: self.company,
            position: self.position,
            location: self.location,
            job_type: self.job_type,
            work_type: self.work_type,
            status,
            notes: self.notes,
            job_url: self.job_url,
            resume_used: self.resume_used,
        })
    }
}

/// GET /api/applications
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<Application>>, AppError> {
    let user_id = resolve_user_id(state.sessions.as_ref()).await;
    let applications = state.storage.get_applications(&user_id).await?;
    Ok(Json(applications))
}

/// POST /api/applications
pub async fn handle_create(
    State(state): State<AppState>,
    Json(payload): Json<ApplicationPayload>,
) -> Result<Json<Application>, AppError> {
    let user_id = resolve_user_id(state.sessions.as_ref()).await;
    let data = payload.into_new(user_id).map_err(AppError::invalid_data)?;
    let created = state.storage.create_application(data).await?;
    Ok(Json(created))
}

/// PATCH /api/applications/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ApplicationUpdatePayload>,
) -> Result<Json<Application>, AppError> {
    let updates = payload.into_update()?;
    let updated = state.storage.update_application(id, updates).await?;
    let updated = updated.ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
    Ok(Json(updated))
}

/// DELETE /api/applications/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let deleted = state.storage.delete_application(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Application not found".to_string()));
    }
    Ok(Json(json!({ "message": "Application deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_payload() -> ApplicationPayload {
        ApplicationPayload {
            company: None,
            position: None,
            location: None,
            job_type: None,
            work_type: None,
            status: None,
            notes: None,
            job_url: None,
            resume_used: None,
        }
    }

    #[test]
    fn test_company_and_position_required() {
        let errors = empty_payload().into_new("u1".to_string()).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["company", "position"]);
    }

    #[test]
    fn test_valid_payload_passes() {
        let payload = ApplicationPayload {
            company: Some("Acme".to_string()),
            position: Some("Engineer".to_string()),
            status: Some("interview".to_string()),
            ..empty_payload()
        };
        let data = payload.into_new("u1".to_string()).unwrap();
        assert_eq!(data.status, Some(ApplicationStatus::Interview));
    }

    #[test]
    fn test_unknown_status_collected_with_missing_fields() {
        let payload = ApplicationPayload {
            status: Some("ghosted".to_string()),
            ..empty_payload()
        };
        let errors = payload.into_new("u1".to_string()).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.field == "status"));
    }

    #[test]
    fn test_update_rejects_unknown_status() {
        let payload = ApplicationUpdatePayload {
            company: None,
            position: None,
            location: None,
            job_type: None,
            work_type: None,
            status: Some("ghosted".to_string()),
            notes: None,
            job_url: None,
            resume_used: None,
        };
        assert!(payload.into_update().is_err());
    }

    #[test]
    fn test_update_allows_partial_body() {
        let payload = ApplicationUpdatePayload {
            company: None,
            position: None,
            location: None,
            job_type: None,
            work_type: None,
            status: None,
            notes: Some("sent follow-up".to_string()),
            job_url: None,
            resume_used: None,
        };
        let update = payload.into_update().unwrap();
        assert_eq!(update.notes.as_deref(), Some("sent follow-up"));
        assert!(update.status.is_none());
    }
}

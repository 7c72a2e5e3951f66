use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::resolve_user_id;
use crate::errors::AppError;
use crate::models::{NewUserPreferences, UserPreferences};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPayload {
    pub qualifications: Option<String>,
    pub work_experience: Option<String>,
    pub job_preferences: Option<String>,
    pub resume_url: Option<String>,
}

impl PreferencesPayload {
    fn into_new(self, user_id: String) -> NewUserPreferences {
        NewUserPreferences {
            user_id,
            qualifications: self.qualifications,
            work_experience: self.work_experience,
            job_preferences: self.job_preferences,
            resume_url: self.resume_url,
        }
    }
}

/// GET /api/user-preferences
/// Returns the caller's preferences, or an empty-defaults object when
/// nothing has been saved yet.
pub async fn handle_get_preferences(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let user_id = resolve_user_id(state.sessions.as_ref()).await;
    let preferences = state.storage.get_user_preferences(&user_id).await?;

    match preferences {
        Some(p) => Ok(Json(serde_json::to_value(p).map_err(anyhow::Error::from)?)),
        None => Ok(Json(json!({
            "qualifications": "",
            "workExperience": "",
            "jobPreferences": ""
        }))),
    }
}

/// POST /api/user-preferences
pub async fn handle_save_preferences(
    State(state): State<AppState>,
    Json(payload): Json<PreferencesPayload>,
) -> Result<Json<UserPreferences>, AppError> {
    let user_id = resolve_user_id(state.sessions.as_ref()).await;
    let saved = state
        .storage
        .create_or_update_user_preferences(payload.into_new(user_id))
        .await?;
    Ok(Json(saved))
}

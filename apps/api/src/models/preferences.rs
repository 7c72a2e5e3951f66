use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user's saved search profile. At most one row per user; writes go
/// through the upsert in the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub id: i32,
    pub user_id: String,
    pub qualifications: Option<String>,
    pub work_experience: Option<String>,
    pub job_preferences: Option<String>,
    pub resume_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted by the preferences upsert. `None` leaves the stored
/// value untouched on update.
#[derive(Debug, Clone)]
pub struct NewUserPreferences {
    pub user_id: String,
    pub qualifications: Option<String>,
    pub work_experience: Option<String>,
    pub job_preferences: Option<String>,
    pub resume_url: Option<String>,
}

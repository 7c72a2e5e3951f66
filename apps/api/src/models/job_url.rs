use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobUrl {
    pub id: i32,
    pub user_id: String,
    pub url: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub status: String,
    pub date_added: DateTime<Utc>,
}

/// Lifecycle of a saved posting URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobUrlStatus {
    Pending,
    Applied,
    Duplicate,
}

impl JobUrlStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobUrlStatus::Pending => "pending",
            JobUrlStatus::Applied => "applied",
            JobUrlStatus::Duplicate => "duplicate",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobUrlStatus::Pending),
            "applied" => Some(JobUrlStatus::Applied),
            "duplicate" => Some(JobUrlStatus::Duplicate),
            _ => None,
        }
    }
}

/// Insert payload for a job URL. The storage backend assigns the id,
/// stamps `date_added`, and defaults a missing status to pending.
#[derive(Debug, Clone)]
pub struct NewJobUrl {
    pub user_id: String,
    pub url: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub status: Option<JobUrlStatus>,
}

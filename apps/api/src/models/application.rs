use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tracked job application. `applied_date` is fixed at creation;
/// `last_update` is refreshed by every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i32,
    pub user_id: String,
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub work_type: Option<String>,
    pub status: String,
    pub applied_date: DateTime<Utc>,
    pub last_update: DateTime<Utc>,
    pub notes: Option<String>,
    pub job_url: Option<String>,
    pub resume_used: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Interview,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ApplicationStatus::Pending),
            "interview" => Some(ApplicationStatus::Interview),
            "rejected" => Some(ApplicationStatus::Rejected),
            "accepted" => Some(ApplicationStatus::Accepted),
            _ => None,
        }
    }
}

/// Insert payload for an application. The storage backend assigns the id,
/// stamps both timestamps, and defaults a missing status to pending.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub user_id: String,
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub work_type: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub notes: Option<String>,
    pub job_url: Option<String>,
    pub resume_used: Option<String>,
}

/// Partial update. `None` leaves the stored field untouched; any update
/// refreshes `last_update`.
#[derive(Debug, Clone, Default)]
pub struct ApplicationUpdate {
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub work_type: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub notes: Option<String>,
    pub job_url: Option<String>,
    pub resume_used: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for s in ["pending", "interview", "rejected", "accepted"] {
            assert_eq!(ApplicationStatus::parse(s).map(|v| v.as_str()), Some(s));
        }
    }

    #[test]
    fn test_status_rejects_unknown() {
        assert!(ApplicationStatus::parse("offer").is_none());
        assert!(ApplicationStatus::parse("Accepted").is_none());
    }
}

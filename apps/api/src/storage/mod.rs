mod memory;
mod postgres;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::config::Config;
use crate::db::create_pool;
use crate::models::{
    Application, ApplicationUpdate, JobUrl, JobUrlStatus, NewApplication, NewJobUrl,
    NewUserPreferences, UserPreferences,
};

pub use memory::MemStorage;
pub use postgres::PgStorage;

/// Aggregate counters for a user's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_applications: i64,
    pub pending_urls: i64,
    pub interviews: i64,
    pub success_rate: i64,
}

impl Stats {
    /// Whole-percent acceptance rate; 0 when there are no applications.
    pub fn success_rate(accepted: i64, total: i64) -> i64 {
        if total == 0 {
            0
        } else {
            ((accepted as f64 / total as f64) * 100.0).round() as i64
        }
    }
}

/// Capability interface over the persistence layer, implemented by
/// [`PgStorage`] and [`MemStorage`]. Absence of a record is a normal
/// outcome (`None` / `false`), distinct from an operation failure.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_user_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>>;

    /// Upsert keyed on the owning user: merges the provided fields into the
    /// existing record and refreshes `updated_at`, or inserts a new record.
    async fn create_or_update_user_preferences(
        &self,
        data: NewUserPreferences,
    ) -> Result<UserPreferences>;

    /// All job URLs owned by the user, oldest first.
    async fn get_job_urls(&self, user_id: &str) -> Result<Vec<JobUrl>>;

    async fn create_job_url(&self, data: NewJobUrl) -> Result<JobUrl>;

    /// Replaces only the status field. `None` when the id is unknown.
    async fn update_job_url_status(&self, id: i32, status: JobUrlStatus)
        -> Result<Option<JobUrl>>;

    /// `false` when the id is unknown.
    async fn delete_job_url(&self, id: i32) -> Result<bool>;

    /// All applications owned by the user, oldest first.
    async fn get_applications(&self, user_id: &str) -> Result<Vec<Application>>;

    async fn create_application(&self, data: NewApplication) -> Result<Application>;

    /// Partial merge; refreshes `last_update` on every call. `applied_date`
    /// is never touched. `None` when the id is unknown.
    async fn update_application(
        &self,
        id: i32,
        updates: ApplicationUpdate,
    ) -> Result<Option<Application>>;

    async fn delete_application(&self, id: i32) -> Result<bool>;

    async fn get_stats(&self, user_id: &str) -> Result<Stats>;
}

/// Selects the backend at process start: Postgres when `DATABASE_URL` is
/// configured, the in-memory store otherwise.
pub async fn connect(config: &Config) -> Result<Arc<dyn Storage>> {
    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            Ok(Arc::new(PgStorage::new(pool)))
        }
        None => {
            warn!("DATABASE_URL not set; using the in-memory store (data will not survive a restart)");
            Ok(Arc::new(MemStorage::new()))
        }
    }
}

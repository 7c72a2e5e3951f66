use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::models::{
    Application, ApplicationStatus, ApplicationUpdate, JobUrl, JobUrlStatus, NewApplication,
    NewJobUrl, NewUserPreferences, UserPreferences,
};
use crate::storage::{Stats, Storage};

/// Postgres-backed storage. Each operation is a single statement, except
/// the preferences upsert which is a read-then-write pair (two concurrent
/// first saves can both insert; see DESIGN.md).
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        PgStorage { pool }
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn get_user_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>> {
        Ok(sqlx::query_as::<_, UserPreferences>(
            "SELECT * FROM user_preferences WHERE user_id = $1 LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_or_update_user_preferences(
        &self,
        data: NewUserPreferences,
    ) -> Result<UserPreferences> {
        let existing = self.get_user_preferences(&data.user_id).await?;

        let saved = match existing {
            Some(current) => {
                sqlx::query_as::<_, UserPreferences>(
                    r#"
                    UPDATE user_preferences
                    SET qualifications  = COALESCE($2, qualifications),
                        work_experience = COALESCE($3, work_experience),
                        job_preferences = COALESCE($4, job_preferences),
                        resume_url      = COALESCE($5, resume_url),
                        updated_at      = now()
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(current.id)
                .bind(&data.qualifications)
                .bind(&data.work_experience)
                .bind(&data.job_preferences)
                .bind(&data.resume_url)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, UserPreferences>(
                    r#"
                    INSERT INTO user_preferences
                        (user_id, qualifications, work_experience, job_preferences, resume_url)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING *
                    "#,
                )
                .bind(&data.user_id)
                .bind(&data.qualifications)
                .bind(&data.work_experience)
                .bind(&data.job_preferences)
                .bind(&data.resume_url)
                .fetch_one(&self.pool)
                .await?
            }
        };

        info!("Saved preferences for user {}", saved.user_id);
        Ok(saved)
    }

    async fn get_job_urls(&self, user_id: &str) -> Result<Vec<JobUrl>> {
        Ok(sqlx::query_as::<_, JobUrl>(
            "SELECT * FROM job_urls WHERE user_id = $1 ORDER BY date_added ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_job_url(&self, data: NewJobUrl) -> Result<JobUrl> {
        Ok(sqlx::query_as::<_, JobUrl>(
            r#"
            INSERT INTO job_urls (user_id, url, company, position, location, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&data.user_id)
        .bind(&data.url)
        .bind(&data.company)
        .bind(&data.position)
        .bind(&data.location)
        .bind(data.status.unwrap_or(JobUrlStatus::Pending).as_str())
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_job_url_status(
        &self,
        id: i32,
        status: JobUrlStatus,
    ) -> Result<Option<JobUrl>> {
        Ok(sqlx::query_as::<_, JobUrl>(
            "UPDATE job_urls SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_job_url(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM job_urls WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_applications(&self, user_id: &str) -> Result<Vec<Application>> {
        Ok(sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE user_id = $1 ORDER BY applied_date ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_application(&self, data: NewApplication) -> Result<Application> {
        Ok(sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications
                (user_id, company, position, location, job_type, work_type,
                 status, notes, job_url, resume_used)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&data.user_id)
        .bind(&data.company)
        .bind(&data.position)
        .bind(&data.location)
        .bind(&data.job_type)
        .bind(&data.work_type)
        .bind(data.status.unwrap_or(ApplicationStatus::Pending).as_str())
        .bind(&data.notes)
        .bind(&data.job_url)
        .bind(&data.resume_used)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_application(
        &self,
        id: i32,
        updates: ApplicationUpdate,
    ) -> Result<Option<Application>> {
        Ok(sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET company     = COALESCE($2, company),
                position    = COALESCE($3, position),
                location    = COALESCE($4, location),
                job_type    = COALESCE($5, job_type),
                work_type   = COALESCE($6, work_type),
                status      = COALESCE($7, status),
                notes       = COALESCE($8, notes),
                job_url     = COALESCE($9, job_url),
                resume_used = COALESCE($10, resume_used),
                last_update = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&updates.company)
        .bind(&updates.position)
        .bind(&updates.location)
        .bind(&updates.job_type)
        .bind(&updates.work_type)
        .bind(updates.status.map(|s| s.as_str()))
        .bind(&updates.notes)
        .bind(&updates.job_url)
        .bind(&updates.resume_used)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_application(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_stats(&self, user_id: &str) -> Result<Stats> {
        let total_applications: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let pending_urls: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM job_urls WHERE user_id = $1 AND status = 'pending'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let interviews: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM applications WHERE user_id = $1 AND status = 'interview'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let accepted: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM applications WHERE user_id = $1 AND status = 'accepted'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Stats {
            total_applications,
            pending_urls,
            interviews,
            success_rate: Stats::success_rate(accepted, total_applications),
        })
    }
}

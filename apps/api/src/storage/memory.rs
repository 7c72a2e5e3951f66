use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

use crate::models::{
    Application, ApplicationStatus, ApplicationUpdate, JobUrl, JobUrlStatus, NewApplication,
    NewJobUrl, NewUserPreferences, UserPreferences,
};
use crate::storage::{Stats, Storage};

#[derive(Default)]
struct Inner {
    // One process-wide counter assigns ids across all entity kinds, so an
    // id is never reused within the process lifetime.
    next_id: i32,
    preferences: HashMap<i32, UserPreferences>,
    job_urls: HashMap<i32, JobUrl>,
    applications: HashMap<i32, Application>,
}

impl Inner {
    fn alloc_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory storage used when no `DATABASE_URL` is configured. Not
/// durable; development and demo only. All access goes through one mutex
/// since the runtime schedules handlers across threads.
#[derive(Default)]
pub struct MemStorage {
    inner: Mutex<Inner>,
}

impl MemStorage {
    pub fn new() -> Self {
        MemStorage::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("storage mutex poisoned")
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>> {
        let inner = self.lock();
        Ok(inner
            .preferences
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn create_or_update_user_preferences(
        &self,
        data: NewUserPreferences,
    ) -> Result<UserPreferences> {
        let mut inner = self.lock();

        if let Some(id) = inner
            .preferences
            .values()
            .find(|p| p.user_id == data.user_id)
            .map(|p| p.id)
        {
            let existing = inner
                .preferences
                .get_mut(&id)
                .ok_or_else(|| anyhow::anyhow!("preferences row {id} vanished"))?;
            if data.qualifications.is_some() {
                existing.qualifications = data.qualifications;
            }
            if data.work_experience.is_some() {
                existing.work_experience = data.work_experience;
            }
            if data.job_preferences.is_some() {
                existing.job_preferences = data.job_preferences;
            }
            if data.resume_url.is_some() {
                existing.resume_url = data.resume_url;
            }
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }

        let id = inner.alloc_id();
        let record = UserPreferences {
            id,
            user_id: data.user_id,
            qualifications: data.qualifications,
            work_experience: data.work_experience,
            job_preferences: data.job_preferences,
            resume_url: data.resume_url,
            updated_at: Utc::now(),
        };
        inner.preferences.insert(id, record.clone());
        Ok(record)
    }

    async fn get_job_urls(&self, user_id: &str) -> Result<Vec<JobUrl>> {
        let inner = self.lock();
        let mut urls: Vec<JobUrl> = inner
            .job_urls
            .values()
            .filter(|j| j.user_id == user_id)
            .cloned()
            .collect();
        // Ids are monotonic, so this is insertion order.
        urls.sort_by_key(|j| j.id);
        Ok(urls)
    }

    async fn create_job_url(&self, data: NewJobUrl) -> Result<JobUrl> {
        let mut inner = self.lock();
        let id = inner.alloc_id();
        let record = JobUrl {
            id,
            user_id: data.user_id,
            url: data.url,
            company: data.company,
            position: data.position,
            location: data.location,
            status: data
                .status
                .unwrap_or(JobUrlStatus::Pending)
                .as_str()
                .to_string(),
            date_added: Utc::now(),
        };
        inner.job_urls.insert(id, record.clone());
        Ok(record)
    }

    async fn update_job_url_status(
        &self,
        id: i32,
        status: JobUrlStatus,
    ) -> Result<Option<JobUrl>> {
        let mut inner = self.lock();
        Ok(inner.job_urls.get_mut(&id).map(|record| {
            record.status = status.as_str().to_string();
            record.clone()
        }))
    }

    async fn delete_job_url(&self, id: i32) -> Result<bool> {
        let mut inner = self.lock();
        Ok(inner.job_urls.remove(&id).is_some())
    }

    async fn get_applications(&self, user_id: &str) -> Result<Vec<Application>> {
        let inner = self.lock();
        let mut apps: Vec<Application> = inner
            .applications
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        apps.sort_by_key(|a| a.id);
        Ok(apps)
    }

    async fn create_application(&self, data: NewApplication) -> Result<Application> {
        let mut inner = self.lock();
        let id = inner.alloc_id();
        let now = Utc::now();
        let record = Application {
            id,
            user_id: data.user_id,
            company: data.company,
            position: data.position,
            location: data.location,
            job_type: data.job_type,
            work_type: data.work_type,
            status: data
                .status
                .unwrap_or(ApplicationStatus::Pending)
                .as_str()
                .to_string(),
            applied_date: now,
            last_update: now,
            notes: data.notes,
            job_url: data.job_url,
            resume_used: data.resume_used,
        };
        inner.applications.insert(id, record.clone());
        Ok(record)
    }

    async fn update_application(
        &self,
        id: i32,
        updates: ApplicationUpdate,
    ) -> Result<Option<Application>> {
        let mut inner = self.lock();
        Ok(inner.applications.get_mut(&id).map(|record| {
            if let Some(company) = updates.company {
                record.company = company;
            }
            if let Some(position) = updates.position {
                record.position = position;
            }
            if updates.location.is_some() {
                record.location = updates.location;
            }
            if updates.job_type.is_some() {
                record.job_type = updates.job_type;
            }
            if updates.work_type.is_some() {
                record.work_type = updates.work_type;
            }
            if let Some(status) = updates.status {
                record.status = status.as_str().to_string();
            }
            if updates.notes.is_some() {
                record.notes = updates.notes;
            }
            if updates.job_url.is_some() {
                record.job_url = updates.job_url;
            }
            if updates.resume_used.is_some() {
                record.resume_used = updates.resume_used;
            }
            record.last_update = Utc::now();
            record.clone()
        }))
    }

    async fn delete_application(&self, id: i32) -> Result<bool> {
        let mut inner = self.lock();
        Ok(inner.applications.remove(&id).is_some())
    }

    async fn get_stats(&self, user_id: &str) -> Result<Stats> {
        let inner = self.lock();
        let total_applications = inner
            .applications
            .values()
            .filter(|a| a.user_id == user_id)
            .count() as i64;
        let pending_urls = inner
            .job_urls
            .values()
            .filter(|j| j.user_id == user_id && j.status == "pending")
            .count() as i64;
        let interviews = inner
            .applications
            .values()
            .filter(|a| a.user_id == user_id && a.status == "interview")
            .count() as i64;
        let accepted = inner
            .applications
            .values()
            .filter(|a| a.user_id == user_id && a.status == "accepted")
            .count() as i64;

        Ok(Stats {
            total_applications,
            pending_urls,
            interviews,
            success_rate: Stats::success_rate(accepted, total_applications),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_job_url(user_id: &str, url: &str) -> NewJobUrl {
        NewJobUrl {
            user_id: user_id.to_string(),
            url: url.to_string(),
            company: None,
            position: None,
            location: None,
            status: None,
        }
    }

    fn new_application(user_id: &str, company: &str) -> NewApplication {
        NewApplication {
            user_id: user_id.to_string(),
            company: company.to_string(),
            position: "Engineer".to_string(),
            location: None,
            job_type: None,
            work_type: None,
            status: None,
            notes: None,
            job_url: None,
            resume_used: None,
        }
    }

    #[tokio::test]
    async fn test_create_job_url_defaults_to_pending() {
        let storage = MemStorage::new();
        let created = storage
            .create_job_url(new_job_url("u1", "https://jobs.example.com/1"))
            .await
            .unwrap();
        assert_eq!(created.status, "pending");
    }

    #[tokio::test]
    async fn test_ids_unique_across_entity_kinds() {
        let storage = MemStorage::new();
        let url = storage
            .create_job_url(new_job_url("u1", "https://jobs.example.com/1"))
            .await
            .unwrap();
        let app = storage
            .create_application(new_application("u1", "Acme"))
            .await
            .unwrap();
        let url2 = storage
            .create_job_url(new_job_url("u1", "https://jobs.example.com/2"))
            .await
            .unwrap();
        assert_ne!(url.id, app.id);
        assert_ne!(app.id, url2.id);
        assert!(url.id < app.id && app.id < url2.id);
    }

    #[tokio::test]
    async fn test_job_urls_listed_in_insertion_order() {
        let storage = MemStorage::new();
        for n in 1..=3 {
            storage
                .create_job_url(new_job_url("u1", &format!("https://jobs.example.com/{n}")))
                .await
                .unwrap();
        }
        storage
            .create_job_url(new_job_url("other", "https://jobs.example.com/x"))
            .await
            .unwrap();

        let urls = storage.get_job_urls("u1").await.unwrap();
        assert_eq!(urls.len(), 3);
        let ids: Vec<i32> = urls.iter().map(|j| j.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn test_update_job_url_status() {
        let storage = MemStorage::new();
        let created = storage
            .create_job_url(new_job_url("u1", "https://jobs.example.com/1"))
            .await
            .unwrap();
        let updated = storage
            .update_job_url_status(created.id, JobUrlStatus::Applied)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, "applied");
    }

    #[tokio::test]
    async fn test_update_unknown_job_url_is_none() {
        let storage = MemStorage::new();
        let updated = storage
            .update_job_url_status(999, JobUrlStatus::Applied)
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_delete_job_url() {
        let storage = MemStorage::new();
        let created = storage
            .create_job_url(new_job_url("u1", "https://jobs.example.com/1"))
            .await
            .unwrap();
        assert!(storage.delete_job_url(created.id).await.unwrap());
        assert!(!storage.delete_job_url(created.id).await.unwrap());
        assert!(storage.get_job_urls("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_preferences_upsert_keeps_one_record() {
        let storage = MemStorage::new();

        let first = storage
            .create_or_update_user_preferences(NewUserPreferences {
                user_id: "u1".to_string(),
                qualifications: Some("BSc Computer Science".to_string()),
                work_experience: Some("5 years".to_string()),
                job_preferences: None,
                resume_url: None,
            })
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let second = storage
            .create_or_update_user_preferences(NewUserPreferences {
                user_id: "u1".to_string(),
                qualifications: Some("MSc Computer Science".to_string()),
                work_experience: None,
                job_preferences: Some("Remote only".to_string()),
                resume_url: None,
            })
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.qualifications.as_deref(), Some("MSc Computer Science"));
        // Fields the second call omitted survive the merge.
        assert_eq!(second.work_experience.as_deref(), Some("5 years"));
        assert_eq!(second.job_preferences.as_deref(), Some("Remote only"));
        assert!(second.updated_at > first.updated_at);

        let fetched = storage.get_user_preferences("u1").await.unwrap().unwrap();
        assert_eq!(fetched.id, first.id);
    }

    #[tokio::test]
    async fn test_preferences_absent_for_unknown_user() {
        let storage = MemStorage::new();
        assert!(storage.get_user_preferences("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_application_update_refreshes_last_update_only() {
        let storage = MemStorage::new();
        let created = storage
            .create_application(new_application("u1", "Acme"))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let updated = storage
            .update_application(
                created.id,
                ApplicationUpdate {
                    notes: Some("phone screen booked".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.applied_date, created.applied_date);
        assert!(updated.last_update > created.last_update);
        assert_eq!(updated.notes.as_deref(), Some("phone screen booked"));
        // Untouched fields survive a partial update.
        assert_eq!(updated.company, "Acme");
        assert_eq!(updated.status, "pending");
    }

    #[tokio::test]
    async fn test_update_unknown_application_is_none() {
        let storage = MemStorage::new();
        let updated = storage
            .update_application(42, ApplicationUpdate::default())
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_stats_empty_user() {
        let storage = MemStorage::new();
        let stats = storage.get_stats("u1").await.unwrap();
        assert_eq!(
            stats,
            Stats {
                total_applications: 0,
                pending_urls: 0,
                interviews: 0,
                success_rate: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_stats_counts_and_success_rate() {
        let storage = MemStorage::new();

        for n in 0..4 {
            storage
                .create_application(new_application("u1", &format!("Company {n}")))
                .await
                .unwrap();
        }
        let accepted = storage.get_applications("u1").await.unwrap()[0].clone();
        storage
            .update_application(
                accepted.id,
                ApplicationUpdate {
                    status: Some(ApplicationStatus::Accepted),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let interviewing = storage.get_applications("u1").await.unwrap()[1].clone();
        storage
            .update_application(
                interviewing.id,
                ApplicationUpdate {
                    status: Some(ApplicationStatus::Interview),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        storage
            .create_job_url(new_job_url("u1", "https://jobs.example.com/1"))
            .await
            .unwrap();
        let applied = storage
            .create_job_url(new_job_url("u1", "https://jobs.example.com/2"))
            .await
            .unwrap();
        storage
            .update_job_url_status(applied.id, JobUrlStatus::Applied)
            .await
            .unwrap();

        // Another user's records stay out of the counts.
        storage
            .create_application(new_application("u2", "Elsewhere"))
            .await
            .unwrap();

        let stats = storage.get_stats("u1").await.unwrap();
        assert_eq!(stats.total_applications, 4);
        assert_eq!(stats.pending_urls, 1);
        assert_eq!(stats.interviews, 1);
        assert_eq!(stats.success_rate, 25);
    }
}

pub mod applications;
pub mod health;
pub mod job_urls;
pub mod preferences;
pub mod stats;
pub mod uploads;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/user-preferences",
            get(preferences::handle_get_preferences).post(preferences::handle_save_preferences),
        )
        .route("/api/upload-resume", post(uploads::handle_upload_resume))
        .route(
            "/api/job-urls",
            get(job_urls::handle_list).post(job_urls::handle_create),
        )
        .route(
            "/api/job-urls/:id",
            patch(job_urls::handle_update_status).delete(job_urls::handle_delete),
        )
        .route(
            "/api/applications",
            get(applications::handle_list).post(applications::handle_create),
        )
        .route(
            "/api/applications/:id",
            patch(applications::handle_update).delete(applications::handle_delete),
        )
        .route("/api/stats", get(stats::handle_get_stats))
        .with_state(state)
}

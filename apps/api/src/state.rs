use std::sync::Arc;

use crate::auth::SessionResolver;
use crate::object_store::ResumeStore;
use crate::storage::Storage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Selected at startup: Postgres when `DATABASE_URL` is set, in-memory otherwise.
    pub storage: Arc<dyn Storage>,
    pub resumes: Arc<ResumeStore>,
    pub sessions: Arc<dyn SessionResolver>,
}

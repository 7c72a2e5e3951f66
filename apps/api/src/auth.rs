use async_trait::async_trait;
use serde::Serialize;

/// Identity every request falls back to while real sign-in is not wired up.
pub const DEMO_USER_ID: &str = "demo-user-123";

/// The authenticated identity as the session layer sees it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

/// Seam between handlers and whatever produces sessions. Handlers only
/// ever see the resolved user id, so a real session store can replace
/// [`DemoSessions`] without touching handler code.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn current_session(&self) -> Option<SessionUser>;
}

/// Development resolver: every request belongs to the demo user.
pub struct DemoSessions;

#[async_trait]
impl SessionResolver for DemoSessions {
    async fn current_session(&self) -> Option<SessionUser> {
        Some(SessionUser {
            id: DEMO_USER_ID.to_string(),
            name: Some("Demo User".to_string()),
            email: Some("demo@example.com".to_string()),
            image: None,
        })
    }
}

/// The acting user id for a request: the session's user if one exists,
/// the demo identity otherwise. The fallback is a development
/// convenience, not a security boundary.
pub async fn resolve_user_id(sessions: &dyn SessionResolver) -> String {
    match sessions.current_session().await {
        Some(user) => user.id,
        None => DEMO_USER_ID.to_string(),
    }
}

use axum::{extract::State, Json};

use crate::auth::resolve_user_id;
use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::Stats;

/// GET /api/stats
pub async fn handle_get_stats(State(state): State<AppState>) -> Result<Json<Stats>, AppError> {
    let user_id = resolve_user_id(state.sessions.as_ref()).await;
    let stats = state.storage.get_stats(&user_id).await?;
    Ok(Json(stats))
}

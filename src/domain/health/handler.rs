use axum::{extract::State, Json};

use super::dto::HealthStatus;
use crate::AppState;

/// Service health
///
/// Reports status, version, uptime and the provider check.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Health report", body = HealthStatus)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.health.check().await)
}

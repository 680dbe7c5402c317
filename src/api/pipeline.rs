use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::infrastructure::AppState;
use crate::services::supervisor::JobRecord;

pub async fn list_jobs(State(state): State<AppState>) -> Json<Vec<JobRecord>> {
    Json(state.supervisor.jobs())
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobRecord>, (StatusCode, Json<Value>)> {
    state.supervisor.job(&id).map(Json).ok_or((
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("job {} not found", id) })),
    ))
}

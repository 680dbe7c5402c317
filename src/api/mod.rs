pub mod approval;
pub mod health;
pub mod loan;
pub mod pipeline;
pub mod returns;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::domain::ServiceError;
use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Loan lifecycle
        .route("/loans", post(loan::submit_loan))
        .route("/loans/approve", post(approval::approve_cells))
        .route("/loans/approval", post(approval::approve_with_document))
        .route("/loans/return", post(returns::submit_return))
        // Pipeline status board
        .route("/pipeline", get(pipeline::list_jobs))
        .route("/pipeline/:id", get(pipeline::get_job))
        .with_state(state)
}

/// Map a pipeline error onto an HTTP status for synchronous endpoints.
pub(crate) fn error_response(err: ServiceError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Ledger(_)
        | ServiceError::Document(_)
        | ServiceError::Storage(_)
        | ServiceError::Messaging(_) => StatusCode::BAD_GATEWAY,
        ServiceError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = match err {
        ServiceError::Validation(msg) | ServiceError::NotFound(msg) => msg,
        other => other.to_string(),
    };
    (status, Json(json!({ "error": message })))
}

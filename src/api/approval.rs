use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{error_response, loan::bad_multipart};
use crate::infrastructure::AppState;
use crate::services::lifecycle::{self, ApprovalInput, ApprovalMode};

#[derive(Debug, Deserialize)]
pub struct ApproveForm {
    #[serde(rename = "idPinjam", default)]
    pub id_pinjam: String,
    #[serde(default)]
    pub approver: String,
    #[serde(rename = "statusPersetujuan", default)]
    pub status_persetujuan: String,
}

/// Record a decision into the loan's own row. Used by the approval link sent
/// to the approver; runs synchronously so the approver sees the real outcome.
pub async fn approve_cells(
    State(state): State<AppState>,
    Form(form): Form<ApproveForm>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let input = ApprovalInput {
        loan_id: form.id_pinjam,
        approver: form.approver,
        decision: form.status_persetujuan,
    };

    lifecycle::approve(&state, input, ApprovalMode::CellsOnly)
        .await
        .map_err(error_response)?;

    Ok(Json(json!({
        "status": "ok",
        "message": "✅ Approval berhasil dikirim"
    })))
}

/// Full approval: decision cells plus a rendered approval document, an
/// appended approval row, and notifications to both parties.
pub async fn approve_with_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut input = ApprovalInput::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.map_err(bad_multipart)?;
        match name.as_str() {
            "idPinjam" => input.loan_id = value,
            "approver" => input.approver = value,
            "statusPersetujuan" => input.decision = value,
            _ => {}
        }
    }

    lifecycle::approve(&state, input, ApprovalMode::WithDocument)
        .await
        .map_err(error_response)?;

    Ok(Json(json!({
        "status": "ok",
        "message": "✅ Permohonan persetujuan berhasil diproses"
    })))
}

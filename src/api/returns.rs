use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::api::loan::bad_multipart;
use crate::infrastructure::{staging, AppState};
use crate::services::lifecycle::{self, ReturnInput};

/// Accept a return form and hand the pipeline to the supervisor. The loan
/// reference is the only hard precondition checked at the edge; whether it
/// resolves is decided inside the pipeline.
pub async fn submit_return(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut input = ReturnInput::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "foto" => {
                let filename = field.file_name().unwrap_or("foto.jpg").to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                if !bytes.is_empty() {
                    let path = staging::save_upload(&state.config.upload_dir, &filename, &bytes)
                        .await
                        .map_err(|e| {
                            tracing::error!("failed to stage upload: {}", e);
                            (
                                StatusCode::INTERNAL_SERVER_ERROR,
                                Json(json!({ "error": "gagal menyimpan foto" })),
                            )
                        })?;
                    input.staged_photo = Some(path);
                }
            }
            other => {
                let value = field.text().await.map_err(bad_multipart)?;
                match other {
                    "idPeminjam" => input.loan_id = value,
                    "kondisiAlat" => input.condition = value,
                    "keteranganPengembalian" => input.note = value,
                    _ => {}
                }
            }
        }
    }

    if input.loan_id.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "ID Peminjam harus diisi" })),
        ));
    }

    let label = format!("return {}", input.loan_id);
    let job_state = state.clone();
    let job_id = state
        .supervisor
        .enqueue(&label, async move {
            lifecycle::return_pipeline(&job_state, input).await
        })
        .await;

    Ok(Json(json!({
        "status": "accepted",
        "message": "✅ Data pengembalian berhasil diterima dan sedang diproses",
        "jobId": job_id
    })))
}

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::infrastructure::{staging, AppState};
use crate::services::lifecycle::{self, SubmitInput};

/// Accept a loan submission form, stage its photo, and hand the pipeline to
/// the supervisor. The caller is acked as soon as the job is queued.
pub async fn submit_loan(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut input = SubmitInput::default();

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
                    "nama" => input.borrower_name = value,
                    "kelas" => input.class_name = value,
                    "nis" => input.student_id = value,
                    "noWa" => input.phone = value,
                    "namaAlat" => input.equipment_name = value,
                    // Quantity has always been free-form in the intake form.
                    "jumlahAlat" => input.quantity = value.trim().parse().unwrap_or(0),
                    "tanggalPinjam" => input.loan_date = value,
                    "tanggalKembali" => input.due_date = value,
                    "keterangan" => input.note = value,
                    _ => {}
                }
            }
        }
    }

    let label = format!("submit {}", input.borrower_name);
    let job_state = state.clone();
    let job_id = state
        .supervisor
        .enqueue(&label, async move {
            lifecycle::submit_pipeline(&job_state, input).await
        })
        .await;

    Ok(Json(json!({
        "status": "accepted",
        "message": "✅ Data berhasil diterima dan sedang diproses",
        "jobId": job_id
    })))
}

pub(crate) fn bad_multipart(e: axum::extract::multipart::MultipartError) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": format!("invalid multipart body: {}", e) })),
    )
}

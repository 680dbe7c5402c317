//! Lifecycle orchestrator: the Submit, Approve and Return pipelines.
//!
//! Each pipeline sequences the identity resolver, the document renderer and
//! the ledger against one region, then dispatches notifications. Submit and
//! Return run as supervised background jobs after the caller has been acked;
//! Approve runs synchronously. Cross-request coordination happens only
//! through the ledger.

use std::path::PathBuf;

use chrono::Local;

use crate::domain::{ServiceError, APPROVAL, LOAN, RETURN};
use crate::infrastructure::AppState;
use crate::models::{format_ordinal, ApprovalRecord, LoanRecord, ReturnRecord};
use crate::services::{identity, notify, render};

#[derive(Debug, Clone, Default)]
pub struct SubmitInput {
    pub borrower_name: String,
    pub class_name: String,
    pub student_id: String,
    pub phone: String,
    pub equipment_name: String,
    pub quantity: u32,
    pub loan_date: String,
    pub due_date: String,
    pub note: String,
    pub staged_photo: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct ApprovalInput {
    pub loan_id: String,
    pub approver: String,
    pub decision: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalMode {
    /// Write status/timestamp/approver into the loan's own row, nothing else.
    CellsOnly,
    /// Render an approval document, append an ApprovalRecord, notify.
    WithDocument,
}

#[derive(Debug, Clone, Default)]
pub struct ReturnInput {
    pub loan_id: String,
    pub condition: String,
    pub note: String,
    pub staged_photo: Option<PathBuf>,
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

fn long_date() -> String {
    Local::now().format("%d %B %Y").to_string()
}

/// Zero-pad a numeric loan reference the way the ledger stores ordinals;
/// non-numeric references are stored as received.
fn canonical_ref(raw: &str) -> String {
    match raw.trim().parse::<u32>() {
        Ok(n) => format_ordinal(n),
        Err(_) => raw.trim().to_string(),
    }
}

/// Upload a staged photo to durable storage, best-effort. The staging file
/// is removed regardless of outcome; a failed upload leaves the URL empty.
async fn upload_staged_photo(state: &AppState, staged: Option<PathBuf>) -> String {
    let Some(path) = staged else {
        return String::new();
    };
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo.jpg".to_string());

    let upload = async {
        let bytes = tokio::fs::read(&path).await?;
        state
            .objects
            .upload_public(&filename, "image/jpeg", bytes, &state.config.photo_folder_id)
            .await
    }
    .await;

    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!("failed to remove staged upload {:?}: {}", path, e);
    }

    match upload {
        Ok(url) => {
            tracing::info!("photo uploaded: {}", url);
            url
        }
        Err(e) => {
            tracing::warn!("photo upload failed, continuing without it: {}", e);
            String::new()
        }
    }
}

/// Placeholder substitutions shared by all three document templates.
/// `number` is the document's own ordinal: the loan ordinal for loan and
/// approval forms, the referenced loan (or row ordinal) for return forms.
fn base_substitutions(loan: &LoanRecord, number: u32) -> Vec<(String, String)> {
    vec![
        ("<<NMR>>".into(), format_ordinal(number)),
        ("<<TGL>>".into(), long_date()),
        ("<<NAMA>>".into(), loan.borrower_name.clone()),
        ("<<KLS>>".into(), loan.class_name.clone()),
        ("<<NIS>>".into(), loan.student_id.clone()),
        ("<<NO>>".into(), loan.phone.clone()),
        ("<<NMALT>>".into(), loan.equipment_name.clone()),
        ("<<JML>>".into(), loan.quantity.to_string()),
        ("<<TGLPMJ>>".into(), loan.loan_date.clone()),
        ("<<TGLPGN>>".into(), loan.due_date.clone()),
        ("<<LMPJM>>".into(), loan.duration_label()),
        ("<<KET>>".into(), loan.note.clone()),
    ]
}

/// Submit pipeline: runs after the caller has already been acked.
pub async fn submit_pipeline(state: &AppState, input: SubmitInput) -> Result<(), ServiceError> {
    let photo_url = upload_staged_photo(state, input.staged_photo.clone()).await;

    let ordinal = state
        .sequencer
        .allocate_next(state.ledger.as_ref(), &LOAN)
        .await;

    let mut loan = LoanRecord {
        ordinal,
        submitted_at: today(),
        borrower_name: input.borrower_name,
        class_name: input.class_name,
        student_id: input.student_id,
        phone: input.phone,
        equipment_name: input.equipment_name,
        quantity: input.quantity,
        loan_date: input.loan_date,
        due_date: input.due_date,
        note: input.note,
        photo_url,
        ..Default::default()
    };

    let request = render::RenderRequest {
        template_id: state.config.loan_template_id.clone(),
        title: format!(
            "Formulir Peminjaman {} - {}",
            format_ordinal(ordinal),
            loan.borrower_name
        ),
        substitutions: base_substitutions(&loan, ordinal),
        images: vec![("<<FOTO>>".into(), loan.photo_url.clone())],
    };
    let artifacts = render::render(
        state.documents.as_ref(),
        state.objects.as_ref(),
        &state.config,
        &request,
    )
    .await?;
    loan.pdf_url = artifacts.pdf_url;
    loan.doc_url = artifacts.doc_url;

    state
        .ledger
        .write_range(&LOAN.row_address(ordinal), vec![loan.to_row()])
        .await?;
    tracing::info!("loan {} recorded for {}", format_ordinal(ordinal), loan.borrower_name);

    // Borrower and approver notifications are independent and best-effort.
    notify::dispatch(
        state.messenger.as_ref(),
        &loan.phone,
        &notify::submit_borrower_message(&loan),
    )
    .await;
    notify::dispatch(
        state.messenger.as_ref(),
        &state.config.approver_number,
        &notify::submit_approver_message(&loan, &state.config.approval_link),
    )
    .await;

    Ok(())
}

/// Approve a loan. One operation, two modes; the hard precondition (id,
/// approver and decision present) is shared, as is tolerant id matching.
pub async fn approve(
    state: &AppState,
    input: ApprovalInput,
    mode: ApprovalMode,
) -> Result<(), ServiceError> {
    if input.loan_id.is_empty() || input.approver.is_empty() || input.decision.is_empty() {
        return Err(ServiceError::Validation(
            "ID Pinjam, Approver, dan Status Persetujuan harus diisi".to_string(),
        ));
    }

    let row = identity::resolve(state.ledger.as_ref(), &LOAN, &input.loan_id)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("loan {} not in ledger", input.loan_id))
        })?;
    let loan = LoanRecord::from_row(&row.cells);

    match mode {
        ApprovalMode::CellsOnly => {
            let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            let writes = [
                ('Q', input.decision.clone()),
                ('R', now),
                ('S', input.approver.clone()),
            ];
            for (column, value) in writes {
                state
                    .ledger
                    .write_range(
                        &LOAN.cell_address(column, row.row_number),
                        vec![vec![value]],
                    )
                    .await?;
            }
            tracing::info!(
                "loan {} marked {} by {}",
                input.loan_id,
                input.decision,
                input.approver
            );
            Ok(())
        }
        ApprovalMode::WithDocument => {
            let mut approval = ApprovalRecord {
                ordinal: 0,
                recorded_at: today(),
                borrower_name: loan.borrower_name.clone(),
                approver_name: input.approver,
                loan_ref: input.loan_id,
                decision: input.decision,
            };

            let mut substitutions = base_substitutions(&loan, loan.ordinal);
            substitutions.push((
                "<<TGLPS>>".into(),
                Local::now().format("%d %B %Y %H:%M").to_string(),
            ));
            substitutions.push(("<<STS>>".into(), approval.decision.clone()));
            substitutions.push(("<<YNG>>".into(), approval.approver_name.clone()));

            let request = render::RenderRequest {
                template_id: state.config.approval_template_id.clone(),
                title: format!(
                    "Formulir Approval {} - {}",
                    format_ordinal(loan.ordinal),
                    loan.borrower_name
                ),
                substitutions,
                images: vec![("<<FOTO>>".into(), loan.photo_url.clone())],
            };
            let artifacts = render::render(
                state.documents.as_ref(),
                state.objects.as_ref(),
                &state.config,
                &request,
            )
            .await?;

            approval.ordinal = state
                .sequencer
                .allocate_next(state.ledger.as_ref(), &APPROVAL)
                .await;
            state
                .ledger
                .write_range(
                    &APPROVAL.row_address(approval.ordinal),
                    vec![approval.to_row()],
                )
                .await?;
            tracing::info!(
                "approval {} recorded for loan {}",
                format_ordinal(approval.ordinal),
                approval.loan_ref
            );

            notify::dispatch(
                state.messenger.as_ref(),
                &loan.phone,
                &notify::approval_borrower_message(&loan, &approval, &artifacts.doc_url),
            )
            .await;
            notify::dispatch(
                state.messenger.as_ref(),
                &state.config.approver_number,
                &notify::approval_approver_message(&loan, &approval, &artifacts.doc_url),
            )
            .await;

            Ok(())
        }
    }
}

/// Return pipeline: runs after the caller has already been acked. A loan id
/// that resolves to nothing aborts before any write or notification.
pub async fn return_pipeline(state: &AppState, input: ReturnInput) -> Result<(), ServiceError> {
    let row = identity::resolve(state.ledger.as_ref(), &LOAN, &input.loan_id)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("loan {} not in ledger", input.loan_id))
        })?;
    let loan = LoanRecord::from_row(&row.cells);

    // Most recent approval for this loan; absent or unreadable joins as
    // empty fields rather than aborting the return.
    let approval = match identity::resolve_latest(state.ledger.as_ref(), &APPROVAL, &input.loan_id)
        .await
    {
        Ok(Some(found)) => ApprovalRecord::from_row(&found.cells),
        Ok(None) => ApprovalRecord::default(),
        Err(e) => {
            tracing::warn!("approval join failed for loan {}: {}", input.loan_id, e);
            ApprovalRecord::default()
        }
    };

    let photo_url = upload_staged_photo(state, input.staged_photo.clone()).await;

    let ordinal = state
        .sequencer
        .allocate_next(state.ledger.as_ref(), &RETURN)
        .await;

    let record = ReturnRecord {
        loan_ref: canonical_ref(&input.loan_id),
        borrower_name: loan.borrower_name.clone(),
        returned_at: today(),
        condition: input.condition,
        note: input.note,
        photo_url,
    };

    // The return document is numbered by the loan it closes when the
    // reference is numeric, by its own row ordinal otherwise.
    let doc_number = input.loan_id.trim().parse::<u32>().unwrap_or(ordinal);

    let mut substitutions = base_substitutions(&loan, doc_number);
    substitutions.push(("<<TGLBALI>>".into(), long_date()));
    substitutions.push(("<<KNDS>>".into(), record.condition.clone()));
    substitutions.push(("<<KETALT>>".into(), record.note.clone()));
    substitutions.push(("<<TGLPS>>".into(), approval.recorded_at.clone()));
    substitutions.push(("<<STS>>".into(), approval.decision.clone()));
    substitutions.push(("<<YNG>>".into(), approval.approver_name.clone()));

    let request = render::RenderRequest {
        template_id: state.config.return_template_id.clone(),
        title: format!(
            "Formulir Pengembalian {} - {}",
            format_ordinal(doc_number),
            loan.borrower_name
        ),
        substitutions,
        images: vec![
            ("<<FOTO>>".into(), loan.photo_url.clone()),
            ("<<FOTO2>>".into(), record.photo_url.clone()),
        ],
    };
    let artifacts = render::render(
        state.documents.as_ref(),
        state.objects.as_ref(),
        &state.config,
        &request,
    )
    .await?;

    state
        .ledger
        .write_range(&RETURN.row_address(ordinal), vec![record.to_row()])
        .await?;
    tracing::info!(
        "return recorded for loan {} ({})",
        record.loan_ref,
        record.condition
    );

    notify::dispatch(
        state.messenger.as_ref(),
        &loan.phone,
        &notify::return_borrower_message(&loan, &record, &artifacts.pdf_url),
    )
    .await;

    let approver_name = if approval.approver_name.is_empty() {
        "Bapak/Ibu".to_string()
    } else {
        approval.approver_name.clone()
    };
    notify::dispatch(
        state.messenger.as_ref(),
        &state.config.approver_number,
        &notify::return_approver_message(&loan, &record, &approver_name, &artifacts.pdf_url),
    )
    .await;

    Ok(())
}

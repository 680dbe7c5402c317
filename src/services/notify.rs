//! Notification dispatch: role-specific WhatsApp messages for each stage.
//!
//! Body construction is pure and independently testable; sending is one
//! best-effort call through the [`Messenger`] collaborator. A notification
//! failure never fails the surrounding pipeline.

use chrono::{Local, Timelike};

use crate::domain::Messenger;
use crate::models::{format_ordinal, ApprovalRecord, LoanRecord, ReturnRecord};
use crate::services::phone;

/// Time-of-day salutation, four bands.
pub fn salutation(hour: u32) -> &'static str {
    match hour {
        h if h < 11 => "Selamat pagi",
        h if h < 15 => "Selamat siang",
        h if h < 18 => "Selamat sore",
        _ => "Selamat malam",
    }
}

fn salutation_now() -> &'static str {
    salutation(Local::now().hour())
}

/// Normalize and send, best-effort. Returns whether a send was attempted
/// and succeeded; an address that cannot be normalized is skipped with a
/// warning and counts as not sent.
pub async fn dispatch(messenger: &dyn Messenger, raw_address: &str, body: &str) -> bool {
    let address = phone::normalize(raw_address);
    if address.is_empty() {
        tracing::warn!("invalid recipient address {:?}, message not sent", raw_address);
        return false;
    }
    match messenger.send(&address, body).await {
        Ok(()) => {
            tracing::info!("message sent to {}", address);
            true
        }
        Err(e) => {
            tracing::warn!("failed to send message to {}: {}", address, e);
            false
        }
    }
}

pub fn submit_borrower_message(loan: &LoanRecord) -> String {
    format!(
        "{salam} *{nama}* 👋\n\n\
         Terima kasih telah mengajukan izin pinjam alat dengan detail berikut:\n\n\
         🛠️ *Nama Alat*   : _{alat}_\n\
         📦 *Jumlah Alat* : _{jumlah}_\n\
         📅 *Tgl Pinjam*  : _{pinjam}_\n\
         📆 *Tgl Kembali* : _{kembali}_\n\n\
         📄 *Berikut adalah dokumen peminjaman alat*: {pdf}\n\n\
         ⏳ Mohon tunggu persetujuan. Izin akan dikirim melalui WA ini.\n\n\
         🙏 Terima kasih.",
        salam = salutation_now(),
        nama = loan.borrower_name,
        alat = loan.equipment_name,
        jumlah = loan.quantity,
        pinjam = loan.loan_date,
        kembali = loan.due_date,
        pdf = loan.pdf_url,
    )
}

pub fn submit_approver_message(loan: &LoanRecord, approval_link: &str) -> String {
    format!(
        "{salam} Bapak {nama}\n\n\
         {nama} telah mengajukan alat sebagai berikut:\n\
         🛠️ Nama Alat   : {alat}\n\
         📦 Jml Alat    : {jumlah}\n\
         📅 Tgl pinjam  : {pinjam}\n\
         📅 Tgl kembali : {kembali}\n\n\
         📄 Berikut adalah dokumen peminjaman alat: {pdf}\n\n\
         Mohon dapat memberikan persetujuan peminjaman alat melalui link berikut:\n\
         {link}\n\n\
         🆔 Untuk isian ID Peminjaman, silakan masukkan: {id} ✅\n\n\
         Terima kasih 🙏",
        salam = salutation_now(),
        nama = loan.borrower_name,
        alat = loan.equipment_name,
        jumlah = loan.quantity,
        pinjam = loan.loan_date,
        kembali = loan.due_date,
        pdf = loan.pdf_url,
        link = approval_link,
        id = format_ordinal(loan.ordinal),
    )
}

pub fn approval_borrower_message(loan: &LoanRecord, approval: &ApprovalRecord, doc_url: &str) -> String {
    format!(
        "{salam} {nama}\n\n\
         Pengajuan peminjaman alat berikut:\n\n\
         Nama Alat          : {alat}\n\
         Jumlah Alat        : {jumlah}\n\
         Tgl Pinjam         : {pinjam}\n\
         Tgl Harus Kembali  : {kembali}\n\
         Status Persetujuan : {status}\n\
         Pemberi ijin       : Bapak {approver}\n\n\
         Silahkan gunakan alat dengan baik.\n\
         Jika sudah selesai digunakan silahkan isi formulir pengembalian alat melalui link berikut: https://s.id/FormKembaliAlat\n\n\
         Dokumen persetujuan:\n{doc}\n\n\
         Terima Kasih 🙏",
        salam = salutation_now(),
        nama = loan.borrower_name,
        alat = loan.equipment_name,
        jumlah = loan.quantity,
        pinjam = loan.loan_date,
        kembali = loan.due_date,
        status = approval.decision,
        approver = approval.approver_name,
        doc = doc_url,
    )
}

pub fn approval_approver_message(loan: &LoanRecord, approval: &ApprovalRecord, doc_url: &str) -> String {
    format!(
        "{salam} Bapak/Ibu {approver}\n\n\
         Permohonan persetujuan dengan ID {id} dari {nama} telah diproses dengan status: {status}.\n\n\
         📄 Dokumen persetujuan: {doc}\n\n\
         Terima kasih.",
        salam = salutation_now(),
        approver = approval.approver_name,
        id = approval.loan_ref,
        nama = loan.borrower_name,
        status = approval.decision,
        doc = doc_url,
    )
}

pub fn return_borrower_message(loan: &LoanRecord, ret: &ReturnRecord, pdf_url: &str) -> String {
    format!(
        "{salam} *{nama}* 👋\n\n\
         Terima kasih telah melakukan pengembalian alat dengan detail berikut:\n\n\
         🛠️ *Nama Alat*   : _{alat}_\n\
         📦 *Jumlah Alat* : _{jumlah}_\n\
         📅 *Tgl Pinjam*  : _{pinjam}_\n\
         📆 *Tgl Kembali* : _{kembali}_\n\
         📋 *Kondisi Alat*: _{kondisi}_\n\n\
         📄 *Dokumen Pengembalian*: {pdf}\n\n\
         🙏 Terima kasih.",
        salam = salutation_now(),
        nama = loan.borrower_name,
        alat = loan.equipment_name,
        jumlah = loan.quantity,
        pinjam = loan.loan_date,
        kembali = loan.due_date,
        kondisi = ret.condition,
        pdf = pdf_url,
    )
}

pub fn return_approver_message(
    loan: &LoanRecord,
    ret: &ReturnRecord,
    approver_name: &str,
    pdf_url: &str,
) -> String {
    format!(
        "{salam} {approver}\n\n\
         Melaporkan, {nama} telah mengembalikan alat berikut:\n\n\
         Nama Alat         : {alat}\n\
         Jumlah Alat       : {jumlah}\n\
         Tgl Pinjam        : {pinjam}\n\
         Tgl Harus Kembali : {kembali}\n\
         Tgl Kembali       : {tgl_balik}\n\
         Kondisi Alat      : {kondisi}\n\
         Keterangan        : {ket}\n\n\
         Berikut dokumen pengembalian alat:\n{pdf}\n\n\
         Terima Kasih 🙏",
        salam = salutation_now(),
        approver = approver_name,
        nama = loan.borrower_name,
        alat = loan.equipment_name,
        jumlah = loan.quantity,
        pinjam = loan.loan_date,
        kembali = loan.due_date,
        tgl_balik = ret.returned_at,
        kondisi = ret.condition,
        ket = ret.note,
        pdf = pdf_url,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ServiceError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[test]
    fn salutation_bands() {
        assert_eq!(salutation(8), "Selamat pagi");
        assert_eq!(salutation(10), "Selamat pagi");
        assert_eq!(salutation(11), "Selamat siang");
        assert_eq!(salutation(13), "Selamat siang");
        assert_eq!(salutation(15), "Selamat sore");
        assert_eq!(salutation(17), "Selamat sore");
        assert_eq!(salutation(18), "Selamat malam");
        assert_eq!(salutation(20), "Selamat malam");
        assert_eq!(salutation(0), "Selamat pagi");
    }

    #[test]
    fn borrower_message_interpolates_record_fields() {
        let loan = LoanRecord {
            ordinal: 7,
            borrower_name: "Budi".into(),
            equipment_name: "Multimeter".into(),
            quantity: 3,
            loan_date: "2025-01-10".into(),
            due_date: "2025-01-15".into(),
            pdf_url: "https://drive.google.com/uc?id=pdf".into(),
            ..Default::default()
        };
        let body = submit_borrower_message(&loan);
        assert!(body.contains("*Budi*"));
        assert!(body.contains("_Multimeter_"));
        assert!(body.contains("_3_"));
        assert!(body.contains("https://drive.google.com/uc?id=pdf"));
    }

    #[test]
    fn approver_message_carries_portal_link_and_padded_id() {
        let loan = LoanRecord {
            ordinal: 7,
            borrower_name: "Budi".into(),
            ..Default::default()
        };
        let body = submit_approver_message(&loan, "https://portal.example/approve");
        assert!(body.contains("https://portal.example/approve"));
        assert!(body.contains("0007"));
    }

    struct RecordingMessenger {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send(&self, address: &str, _body: &str) -> Result<(), ServiceError> {
            self.sent.lock().unwrap().push(address.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn dispatch_normalizes_and_skips_invalid_addresses() {
        let messenger = RecordingMessenger {
            sent: Mutex::new(Vec::new()),
        };

        assert!(dispatch(&messenger, "0812-3456-7890", "halo").await);
        assert!(!dispatch(&messenger, "not a number", "halo").await);

        let sent = messenger.sent.lock().unwrap();
        assert_eq!(sent.as_slice(), ["6281234567890"]);
    }
}

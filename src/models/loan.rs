//! Loan record: one row in the loan intake region.

use chrono::NaiveDate;

use super::{cell, format_ordinal};

/// Column indices within the loan region (0-based, column A = 0).
/// Columns Q/R/S (16..=18) are the approval status block written by the
/// cells-only approve path.
pub const COL_ID: usize = 0;
pub const COL_SUBMITTED: usize = 1;
pub const COL_NAME: usize = 2;
pub const COL_CLASS: usize = 3;
pub const COL_STUDENT_ID: usize = 4;
pub const COL_PHONE: usize = 5;
pub const COL_EQUIPMENT: usize = 6;
pub const COL_QUANTITY: usize = 7;
pub const COL_LOAN_DATE: usize = 8;
pub const COL_DUE_DATE: usize = 9;
pub const COL_NOTE: usize = 10;
pub const COL_DURATION: usize = 11;
pub const COL_PHOTO_URL: usize = 12;
pub const COL_PDF_URL: usize = 13;
pub const COL_DOC_URL: usize = 14;
pub const COL_STATUS: usize = 16;

#[derive(Debug, Clone, Default)]
pub struct LoanRecord {
    pub ordinal: u32,
    pub submitted_at: String,
    pub borrower_name: String,
    pub class_name: String,
    pub student_id: String,
    pub phone: String,
    pub equipment_name: String,
    pub quantity: u32,
    pub loan_date: String,
    pub due_date: String,
    pub note: String,
    pub photo_url: String,
    pub pdf_url: String,
    pub doc_url: String,
    pub approval_status: String,
}

impl LoanRecord {
    /// Number of days between loan and due date, clamped to zero.
    /// Unparseable dates count as zero days rather than failing the pipeline.
    pub fn duration_days(&self) -> i64 {
        duration_days(&self.loan_date, &self.due_date)
    }

    pub fn duration_label(&self) -> String {
        format!("{} hari", self.duration_days())
    }

    /// Full row in ledger column order (A..Q). Column P is reserved and
    /// written empty; the rest of the approval block (R/S) is only ever
    /// written by the cells-only approve path.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            format_ordinal(self.ordinal),
            self.submitted_at.clone(),
            self.borrower_name.clone(),
            self.class_name.clone(),
            self.student_id.clone(),
            self.phone.clone(),
            self.equipment_name.clone(),
            self.quantity.to_string(),
            self.loan_date.clone(),
            self.due_date.clone(),
            self.note.clone(),
            self.duration_label(),
            self.photo_url.clone(),
            self.pdf_url.clone(),
            self.doc_url.clone(),
            String::new(),
            self.approval_status.clone(),
        ]
    }

    pub fn from_row(row: &[String]) -> Self {
        let ordinal = cell(row, COL_ID)
            .trim_start_matches('0')
            .parse()
            .unwrap_or(0);
        LoanRecord {
            ordinal,
            submitted_at: cell(row, COL_SUBMITTED),
            borrower_name: cell(row, COL_NAME),
            class_name: cell(row, COL_CLASS),
            student_id: cell(row, COL_STUDENT_ID),
            phone: cell(row, COL_PHONE),
            equipment_name: cell(row, COL_EQUIPMENT),
            quantity: cell(row, COL_QUANTITY).parse().unwrap_or(0),
            loan_date: cell(row, COL_LOAN_DATE),
            due_date: cell(row, COL_DUE_DATE),
            note: cell(row, COL_NOTE),
            photo_url: cell(row, COL_PHOTO_URL),
            pdf_url: cell(row, COL_PDF_URL),
            doc_url: cell(row, COL_DOC_URL),
            approval_status: cell(row, COL_STATUS),
        }
    }
}

/// Days between two `YYYY-MM-DD` dates, clamped to zero.
pub fn duration_days(loan_date: &str, due_date: &str) -> i64 {
    let start = NaiveDate::parse_from_str(loan_date, "%Y-%m-%d");
    let end = NaiveDate::parse_from_str(due_date, "%Y-%m-%d");
    match (start, end) {
        (Ok(start), Ok(end)) => (end - start).num_days().max(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_is_calendar_days() {
        assert_eq!(duration_days("2025-01-10", "2025-01-15"), 5);
        assert_eq!(duration_days("2025-01-15", "2025-01-10"), 0);
        assert_eq!(duration_days("garbage", "2025-01-10"), 0);
    }

    #[test]
    fn row_round_trip_keeps_fields() {
        let record = LoanRecord {
            ordinal: 7,
            submitted_at: "2025-01-10".into(),
            borrower_name: "Budi".into(),
            class_name: "XI TKJ 1".into(),
            student_id: "12345".into(),
            phone: "0812345".into(),
            equipment_name: "Multimeter".into(),
            quantity: 3,
            loan_date: "2025-01-10".into(),
            due_date: "2025-01-15".into(),
            note: "praktikum".into(),
            photo_url: "https://drive.google.com/uc?id=x".into(),
            pdf_url: String::new(),
            doc_url: String::new(),
            approval_status: String::new(),
        };
        let row = record.to_row();
        assert_eq!(row[COL_ID], "0007");
        assert_eq!(row[COL_DURATION], "5 hari");

        let parsed = LoanRecord::from_row(&row);
        assert_eq!(parsed.ordinal, 7);
        assert_eq!(parsed.borrower_name, "Budi");
        assert_eq!(parsed.quantity, 3);
        assert_eq!(parsed.photo_url, "https://drive.google.com/uc?id=x");
    }

    #[test]
    fn short_row_reads_as_empty_cells() {
        let parsed = LoanRecord::from_row(&["0001".into(), "2025-01-01".into()]);
        assert_eq!(parsed.ordinal, 1);
        assert_eq!(parsed.borrower_name, "");
        assert_eq!(parsed.photo_url, "");
    }
}

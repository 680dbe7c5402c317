//! Return record: one row in the return region. The referenced loan row is
//! never mutated by a return.

use super::cell;

pub const COL_LOAN_REF: usize = 0;
pub const COL_BORROWER: usize = 1;
pub const COL_RETURNED: usize = 2;
pub const COL_CONDITION: usize = 3;
pub const COL_NOTE: usize = 4;
pub const COL_PHOTO_URL: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct ReturnRecord {
    /// Referenced loan ordinal, stored zero-padded when numeric.
    pub loan_ref: String,
    pub borrower_name: String,
    pub returned_at: String,
    pub condition: String,
    pub note: String,
    pub photo_url: String,
}

impl ReturnRecord {
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.loan_ref.clone(),
            self.borrower_name.clone(),
            self.returned_at.clone(),
            self.condition.clone(),
            self.note.clone(),
            self.photo_url.clone(),
        ]
    }

    pub fn from_row(row: &[String]) -> Self {
        ReturnRecord {
            loan_ref: cell(row, COL_LOAN_REF),
            borrower_name: cell(row, COL_BORROWER),
            returned_at: cell(row, COL_RETURNED),
            condition: cell(row, COL_CONDITION),
            note: cell(row, COL_NOTE),
            photo_url: cell(row, COL_PHOTO_URL),
        }
    }
}

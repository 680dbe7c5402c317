//! Approval record: one row in the approval region, immutable once written.
//! Repeat approvals append new rows; they never overwrite earlier ones.

use super::{cell, format_ordinal};

pub const COL_ID: usize = 0;
pub const COL_RECORDED: usize = 1;
pub const COL_BORROWER: usize = 2;
pub const COL_APPROVER: usize = 3;
pub const COL_LOAN_REF: usize = 4;
pub const COL_DECISION: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct ApprovalRecord {
    /// Ordinal within the approval region, unrelated to the loan ordinal.
    pub ordinal: u32,
    pub recorded_at: String,
    pub borrower_name: String,
    pub approver_name: String,
    /// Loose reference to a loan ordinal, matched after stripping leading
    /// zeros. Stored as received from the caller.
    pub loan_ref: String,
    pub decision: String,
}

impl ApprovalRecord {
    pub fn to_row(&self) -> Vec<String> {
        vec![
            format_ordinal(self.ordinal),
            self.recorded_at.clone(),
            self.borrower_name.clone(),
            self.approver_name.clone(),
            self.loan_ref.clone(),
            self.decision.clone(),
        ]
    }

    pub fn from_row(row: &[String]) -> Self {
        ApprovalRecord {
            ordinal: cell(row, COL_ID)
                .trim_start_matches('0')
                .parse()
                .unwrap_or(0),
            recorded_at: cell(row, COL_RECORDED),
            borrower_name: cell(row, COL_BORROWER),
            approver_name: cell(row, COL_APPROVER),
            loan_ref: cell(row, COL_LOAN_REF),
            decision: cell(row, COL_DECISION),
        }
    }
}

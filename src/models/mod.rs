pub mod approval;
pub mod loan;
pub mod returns;

pub use approval::ApprovalRecord;
pub use loan::LoanRecord;
pub use returns::ReturnRecord;

/// Cell accessor tolerant of ragged rows: the ledger omits trailing empty
/// cells, so any index past the row's end reads as empty.
pub(crate) fn cell(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}

/// Format an ordinal the way the ledger stores it.
pub fn format_ordinal(ordinal: u32) -> String {
    format!("{:04}", ordinal)
}

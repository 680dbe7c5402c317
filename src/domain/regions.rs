//! Ledger region layouts
//!
//! The spreadsheet holds three fixed-layout regions (tabs). Each region has
//! a header block, a designated column used to measure how many data rows
//! exist, and a key column used for tolerant id matching. Row addresses are
//! 1-based spreadsheet rows; ordinals are 1-based within the data block.

/// One named, fixed-layout portion of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Sheet tab name.
    pub name: &'static str,
    /// Rows above the first data row.
    pub header_rows: u32,
    /// Column whose non-empty extent measures the current row count.
    pub count_column: char,
    /// 0-based index of the identifier column used by tolerant matching.
    pub key_column: usize,
}

impl Region {
    /// Range covering every data row in full width, e.g. `"Form Peminjam!A5:Z"`.
    pub fn data_range(&self) -> String {
        format!("{}!A{}:Z", self.name, self.header_rows + 1)
    }

    /// Open-ended range of the count column, e.g. `"Form Peminjam!B5:B"`.
    pub fn count_range(&self) -> String {
        format!(
            "{}!{}{}:{}",
            self.name,
            self.count_column,
            self.header_rows + 1,
            self.count_column
        )
    }

    /// Spreadsheet row number holding the given ordinal.
    pub fn row_for_ordinal(&self, ordinal: u32) -> u32 {
        self.header_rows + ordinal
    }

    /// Write address for a whole row at the given ordinal, e.g. `"Form Peminjam!A5"`.
    pub fn row_address(&self, ordinal: u32) -> String {
        format!("{}!A{}", self.name, self.row_for_ordinal(ordinal))
    }

    /// Address of a single cell by column letter and spreadsheet row.
    pub fn cell_address(&self, column: char, row: u32) -> String {
        format!("{}!{}{}", self.name, column, row)
    }
}

/// Loan intake region. Identifier in column A, count measured on column B.
pub const LOAN: Region = Region {
    name: "Form Peminjam",
    header_rows: 4,
    count_column: 'B',
    key_column: 0,
};

/// Approval region. Own ordinal in column A; the loan reference used for
/// cross-region joins sits in column E.
pub const APPROVAL: Region = Region {
    name: "Approval Peminjaman",
    header_rows: 5,
    count_column: 'A',
    key_column: 4,
};

/// Return region. Keyed by the referenced loan id in column A.
pub const RETURN: Region = Region {
    name: "Form Pengembalian",
    header_rows: 4,
    count_column: 'B',
    key_column: 0,
};

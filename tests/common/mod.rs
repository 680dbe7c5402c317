//! In-memory collaborator fakes shared by the integration tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use pinjamalat::config::Config;
use pinjamalat::domain::{
    DocumentStore, DuplicatedDocument, LedgerStore, Messenger, ObjectStore, ServiceError,
};
use pinjamalat::infrastructure::AppState;

/// Spreadsheet fake: sheets of sparse 1-based rows, addressed with the same
/// A1 ranges the real client sends.
#[derive(Default)]
pub struct InMemoryLedger {
    sheets: Mutex<HashMap<String, BTreeMap<u32, Vec<String>>>>,
}

impl InMemoryLedger {
    pub fn seed_row(&self, sheet: &str, row: u32, cells: Vec<String>) {
        self.sheets
            .lock()
            .unwrap()
            .entry(sheet.to_string())
            .or_default()
            .insert(row, cells);
    }

    pub fn row(&self, sheet: &str, row: u32) -> Option<Vec<String>> {
        self.sheets
            .lock()
            .unwrap()
            .get(sheet)
            .and_then(|rows| rows.get(&row))
            .cloned()
    }

    pub fn row_count(&self, sheet: &str) -> usize {
        self.sheets
            .lock()
            .unwrap()
            .get(sheet)
            .map(|rows| rows.len())
            .unwrap_or(0)
    }
}

/// `"B5"` -> (column index 1, row 5). Single letters only; the regions never
/// go past column Z.
fn parse_ref(cell_ref: &str) -> (usize, u32) {
    let letters: String = cell_ref
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    let digits: String = cell_ref
        .chars()
        .skip_while(|c| c.is_ascii_alphabetic())
        .collect();
    let col = letters
        .chars()
        .fold(0usize, |acc, c| acc * 26 + (c as usize - 'A' as usize + 1));
    (col.saturating_sub(1), digits.parse().unwrap_or(1))
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, ServiceError> {
        let (sheet, a1) = range
            .split_once('!')
            .ok_or_else(|| ServiceError::Ledger(format!("bad range {}", range)))?;
        let (start, end) = a1.split_once(':').unwrap_or((a1, a1));
        let (start_col, start_row) = parse_ref(start);
        let column_only = !end.chars().any(|c| c.is_ascii_digit()) && end == start[..1].to_string();

        let sheets = self.sheets.lock().unwrap();
        let Some(rows) = sheets.get(sheet) else {
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        for (&row, cells) in rows.range(start_row..) {
            let _ = row;
            if column_only {
                let value = cells.get(start_col).cloned().unwrap_or_default();
                if !value.is_empty() {
                    out.push(vec![value]);
                }
            } else {
                out.push(cells.clone());
            }
        }
        Ok(out)
    }

    async fn write_range(&self, start: &str, rows: Vec<Vec<String>>) -> Result<(), ServiceError> {
        let (sheet, a1) = start
            .split_once('!')
            .ok_or_else(|| ServiceError::Ledger(format!("bad range {}", start)))?;
        let (col, row) = parse_ref(a1);

        let mut sheets = self.sheets.lock().unwrap();
        let entry = sheets.entry(sheet.to_string()).or_default();
        if col == 0 {
            for (i, cells) in rows.into_iter().enumerate() {
                entry.insert(row + i as u32, cells);
            }
        } else {
            // Single-cell write into an existing row.
            let value = rows
                .first()
                .and_then(|r| r.first())
                .cloned()
                .unwrap_or_default();
            let cells = entry.entry(row).or_default();
            if cells.len() <= col {
                cells.resize(col + 1, String::new());
            }
            cells[col] = value;
        }
        Ok(())
    }
}

/// Document fake whose templates contain every placeholder. Records titles
/// and substitution batches for assertion.
#[derive(Default)]
pub struct FakeDocuments {
    pub titles: Mutex<Vec<String>>,
    pub substitutions: Mutex<Vec<Vec<(String, String)>>>,
    counter: Mutex<u32>,
}

#[async_trait]
impl DocumentStore for FakeDocuments {
    async fn duplicate_template(
        &self,
        _template_id: &str,
        title: &str,
    ) -> Result<DuplicatedDocument, ServiceError> {
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;
        self.titles.lock().unwrap().push(title.to_string());
        Ok(DuplicatedDocument {
            id: format!("doc-{}", counter),
            url: format!("https://docs.test/doc-{}", counter),
        })
    }

    async fn relocate(&self, _doc_id: &str, _collection_id: &str) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn replace_text(
        &self,
        _doc_id: &str,
        substitutions: &[(String, String)],
    ) -> Result<Vec<u64>, ServiceError> {
        self.substitutions
            .lock()
            .unwrap()
            .push(substitutions.to_vec());
        Ok(vec![1; substitutions.len()])
    }

    async fn locate_token(&self, _doc_id: &str, _token: &str) -> Result<Option<i64>, ServiceError> {
        Ok(Some(1))
    }

    async fn splice_image(
        &self,
        _doc_id: &str,
        _start: i64,
        _end: i64,
        _image_url: &str,
    ) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn grant_public_read(&self, _file_id: &str) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn export_pdf(&self, _doc_id: &str) -> Result<Vec<u8>, ServiceError> {
        Ok(b"%PDF-1.4 fake".to_vec())
    }
}

#[derive(Default)]
pub struct FakeObjects {
    /// (filename, mime, collection)
    pub uploads: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl ObjectStore for FakeObjects {
    async fn upload_public(
        &self,
        filename: &str,
        mime: &str,
        _bytes: Vec<u8>,
        collection_id: &str,
    ) -> Result<String, ServiceError> {
        self.uploads.lock().unwrap().push((
            filename.to_string(),
            mime.to_string(),
            collection_id.to_string(),
        ));
        Ok(format!("https://files.test/{}", filename))
    }
}

#[derive(Default)]
pub struct RecordingMessenger {
    /// (normalized address, body)
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, address: &str, body: &str) -> Result<(), ServiceError> {
        self.sent
            .lock()
            .unwrap()
            .push((address.to_string(), body.to_string()));
        Ok(())
    }
}

pub struct Harness {
    pub state: AppState,
    pub ledger: Arc<InMemoryLedger>,
    pub documents: Arc<FakeDocuments>,
    pub objects: Arc<FakeObjects>,
    pub messenger: Arc<RecordingMessenger>,
    // Staging directory lives as long as the harness.
    _upload_dir: tempfile::TempDir,
}

pub fn harness() -> Harness {
    let upload_dir = tempfile::tempdir().expect("tempdir");
    let mut config = Config::for_tests();
    config.upload_dir = upload_dir.path().display().to_string();

    let ledger = Arc::new(InMemoryLedger::default());
    let documents = Arc::new(FakeDocuments::default());
    let objects = Arc::new(FakeObjects::default());
    let messenger = Arc::new(RecordingMessenger::default());

    let state = AppState::new(
        config,
        ledger.clone(),
        documents.clone(),
        objects.clone(),
        messenger.clone(),
    );

    Harness {
        state,
        ledger,
        documents,
        objects,
        messenger,
        _upload_dir: upload_dir,
    }
}

//! Collaborator trait definitions
//!
//! These traits define the contract for the four external systems the
//! orchestrator talks to. Implementations live in the infrastructure layer;
//! tests substitute in-memory fakes.

use async_trait::async_trait;

use super::ServiceError;

/// A freshly duplicated document, addressable by its opaque id.
#[derive(Debug, Clone)]
pub struct DuplicatedDocument {
    pub id: String,
    pub url: String,
}

/// The shared spreadsheet. Range-read and range-write only: the ledger
/// offers no transactions, no locks and no uniqueness constraints, so every
/// safety property on top of it is built in the service layer.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Read an ordered block of rows, e.g. `"Form Peminjam!A5:Z"`.
    /// Trailing empty cells may be absent from a row.
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, ServiceError>;

    /// Write rows starting at a cell address, overwrite semantics.
    async fn write_range(&self, start: &str, rows: Vec<Vec<String>>) -> Result<(), ServiceError>;
}

/// The document templating collaborator (duplicate, move, edit, share,
/// export), addressed by the opaque id returned from the duplicate step.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn duplicate_template(
        &self,
        template_id: &str,
        title: &str,
    ) -> Result<DuplicatedDocument, ServiceError>;

    /// Move the document out of its default location. Callers treat failure
    /// as non-fatal: the document stays usable where it was created.
    async fn relocate(&self, doc_id: &str, collection_id: &str) -> Result<(), ServiceError>;

    /// Apply all substitutions as one batched, case-sensitive, exact-match
    /// replace-all. Returns how many occurrences each token matched, in the
    /// order given.
    async fn replace_text(
        &self,
        doc_id: &str,
        substitutions: &[(String, String)],
    ) -> Result<Vec<u64>, ServiceError>;

    /// First occurrence of `token` in document order, as a character index.
    async fn locate_token(&self, doc_id: &str, token: &str) -> Result<Option<i64>, ServiceError>;

    /// Delete exactly `[start, end)` and insert an inline image anchored at
    /// `start` with the fixed target size.
    async fn splice_image(
        &self,
        doc_id: &str,
        start: i64,
        end: i64,
        image_url: &str,
    ) -> Result<(), ServiceError>;

    async fn grant_public_read(&self, file_id: &str) -> Result<(), ServiceError>;

    /// Export the document to the portable format (PDF).
    async fn export_pdf(&self, doc_id: &str) -> Result<Vec<u8>, ServiceError>;
}

/// Durable object storage for uploaded photos and exported artifacts.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload bytes as a publicly readable object inside `collection_id`,
    /// returning a stable retrieval URL.
    async fn upload_public(
        &self,
        filename: &str,
        mime: &str,
        bytes: Vec<u8>,
        collection_id: &str,
    ) -> Result<String, ServiceError>;
}

/// The messaging gateway. One synchronous send, bounded timeout, no retry.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, address: &str, body: &str) -> Result<(), ServiceError>;
}

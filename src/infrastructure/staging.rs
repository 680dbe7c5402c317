//! Local staging of uploaded files.
//!
//! Each upload is written once under a timestamp-qualified name (names never
//! collide in practice), read once by the uploader, and removed afterwards.
//! The staging area is the only process-local mutable resource.

use std::path::{Path, PathBuf};

use chrono::Utc;

/// Write an uploaded file into the staging directory under a globally
/// unique name, returning its path.
pub async fn save_upload(
    dir: &str,
    original_name: &str,
    bytes: &[u8],
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let filename = format!("{}_{}", nanos, sanitize(original_name));
    let path = Path::new(dir).join(filename);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Keep only path-safe characters from a client-supplied filename.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload.bin".to_string()
    } else {
        cleaned
    }
}

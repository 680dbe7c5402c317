//! Object storage client (Google Drive multipart upload).

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use crate::domain::{ObjectStore, ServiceError};

pub struct DriveObjects {
    client: reqwest::Client,
    upload_base: String,
    drive_base: String,
    token: String,
}

impl DriveObjects {
    pub fn new(upload_base: &str, drive_base: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            upload_base: upload_base.trim_end_matches('/').to_string(),
            drive_base: drive_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for DriveObjects {
    async fn upload_public(
        &self,
        filename: &str,
        mime: &str,
        bytes: Vec<u8>,
        collection_id: &str,
    ) -> Result<String, ServiceError> {
        let metadata = json!({
            "name": filename,
            "parents": [collection_id],
            "mimeType": mime,
        });

        let form = reqwest::multipart::Form::new()
            .part(
                "metadata",
                reqwest::multipart::Part::text(metadata.to_string())
                    .mime_str("application/json")
                    .map_err(|e| ServiceError::Storage(format!("upload metadata: {}", e)))?,
            )
            .part(
                "media",
                reqwest::multipart::Part::bytes(bytes)
                    .file_name(filename.to_string())
                    .mime_str(mime)
                    .map_err(|e| ServiceError::Storage(format!("upload media: {}", e)))?,
            );

        let url = format!(
            "{}/upload/drive/v3/files?uploadType=multipart",
            self.upload_base
        );
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ServiceError::Storage(format!("upload {}: {}", filename, e)))?;

        if !resp.status().is_success() {
            return Err(ServiceError::Storage(format!(
                "upload {}: status {}",
                filename,
                resp.status()
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| ServiceError::Storage(format!("upload {}: {}", filename, e)))?;
        let id = body["id"]
            .as_str()
            .ok_or_else(|| ServiceError::Storage(format!("upload {}: no id in response", filename)))?
            .to_string();

        // A file that cannot be shared is still usable through the API, so
        // a failed permission grant only downgrades the link.
        let perm_url = format!("{}/drive/v3/files/{}/permissions", self.drive_base, id);
        let shared = self
            .client
            .post(perm_url)
            .bearer_auth(&self.token)
            .json(&json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await;
        match shared {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => warn!(file_id = %id, status = %resp.status(), "could not share uploaded file"),
            Err(e) => warn!(file_id = %id, error = %e, "could not share uploaded file"),
        }

        Ok(format!("https://drive.google.com/uc?id={}", id))
    }
}

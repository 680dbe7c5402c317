//! Document collaborator client (Google Docs + Drive file operations).

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::{DocumentStore, DuplicatedDocument, ServiceError};
use crate::services::render;

pub struct GoogleDocuments {
    client: reqwest::Client,
    docs_base: String,
    drive_base: String,
    token: String,
}

impl GoogleDocuments {
    pub fn new(docs_base: &str, drive_base: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            docs_base: docs_base.trim_end_matches('/').to_string(),
            drive_base: drive_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    async fn batch_update(&self, doc_id: &str, requests: Value) -> Result<Value, ServiceError> {
        let url = format!("{}/v1/documents/{}:batchUpdate", self.docs_base, doc_id);
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(|e| ServiceError::Document(format!("batch update: {}", e)))?;

        if !resp.status().is_success() {
            return Err(ServiceError::Document(format!(
                "batch update: status {}",
                resp.status()
            )));
        }
        resp.json()
            .await
            .map_err(|e| ServiceError::Document(format!("batch update: {}", e)))
    }
}

#[async_trait]
impl DocumentStore for GoogleDocuments {
    async fn duplicate_template(
        &self,
        template_id: &str,
        title: &str,
    ) -> Result<DuplicatedDocument, ServiceError> {
        let url = format!("{}/drive/v3/files/{}/copy", self.drive_base, template_id);
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({ "name": title }))
            .send()
            .await
            .map_err(|e| ServiceError::Document(format!("copy template: {}", e)))?;

        if !resp.status().is_success() {
            return Err(ServiceError::Document(format!(
                "copy template: status {}",
                resp.status()
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| ServiceError::Document(format!("copy template: {}", e)))?;
        let id = body["id"]
            .as_str()
            .ok_or_else(|| ServiceError::Document("copy template: no id in response".into()))?
            .to_string();
        let url = format!("https://docs.google.com/document/d/{}/edit", id);
        Ok(DuplicatedDocument { id, url })
    }

    async fn relocate(&self, doc_id: &str, collection_id: &str) -> Result<(), ServiceError> {
        let url = format!(
            "{}/drive/v3/files/{}?addParents={}&removeParents=root",
            self.drive_base, doc_id, collection_id
        );
        let resp = self
            .client
            .patch(url)
            .bearer_auth(&self.token)
            .json(&json!({}))
            .send()
            .await
            .map_err(|e| ServiceError::Document(format!("relocate: {}", e)))?;
        if !resp.status().is_success() {
            return Err(ServiceError::Document(format!(
                "relocate: status {}",
                resp.status()
            )));
        }
        Ok(())
    }

    async fn replace_text(
        &self,
        doc_id: &str,
        substitutions: &[(String, String)],
    ) -> Result<Vec<u64>, ServiceError> {
        let requests: Vec<Value> = substitutions
            .iter()
            .map(|(token, value)| {
                json!({
                    "replaceAllText": {
                        "containsText": { "text": token, "matchCase": true },
                        "replaceText": value,
                    }
                })
            })
            .collect();

        let body = self.batch_update(doc_id, Value::Array(requests)).await?;

        // One reply per request, in order; a token that matched nothing
        // comes back without an occurrence count.
        let empty = Vec::new();
        let replies = body["replies"].as_array().unwrap_or(&empty);
        Ok((0..substitutions.len())
            .map(|i| {
                replies
                    .get(i)
                    .and_then(|r| r["replaceAllText"]["occurrencesChanged"].as_u64())
                    .unwrap_or(0)
            })
            .collect())
    }

    async fn locate_token(&self, doc_id: &str, token: &str) -> Result<Option<i64>, ServiceError> {
        let url = format!("{}/v1/documents/{}", self.docs_base, doc_id);
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ServiceError::Document(format!("get document: {}", e)))?;
        if !resp.status().is_success() {
            return Err(ServiceError::Document(format!(
                "get document: status {}",
                resp.status()
            )));
        }
        let body: Value = resp
            .json()
            .await
            .map_err(|e| ServiceError::Document(format!("get document: {}", e)))?;

        Ok(find_token_index(&body, token))
    }

    async fn splice_image(
        &self,
        doc_id: &str,
        start: i64,
        end: i64,
        image_url: &str,
    ) -> Result<(), ServiceError> {
        let (width, height) = render::image_size_pt();
        let requests = json!([
            {
                "deleteContentRange": {
                    "range": { "startIndex": start, "endIndex": end }
                }
            },
            {
                "insertInlineImage": {
                    "location": { "index": start },
                    "uri": image_url,
                    "objectSize": {
                        "width": { "magnitude": width, "unit": "PT" },
                        "height": { "magnitude": height, "unit": "PT" },
                    }
                }
            }
        ]);
        self.batch_update(doc_id, requests).await.map(|_| ())
    }

    async fn grant_public_read(&self, file_id: &str) -> Result<(), ServiceError> {
        let url = format!("{}/drive/v3/files/{}/permissions", self.drive_base, file_id);
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await
            .map_err(|e| ServiceError::Document(format!("share: {}", e)))?;
        if !resp.status().is_success() {
            return Err(ServiceError::Document(format!(
                "share: status {}",
                resp.status()
            )));
        }
        Ok(())
    }

    async fn export_pdf(&self, doc_id: &str) -> Result<Vec<u8>, ServiceError> {
        let url = format!(
            "{}/drive/v3/files/{}/export?mimeType=application/pdf",
            self.drive_base, doc_id
        );
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ServiceError::Document(format!("export: {}", e)))?;
        if !resp.status().is_success() {
            return Err(ServiceError::Document(format!(
                "export: status {}",
                resp.status()
            )));
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ServiceError::Document(format!("export: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

/// Walk the document body for the first text run containing `token` and
/// return the token's character index within the document.
fn find_token_index(document: &Value, token: &str) -> Option<i64> {
    let content = document["body"]["content"].as_array()?;
    for block in content {
        let Some(elements) = block["paragraph"]["elements"].as_array() else {
            continue;
        };
        for element in elements {
            let Some(text) = element["textRun"]["content"].as_str() else {
                continue;
            };
            if let Some(byte_pos) = text.find(token) {
                let start = element["startIndex"].as_i64().unwrap_or(0);
                let offset = text[..byte_pos].chars().count() as i64;
                return Some(start + offset);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_index_accounts_for_element_offset() {
        let document = json!({
            "body": { "content": [
                { "sectionBreak": {} },
                { "paragraph": { "elements": [
                    { "startIndex": 10, "textRun": { "content": "Foto: <<FOTO>>\n" } }
                ]}}
            ]}
        });
        assert_eq!(find_token_index(&document, "<<FOTO>>"), Some(16));
        assert_eq!(find_token_index(&document, "<<FOTO2>>"), None);
    }
}

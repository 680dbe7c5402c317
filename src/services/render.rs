//! Document rendering: duplicate a template, fill placeholders, publish,
//! and derive the portable (PDF) artifact.
//!
//! Fatal steps: duplicate, text substitution, export/upload. Everything else
//! (relocation, image placeholders, public sharing) degrades gracefully: the
//! document stays usable, the gap is logged.

use std::path::PathBuf;

use crate::config::Config;
use crate::domain::{DocumentStore, ObjectStore, ServiceError};

/// Fixed inline image target size in points.
const IMAGE_WIDTH_PT: f64 = 400.0;
const IMAGE_HEIGHT_PT: f64 = 225.0;

#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    pub template_id: String,
    pub title: String,
    /// Placeholder token -> literal replacement, applied as one batch.
    pub substitutions: Vec<(String, String)>,
    /// Placeholder token -> image URL, each processed as an independent pass.
    pub images: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct RenderedArtifacts {
    pub doc_url: String,
    pub pdf_url: String,
}

pub async fn render(
    documents: &dyn DocumentStore,
    objects: &dyn ObjectStore,
    config: &Config,
    request: &RenderRequest,
) -> Result<RenderedArtifacts, ServiceError> {
    // 1. Duplicate the template under the deterministic title.
    let doc = documents
        .duplicate_template(&request.template_id, &request.title)
        .await?;

    // 2. Move it into the destination collection. Non-fatal: the document
    // remains usable at its original location.
    if let Err(e) = documents.relocate(&doc.id, &config.doc_folder_id).await {
        tracing::warn!(doc_id = %doc.id, "failed to relocate document: {}", e);
    }

    // 3. Batched, case-sensitive replace-all. In strict mode a token that
    // matched nothing fails the render; lenient mode leaves it in place.
    let occurrences = documents
        .replace_text(&doc.id, &request.substitutions)
        .await?;
    for ((token, _), count) in request.substitutions.iter().zip(&occurrences) {
        if *count == 0 {
            if config.strict_templates {
                return Err(ServiceError::Document(format!(
                    "placeholder {} not present in template {}",
                    token, request.template_id
                )));
            }
            tracing::warn!(doc_id = %doc.id, "placeholder {} matched nothing", token);
        }
    }

    // 4. Image placeholders, each an independent pass: a missing token is
    // skipped, a splice failure is logged, neither fails the render.
    for (token, image_url) in &request.images {
        if image_url.is_empty() {
            tracing::debug!(doc_id = %doc.id, "no image for {}, leaving placeholder", token);
            continue;
        }
        match documents.locate_token(&doc.id, token).await {
            Ok(Some(start)) => {
                let end = start + token.chars().count() as i64;
                if let Err(e) = documents
                    .splice_image(&doc.id, start, end, image_url)
                    .await
                {
                    tracing::warn!(doc_id = %doc.id, "failed to insert image at {}: {}", token, e);
                }
            }
            Ok(None) => {
                tracing::warn!(doc_id = %doc.id, "image placeholder {} not found", token);
            }
            Err(e) => {
                tracing::warn!(doc_id = %doc.id, "could not scan for {}: {}", token, e);
            }
        }
    }

    // 5. Public read access, non-fatal.
    if let Err(e) = documents.grant_public_read(&doc.id).await {
        tracing::warn!(doc_id = %doc.id, "failed to share document: {}", e);
    }

    // 6. Export to PDF, stage locally, upload as a stored artifact, clean up.
    let pdf_bytes = documents.export_pdf(&doc.id).await?;
    let staging = stage_pdf(&config.upload_dir, &request.title, &pdf_bytes).await?;
    let upload = async {
        let bytes = tokio::fs::read(&staging).await?;
        objects
            .upload_public(
                &format!("{}.pdf", request.title),
                "application/pdf",
                bytes,
                &config.pdf_folder_id,
            )
            .await
    }
    .await;
    if let Err(e) = tokio::fs::remove_file(&staging).await {
        tracing::warn!("failed to remove staged export {:?}: {}", staging, e);
    }
    let pdf_url = upload?;

    Ok(RenderedArtifacts {
        doc_url: doc.url,
        pdf_url,
    })
}

async fn stage_pdf(dir: &str, title: &str, bytes: &[u8]) -> Result<PathBuf, ServiceError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = PathBuf::from(dir).join(format!("{}.pdf", title));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Insert requests use the fixed target size; exposed for the infrastructure
/// client so the wire call and the contract stay in one place.
pub fn image_size_pt() -> (f64, f64) {
    (IMAGE_WIDTH_PT, IMAGE_HEIGHT_PT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DuplicatedDocument;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedDocs {
        calls: Mutex<Vec<String>>,
        /// Text content the fake template "contains"; replace_text reports
        /// one occurrence per token found here.
        template_text: String,
    }

    #[async_trait]
    impl DocumentStore for ScriptedDocs {
        async fn duplicate_template(
            &self,
            _template_id: &str,
            title: &str,
        ) -> Result<DuplicatedDocument, ServiceError> {
            self.calls.lock().unwrap().push(format!("copy:{}", title));
            Ok(DuplicatedDocument {
                id: "doc-1".into(),
                url: "https://docs.example/doc-1".into(),
            })
        }

        async fn relocate(&self, _doc_id: &str, _collection: &str) -> Result<(), ServiceError> {
            self.calls.lock().unwrap().push("relocate".into());
            // Relocation failure must not fail the render.
            Err(ServiceError::Storage("no such collection".into()))
        }

        async fn replace_text(
            &self,
            _doc_id: &str,
            substitutions: &[(String, String)],
        ) -> Result<Vec<u64>, ServiceError> {
            self.calls.lock().unwrap().push("replace".into());
            Ok(substitutions
                .iter()
                .map(|(token, _)| u64::from(self.template_text.contains(token.as_str())))
                .collect())
        }

        async fn locate_token(
            &self,
            _doc_id: &str,
            token: &str,
        ) -> Result<Option<i64>, ServiceError> {
            Ok(self
                .template_text
                .find(token)
                .map(|byte_pos| byte_pos as i64))
        }

        async fn splice_image(
            &self,
            _doc_id: &str,
            start: i64,
            end: i64,
            _image_url: &str,
        ) -> Result<(), ServiceError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("image:{}..{}", start, end));
            Ok(())
        }

        async fn grant_public_read(&self, _file_id: &str) -> Result<(), ServiceError> {
            self.calls.lock().unwrap().push("share".into());
            Ok(())
        }

        async fn export_pdf(&self, _doc_id: &str) -> Result<Vec<u8>, ServiceError> {
            self.calls.lock().unwrap().push("export".into());
            Ok(b"%PDF-1.4 fake".to_vec())
        }
    }

    struct FakeObjects;

    #[async_trait]
    impl ObjectStore for FakeObjects {
        async fn upload_public(
            &self,
            filename: &str,
            _mime: &str,
            _bytes: Vec<u8>,
            _collection: &str,
        ) -> Result<String, ServiceError> {
            Ok(format!("https://objects.example/{}", filename))
        }
    }

    fn request() -> RenderRequest {
        RenderRequest {
            template_id: "tpl".into(),
            title: "Formulir Peminjaman 0001 - Budi".into(),
            substitutions: vec![
                ("<<NAMA>>".into(), "Budi".into()),
                ("<<JML>>".into(), "3".into()),
            ],
            images: vec![("<<FOTO>>".into(), "https://img.example/1.jpg".into())],
        }
    }

    fn test_config(dir: &tempfile::TempDir) -> Config {
        let mut config = Config::for_tests();
        config.upload_dir = dir.path().display().to_string();
        config
    }

    #[tokio::test]
    async fn render_survives_relocation_failure_and_missing_image_token() {
        let docs = ScriptedDocs {
            template_text: "<<NAMA>> meminjam <<JML>> alat".into(),
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();

        let artifacts = render(&docs, &FakeObjects, &test_config(&dir), &request())
            .await
            .unwrap();
        assert_eq!(artifacts.doc_url, "https://docs.example/doc-1");
        assert!(artifacts.pdf_url.ends_with(".pdf"));

        // <<FOTO>> is absent from the template: skipped, not fatal.
        let calls = docs.calls.lock().unwrap();
        assert!(!calls.iter().any(|c| c.starts_with("image:")));
        assert!(calls.contains(&"export".to_string()));
    }

    #[tokio::test]
    async fn image_token_is_spliced_over_its_exact_span() {
        let docs = ScriptedDocs {
            template_text: "foto: <<FOTO>> selesai <<NAMA>> <<JML>>".into(),
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();

        render(&docs, &FakeObjects, &test_config(&dir), &request())
            .await
            .unwrap();

        let calls = docs.calls.lock().unwrap();
        let span = format!("image:{}..{}", 6, 6 + "<<FOTO>>".len());
        assert!(calls.contains(&span), "calls: {:?}", calls);
    }

    #[tokio::test]
    async fn strict_mode_rejects_unmatched_placeholder() {
        let docs = ScriptedDocs {
            template_text: "<<NAMA>> only".into(),
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(&dir);
        config.strict_templates = true;

        let err = render(&docs, &FakeObjects, &config, &request())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Document(_)), "{}", err);
    }

    #[tokio::test]
    async fn lenient_mode_tolerates_unmatched_placeholder() {
        let docs = ScriptedDocs {
            template_text: "<<NAMA>> only".into(),
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();

        assert!(render(&docs, &FakeObjects, &test_config(&dir), &request())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn staged_export_is_removed_after_upload() {
        let docs = ScriptedDocs {
            template_text: "<<NAMA>> <<JML>>".into(),
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();

        render(&docs, &FakeObjects, &test_config(&dir), &request())
            .await
            .unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert!(leftovers.is_empty(), "staging files left behind");
    }
}

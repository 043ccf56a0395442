//! crates/recruitment_core/src/uploads.rs
//!
//! Stores a candidate document and returns the link written into the sheet.

use crate::documents::format_file_size;
use crate::domain::{DocumentKind, UploadedFile};
use crate::ports::{FileStore, FileUpload, PortResult};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct DocumentUploader {
    files: Arc<dyn FileStore>,
    folder_id: String,
}

impl DocumentUploader {
    pub fn new(files: Arc<dyn FileStore>, folder_id: impl Into<String>) -> Self {
        Self {
            files,
            folder_id: folder_id.into(),
        }
    }

    /// Uploads into the destination folder as `<KIND>_<nik>_<millis>`, then tries
    /// to make the object link-readable. A failed permission grant is only logged.
    pub async fn upload(
        &self,
        kind: DocumentKind,
        nik: &str,
        file: UploadedFile,
        now_millis: u64,
    ) -> PortResult<String> {
        let name = format!("{}_{}_{}", kind.file_prefix(), nik, now_millis);
        let size = format_file_size(file.size());
        let stored = self
            .files
            .upload(FileUpload {
                name: name.clone(),
                parent_folder: self.folder_id.clone(),
                mime_type: file.mime_type,
                bytes: file.bytes,
            })
            .await?;
        info!(file_id = %stored.id, name = %name, size = %size, "Document uploaded");

        if let Err(e) = self.files.grant_public_read(&stored.id).await {
            warn!(file_id = %stored.id, "Could not make file public: {}", e);
        }

        Ok(self.files.viewer_url(&stored.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{PortError, StoredFile};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeFiles {
        uploads: Mutex<Vec<FileUpload>>,
        deny_permissions: bool,
    }

    #[async_trait]
    impl FileStore for FakeFiles {
        async fn upload(&self, file: FileUpload) -> PortResult<StoredFile> {
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push(file);
            Ok(StoredFile {
                id: format!("file-{}", uploads.len()),
            })
        }

        async fn grant_public_read(&self, _file_id: &str) -> PortResult<()> {
            if self.deny_permissions {
                Err(PortError::Unauthorized("insufficient scope".to_string()))
            } else {
                Ok(())
            }
        }

        fn viewer_url(&self, file_id: &str) -> String {
            format!("https://files.test/{file_id}/view")
        }
    }

    fn selfie() -> UploadedFile {
        UploadedFile {
            file_name: "me.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn names_file_and_returns_viewer_url() {
        let files = Arc::new(FakeFiles::default());
        let uploader = DocumentUploader::new(files.clone(), "folder-1");

        let url = uploader
            .upload(DocumentKind::Selfie, "1234567890123456", selfie(), 42)
            .await
            .unwrap();

        assert_eq!(url, "https://files.test/file-1/view");
        let uploads = files.uploads.lock().unwrap();
        assert_eq!(uploads[0].name, "SELFIE_1234567890123456_42");
        assert_eq!(uploads[0].parent_folder, "folder-1");
        assert_eq!(uploads[0].mime_type, "image/png");
    }

    #[tokio::test]
    async fn permission_failure_is_swallowed() {
        let files = Arc::new(FakeFiles {
            deny_permissions: true,
            ..Default::default()
        });
        let uploader = DocumentUploader::new(files, "folder-1");

        let url = uploader
            .upload(DocumentKind::Ktp, "1234567890123456", selfie(), 7)
            .await;
        assert!(url.is_ok());
    }
}

//! services/api/src/adapters/drive.rs
//!
//! This module contains the adapter for Google Drive uploads.
//! It implements the `FileStore` port from the `core` crate.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use recruitment_core::ports::{
    AccessTokenProvider, FileStore, FileUpload, PortError, PortResult, StoredFile,
};
use reqwest::{header::CONTENT_TYPE, Client};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

const BOUNDARY: &str = "-------314159265358979323846";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `FileStore` port using the Drive v3 API.
#[derive(Clone)]
pub struct DriveAdapter {
    client: Client,
    drive_base: String,
    upload_base: String,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl DriveAdapter {
    /// Creates a new `DriveAdapter`.
    pub fn new(
        client: Client,
        drive_base: impl Into<String>,
        upload_base: impl Into<String>,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self {
            client,
            drive_base: drive_base.into(),
            upload_base: upload_base.into(),
            tokens,
        }
    }
}

#[derive(Serialize)]
struct FileMetadata<'a> {
    name: &'a str,
    parents: [&'a str; 1],
}

#[derive(Deserialize)]
struct CreatedFile {
    id: String,
}

/// A `multipart/related` body: JSON metadata, then the file as base64.
fn multipart_body(file: &FileUpload) -> PortResult<String> {
    let metadata = serde_json::to_string(&FileMetadata {
        name: &file.name,
        parents: [file.parent_folder.as_str()],
    })
    .map_err(|e| PortError::Unexpected(e.to_string()))?;

    let delimiter = format!("\r\n--{}\r\n", BOUNDARY);
    let close_delimiter = format!("\r\n--{}--", BOUNDARY);
    Ok(format!(
        "{delimiter}Content-Type: application/json\r\n\r\n{metadata}{delimiter}Content-Type: {mime}\r\nContent-Transfer-Encoding: base64\r\n\r\n{data}{close_delimiter}",
        mime = file.mime_type,
        data = STANDARD.encode(&file.bytes),
    ))
}

//=========================================================================================
// `FileStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl FileStore for DriveAdapter {
    async fn upload(&self, file: FileUpload) -> PortResult<StoredFile> {
        let body = multipart_body(&file)?;
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .post(format!("{}/files", self.upload_base))
            .query(&[("uploadType", "multipart")])
            .bearer_auth(token)
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary=\"{}\"", BOUNDARY),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(PortError::Unauthorized(format!("Drive upload rejected with {}", status)));
        }
        if !status.is_success() {
            return Err(PortError::Unexpected(format!("Drive upload failed with {}", status)));
        }

        let created: CreatedFile = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(StoredFile { id: created.id })
    }

    async fn grant_public_read(&self, file_id: &str) -> PortResult<()> {
        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .post(format!("{}/files/{}/permissions", self.drive_base, file_id))
            .bearer_auth(token)
            .json(&json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortError::Unexpected(format!(
                "Drive permission grant failed with {}",
                response.status()
            )));
        }
        Ok(())
    }

    fn viewer_url(&self, file_id: &str) -> String {
        format!("https://drive.google.com/file/d/{}/view", file_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::token::TokenGate;
    use std::time::Duration;

    fn upload() -> FileUpload {
        FileUpload {
            name: "KTP_1234567890123456_1".to_string(),
            parent_folder: "folder-9".to_string(),
            mime_type: "image/jpeg".to_string(),
            bytes: b"jpeg".to_vec(),
        }
    }

    #[test]
    fn body_carries_metadata_and_base64_payload() {
        let body = multipart_body(&upload()).unwrap();

        assert!(body.starts_with(&format!("\r\n--{}\r\nContent-Type: application/json", BOUNDARY)));
        assert!(body.contains(r#"{"name":"KTP_1234567890123456_1","parents":["folder-9"]}"#));
        assert!(body.contains("Content-Type: image/jpeg\r\nContent-Transfer-Encoding: base64\r\n\r\nanBlZw=="));
        assert!(body.ends_with(&format!("\r\n--{}--", BOUNDARY)));
    }

    #[test]
    fn viewer_url_points_at_drive() {
        let adapter = DriveAdapter::new(
            Client::new(),
            "https://www.googleapis.com/drive/v3",
            "https://www.googleapis.com/upload/drive/v3",
            Arc::new(TokenGate::new(Duration::from_millis(1))),
        );
        assert_eq!(adapter.viewer_url("abc"), "https://drive.google.com/file/d/abc/view");
    }

    #[tokio::test]
    async fn upload_without_token_is_unauthorized() {
        let adapter = DriveAdapter::new(
            Client::new(),
            "http://127.0.0.1:9",
            "http://127.0.0.1:9",
            Arc::new(TokenGate::new(Duration::from_millis(1))),
        );
        assert!(matches!(adapter.upload(upload()).await, Err(PortError::Unauthorized(_))));
    }
}

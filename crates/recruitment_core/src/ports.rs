//! crates/recruitment_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, so the same
//! registry and uploader run against Google's APIs or the in-memory fakes.

use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., HTTP, JSON).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Port Payloads
//=========================================================================================

/// A file ready to be sent to the file store.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub name: String,
    pub parent_folder: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// The object created by a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub id: String,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Reads a range such as `Reviewed!A:AC`. Rows may be shorter than the range
    /// when their trailing cells are empty.
    async fn read_range(&self, range: &str) -> PortResult<Vec<Vec<String>>>;

    /// Replaces the cells of a range with the given rows. No merge, no version check.
    async fn write_range(&self, range: &str, values: Vec<Vec<String>>) -> PortResult<()>;
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn upload(&self, file: FileUpload) -> PortResult<StoredFile>;

    /// Grants anyone-with-link read access to an uploaded object.
    async fn grant_public_read(&self, file_id: &str) -> PortResult<()>;

    /// The URL a human opens to view the stored object.
    fn viewer_url(&self, file_id: &str) -> String;
}

#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Suspends until a bearer token is available or consent has been refused.
    async fn access_token(&self) -> PortResult<String>;
}

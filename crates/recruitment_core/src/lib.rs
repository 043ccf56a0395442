pub mod calendar;
pub mod dates;
pub mod documents;
pub mod domain;
pub mod layout;
pub mod obfuscation;
pub mod ports;
pub mod registry;
pub mod uploads;
pub mod validation;

pub use domain::{CandidateRecord, CandidateStatus, CompletionUpdate, DocumentKind, UploadedFile};
pub use ports::{
    AccessTokenProvider, FileStore, FileUpload, PortError, PortResult, StoredFile, TabularStore,
};
pub use registry::CandidateRegistry;
pub use uploads::DocumentUploader;

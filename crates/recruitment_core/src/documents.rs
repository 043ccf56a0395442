//! crates/recruitment_core/src/documents.rs
//!
//! Size and MIME-type rules for the uploaded identity documents.

use crate::domain::{DocumentKind, UploadedFile};

const MIB: u64 = 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DocumentError {
    /// `limit` is the cap as shown to the candidate, e.g. `5MB`.
    #[error("file exceeds the {limit} limit")]
    TooLarge { limit: String },
    #[error("file type {0} is not accepted")]
    UnsupportedType(String),
}

/// Upload limits for one document class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPolicy {
    pub max_bytes: u64,
    pub allowed_types: Vec<String>,
}

impl DocumentPolicy {
    pub fn new(max_bytes: u64, allowed_types: &[&str]) -> Self {
        Self {
            max_bytes,
            allowed_types: allowed_types.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// The cap as shown to the candidate: `5MB`, `1.5MB`, `512KB`.
    pub fn limit_label(&self) -> String {
        format_file_size(self.max_bytes).replace(' ', "")
    }

    pub fn check_size(&self, file: &UploadedFile) -> Result<(), DocumentError> {
        if file.size() > self.max_bytes {
            return Err(DocumentError::TooLarge {
                limit: self.limit_label(),
            });
        }
        Ok(())
    }

    pub fn check_type(&self, file: &UploadedFile) -> Result<(), DocumentError> {
        if !self.allowed_types.iter().any(|t| t == &file.mime_type) {
            return Err(DocumentError::UnsupportedType(file.mime_type.clone()));
        }
        Ok(())
    }

    /// Size is checked before type, so an oversized file of the wrong type
    /// reports the size problem.
    pub fn check(&self, file: &UploadedFile) -> Result<(), DocumentError> {
        self.check_size(file)?;
        self.check_type(file)
    }
}

/// Policies for both document classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRules {
    pub ktp: DocumentPolicy,
    pub selfie: DocumentPolicy,
}

impl DocumentRules {
    pub fn policy(&self, kind: DocumentKind) -> &DocumentPolicy {
        match kind {
            DocumentKind::Ktp => &self.ktp,
            DocumentKind::Selfie => &self.selfie,
        }
    }

    pub fn check(&self, kind: DocumentKind, file: &UploadedFile) -> Result<(), DocumentError> {
        self.policy(kind).check(file)
    }

    /// Checks a whole submission: every size first, then every type.
    pub fn check_all(&self, files: &[(DocumentKind, &UploadedFile)]) -> Result<(), DocumentError> {
        for (kind, file) in files {
            self.policy(*kind).check_size(file)?;
        }
        for (kind, file) in files {
            self.policy(*kind).check_type(file)?;
        }
        Ok(())
    }
}

impl Default for DocumentRules {
    fn default() -> Self {
        Self {
            ktp: DocumentPolicy::new(5 * MIB, &["image/jpeg", "image/png", "application/pdf"]),
            selfie: DocumentPolicy::new(3 * MIB, &["image/jpeg", "image/png"]),
        }
    }
}

/// Human-readable size: `0 B`, `512 B`, `1.5 KB`, `5 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

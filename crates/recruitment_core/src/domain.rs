//! crates/recruitment_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of the spreadsheet layout and of any transport.

use serde::Serialize;
use std::fmt;

/// Data-entry state of a candidate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CandidateStatus {
    #[default]
    Pending,
    Completed,
}

impl CandidateStatus {
    /// Reads the status cell. Anything other than `Completed` counts as pending,
    /// including the empty cell of a fresh row.
    pub fn from_cell(cell: &str) -> Self {
        if cell.trim() == "Completed" {
            Self::Completed
        } else {
            Self::Pending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate row as read from the tabular store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    /// 1-based row number in the sheet, used for the later write.
    pub row_index: u32,
    pub phone: String,
    /// Birth date exactly as stored in the sheet cell.
    pub birth_date: String,
    pub name: String,
    pub nik: String,
    pub village: String,
    pub test_schedule: String,
    pub test_location: String,
    pub ktp_url: String,
    pub selfie_url: String,
    pub status: CandidateStatus,
    pub obfuscated_id: String,
}

impl CandidateRecord {
    /// A profile is complete once the NIK and both document URLs are present.
    /// This alone decides between the data-entry form and the profile view.
    pub fn is_complete(&self) -> bool {
        !self.nik.is_empty() && !self.ktp_url.is_empty() && !self.selfie_url.is_empty()
    }

    /// Applies a successful completion to the in-memory copy of the row.
    pub fn apply(&mut self, update: &CompletionUpdate) {
        self.nik = update.nik.clone();
        self.test_schedule = update.test_schedule.clone();
        self.test_location = update.test_location.clone();
        self.ktp_url = update.ktp_url.clone();
        self.selfie_url = update.selfie_url.clone();
        self.status = update.status;
        self.obfuscated_id = update.obfuscated_id.clone();
    }
}

/// The fixed tuple written back to a row when data entry completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionUpdate {
    pub nik: String,
    pub test_schedule: String,
    pub test_location: String,
    pub ktp_url: String,
    pub selfie_url: String,
    pub status: CandidateStatus,
    pub obfuscated_id: String,
}

impl CompletionUpdate {
    /// Values in write-range column order.
    pub fn to_row_values(&self) -> Vec<String> {
        vec![
            self.nik.clone(),
            self.test_schedule.clone(),
            self.test_location.clone(),
            self.ktp_url.clone(),
            self.selfie_url.clone(),
            self.status.as_str().to_string(),
            self.obfuscated_id.clone(),
        ]
    }
}

/// The two identity documents a candidate uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Ktp,
    Selfie,
}

impl DocumentKind {
    /// Prefix of the stored file name, e.g. `KTP_<nik>_<millis>`.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Self::Ktp => "KTP",
            Self::Selfie => "SELFIE",
        }
    }
}

/// A file received from the candidate, not yet stored anywhere.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

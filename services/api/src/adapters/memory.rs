//! services/api/src/adapters/memory.rs
//!
//! In-memory implementations of the `TabularStore` and `FileStore` ports.
//! They back the demo deployment (`BACKEND=memory`) and the HTTP tests, and
//! keep the same positional sheet layout as the real spreadsheet.

use async_trait::async_trait;
use recruitment_core::layout::column;
use recruitment_core::obfuscation::{encode_token, CheckInPayload};
use recruitment_core::ports::{FileStore, FileUpload, PortError, PortResult, StoredFile, TabularStore};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

//=========================================================================================
// A1 Range Parsing
//=========================================================================================

/// One end of an A1 range; the row is absent for whole-column ranges like `A:AC`.
#[derive(Debug, PartialEq, Eq)]
struct CellRef {
    column: usize,
    row: Option<usize>,
}

fn parse_cell(text: &str) -> Option<CellRef> {
    let split = text.find(|c: char| c.is_ascii_digit()).unwrap_or(text.len());
    let (letters, digits) = text.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }
    let column = letters
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + usize::from(b - b'A' + 1))
        - 1;
    let row = if digits.is_empty() {
        None
    } else {
        Some(digits.parse::<usize>().ok().filter(|row| *row > 0)?)
    };
    Some(CellRef { column, row })
}

fn parse_range(range: &str) -> PortResult<(CellRef, CellRef)> {
    let cells = range.rsplit_once('!').map(|(_, cells)| cells).unwrap_or(range);
    let (start, end) = cells
        .split_once(':')
        .ok_or_else(|| PortError::Unexpected(format!("Unsupported range {}", range)))?;
    match (parse_cell(start), parse_cell(end)) {
        (Some(start), Some(end)) if start.column <= end.column => Ok((start, end)),
        _ => Err(PortError::Unexpected(format!("Unsupported range {}", range))),
    }
}

//=========================================================================================
// Tabular Store
//=========================================================================================

/// A sheet held in memory. Row 1 is the header, like the real sheet.
#[derive(Default)]
pub struct MemoryTabularStore {
    rows: RwLock<Vec<Vec<String>>>,
}

impl MemoryTabularStore {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// The two demo candidates: one waiting for data entry, one already complete.
    pub fn with_demo_rows() -> Self {
        let mut header = vec![String::new(); column::COUNT];
        header[column::NAME] = "Nama Lengkap (Sesuai KTP)".to_string();
        header[column::PHONE] = "Nomor HP/WhatsApp aktif".to_string();
        header[column::VILLAGE] = "Desa".to_string();
        header[column::BIRTH_DATE] = "Tanggal Lahir".to_string();
        header[column::NIK] = "NIK".to_string();
        header[column::TEST_SCHEDULE] = "Jadwal Test".to_string();
        header[column::TEST_LOCATION] = "Lokasi Test".to_string();
        header[column::KTP_URL] = "KTP".to_string();
        header[column::SELFIE_URL] = "Selfie".to_string();
        header[column::STATUS] = "Status".to_string();
        header[column::OBFUSCATED_ID] = "ID".to_string();

        let mut pending = vec![String::new(); column::COUNT];
        pending[column::NAME] = "John Doe".to_string();
        pending[column::PHONE] = "081234567890".to_string();
        pending[column::VILLAGE] = "Desa Contoh".to_string();
        pending[column::BIRTH_DATE] = "01/01/1990".to_string();
        pending[column::TEST_SCHEDULE] = "2024-01-15 10:00".to_string();
        pending[column::TEST_LOCATION] = "Jakarta".to_string();
        pending[column::STATUS] = "Pending".to_string();

        let nik = "1234567890123456";
        let schedule = "2024-01-16 14:00";
        let mut completed = vec![String::new(); column::COUNT];
        completed[column::NAME] = "Jane Smith".to_string();
        completed[column::PHONE] = "081234567891".to_string();
        completed[column::VILLAGE] = "Desa Lain".to_string();
        completed[column::BIRTH_DATE] = "05/15/1985".to_string();
        completed[column::NIK] = nik.to_string();
        completed[column::TEST_SCHEDULE] = schedule.to_string();
        completed[column::TEST_LOCATION] = "Bandung".to_string();
        completed[column::KTP_URL] = "memory://files/demo-ktp/view".to_string();
        completed[column::SELFIE_URL] = "memory://files/demo-selfie/view".to_string();
        completed[column::STATUS] = "Completed".to_string();
        completed[column::OBFUSCATED_ID] =
            encode_token(&CheckInPayload::new(nik, schedule, 0), 0).unwrap_or_default();

        Self::new(vec![header, pending, completed])
    }

    pub async fn rows(&self) -> Vec<Vec<String>> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl TabularStore for MemoryTabularStore {
    async fn read_range(&self, range: &str) -> PortResult<Vec<Vec<String>>> {
        let (start, end) = parse_range(range)?;
        let rows = self.rows.read().await;

        let first_row = start.row.unwrap_or(1).saturating_sub(1);
        let last_row = end.row.unwrap_or(rows.len()).min(rows.len());
        Ok(rows
            .iter()
            .take(last_row)
            .skip(first_row)
            .map(|row| {
                row.iter()
                    .skip(start.column)
                    .take(end.column - start.column + 1)
                    .cloned()
                    .collect()
            })
            .collect())
    }

    async fn write_range(&self, range: &str, values: Vec<Vec<String>>) -> PortResult<()> {
        let (start, _) = parse_range(range)?;
        let first_row = start
            .row
            .ok_or_else(|| PortError::Unexpected(format!("Write range {} has no row", range)))?;
        let mut rows = self.rows.write().await;

        for (offset, new_cells) in values.into_iter().enumerate() {
            let index = first_row - 1 + offset;
            if rows.len() <= index {
                rows.resize(index + 1, Vec::new());
            }
            let row = &mut rows[index];
            let needed = start.column + new_cells.len();
            if row.len() < needed {
                row.resize(needed, String::new());
            }
            for (i, cell) in new_cells.into_iter().enumerate() {
                row[start.column + i] = cell;
            }
        }
        Ok(())
    }
}

//=========================================================================================
// File Store
//=========================================================================================

/// Keeps uploaded files in memory and records permission grants.
#[derive(Default)]
pub struct MemoryFileStore {
    uploads: Mutex<Vec<(StoredFile, FileUpload)>>,
    public: Mutex<Vec<String>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn uploads(&self) -> Vec<FileUpload> {
        self.uploads
            .lock()
            .await
            .iter()
            .map(|(_, upload)| upload.clone())
            .collect()
    }

    pub async fn is_public(&self, file_id: &str) -> bool {
        self.public.lock().await.iter().any(|id| id == file_id)
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn upload(&self, file: FileUpload) -> PortResult<StoredFile> {
        let stored = StoredFile {
            id: Uuid::new_v4().to_string(),
        };
        self.uploads.lock().await.push((stored.clone(), file));
        Ok(stored)
    }

    async fn grant_public_read(&self, file_id: &str) -> PortResult<()> {
        let known = self
            .uploads
            .lock()
            .await
            .iter()
            .any(|(stored, _)| stored.id == file_id);
        if !known {
            return Err(PortError::NotFound(format!("File {} not found", file_id)));
        }
        self.public.lock().await.push(file_id.to_string());
        Ok(())
    }

    fn viewer_url(&self, file_id: &str) -> String {
        format!("memory://files/{}/view", file_id)
    }
}

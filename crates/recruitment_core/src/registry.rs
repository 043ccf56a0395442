//! crates/recruitment_core/src/registry.rs
//!
//! Login matching and the completion write against the tabular store.
//!
//! Every lookup fetches the whole table and scans it; there is no index and no
//! cache. The write is last-write-wins: nothing detects a concurrent change to
//! the same row between the read and the write.

use crate::dates::sheet_date_to_standard;
use crate::domain::{CandidateRecord, CompletionUpdate};
use crate::layout::{column, SheetLayout};
use crate::ports::{PortResult, TabularStore};
use crate::validation::normalize_phone;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct CandidateRegistry {
    store: Arc<dyn TabularStore>,
    layout: SheetLayout,
}

impl CandidateRegistry {
    pub fn new(store: Arc<dyn TabularStore>, layout: SheetLayout) -> Self {
        Self { store, layout }
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// Finds the first row whose phone and birth date match.
    ///
    /// `phone` must already be normalized (digits, leading `0`) and `birth_date`
    /// must be `YYYY-MM-DD`.
    pub async fn find_candidate(
        &self,
        phone: &str,
        birth_date: &str,
    ) -> PortResult<Option<CandidateRecord>> {
        let rows = self.store.read_range(&self.layout.read_range()).await?;
        debug!(rows = rows.len(), "Fetched candidate table");
        Ok(match_row(&self.layout, &rows, phone, birth_date))
    }

    /// Writes the data-entry columns of one row in a single request.
    pub async fn complete(&self, row_index: u32, update: &CompletionUpdate) -> PortResult<()> {
        let range = self.layout.write_range(row_index);
        self.store
            .write_range(&range, vec![update.to_row_values()])
            .await?;
        info!(row_index, range = %range, "Candidate row completed");
        Ok(())
    }
}

/// Scans data rows (the header is row 1) and returns the first hit.
pub fn match_row(
    layout: &SheetLayout,
    rows: &[Vec<String>],
    phone: &str,
    birth_date: &str,
) -> Option<CandidateRecord> {
    rows.iter()
        .enumerate()
        .skip(1)
        .find(|(_, row)| {
            let cell = |index: usize| row.get(index).map(String::as_str).unwrap_or_default();
            normalize_phone(cell(column::PHONE)) == phone
                && sheet_date_to_standard(cell(column::BIRTH_DATE)) == birth_date
        })
        .map(|(position, row)| layout.record_from_row(position as u32 + 1, row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CandidateStatus;
    use crate::ports::PortError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn row(phone: &str, birth_date: &str, name: &str) -> Vec<String> {
        let mut cells = vec![String::new(); column::COUNT];
        cells[column::NAME] = name.to_string();
        cells[column::PHONE] = phone.to_string();
        cells[column::BIRTH_DATE] = birth_date.to_string();
        cells
    }

    fn table() -> Vec<Vec<String>> {
        vec![
            vec!["Nama".to_string(), "Nomor HP".to_string()],
            row("081234567890", "1990-01-01", "John Doe"),
            row("081234567891", "1985-05-15", "Jane Smith"),
        ]
    }

    #[derive(Default)]
    struct RecordingStore {
        rows: Vec<Vec<String>>,
        writes: Mutex<Vec<(String, Vec<Vec<String>>)>>,
        fail: bool,
    }

    #[async_trait]
    impl TabularStore for RecordingStore {
        async fn read_range(&self, _range: &str) -> PortResult<Vec<Vec<String>>> {
            if self.fail {
                return Err(PortError::Unexpected("connection reset".to_string()));
            }
            Ok(self.rows.clone())
        }

        async fn write_range(&self, range: &str, values: Vec<Vec<String>>) -> PortResult<()> {
            self.writes.lock().unwrap().push((range.to_string(), values));
            Ok(())
        }
    }

    #[test]
    fn matches_first_data_row() {
        let record = match_row(&SheetLayout::default(), &table(), "081234567890", "1990-01-01")
            .expect("row 2 matches");
        assert_eq!(record.row_index, 2);
        assert_eq!(record.name, "John Doe");
    }

    #[test]
    fn wrong_date_is_no_match() {
        assert!(match_row(&SheetLayout::default(), &table(), "081234567890", "1985-05-15").is_none());
    }

    #[test]
    fn header_row_is_never_matched() {
        let rows = vec![row("081234567890", "1990-01-01", "Header")];
        assert!(match_row(&SheetLayout::default(), &rows, "081234567890", "1990-01-01").is_none());
    }

    #[test]
    fn sheet_cells_are_normalized_before_comparing() {
        let rows = vec![
            vec![],
            row("+62 812-3456-7899", "3/7/1992", "Budi"),
        ];
        let record = match_row(&SheetLayout::default(), &rows, "081234567899", "1992-03-07")
            .expect("normalized match");
        assert_eq!(record.row_index, 2);
    }

    #[test]
    fn duplicates_resolve_to_the_first_row() {
        let mut rows = table();
        rows.push(row("081234567890", "1990-01-01", "John Duplicate"));
        let record = match_row(&SheetLayout::default(), &rows, "081234567890", "1990-01-01").unwrap();
        assert_eq!(record.name, "John Doe");
    }

    #[tokio::test]
    async fn find_candidate_reads_the_store() {
        let store = Arc::new(RecordingStore {
            rows: table(),
            ..Default::default()
        });
        let registry = CandidateRegistry::new(store, SheetLayout::default());

        let record = registry
            .find_candidate("081234567891", "1985-05-15")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.row_index, 3);
        assert_eq!(record.status, CandidateStatus::Pending);
    }

    #[tokio::test]
    async fn fetch_failure_propagates() {
        let store = Arc::new(RecordingStore {
            fail: true,
            ..Default::default()
        });
        let registry = CandidateRegistry::new(store, SheetLayout::default());
        let result = registry.find_candidate("081234567890", "1990-01-01").await;
        assert!(matches!(result, Err(PortError::Unexpected(_))));
    }

    #[tokio::test]
    async fn complete_writes_the_fixed_range() {
        let store = Arc::new(RecordingStore::default());
        let registry = CandidateRegistry::new(store.clone(), SheetLayout::default());
        let update = CompletionUpdate {
            nik: "1234567890123456".to_string(),
            test_schedule: "2024-01-15 10:00".to_string(),
            test_location: "Jakarta".to_string(),
            ktp_url: "https://drive.google.com/file/d/k/view".to_string(),
            selfie_url: "https://drive.google.com/file/d/s/view".to_string(),
            status: CandidateStatus::Completed,
            obfuscated_id: "abc_xyz".to_string(),
        };

        registry.complete(2, &update).await.unwrap();

        let writes = store.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, "Reviewed!W2:AC2");
        assert_eq!(writes[0].1, vec![update.to_row_values()]);
        assert_eq!(writes[0].1[0][5], "Completed");
    }
}

//! crates/recruitment_core/src/layout.rs
//!
//! The positional column map of the candidate sheet. The map must match the
//! sheet's actual layout; nothing checks the header row at runtime.

use crate::domain::{CandidateRecord, CandidateStatus};

/// Zero-based column indices of the candidate sheet.
pub mod column {
    pub const NAME: usize = 0; // A
    pub const PHONE: usize = 1; // B
    pub const VILLAGE: usize = 5; // F
    pub const BIRTH_DATE: usize = 8; // I
    pub const NIK: usize = 22; // W
    pub const TEST_SCHEDULE: usize = 23; // X
    pub const TEST_LOCATION: usize = 24; // Y
    pub const KTP_URL: usize = 25; // Z
    pub const SELFIE_URL: usize = 26; // AA
    pub const STATUS: usize = 27; // AB
    pub const OBFUSCATED_ID: usize = 28; // AC

    /// Width of a full row as read.
    pub const COUNT: usize = OBFUSCATED_ID + 1;
}

/// Spreadsheet column letter for a zero-based index: 0 → `A`, 26 → `AA`.
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    sheet_name: String,
}

impl SheetLayout {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// The whole table, header included: `Reviewed!A:AC`.
    pub fn read_range(&self) -> String {
        format!(
            "{}!{}:{}",
            self.sheet_name,
            column_letter(column::NAME),
            column_letter(column::OBFUSCATED_ID)
        )
    }

    /// The data-entry columns of one row: `Reviewed!W5:AC5`.
    pub fn write_range(&self, row_index: u32) -> String {
        format!(
            "{}!{}{row}:{}{row}",
            self.sheet_name,
            column_letter(column::NIK),
            column_letter(column::OBFUSCATED_ID),
            row = row_index
        )
    }

    /// Packages a raw row into a record. Missing trailing cells read as empty.
    pub fn record_from_row(&self, row_index: u32, cells: &[String]) -> CandidateRecord {
        let cell = |index: usize| cells.get(index).cloned().unwrap_or_default();
        CandidateRecord {
            row_index,
            phone: cell(column::PHONE),
            birth_date: cell(column::BIRTH_DATE),
            name: cell(column::NAME),
            nik: cell(column::NIK),
            village: cell(column::VILLAGE),
            test_schedule: cell(column::TEST_SCHEDULE),
            test_location: cell(column::TEST_LOCATION),
            ktp_url: cell(column::KTP_URL),
            selfie_url: cell(column::SELFIE_URL),
            status: CandidateStatus::from_cell(&cell(column::STATUS)),
            obfuscated_id: cell(column::OBFUSCATED_ID),
        }
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::new("Reviewed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(8), "I");
        assert_eq!(column_letter(22), "W");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(28), "AC");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn ranges_follow_the_column_map() {
        let layout = SheetLayout::default();
        assert_eq!(layout.read_range(), "Reviewed!A:AC");
        assert_eq!(layout.write_range(7), "Reviewed!W7:AC7");
    }

    #[test]
    fn short_rows_fill_with_empty_cells() {
        let layout = SheetLayout::default();
        let mut cells = vec![String::new(); 9];
        cells[column::NAME] = "Siti".to_string();
        cells[column::PHONE] = "081234567890".to_string();
        cells[column::BIRTH_DATE] = "01/01/1990".to_string();

        let record = layout.record_from_row(3, &cells);
        assert_eq!(record.row_index, 3);
        assert_eq!(record.name, "Siti");
        assert_eq!(record.nik, "");
        assert_eq!(record.status, CandidateStatus::Pending);
        assert!(!record.is_complete());
    }
}

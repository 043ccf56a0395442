//! crates/recruitment_core/src/dates.rs
//!
//! Birth-date handling. Candidates type `DD/MM/YYYY`, the sheet stores
//! `MM/DD/YYYY`, and the matcher compares both as `YYYY-MM-DD`.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

static INPUT_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$").expect("date pattern is valid")
});

pub const MIN_BIRTH_YEAR: i32 = 1900;

pub const INDONESIAN_MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Parses a typed `DD/MM/YYYY` date. Returns `None` unless the triple is a real
/// calendar date with a year in `[1900, current_year]`.
pub fn parse_input_date(input: &str, current_year: i32) -> Option<NaiveDate> {
    let caps = INPUT_DATE_RE.captures(input)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;

    if !(MIN_BIRTH_YEAR..=current_year).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn is_valid_input_date(input: &str, current_year: i32) -> bool {
    parse_input_date(input, current_year).is_some()
}

/// Reorders slash-separated date parts into `YYYY-MM-DD`, zero-padding day and month.
/// Strings that are not three slash-separated parts are returned unchanged.
fn reorder_slash_date(input: &str, day_first: bool) -> String {
    let parts: Vec<&str> = input.split('/').collect();
    if parts.len() != 3 {
        return input.to_string();
    }
    let (day, month) = if day_first {
        (parts[0], parts[1])
    } else {
        (parts[1], parts[0])
    };
    format!("{}-{:0>2}-{:0>2}", parts[2], month, day)
}

/// `DD/MM/YYYY` (candidate input) to `YYYY-MM-DD`.
pub fn input_date_to_standard(input: &str) -> String {
    reorder_slash_date(input, true)
}

/// `MM/DD/YYYY` (sheet cell) to `YYYY-MM-DD`. Cells already in ISO form pass through.
pub fn sheet_date_to_standard(cell: &str) -> String {
    reorder_slash_date(cell.trim(), false)
}

/// `DD/MM/YYYY`, the format the date input shows.
pub fn format_input_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `1 Januari 1990`.
pub fn format_indonesian(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        INDONESIAN_MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Renders a stored birth-date cell for display; unparseable cells are shown as-is.
pub fn display_birth_date(cell: &str) -> String {
    NaiveDate::parse_from_str(&sheet_date_to_standard(cell), "%Y-%m-%d")
        .map(format_indonesian)
        .unwrap_or_else(|_| cell.to_string())
}

/// Masks free text into `DD/MM/YYYY` while digits are typed: a `/` goes in at
/// positions 2 and 5 and at most eight digits are kept.
pub fn mask_date_input(input: &str) -> String {
    let mut value: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

    if value.len() >= 2 {
        value = format!("{}/{}", &value[..2], &value[2..]);
    }
    if value.len() >= 5 {
        let tail_end = value.len().min(9);
        value = format!("{}/{}", &value[..5], &value[5..tail_end]);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_real_dates_only() {
        assert!(is_valid_input_date("29/02/2024", 2026));
        assert!(!is_valid_input_date("29/02/2023", 2026));
        assert!(!is_valid_input_date("31/04/1990", 2026));
        assert!(!is_valid_input_date("00/01/1990", 2026));
        assert!(!is_valid_input_date("01/13/1990", 2026));
        assert!(!is_valid_input_date("1/1/1990", 2026));
        assert!(!is_valid_input_date("1990-01-01", 2026));
    }

    #[test]
    fn year_window_is_inclusive() {
        assert!(is_valid_input_date("01/01/1900", 2026));
        assert!(!is_valid_input_date("31/12/1899", 2026));
        assert!(is_valid_input_date("31/12/2026", 2026));
        assert!(!is_valid_input_date("01/01/2027", 2026));
    }

    #[test]
    fn valid_input_round_trips_to_iso() {
        for input in ["01/01/1990", "15/05/1985", "29/02/2000", "31/12/2025"] {
            let parsed = parse_input_date(input, 2026).expect("valid date");
            let standard = input_date_to_standard(input);
            assert_eq!(standard, parsed.format("%Y-%m-%d").to_string());
        }
    }

    #[test]
    fn sheet_dates_are_month_first() {
        assert_eq!(sheet_date_to_standard("5/15/1985"), "1985-05-15");
        assert_eq!(sheet_date_to_standard("01/01/1990"), "1990-01-01");
        assert_eq!(sheet_date_to_standard("1990-01-01"), "1990-01-01");
        assert_eq!(sheet_date_to_standard(""), "");
    }

    #[test]
    fn indonesian_display() {
        let date = NaiveDate::from_ymd_opt(1985, 5, 15).unwrap();
        assert_eq!(format_indonesian(date), "15 Mei 1985");
        assert_eq!(format_input_date(date), "15/05/1985");
        assert_eq!(display_birth_date("5/15/1985"), "15 Mei 1985");
        assert_eq!(display_birth_date("not a date"), "not a date");
    }

    #[test]
    fn masking_inserts_separators() {
        assert_eq!(mask_date_input("1"), "1");
        assert_eq!(mask_date_input("12"), "12/");
        assert_eq!(mask_date_input("1203"), "12/03/");
        assert_eq!(mask_date_input("12031990"), "12/03/1990");
        assert_eq!(mask_date_input("12/03/19901"), "12/03/1990");
        assert_eq!(mask_date_input("ab12cd"), "12/");
    }
}

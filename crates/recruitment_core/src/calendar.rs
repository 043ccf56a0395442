//! crates/recruitment_core/src/calendar.rs
//!
//! State machine behind the birth-date picker. It only computes what to show;
//! rendering is left to the client.

use crate::dates::{format_input_date, parse_input_date, INDONESIAN_MONTHS};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

pub const DAY_HEADERS: [&str; 7] = ["Min", "Sen", "Sel", "Rab", "Kam", "Jum", "Sab"];

/// Six weeks, enough for any month starting on any weekday.
pub const GRID_CELLS: usize = 42;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub day: u32,
    pub in_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// e.g. `Februari 2024`
    pub title: String,
    pub day_headers: [&'static str; 7],
    pub cells: Vec<DayCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarState {
    /// First day of the displayed month.
    first: NaiveDate,
    selected: Option<NaiveDate>,
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

impl CalendarState {
    /// Opens on the month containing `today`, nothing selected.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            first: first_of_month(today),
            selected: None,
        }
    }

    /// Opens on an explicit month; `None` for an out-of-range month.
    pub fn showing(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self {
            first,
            selected: None,
        })
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn previous(&mut self) {
        if let Some(first) = self.first.checked_sub_months(Months::new(1)) {
            self.first = first;
        }
    }

    pub fn next(&mut self) {
        if let Some(first) = self.first.checked_add_months(Months::new(1)) {
            self.first = first;
        }
    }

    /// Jumps to a month while keeping the selection.
    pub fn show_month(&mut self, year: i32, month: u32) -> bool {
        match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(first) => {
                self.first = first;
                true
            }
            None => false,
        }
    }

    /// Marks a clicked day as selected and returns the text for the date input.
    pub fn select(&mut self, date: NaiveDate) -> String {
        self.selected = Some(date);
        format_input_date(date)
    }

    /// Blur handling for the typed date: a valid date becomes the selection and
    /// the grid jumps to its month. Returns `false` when the input is invalid.
    pub fn sync_from_input(&mut self, input: &str, current_year: i32) -> bool {
        match parse_input_date(input, current_year) {
            Some(date) => {
                self.selected = Some(date);
                self.first = first_of_month(date);
                true
            }
            None => false,
        }
    }

    pub fn title(&self) -> String {
        format!("{} {}", INDONESIAN_MONTHS[self.first.month0() as usize], self.year())
    }

    /// The 42 cells starting at the Sunday on or before the first of the month.
    pub fn grid(&self, today: NaiveDate) -> MonthGrid {
        let offset = u64::from(self.first.weekday().num_days_from_sunday());
        let start = self
            .first
            .checked_sub_days(Days::new(offset))
            .unwrap_or(self.first);

        let cells = start
            .iter_days()
            .take(GRID_CELLS)
            .map(|date| DayCell {
                date,
                day: date.day(),
                in_month: date.month() == self.month() && date.year() == self.year(),
                is_today: date == today,
                is_selected: self.selected == Some(date),
            })
            .collect();

        MonthGrid {
            year: self.year(),
            month: self.month(),
            title: self.title(),
            day_headers: DAY_HEADERS,
            cells,
        }
    }
}

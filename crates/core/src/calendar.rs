use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::entry::DATE_FORMAT;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Day,
    #[default]
    Week,
    Month,
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|day| *day <= self.end)
            .collect()
    }

    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

pub fn dates_in(range: &DateRange) -> Vec<NaiveDate> {
    range.dates()
}

/// Dates shown for `mode` around `date`; weeks run Monday to Sunday.
pub fn range_for(mode: ViewMode, date: NaiveDate) -> DateRange {
    match mode {
        ViewMode::Day => DateRange::new(date, date),
        ViewMode::Week => {
            let monday = date - Days::new(u64::from(date.weekday().num_days_from_monday()));
            DateRange::new(monday, monday + Days::new(6))
        }
        ViewMode::Month => {
            let first = date.with_day(1).unwrap_or(date);
            let last = (first + Months::new(1)) - Days::new(1);
            DateRange::new(first, last)
        }
    }
}

/// Moves `date` one view step forward (`steps > 0`) or back.
pub fn step(mode: ViewMode, date: NaiveDate, steps: i32) -> NaiveDate {
    let count = steps.unsigned_abs();
    let moved = match (mode, steps >= 0) {
        (ViewMode::Day, true) => date.checked_add_days(Days::new(u64::from(count))),
        (ViewMode::Day, false) => date.checked_sub_days(Days::new(u64::from(count))),
        (ViewMode::Week, true) => date.checked_add_days(Days::new(u64::from(count) * 7)),
        (ViewMode::Week, false) => date.checked_sub_days(Days::new(u64::from(count) * 7)),
        (ViewMode::Month, true) => date.checked_add_months(Months::new(count)),
        (ViewMode::Month, false) => date.checked_sub_months(Months::new(count)),
    };
    moved.unwrap_or(date)
}

//! # CSV Export
//!
//! Files are UTF-8 with a leading byte-order mark so spreadsheet tools
//! pick up accented names, and every field is quoted.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use eyre::{eyre, Result};

use crate::{
    calendar::DateRange,
    models::{child::Child, entry::TimeEntry},
    presence::{declared_meal, declared_snack, EntryStatus},
    time::entry_duration,
};

pub const BOM: &str = "\u{FEFF}";

pub const ATTENDANCE_HEADERS: [&str; 9] = [
    "Date",
    "Child",
    "Status",
    "Segments",
    "Duration",
    "Meal",
    "Snack",
    "AbsenceReason",
    "Notes",
];

pub const CHILDREN_HEADERS: [&str; 5] = ["Name", "DefaultArrival", "DefaultLeaving", "Meal", "Snack"];

const PLACEHOLDER: &str = "-";

fn yes_no(value: bool) -> String {
    let label = if value { "Yes" } else { "No" };
    label.to_string()
}

fn or_placeholder(text: Option<&str>) -> String {
    text.filter(|t| !t.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}

fn segments_text(entry: &TimeEntry) -> String {
    let parts: Vec<String> = entry
        .segments
        .iter()
        .filter(|s| s.is_recorded())
        .map(|s| {
            format!(
                "{}-{}",
                s.arrival_time.as_deref().filter(|t| !t.is_empty()).unwrap_or("?"),
                s.leaving_time.as_deref().filter(|t| !t.is_empty()).unwrap_or("?"),
            )
        })
        .collect();
    if parts.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        parts.join(", ")
    }
}

fn attendance_row(date: NaiveDate, child: &Child, entry: Option<&TimeEntry>) -> Vec<String> {
    let status = EntryStatus::of(entry);
    let (segments, duration) = match entry {
        Some(e) if status != EntryStatus::Absent => (
            segments_text(e),
            entry_duration(&e.segments).unwrap_or_else(|| PLACEHOLDER.to_string()),
        ),
        _ => (PLACEHOLDER.to_string(), PLACEHOLDER.to_string()),
    };

    vec![
        date.format("%d/%m/%Y").to_string(),
        child.name.clone(),
        status.label().to_string(),
        segments,
        duration,
        yes_no(declared_meal(child, entry)),
        yes_no(declared_snack(child, entry)),
        or_placeholder(entry.and_then(|e| e.absence_reason.as_deref())),
        or_placeholder(entry.map(|e| e.notes.as_str())),
    ]
}

/// One row per (date with at least one entry, child), dates ascending and
/// children in list order.
pub fn attendance_rows(children: &[Child], entries: &[TimeEntry]) -> Vec<Vec<String>> {
    let mut by_date: BTreeMap<NaiveDate, HashMap<&str, &TimeEntry>> = BTreeMap::new();
    for entry in entries {
        by_date
            .entry(entry.date)
            .or_default()
            .insert(entry.child_id.as_str(), entry);
    }

    by_date
        .iter()
        .flat_map(|(date, day)| {
            children
                .iter()
                .map(|child| attendance_row(*date, child, day.get(child.id.as_str()).copied()))
        })
        .collect()
}

pub fn children_rows(children: &[Child]) -> Vec<Vec<String>> {
    children
        .iter()
        .map(|child| {
            vec![
                child.name.clone(),
                or_placeholder(Some(child.default_arrival_time.as_str())),
                or_placeholder(Some(child.default_leaving_time.as_str())),
                yes_no(child.has_meal),
                yes_no(child.has_snack),
            ]
        })
        .collect()
}

/// Renders a header and rows as a BOM-prefixed, fully quoted CSV document.
pub fn to_csv<H, R>(headers: &[H], rows: &[R]) -> Result<String>
where
    H: AsRef<str>,
    R: AsRef<[String]>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(headers.iter().map(|h| h.as_ref()))?;
    for row in rows {
        writer.write_record(row.as_ref())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| eyre!("Error flushing CSV export: {}", e))?;

    Ok(format!("{}{}", BOM, String::from_utf8(bytes)?))
}

pub fn attendance_csv(children: &[Child], entries: &[TimeEntry]) -> Result<String> {
    to_csv(&ATTENDANCE_HEADERS, &attendance_rows(children, entries))
}

pub fn children_csv(children: &[Child]) -> Result<String> {
    to_csv(&CHILDREN_HEADERS, &children_rows(children))
}

pub fn attendance_filename(range: &DateRange) -> String {
    format!("presences_{}_{}.csv", range.start_str(), range.end_str())
}

pub fn children_filename(today: NaiveDate) -> String {
    format!("enfants_{}.csv", today.format("%Y-%m-%d"))
}

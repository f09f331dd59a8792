//! # Time Utilities
//!
//! Clock times are kept as "HH:mm" strings on the wire and converted to
//! minutes since midnight for arithmetic. Windows are half-open
//! `[start, end)` and a segment overlaps a window only if it strictly
//! crosses into it: a segment that ends exactly at the window start, or
//! starts exactly at its end, does not count.

use crate::models::entry::TimeSegment;

/// Half-open interval of minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: u32,
    pub end: u32,
}

impl TimeWindow {
    pub const fn from_hours(start: u32, end: u32) -> Self {
        Self {
            start: start * 60,
            end: end * 60,
        }
    }
}

/// Lunch is served between 11:00 and 13:00.
pub const LUNCH_WINDOW: TimeWindow = TimeWindow::from_hours(11, 13);

/// Afternoon snack is served between 15:00 and 17:00.
pub const SNACK_WINDOW: TimeWindow = TimeWindow::from_hours(15, 17);

/// Parses "HH:mm" into minutes since midnight.
pub fn parse_clock(text: &str) -> Option<u32> {
    let (hours, minutes) = text.trim().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

pub fn format_clock(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Both bounds of a segment in minutes, if both are set and valid.
pub fn segment_bounds(segment: &TimeSegment) -> Option<(u32, u32)> {
    let arrival = parse_clock(segment.arrival_time.as_deref()?)?;
    let leaving = parse_clock(segment.leaving_time.as_deref()?)?;
    Some((arrival, leaving))
}

pub fn overlaps(arrival: u32, leaving: u32, window: TimeWindow) -> bool {
    arrival < window.end && leaving > window.start
}

/// True if any complete segment overlaps `window`.
pub fn is_present_during(segments: &[TimeSegment], window: TimeWindow) -> bool {
    segments.iter().any(|segment| {
        segment_bounds(segment)
            .map(|(arrival, leaving)| overlaps(arrival, leaving, window))
            .unwrap_or(false)
    })
}

pub fn should_have_meal(segments: &[TimeSegment]) -> bool {
    is_present_during(segments, LUNCH_WINDOW)
}

pub fn should_have_snack(segments: &[TimeSegment]) -> bool {
    is_present_during(segments, SNACK_WINDOW)
}

/// Sum of positive segment lengths; inverted or empty segments add nothing.
pub fn total_minutes(segments: &[TimeSegment]) -> u32 {
    segments
        .iter()
        .filter_map(segment_bounds)
        .map(|(arrival, leaving)| leaving.saturating_sub(arrival))
        .sum()
}

/// Formats minutes as "5h00".
pub fn format_duration(minutes: u32) -> String {
    format!("{}h{:02}", minutes / 60, minutes % 60)
}

/// Formatted total presence, or `None` when nothing adds up.
pub fn entry_duration(segments: &[TimeSegment]) -> Option<String> {
    match total_minutes(segments) {
        0 => None,
        minutes => Some(format_duration(minutes)),
    }
}

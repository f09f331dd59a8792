//! # Presence Derivation
//!
//! Effective meal/snack status is resolved in this order:
//!
//! 1. the explicit entry-level choice, when it is not `UseDefault`
//! 2. `true` when a segment overlaps the lunch (or snack) window
//! 3. the child's own default policy
//!
//! An absent child has no presence segments, so only the child's default
//! can apply.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    models::{
        child::Child,
        entry::{MealChoice, TimeEntry},
    },
    time::{entry_duration, should_have_meal, should_have_snack},
};

fn resolve(choice: MealChoice, derived: bool, child_default: bool) -> bool {
    match choice.explicit() {
        Some(value) => value,
        None if derived => true,
        None => child_default,
    }
}

pub fn effective_meal(child: &Child, entry: Option<&TimeEntry>) -> bool {
    match entry {
        Some(entry) => resolve(
            entry.has_meal,
            should_have_meal(entry.presence_segments()),
            child.has_meal,
        ),
        None => child.has_meal,
    }
}

pub fn effective_snack(child: &Child, entry: Option<&TimeEntry>) -> bool {
    match entry {
        Some(entry) => resolve(
            entry.has_snack,
            should_have_snack(entry.presence_segments()),
            child.has_snack,
        ),
        None => child.has_snack,
    }
}

/// Meal/snack as printed in exports: explicit choice or child default.
pub fn declared_meal(child: &Child, entry: Option<&TimeEntry>) -> bool {
    entry
        .and_then(|e| e.has_meal.explicit())
        .unwrap_or(child.has_meal)
}

pub fn declared_snack(child: &Child, entry: Option<&TimeEntry>) -> bool {
    entry
        .and_then(|e| e.has_snack.explicit())
        .unwrap_or(child.has_snack)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryStatus {
    NotRecorded,
    Absent,
    /// Arrived, with at least one block still open.
    Present,
    /// Every recorded block has a leaving time.
    Departed,
}

impl EntryStatus {
    pub fn of(entry: Option<&TimeEntry>) -> Self {
        let Some(entry) = entry else {
            return EntryStatus::NotRecorded;
        };
        if entry.is_absent {
            return EntryStatus::Absent;
        }
        let mut recorded = entry.segments.iter().filter(|s| s.is_recorded()).peekable();
        if recorded.peek().is_none() {
            return EntryStatus::NotRecorded;
        }
        if recorded.all(|s| s.leaving_time.as_deref().is_some_and(|t| !t.is_empty())) {
            EntryStatus::Departed
        } else {
            EntryStatus::Present
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntryStatus::NotRecorded => "Not recorded",
            EntryStatus::Absent => "Absent",
            EntryStatus::Present => "Present",
            EntryStatus::Departed => "Left",
        }
    }
}

/// Everything the UI shows for one child on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCard {
    pub child_id: String,
    pub child_name: String,
    pub date: NaiveDate,
    pub expected: bool,
    pub status: EntryStatus,
    /// The stored entry, or the blank one a first edit would start from.
    pub entry: TimeEntry,
    pub stored: bool,
    pub auto_meal: bool,
    pub auto_snack: bool,
    pub has_meal: bool,
    pub has_snack: bool,
    pub duration: Option<String>,
}

impl DayCard {
    pub fn build(child: &Child, date: NaiveDate, entry: Option<&TimeEntry>) -> Self {
        let current = entry
            .cloned()
            .unwrap_or_else(|| TimeEntry::blank(&child.id, date));
        let segments = current.presence_segments();

        Self {
            child_id: child.id.clone(),
            child_name: child.name.clone(),
            date,
            expected: child.is_expected_on(date),
            status: EntryStatus::of(entry),
            auto_meal: should_have_meal(segments),
            auto_snack: should_have_snack(segments),
            has_meal: effective_meal(child, entry),
            has_snack: effective_snack(child, entry),
            duration: entry_duration(segments),
            stored: entry.is_some(),
            entry: current,
        }
    }
}

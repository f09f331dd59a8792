//! Entries for the range currently on screen, updated optimistically
//! after each save.

use chrono::NaiveDate;

use kiddytime_core::{calendar::DateRange, models::entry::TimeEntry};

#[derive(Debug, Clone, Default)]
pub struct EntryCache {
    range: Option<DateRange>,
    entries: Vec<TimeEntry>,
}

impl EntryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached range and its entries.
    pub fn load(&mut self, range: DateRange, entries: Vec<TimeEntry>) {
        self.range = Some(range);
        self.entries = entries;
    }

    pub fn range(&self) -> Option<DateRange> {
        self.range
    }

    /// True when `range` is already loaded.
    pub fn covers(&self, range: &DateRange) -> bool {
        self.range
            .is_some_and(|loaded| loaded.start <= range.start && range.end <= loaded.end)
    }

    pub fn entries(&self) -> &[TimeEntry] {
        &self.entries
    }

    pub fn entry_for(&self, child_id: &str, date: NaiveDate) -> Option<&TimeEntry> {
        self.entries.iter().find(|e| e.matches(child_id, date))
    }

    /// The cached entry, or the blank one an edit would start from.
    pub fn entry_or_blank(&self, child_id: &str, date: NaiveDate) -> TimeEntry {
        self.entry_for(child_id, date)
            .cloned()
            .unwrap_or_else(|| TimeEntry::blank(child_id, date))
    }

    /// Replaces the entry with the same `(child_id, date)` or appends it.
    pub fn reconcile(&mut self, entry: TimeEntry) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.matches(&entry.child_id, entry.date))
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn remove_child(&mut self, child_id: &str) {
        self.entries.retain(|e| e.child_id != child_id);
    }

    pub fn clear(&mut self) {
        self.range = None;
        self.entries.clear();
    }
}

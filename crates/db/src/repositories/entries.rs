use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use eyre::Result;

use kiddytime_core::{
    migration::migrate_entries,
    models::entry::{TimeEntry, UpdateEntryRequest},
};

use super::EntryRepository;
use crate::json_file::JsonCollection;

pub struct EntryStore {
    collection: JsonCollection<TimeEntry>,
}

impl EntryStore {
    /// Opens the entries file; flat legacy records load as one segment.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            collection: JsonCollection::open_with(path, migrate_entries).await?,
        })
    }

    pub async fn migrate(&self) -> Result<usize> {
        self.collection.migrate().await
    }
}

#[async_trait]
impl EntryRepository for EntryStore {
    async fn all(&self) -> Result<Vec<TimeEntry>> {
        self.collection.read().await
    }

    async fn find_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<TimeEntry>> {
        let entries = self.collection.read().await?;
        Ok(entries
            .into_iter()
            .filter(|e| start <= e.date && e.date <= end)
            .collect())
    }

    async fn find_by_child_and_date(
        &self,
        child_id: &str,
        date: NaiveDate,
    ) -> Result<Option<TimeEntry>> {
        let entries = self.collection.read().await?;
        Ok(entries.into_iter().find(|e| e.matches(child_id, date)))
    }

    async fn upsert(&self, mut entry: TimeEntry) -> Result<TimeEntry> {
        entry.normalize();
        tracing::debug!("Saving entry {}", entry.id);
        let stored = entry.clone();
        self.collection
            .modify(|entries| {
                match entries.iter_mut().find(|e| e.matches(&entry.child_id, entry.date)) {
                    Some(existing) => *existing = entry,
                    None => entries.push(entry),
                }
            })
            .await?;
        Ok(stored)
    }

    async fn merge(
        &self,
        child_id: &str,
        date: NaiveDate,
        patch: UpdateEntryRequest,
        now: DateTime<Utc>,
    ) -> Result<TimeEntry> {
        self.collection
            .modify(|entries| {
                match entries.iter_mut().find(|e| e.matches(child_id, date)) {
                    Some(existing) => {
                        patch.apply_to(existing, now);
                        existing.clone()
                    }
                    None => {
                        let mut entry = TimeEntry::blank(child_id, date);
                        patch.apply_to(&mut entry, now);
                        entries.push(entry.clone());
                        entry
                    }
                }
            })
            .await
    }

    async fn delete_by_child(&self, child_id: &str) -> Result<usize> {
        let removed = self
            .collection
            .modify_if(|entries| {
                let before = entries.len();
                entries.retain(|e| e.child_id != child_id);
                let removed = before - entries.len();
                (removed > 0).then_some(removed)
            })
            .await?;
        Ok(removed.unwrap_or(0))
    }
}

//! # JSON Collection Files
//!
//! Every collection lives in a single file holding a JSON array. Each
//! operation reads the whole file and, when it changes something, writes
//! the whole file back.
//!
//! A collection serializes its read-modify-write cycles behind an async
//! mutex, and writes land in a sibling temp file that is renamed over the
//! target so readers never observe a half-written array.

use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
};

use eyre::{Result, WrapErr};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::{fs, sync::Mutex};

use kiddytime_core::migration::needs_migration;

/// Turns the raw records of a file into typed records.
pub type Decoder<T> = fn(Vec<Value>) -> serde_json::Result<Vec<T>>;

fn decode_plain<T: DeserializeOwned>(records: Vec<Value>) -> serde_json::Result<Vec<T>> {
    records.into_iter().map(serde_json::from_value).collect()
}

pub struct JsonCollection<T> {
    path: PathBuf,
    decoder: Decoder<T>,
    lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    /// Opens the file at `path`, creating it as `[]` when missing.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(path, decode_plain::<T>).await
    }

    /// Opens the file with a custom decoder, e.g. one that upgrades
    /// legacy records.
    pub async fn open_with(path: impl Into<PathBuf>, decoder: Decoder<T>) -> Result<Self> {
        let path = path.into();
        if fs::metadata(&path).await.is_err() {
            tracing::info!("Creating empty collection file {}", path.display());
            write_atomic(&path, b"[]").await?;
        }

        Ok(Self {
            path,
            decoder,
            lock: Mutex::new(()),
            _records: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_raw(&self) -> Result<Vec<Value>> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                tracing::error!("Error reading {}: {}", self.path.display(), e);
                return Err(e).wrap_err_with(|| format!("Failed to read {}", self.path.display()));
            }
        };

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Collection file {} is not a JSON array: {}", self.path.display(), e);
            eyre::eyre!("Collection file {} is corrupt: {}", self.path.display(), e)
        })
    }

    async fn read_unlocked(&self) -> Result<Vec<T>> {
        let raw = self.read_raw().await?;
        (self.decoder)(raw).map_err(|e| {
            tracing::error!("Invalid record in {}: {}", self.path.display(), e);
            eyre::eyre!("Invalid record in {}: {}", self.path.display(), e)
        })
    }

    async fn write_unlocked(&self, records: &[T]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(records)?;
        write_atomic(&self.path, &bytes).await
    }

    pub async fn read(&self) -> Result<Vec<T>> {
        let _guard = self.lock.lock().await;
        self.read_unlocked().await
    }

    pub async fn write(&self, records: &[T]) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.write_unlocked(records).await
    }

    /// Runs `change` on the current records and persists the result.
    pub async fn modify<R>(&self, change: impl FnOnce(&mut Vec<T>) -> R) -> Result<R> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_unlocked().await?;
        let outcome = change(&mut records);
        self.write_unlocked(&records).await?;
        Ok(outcome)
    }

    /// Like [`modify`](Self::modify), but the file is only rewritten when
    /// `change` returns `Some`.
    pub async fn modify_if<R>(
        &self,
        change: impl FnOnce(&mut Vec<T>) -> Option<R>,
    ) -> Result<Option<R>> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_unlocked().await?;
        let Some(outcome) = change(&mut records) else {
            return Ok(None);
        };
        self.write_unlocked(&records).await?;
        Ok(Some(outcome))
    }

    /// Rewrites the file in the current schema if any record is legacy.
    /// Returns the number of records rewritten, zero when nothing changed.
    pub async fn migrate(&self) -> Result<usize> {
        let _guard = self.lock.lock().await;
        let raw = self.read_raw().await?;
        if !needs_migration(&raw) {
            return Ok(0);
        }

        let records = (self.decoder)(raw)
            .wrap_err_with(|| format!("Failed to migrate {}", self.path.display()))?;
        self.write_unlocked(&records).await?;
        tracing::info!(
            "Migrated {} records in {}",
            records.len(),
            self.path.display()
        );
        Ok(records.len())
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, bytes)
        .await
        .wrap_err_with(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .await
        .wrap_err_with(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: u32,
        text: String,
    }

    #[tokio::test]
    async fn missing_file_is_created_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");

        let notes = JsonCollection::<Note>::open(&path).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        assert!(notes.read().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn modify_persists_pretty_json() {
        let dir = tempdir().unwrap();
        let notes = JsonCollection::<Note>::open(dir.path().join("notes.json"))
            .await
            .unwrap();

        let count = notes
            .modify(|records| {
                records.push(Note { id: 1, text: "hello".into() });
                records.len()
            })
            .await
            .unwrap();

        assert_eq!(count, 1);
        let text = std::fs::read_to_string(notes.path()).unwrap();
        assert!(text.contains("\n  {"));
        assert!(!dir.path().join("notes.json.tmp").exists());
    }

    #[tokio::test]
    async fn modify_if_skips_the_write_on_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(&path, r#"[{"id":1,"text":"a"}]"#).unwrap();
        let notes = JsonCollection::<Note>::open(&path).await.unwrap();

        let missing = notes
            .modify_if(|records| records.iter_mut().find(|n| n.id == 2).map(|n| n.id))
            .await
            .unwrap();
        assert_eq!(missing, None);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"[{"id":1,"text":"a"}]"#);

        let found = notes
            .modify_if(|records| {
                let note = records.iter_mut().find(|n| n.id == 1)?;
                note.text = "b".into();
                Some(note.id)
            })
            .await
            .unwrap();
        assert_eq!(found, Some(1));
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"text\": \"b\""));
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error_and_left_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(&path, "{ not json").unwrap();

        let notes = JsonCollection::<Note>::open(&path).await.unwrap();

        assert!(notes.read().await.is_err());
        assert!(notes.modify(|records| records.clear()).await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn concurrent_modifications_are_serialized() {
        let dir = tempdir().unwrap();
        let notes = std::sync::Arc::new(
            JsonCollection::<Note>::open(dir.path().join("notes.json"))
                .await
                .unwrap(),
        );

        let tasks: Vec<_> = (0..20)
            .map(|id| {
                let notes = notes.clone();
                tokio::spawn(async move {
                    notes
                        .modify(|records| records.push(Note { id, text: String::new() }))
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(notes.read().await.unwrap().len(), 20);
    }
}

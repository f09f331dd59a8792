//! # KiddyTime Storage
//!
//! Flat JSON files under a data directory, one per collection:
//! `users.json`, `children.json` and `entries.json`. The repository traits
//! let the API swap in mocks for tests.

pub mod json_file;
pub mod repositories;

pub mod mock;

use std::{path::Path, sync::Arc};

use eyre::{Result, WrapErr};

use repositories::{ChildStore, EntryStore, UserStore};

pub const USERS_FILE: &str = "users.json";
pub const CHILDREN_FILE: &str = "children.json";
pub const ENTRIES_FILE: &str = "entries.json";

/// Counts of records rewritten by [`DataStore::migrate`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub children: usize,
    pub entries: usize,
}

#[derive(Clone)]
pub struct DataStore {
    pub users: Arc<UserStore>,
    pub children: Arc<ChildStore>,
    pub entries: Arc<EntryStore>,
}

impl DataStore {
    /// Opens (and creates if needed) the collections under `data_dir`,
    /// then upgrades any legacy records on disk.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        tokio::fs::create_dir_all(data_dir)
            .await
            .wrap_err_with(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let store = Self {
            users: Arc::new(UserStore::open(data_dir.join(USERS_FILE)).await?),
            children: Arc::new(ChildStore::open(data_dir.join(CHILDREN_FILE)).await?),
            entries: Arc::new(EntryStore::open(data_dir.join(ENTRIES_FILE)).await?),
        };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<MigrationReport> {
        Ok(MigrationReport {
            children: self.children.migrate().await?,
            entries: self.entries.migrate().await?,
        })
    }

    pub async fn delete_child_cascade(&self, id: &str) -> Result<bool> {
        repositories::delete_child_cascade(self.children.as_ref(), self.entries.as_ref(), id).await
    }
}

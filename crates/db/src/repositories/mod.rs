//! Repository traits over the three collections, with the JSON-file
//! implementations in the submodules.

pub mod children;
pub mod entries;
pub mod users;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use eyre::Result;

use kiddytime_core::models::{
    auth::User,
    child::{Child, UpdateChildRequest},
    entry::{TimeEntry, UpdateEntryRequest},
};

pub use children::ChildStore;
pub use entries::EntryStore;
pub use users::UserStore;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn all(&self) -> Result<Vec<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn create(&self, user: User) -> Result<User>;

    /// Stores `user` only while the collection is empty; `None` otherwise.
    async fn create_if_none(&self, user: User) -> Result<Option<User>>;

    /// Replaces the user with the same id; `None` if there is none.
    async fn update(&self, user: User) -> Result<Option<User>>;
}

#[async_trait]
pub trait ChildRepository: Send + Sync {
    async fn all(&self) -> Result<Vec<Child>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Child>>;

    async fn create(&self, child: Child) -> Result<Child>;

    /// Merges `patch` into the stored child; `None` if the id is unknown.
    async fn update(&self, id: &str, patch: UpdateChildRequest) -> Result<Option<Child>>;

    /// Returns false if the id is unknown.
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait EntryRepository: Send + Sync {
    async fn all(&self) -> Result<Vec<TimeEntry>>;

    /// Entries with `start <= date <= end`.
    async fn find_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<TimeEntry>>;

    async fn find_by_child_and_date(
        &self,
        child_id: &str,
        date: NaiveDate,
    ) -> Result<Option<TimeEntry>>;

    /// Stores `entry` under its `(child_id, date)` key, replacing any record
    /// already there.
    async fn upsert(&self, entry: TimeEntry) -> Result<TimeEntry>;

    /// Applies `patch` to the entry under `(child_id, date)`, or to a blank
    /// one, in a single locked cycle.
    async fn merge(
        &self,
        child_id: &str,
        date: NaiveDate,
        patch: UpdateEntryRequest,
        now: DateTime<Utc>,
    ) -> Result<TimeEntry>;

    /// Removes every entry of the child and returns how many were dropped.
    async fn delete_by_child(&self, child_id: &str) -> Result<usize>;
}

/// Deletes a child together with all of its entries. Entries go first so a
/// failure never leaves orphans behind a deleted child.
pub async fn delete_child_cascade(
    children: &dyn ChildRepository,
    entries: &dyn EntryRepository,
    id: &str,
) -> Result<bool> {
    if children.find_by_id(id).await?.is_none() {
        return Ok(false);
    }
    let removed = entries.delete_by_child(id).await?;
    let deleted = children.delete(id).await?;
    tracing::debug!("Deleted child {} and {} entries", id, removed);
    Ok(deleted)
}

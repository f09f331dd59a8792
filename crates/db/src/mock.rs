//! mockall doubles of the repository traits, used by handler tests to
//! simulate storage failures.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mockall::mock;

use kiddytime_core::models::{
    auth::User,
    child::{Child, UpdateChildRequest},
    entry::{TimeEntry, UpdateEntryRequest},
};

use crate::repositories::{ChildRepository, EntryRepository, UserRepository};

mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserRepository for UserRepo {
        async fn all(&self) -> eyre::Result<Vec<User>>;
        async fn find_by_username(&self, username: &str) -> eyre::Result<Option<User>>;
        async fn create(&self, user: User) -> eyre::Result<User>;
        async fn create_if_none(&self, user: User) -> eyre::Result<Option<User>>;
        async fn update(&self, user: User) -> eyre::Result<Option<User>>;
    }
}

mock! {
    pub ChildRepo {}

    #[async_trait]
    impl ChildRepository for ChildRepo {
        async fn all(&self) -> eyre::Result<Vec<Child>>;
        async fn find_by_id(&self, id: &str) -> eyre::Result<Option<Child>>;
        async fn create(&self, child: Child) -> eyre::Result<Child>;
        async fn update(&self, id: &str, patch: UpdateChildRequest) -> eyre::Result<Option<Child>>;
        async fn delete(&self, id: &str) -> eyre::Result<bool>;
    }
}

mock! {
    pub EntryRepo {}

    #[async_trait]
    impl EntryRepository for EntryRepo {
        async fn all(&self) -> eyre::Result<Vec<TimeEntry>>;
        async fn find_by_date_range(
            &self,
            start: NaiveDate,
            end: NaiveDate,
        ) -> eyre::Result<Vec<TimeEntry>>;
        async fn find_by_child_and_date(
            &self,
            child_id: &str,
            date: NaiveDate,
        ) -> eyre::Result<Option<TimeEntry>>;
        async fn upsert(&self, entry: TimeEntry) -> eyre::Result<TimeEntry>;
        async fn merge(
            &self,
            child_id: &str,
            date: NaiveDate,
            patch: UpdateEntryRequest,
            now: DateTime<Utc>,
        ) -> eyre::Result<TimeEntry>;
        async fn delete_by_child(&self, child_id: &str) -> eyre::Result<usize>;
    }
}

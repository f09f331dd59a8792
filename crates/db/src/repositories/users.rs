use std::path::PathBuf;

use async_trait::async_trait;
use eyre::Result;

use kiddytime_core::models::auth::User;

use super::UserRepository;
use crate::json_file::JsonCollection;

pub struct UserStore {
    collection: JsonCollection<User>,
}

impl UserStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            collection: JsonCollection::open(path).await?,
        })
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn all(&self) -> Result<Vec<User>> {
        self.collection.read().await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.collection.read().await?;
        Ok(users.into_iter().find(|u| u.username == username))
    }

    async fn create(&self, user: User) -> Result<User> {
        tracing::debug!("Creating user: id={}, username={}", user.id, user.username);
        let created = user.clone();
        self.collection.modify(|users| users.push(user)).await?;
        Ok(created)
    }

    async fn create_if_none(&self, user: User) -> Result<Option<User>> {
        self.collection
            .modify_if(|users| {
                if !users.is_empty() {
                    return None;
                }
                tracing::debug!("Creating user: id={}, username={}", user.id, user.username);
                users.push(user);
                users.last().cloned()
            })
            .await
    }

    async fn update(&self, user: User) -> Result<Option<User>> {
        self.collection
            .modify_if(|users| {
                let slot = users.iter_mut().find(|u| u.id == user.id)?;
                *slot = user;
                Some(slot.clone())
            })
            .await
    }
}

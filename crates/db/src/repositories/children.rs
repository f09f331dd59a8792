use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use eyre::Result;

use kiddytime_core::{
    migration::migrate_children,
    models::child::{Child, UpdateChildRequest},
};

use super::ChildRepository;
use crate::json_file::JsonCollection;

pub struct ChildStore {
    collection: JsonCollection<Child>,
}

impl ChildStore {
    /// Opens the children file; legacy records are upgraded as they load.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            collection: JsonCollection::open_with(path, migrate_children).await?,
        })
    }

    pub async fn migrate(&self) -> Result<usize> {
        self.collection.migrate().await
    }
}

#[async_trait]
impl ChildRepository for ChildStore {
    async fn all(&self) -> Result<Vec<Child>> {
        self.collection.read().await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Child>> {
        let children = self.collection.read().await?;
        Ok(children.into_iter().find(|c| c.id == id))
    }

    async fn create(&self, child: Child) -> Result<Child> {
        tracing::debug!("Creating child: id={}, name={}", child.id, child.name);
        let created = child.clone();
        self.collection.modify(|children| children.push(child)).await?;
        Ok(created)
    }

    async fn update(&self, id: &str, patch: UpdateChildRequest) -> Result<Option<Child>> {
        self.collection
            .modify_if(|children| {
                let child = children.iter_mut().find(|c| c.id == id)?;
                child.apply(patch);
                child.updated_at = Some(Utc::now());
                Some(child.clone())
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let removed = self
            .collection
            .modify_if(|children| {
                let before = children.len();
                children.retain(|c| c.id != id);
                (children.len() != before).then_some(())
            })
            .await?;
        Ok(removed.is_some())
    }
}

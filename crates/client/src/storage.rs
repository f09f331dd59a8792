//! # Storage Facade
//!
//! What screens call to load and save data. Writes report failures to the
//! caller; reads log the failure and fall back to an empty value so a
//! screen can still render.

use chrono::NaiveDate;

use kiddytime_core::{
    calendar::DateRange,
    models::{
        child::{Child, CreateChildRequest, UpdateChildRequest},
        entry::{SaveEntryRequest, TimeEntry, parse_date},
    },
};

use crate::{api::ApiClient, error::ClientResult};

/// First and last dates of the "everything" range used to load all entries.
pub const ALL_ENTRIES_START: &str = "2020-01-01";
pub const ALL_ENTRIES_END: &str = "2099-12-31";

pub fn all_entries_range() -> DateRange {
    let start = parse_date(ALL_ENTRIES_START).unwrap_or(NaiveDate::MIN);
    let end = parse_date(ALL_ENTRIES_END).unwrap_or(NaiveDate::MAX);
    DateRange::new(start, end)
}

#[derive(Clone)]
pub struct StorageService {
    api: ApiClient,
}

impl StorageService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // Password management

    pub async fn set_password(&self, password: &str) -> ClientResult<()> {
        self.api.setup(password).await?;
        Ok(())
    }

    /// Logs in; any failure counts as a wrong password.
    pub async fn verify_password(&self, password: &str) -> bool {
        self.api.login(password).await.is_ok()
    }

    pub async fn has_password(&self) -> bool {
        match self.api.has_password().await {
            Ok(has_password) => has_password,
            Err(e) => {
                tracing::warn!("Error checking password: {}", e);
                false
            }
        }
    }

    pub async fn check_auth(&self) -> bool {
        match self.api.check().await {
            Ok(check) => check.is_authenticated,
            Err(e) => {
                tracing::warn!("Error checking auth: {}", e);
                false
            }
        }
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.api.logout().await?;
        Ok(())
    }

    // Children management

    pub async fn get_children(&self) -> Vec<Child> {
        self.api.children().await.unwrap_or_else(|e| {
            tracing::warn!("Error getting children: {}", e);
            Vec::new()
        })
    }

    pub async fn add_child(&self, child: &Child) -> ClientResult<Child> {
        self.api.create_child(&CreateChildRequest::from(child)).await
    }

    pub async fn update_child(&self, child: &Child) -> ClientResult<Child> {
        self.api
            .update_child(&child.id, &UpdateChildRequest::from(child))
            .await
    }

    pub async fn delete_child(&self, child_id: &str) -> ClientResult<()> {
        self.api.delete_child(child_id).await?;
        Ok(())
    }

    // Time entries

    pub async fn get_time_entries(&self) -> Vec<TimeEntry> {
        self.get_entries_for_date_range(&all_entries_range()).await
    }

    /// `None` when the entry does not exist or cannot be loaded.
    pub async fn get_time_entry(&self, child_id: &str, date: NaiveDate) -> Option<TimeEntry> {
        match self.api.entry(child_id, date).await {
            Ok(entry) => Some(entry),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                tracing::warn!("Error getting entry for {} on {}: {}", child_id, date, e);
                None
            }
        }
    }

    pub async fn save_time_entry(&self, entry: &TimeEntry) -> ClientResult<TimeEntry> {
        self.api.save_entry(&SaveEntryRequest::from(entry)).await
    }

    pub async fn get_entries_for_date_range(&self, range: &DateRange) -> Vec<TimeEntry> {
        self.api
            .entries(range.start, range.end)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(
                    "Error getting entries from {} to {}: {}",
                    range.start_str(),
                    range.end_str(),
                    e
                );
                Vec::new()
            })
    }
}

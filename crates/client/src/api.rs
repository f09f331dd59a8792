//! Thin wrapper over the HTTP endpoints. Every call returns the decoded
//! body or a [`ClientError`]; nothing is swallowed here.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;

use kiddytime_core::{
    calendar::DateRange,
    models::{
        auth::{AuthCheckResponse, HasPasswordResponse, MessageResponse},
        child::{Child, CreateChildRequest, UpdateChildRequest},
        entry::{DATE_FORMAT, SaveEntryRequest, TimeEntry, UpdateEntryRequest},
    },
    roster::RosterView,
};

use crate::{
    config::ClientConfig,
    error::{ClientError, ClientResult, NETWORK_ERROR},
};

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

fn day(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// HTTP client that keeps the session cookie between calls.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| NETWORK_ERROR.to_string());
        tracing::debug!("API answered {}: {}", status, message);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.config.endpoint(path))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.config.endpoint(path))
    }

    fn put(&self, path: &str) -> RequestBuilder {
        self.http.put(self.config.endpoint(path))
    }

    // Auth

    pub async fn has_password(&self) -> ClientResult<bool> {
        let body: HasPasswordResponse = self.send_json(self.get("/auth/has-password")).await?;
        Ok(body.has_password)
    }

    pub async fn check(&self) -> ClientResult<AuthCheckResponse> {
        self.send_json(self.get("/auth/check")).await
    }

    pub async fn setup(&self, password: &str) -> ClientResult<MessageResponse> {
        let request = self.post("/auth/setup").json(&json!({ "password": password }));
        self.send_json(request).await
    }

    pub async fn login(&self, password: &str) -> ClientResult<MessageResponse> {
        let request = self.post("/auth/login").json(&json!({ "password": password }));
        self.send_json(request).await
    }

    pub async fn logout(&self) -> ClientResult<MessageResponse> {
        self.send_json(self.post("/auth/logout")).await
    }

    // Children

    pub async fn children(&self) -> ClientResult<Vec<Child>> {
        self.send_json(self.get("/children")).await
    }

    pub async fn child(&self, id: &str) -> ClientResult<Child> {
        self.send_json(self.get(&format!("/children/{}", id))).await
    }

    pub async fn create_child(&self, child: &CreateChildRequest) -> ClientResult<Child> {
        self.send_json(self.post("/children").json(child)).await
    }

    pub async fn update_child(&self, id: &str, update: &UpdateChildRequest) -> ClientResult<Child> {
        let request = self.put(&format!("/children/{}", id)).json(update);
        self.send_json(request).await
    }

    pub async fn delete_child(&self, id: &str) -> ClientResult<MessageResponse> {
        let request = self.http.delete(self.config.endpoint(&format!("/children/{}", id)));
        self.send_json(request).await
    }

    // Entries

    pub async fn entries(&self, start: NaiveDate, end: NaiveDate) -> ClientResult<Vec<TimeEntry>> {
        let request = self
            .get("/entries")
            .query(&[("startDate", day(start)), ("endDate", day(end))]);
        self.send_json(request).await
    }

    pub async fn entry(&self, child_id: &str, date: NaiveDate) -> ClientResult<TimeEntry> {
        self.send_json(self.get(&format!("/entries/{}/{}", child_id, day(date))))
            .await
    }

    pub async fn save_entry(&self, entry: &SaveEntryRequest) -> ClientResult<TimeEntry> {
        self.send_json(self.post("/entries").json(entry)).await
    }

    pub async fn update_entry(
        &self,
        child_id: &str,
        date: NaiveDate,
        update: &UpdateEntryRequest,
    ) -> ClientResult<TimeEntry> {
        let request = self
            .put(&format!("/entries/{}/{}", child_id, day(date)))
            .json(update);
        self.send_json(request).await
    }

    // Day view and exports

    pub async fn attendance(
        &self,
        date: NaiveDate,
        show_all: bool,
        hidden: &[String],
    ) -> ClientResult<RosterView> {
        let mut query = vec![("showAll", show_all.to_string())];
        if !hidden.is_empty() {
            query.push(("hidden", hidden.join(",")));
        }
        let request = self.get(&format!("/attendance/{}", day(date))).query(&query);
        self.send_json(request).await
    }

    pub async fn export_entries(&self, range: &DateRange) -> ClientResult<String> {
        let request = self
            .get("/export/entries")
            .query(&[("startDate", range.start_str()), ("endDate", range.end_str())]);
        Ok(self.send(request).await?.text().await?)
    }

    pub async fn export_children(&self) -> ClientResult<String> {
        Ok(self.send(self.get("/export/children")).await?.text().await?)
    }
}

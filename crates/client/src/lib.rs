//! # KiddyTime Client
//!
//! Typed access to the KiddyTime API for front ends: a thin HTTP client,
//! the storage facade screens call into, and a local cache of the entries
//! currently on screen.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod storage;

pub use api::ApiClient;
pub use cache::EntryCache;
pub use config::ClientConfig;
pub use error::ClientError;
pub use storage::StorageService;

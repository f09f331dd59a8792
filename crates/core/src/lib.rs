//! # KiddyTime Core
//!
//! Domain types and pure logic for the KiddyTime attendance tracker.
//!
//! - **models**: children, attendance entries, the admin user and API payloads
//! - **time**: "HH:mm" parsing, window overlap and duration arithmetic
//! - **presence**: meal/snack derivation and the per-day card view
//! - **roster**: expected vs unexpected children for a date
//! - **migration**: upgrades of legacy flat records to the segmented schema
//! - **calendar**: day/week/month ranges used for loading and export
//! - **export**: CSV rendering of attendance and children lists

pub mod calendar;
pub mod errors;
pub mod export;
pub mod migration;
pub mod models;
pub mod presence;
pub mod roster;
pub mod time;

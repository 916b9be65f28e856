//! Local persistence for onboard filters and keywords.
//!
//! This crate stores saved filters and keyword lists in a single JSON
//! document, scopes every read and write to an explicit [`UserId`], and runs
//! all filter creation through the validation gate of `onboard-filters`.

use chrono::{DateTime, Utc};
use onboard_filters::Filter;
use serde::{Deserialize, Serialize};

mod keyword;
mod manager;
mod store;
mod user;

pub use keyword::{default_keyword_categories, persona_category, Keyword, KeywordCategory};
pub use manager::{FilterManager, StoreError, StoreResult};
pub use store::{DatabaseStore, DatabaseStoreError};
pub use user::UserId;

/// Snapshot of everything persisted for all users.
///
/// Identifiers are allocated from monotonically increasing counters and are
/// never reused, even after deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    /// Saved filters, in creation order.
    #[serde(default)]
    pub filters: Vec<Filter>,

    /// Saved keywords, in creation order.
    #[serde(default)]
    pub keywords: Vec<Keyword>,

    /// Categories keywords may be filed under.
    #[serde(default = "default_keyword_categories")]
    pub keyword_categories: Vec<KeywordCategory>,

    /// Next filter identifier to hand out.
    #[serde(default = "first_id")]
    pub next_filter_id: i64,

    /// Next keyword identifier to hand out.
    #[serde(default = "first_id")]
    pub next_keyword_id: i64,

    /// UTC timestamp of the last write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn first_id() -> i64 {
    1
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Creates an empty database seeded with the default keyword categories.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            keywords: Vec::new(),
            keyword_categories: default_keyword_categories(),
            next_filter_id: first_id(),
            next_keyword_id: first_id(),
            updated_at: None,
        }
    }

    /// Reserves the next filter identifier.
    pub fn allocate_filter_id(&mut self) -> i64 {
        let id = self.next_filter_id;
        self.next_filter_id += 1;
        id
    }

    /// Reserves the next keyword identifier.
    pub fn allocate_keyword_id(&mut self) -> i64 {
        let id = self.next_keyword_id;
        self.next_keyword_id += 1;
        id
    }

    /// Records a write at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }
}

//! User-scoped access to saved filters and keywords.
//!
//! The `FilterManager` owns the in-memory [`Database`] and its backing
//! [`DatabaseStore`]. Every read and write takes the acting [`UserId`]
//! explicitly, and every mutation is persisted before it returns.
//!
//! # Example
//!
//! ```no_run
//! use onboard_filters::{Condition, FilterCriteria, FilterDraft, Operator};
//! use onboard_store::{DatabaseStore, FilterManager, UserId};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut manager = FilterManager::new(DatabaseStore::new()?)?;
//!     let user = UserId::anonymous();
//!
//!     let draft = FilterDraft {
//!         name: Some("Chiefs".to_string()),
//!         category: Some("personas".to_string()),
//!         ..FilterDraft::default()
//!     }
//!     .with_criteria(&FilterCriteria::all(vec![Condition::new(
//!         "title",
//!         Operator::Contains,
//!         "chief",
//!     )]));
//!     manager.create_filter(&user, &draft).await?;
//!
//!     let records = vec![json!({ "title": "Police Chief" })];
//!     let matched = manager.apply_filters(&user, Some("personas"), &records);
//!     assert_eq!(matched.len(), 1);
//!     Ok(())
//! }
//! ```

mod keywords;
mod lookups;

use chrono::Utc;
use onboard_filters::filter::Record;
use onboard_filters::{
    apply_filters, prepare_filter_for_save, validate_filter, Filter, FilterDraft, FilterError,
};

use crate::{Database, DatabaseStore, DatabaseStoreError, UserId};

pub(crate) use lookups::{find_similar_name, format_not_found_error};

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the database file failed.
    #[error("store error: {0}")]
    Store(#[from] DatabaseStoreError),

    /// A filter did not pass validation.
    #[error(transparent)]
    InvalidFilter(#[from] FilterError),

    /// The requested record does not exist for this user.
    #[error("{}", format_not_found_error(resource_type, identifier, suggestion.as_deref()))]
    NotFound {
        /// The type of record that was not found (e.g., "filter", "keyword category").
        resource_type: &'static str,
        /// The name or ID that was searched for.
        identifier: String,
        /// Optional suggestion for a similar name.
        suggestion: Option<String>,
    },

    /// A keyword was blank after trimming.
    #[error("keyword cannot be empty")]
    EmptyKeyword,

    /// Other invalid input.
    #[error("{0}")]
    Validation(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// User-scoped filter and keyword operations over a persisted [`Database`].
///
/// `FilterManager` is [`Send`] but mutating methods take `&mut self`. In CLI
/// usage a single task owns the manager and no synchronization is needed.
pub struct FilterManager {
    store: DatabaseStore,
    db: Database,
}

impl FilterManager {
    /// Creates a manager, loading the database from `store` if it exists.
    ///
    /// Stored filters that no longer validate are kept but logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the database file exists but cannot be read or parsed.
    pub fn new(store: DatabaseStore) -> StoreResult<Self> {
        let db = store.load_or_default()?;
        let manager = Self { store, db };
        manager.audit_filters();
        Ok(manager)
    }

    /// Returns the in-memory database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Returns the backing store.
    pub fn store(&self) -> &DatabaseStore {
        &self.store
    }

    fn audit_filters(&self) {
        for filter in &self.db.filters {
            let Ok(value) = serde_json::to_value(filter) else {
                continue;
            };
            if let Err(failure) = validate_filter(&value) {
                tracing::warn!(
                    id = ?filter.id,
                    name = %filter.name,
                    issues = %failure,
                    "stored filter no longer validates"
                );
            }
        }
    }

    /// Saves the database. On failure the snapshot timestamp is restored;
    /// callers undo their own change.
    async fn persist(&mut self) -> StoreResult<()> {
        let previous = self.db.updated_at;
        self.db.touch(Utc::now());
        if let Err(e) = self.store.save_async(&self.db).await {
            self.db.updated_at = previous;
            return Err(e.into());
        }
        Ok(())
    }

    // ==================== Filters ====================

    /// Returns the user's filters, optionally restricted to one category,
    /// in creation order.
    pub fn fetch_filters(&self, user: &UserId, category: Option<&str>) -> Vec<Filter> {
        let filters: Vec<Filter> = self
            .db
            .filters
            .iter()
            .filter(|filter| owned_by(filter, user))
            .filter(|filter| category.map_or(true, |c| filter.category == c))
            .cloned()
            .collect();
        tracing::debug!(user = %user, ?category, count = filters.len(), "fetched filters");
        filters
    }

    /// Validates and saves a new filter for the user.
    ///
    /// The draft goes through [`prepare_filter_for_save`]; the stored filter
    /// receives the next id, the user's id, and equal creation and update
    /// timestamps.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidFilter` if the draft does not validate, or
    /// `StoreError::Store` if saving fails. Nothing is persisted on error.
    pub async fn create_filter(
        &mut self,
        user: &UserId,
        draft: &FilterDraft,
    ) -> StoreResult<Filter> {
        let prepared = prepare_filter_for_save(draft)?;

        let id = self.db.allocate_filter_id();
        let filter = prepared.into_filter(id, user.as_str(), Utc::now());
        self.db.filters.push(filter.clone());

        if let Err(e) = self.persist().await {
            self.db.filters.pop();
            self.db.next_filter_id -= 1;
            return Err(e);
        }

        tracing::debug!(user = %user, id, name = %filter.name, "created filter");
        Ok(filter)
    }

    /// Looks up one of the user's filters by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such filter belongs to the user.
    pub fn find_filter(&self, user: &UserId, id: i64) -> StoreResult<&Filter> {
        self.filter_index(user, id).map(|index| &self.db.filters[index])
    }

    fn filter_index(&self, user: &UserId, id: i64) -> StoreResult<usize> {
        self.db
            .filters
            .iter()
            .position(|filter| filter.id == Some(id) && owned_by(filter, user))
            .ok_or_else(|| StoreError::NotFound {
                resource_type: "filter",
                identifier: id.to_string(),
                suggestion: None,
            })
    }

    /// Turns a filter on or off and bumps its update timestamp.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such filter belongs to the user,
    /// or `StoreError::Store` if saving fails.
    pub async fn set_active(
        &mut self,
        user: &UserId,
        id: i64,
        active: bool,
    ) -> StoreResult<Filter> {
        let index = self.filter_index(user, id)?;
        let filter = &mut self.db.filters[index];
        let previous = (filter.is_active, filter.updated_at);
        filter.is_active = active;
        filter.updated_at = Some(Utc::now());
        let updated = filter.clone();

        if let Err(e) = self.persist().await {
            let filter = &mut self.db.filters[index];
            (filter.is_active, filter.updated_at) = previous;
            return Err(e);
        }
        tracing::debug!(user = %user, id, active, "updated filter");
        Ok(updated)
    }

    /// Deletes one of the user's filters and returns it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such filter belongs to the user,
    /// or `StoreError::Store` if saving fails.
    pub async fn delete_filter(&mut self, user: &UserId, id: i64) -> StoreResult<Filter> {
        let index = self.filter_index(user, id)?;
        let removed = self.db.filters.remove(index);

        if let Err(e) = self.persist().await {
            self.db.filters.insert(index, removed);
            return Err(e);
        }
        tracing::debug!(user = %user, id, "deleted filter");
        Ok(removed)
    }

    /// Narrows `records` through the user's active filters, optionally only
    /// those in one category.
    pub fn apply_filters<'b, R: Record>(
        &self,
        user: &UserId,
        category: Option<&str>,
        records: &'b [R],
    ) -> Vec<&'b R> {
        let filters = self.fetch_filters(user, category);
        apply_filters(records, &filters)
    }
}

fn owned_by(filter: &Filter, user: &UserId) -> bool {
    filter.user_id.as_deref() == Some(user.as_str())
}

#[cfg(test)]
mod tests;

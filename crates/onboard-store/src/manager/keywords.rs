//! Keyword operations for FilterManager.

use chrono::Utc;

use super::find_similar_name;
use crate::{FilterManager, Keyword, KeywordCategory, StoreError, StoreResult, UserId};

impl FilterManager {
    // ==================== Keywords ====================

    /// Returns the user's keywords, optionally restricted to one category,
    /// in creation order.
    pub fn keywords(&self, user: &UserId, category: Option<&str>) -> Vec<&Keyword> {
        self.db
            .keywords
            .iter()
            .filter(|keyword| keyword.user_id == user.as_str())
            .filter(|keyword| category.map_or(true, |c| keyword.category == c))
            .collect()
    }

    /// Saves a keyword for the user under `category`.
    ///
    /// Surrounding whitespace is trimmed. Duplicates are allowed.
    ///
    /// # Errors
    ///
    /// - Returns `StoreError::EmptyKeyword` if the keyword is blank.
    /// - Returns `StoreError::NotFound` if no known category accepts `category`,
    ///   with a suggestion when a close match exists.
    /// - Returns `StoreError::Store` if saving fails.
    pub async fn add_keyword(
        &mut self,
        user: &UserId,
        keyword: &str,
        category: &str,
    ) -> StoreResult<Keyword> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(StoreError::EmptyKeyword);
        }
        self.check_category(category)?;

        let record = Keyword {
            id: self.db.allocate_keyword_id(),
            keyword: keyword.to_string(),
            category: category.to_string(),
            user_id: user.to_string(),
            created_at: Utc::now(),
        };
        self.db.keywords.push(record.clone());

        if let Err(e) = self.persist().await {
            self.db.keywords.pop();
            self.db.next_keyword_id -= 1;
            return Err(e);
        }

        tracing::debug!(user = %user, id = record.id, category, "added keyword");
        Ok(record)
    }

    /// Deletes one of the user's keywords.
    ///
    /// Returns `false` when no such keyword belongs to the user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Store` if saving fails.
    pub async fn delete_keyword(&mut self, user: &UserId, id: i64) -> StoreResult<bool> {
        let Some(index) = self
            .db
            .keywords
            .iter()
            .position(|keyword| keyword.id == id && keyword.user_id == user.as_str())
        else {
            tracing::debug!(user = %user, id, "no keyword to delete");
            return Ok(false);
        };
        let removed = self.db.keywords.remove(index);

        if let Err(e) = self.persist().await {
            self.db.keywords.insert(index, removed);
            return Err(e);
        }
        tracing::debug!(user = %user, id, "deleted keyword");
        Ok(true)
    }

    /// Returns every keyword category. Categories are shared by all users.
    pub fn categories(&self) -> &[KeywordCategory] {
        &self.db.keyword_categories
    }

    fn check_category(&self, category: &str) -> StoreResult<()> {
        if self.categories().iter().any(|known| known.accepts(category)) {
            return Ok(());
        }
        Err(StoreError::NotFound {
            resource_type: "keyword category",
            identifier: category.to_string(),
            suggestion: find_similar_name(
                category,
                self.categories().iter().map(|known| known.name.as_str()),
            ),
        })
    }
}

//! Keyword records and the categories they are filed under.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A keyword saved by a user under a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub id: i64,
    pub keyword: String,
    pub category: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// A category keywords can be filed under.
///
/// A qualified category also accepts names of the form `{name}_{qualifier}`,
/// such as `persona_title_filters_sales_lead` for a per-persona list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub qualified: bool,
}

impl KeywordCategory {
    fn new(name: &str, description: &str, qualified: bool) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            qualified,
        }
    }

    /// Returns true if `category` names this category or one of its
    /// qualified forms.
    pub fn accepts(&self, category: &str) -> bool {
        if category == self.name {
            return true;
        }
        self.qualified
            && category
                .strip_prefix(self.name.as_str())
                .and_then(|rest| rest.strip_prefix('_'))
                .is_some_and(|qualifier| !qualifier.is_empty())
    }
}

/// Categories every new database starts with.
pub fn default_keyword_categories() -> Vec<KeywordCategory> {
    vec![
        KeywordCategory::new(
            "opportunity_keywords",
            "Types of opportunities to surface",
            false,
        ),
        KeywordCategory::new("target_personas", "Personas the company sells to", false),
        KeywordCategory::new(
            "authority_title_filters",
            "Job titles that carry buying authority",
            false,
        ),
        KeywordCategory::new(
            "authority_department_filters",
            "Departments that carry buying authority",
            false,
        ),
        KeywordCategory::new(
            "persona_title_filters",
            "Job titles matching a persona",
            true,
        ),
        KeywordCategory::new(
            "persona_department_filters",
            "Departments matching a persona",
            true,
        ),
    ]
}

/// Builds the per-persona form of a qualified category.
///
/// Whitespace runs in the persona name become underscores and the result is
/// lowercased: `persona_category("persona_title_filters", "Sales Lead")` is
/// `persona_title_filters_sales_lead`.
pub fn persona_category(base: &str, persona: &str) -> String {
    let slug = persona
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();
    format!("{base}_{slug}")
}

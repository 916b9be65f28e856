//! Data model for saved filters.
//!
//! A [`Filter`] wraps a [`FilterCriteria`], which is a flat list of
//! [`Condition`]s combined with a single [`Logic`] mode. The serialized form
//! matches the JSON stored by the persistence layer:
//!
//! ```json
//! {
//!   "id": 7,
//!   "name": "Chiefs",
//!   "category": "personas",
//!   "criteria": {
//!     "conditions": [{ "field": "title", "operator": "contains", "value": "chief" }],
//!     "logic": "and"
//!   },
//!   "is_active": true
//! }
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Comparison operator of a [`Condition`].
///
/// The set is closed. Stored data carrying an operator outside of it
/// deserializes to [`Operator::Unrecognized`], which never matches and
/// serializes back under its original name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    In,
    NotIn,
    /// Any operator name not listed above, as it was read.
    Unrecognized(String),
}

impl Operator {
    /// Every operator accepted by the validator, in declaration order.
    pub const ALL: [Operator; 10] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::Contains,
        Operator::NotContains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::In,
        Operator::NotIn,
    ];

    /// Returns the wire name of the operator.
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Unrecognized(name) => name,
        }
    }

    /// Looks up an accepted operator by its wire name.
    pub fn from_name(name: &str) -> Option<Operator> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    /// Returns true for operators outside the accepted set.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Operator::Unrecognized(_))
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Operator::from_name(&name).unwrap_or(Operator::Unrecognized(name)))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operand of a [`Condition`].
///
/// Serialized untagged, so `"x"`, `3`, `true`, `["a", "b"]` and `[1, 2]` are
/// all valid JSON forms. An empty JSON array reads back as an empty
/// [`ConditionValue::TextList`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Text(String),
    Number(f64),
    Bool(bool),
    TextList(Vec<String>),
    NumberList(Vec<f64>),
}

impl ConditionValue {
    /// Returns true for the two sequence-typed shapes.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            ConditionValue::TextList(_) | ConditionValue::NumberList(_)
        )
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Text(value.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(value: String) -> Self {
        ConditionValue::Text(value)
    }
}

impl From<f64> for ConditionValue {
    fn from(value: f64) -> Self {
        ConditionValue::Number(value)
    }
}

impl From<i64> for ConditionValue {
    fn from(value: i64) -> Self {
        ConditionValue::Number(value as f64)
    }
}

impl From<bool> for ConditionValue {
    fn from(value: bool) -> Self {
        ConditionValue::Bool(value)
    }
}

impl From<Vec<String>> for ConditionValue {
    fn from(value: Vec<String>) -> Self {
        ConditionValue::TextList(value)
    }
}

impl From<Vec<&str>> for ConditionValue {
    fn from(value: Vec<&str>) -> Self {
        ConditionValue::TextList(value.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<f64>> for ConditionValue {
    fn from(value: Vec<f64>) -> Self {
        ConditionValue::NumberList(value)
    }
}

/// A single field/operator/value predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Dot-separated path into the record, e.g. `user.address.city`.
    pub field: String,
    pub operator: Operator,
    pub value: ConditionValue,
}

impl Condition {
    /// Creates a condition.
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<ConditionValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// How the results of a criteria's conditions are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Logic {
    /// Every condition must hold. Vacuously true with no conditions.
    #[default]
    And,
    /// At least one condition must hold. Vacuously false with no conditions.
    Or,
}

impl Logic {
    /// Returns the wire name of the logic mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Logic::And => "and",
            Logic::Or => "or",
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A list of conditions plus the logic that combines them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub logic: Logic,
}

impl FilterCriteria {
    /// Creates an AND criteria over the given conditions.
    pub fn all(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            logic: Logic::And,
        }
    }

    /// Creates an OR criteria over the given conditions.
    pub fn any(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            logic: Logic::Or,
        }
    }
}

fn default_active() -> bool {
    true
}

/// A named, user-owned, persisted criteria.
///
/// `id`, `user_id`, `created_at` and `updated_at` are assigned by the
/// persistence layer and are never set by evaluation code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub category: String,
    pub criteria: FilterCriteria,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Filter {
    /// Creates an active filter with no identity or audit metadata.
    pub fn new(name: impl Into<String>, category: impl Into<String>, criteria: FilterCriteria) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: category.into(),
            criteria,
            is_active: true,
            user_id: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// A filter ready to be handed to persistence: everything except identity
/// and audit metadata.
///
/// Only [`prepare_filter_for_save`](super::prepare_filter_for_save) produces
/// values of this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFilter {
    pub name: String,
    pub category: String,
    pub criteria: FilterCriteria,
    pub is_active: bool,
}

impl NewFilter {
    /// Attaches persistence metadata, producing a stored filter.
    pub fn into_filter(
        self,
        id: i64,
        user_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Filter {
        Filter {
            id: Some(id),
            name: self.name,
            category: self.category,
            criteria: self.criteria,
            is_active: self.is_active,
            user_id: Some(user_id.into()),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// A partially populated filter, as supplied by a form or the command line.
///
/// `criteria` stays untyped so that malformed input is reported by the
/// validator with a path instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl FilterDraft {
    /// Sets typed criteria on the draft.
    pub fn with_criteria(mut self, criteria: &FilterCriteria) -> Self {
        // Serializing plain data into a `Value` cannot fail.
        self.criteria = serde_json::to_value(criteria).ok();
        self
    }
}

//! Saved filters: data model, validation and evaluation.
//!
//! A filter is a named list of conditions over record fields, combined with
//! either AND or OR logic. Filters are evaluated locally against JSON records
//! without any round-trip to the store.
//!
//! # Operators
//!
//! ## Equality
//! - `equals`, `not_equals` - Strict comparison, no type coercion
//!
//! ## Text
//! - `contains`, `not_contains` - Case-insensitive substring test
//! - `starts_with`, `ends_with` - Case-insensitive prefix and suffix tests
//!
//! ## Numeric
//! - `greater_than`, `less_than` - Both sides read as numbers
//!
//! ## Membership
//! - `in`, `not_in` - Strict membership in a list operand
//!
//! # Field Paths
//!
//! Fields are addressed with dot-separated paths such as `address.city`. A
//! path that cannot be followed resolves to an absent value rather than an
//! error.
//!
//! # Example
//!
//! ```
//! use onboard_filters::filter::{apply_filters, validate_filter};
//! use serde_json::json;
//!
//! let filter = validate_filter(&json!({
//!     "name": "Busy chiefs",
//!     "category": "personas",
//!     "criteria": {
//!         "conditions": [
//!             { "field": "title", "operator": "contains", "value": "chief" },
//!             { "field": "count", "operator": "greater_than", "value": 100 }
//!         ],
//!         "logic": "and"
//!     }
//! }))
//! .unwrap();
//!
//! let records = vec![
//!     json!({ "title": "Police Chief", "count": 120 }),
//!     json!({ "title": "Fire Chief", "count": "abc" }),
//! ];
//! let matched = apply_filters(&records, &[filter]);
//! assert_eq!(matched.len(), 1);
//! ```

mod coerce;
mod error;
mod evaluator;
mod model;
mod path;
mod validate;

pub use error::{FilterError, FilterResult, ValidationFailure, ValidationIssue};
pub use evaluator::{
    apply_filter, apply_filters, evaluate_condition, evaluate_criteria, FilterEvaluator,
};
pub use model::{
    Condition, ConditionValue, Filter, FilterCriteria, FilterDraft, Logic, NewFilter, Operator,
};
pub use path::{resolve, Record, Resolved};
pub use validate::{prepare_filter_for_save, validate_filter};

//! Filter evaluation against in-memory records.
//!
//! This module provides the [`FilterEvaluator`] for testing records against a
//! [`FilterCriteria`], plus the [`apply_filter`] and [`apply_filters`]
//! helpers used on whole record sets.
//!
//! Evaluation never fails. Missing fields, type mismatches and unrecognized
//! operators make the affected condition false.
//!
//! # Example
//!
//! ```
//! use onboard_filters::filter::{apply_filter, Condition, Filter, FilterCriteria, Operator};
//! use serde_json::json;
//!
//! let records = vec![json!({ "title": "Police Chief" }), json!({ "title": "Clerk" })];
//! let filter = Filter::new(
//!     "Chiefs",
//!     "personas",
//!     FilterCriteria::all(vec![Condition::new("title", Operator::Contains, "chief")]),
//! );
//!
//! let matched = apply_filter(&records, &filter);
//! assert_eq!(matched, vec![&records[0]]);
//! ```

use super::coerce::{
    list_contains, operand_number, operand_text, resolved_number, resolved_text, strict_equals,
};
use super::model::{Condition, ConditionValue, Filter, FilterCriteria, Logic, Operator};
use super::path::{resolve, Record, Resolved};

/// Evaluates a criteria against records.
///
/// The evaluator borrows the criteria for its lifetime and holds no other
/// state, so one evaluator can be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct FilterEvaluator<'a> {
    criteria: &'a FilterCriteria,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates a new evaluator for the given criteria.
    pub fn new(criteria: &'a FilterCriteria) -> Self {
        Self { criteria }
    }

    /// Creates a new evaluator for a filter's criteria.
    pub fn for_filter(filter: &'a Filter) -> Self {
        Self::new(&filter.criteria)
    }

    /// Returns true if the record satisfies the criteria.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        evaluate_criteria(record, self.criteria)
    }

    /// Returns the matching records, in their original order.
    pub fn filter_records<'b, R: Record>(&self, records: &'b [R]) -> Vec<&'b R> {
        records.iter().filter(|record| self.matches(*record)).collect()
    }
}

/// Evaluates a single condition against a record.
pub fn evaluate_condition<R: Record + ?Sized>(record: &R, condition: &Condition) -> bool {
    let resolved = resolve(record, &condition.field);
    let operand = &condition.value;

    match &condition.operator {
        Operator::Equals => strict_equals(resolved, operand),
        Operator::NotEquals => !strict_equals(resolved, operand),
        Operator::Contains => folded_text(resolved, operand, |h, n| h.contains(n)),
        Operator::NotContains => !folded_text(resolved, operand, |h, n| h.contains(n)),
        Operator::StartsWith => folded_text(resolved, operand, |h, n| h.starts_with(n)),
        Operator::EndsWith => folded_text(resolved, operand, |h, n| h.ends_with(n)),
        Operator::GreaterThan => resolved_number(resolved) > operand_number(operand),
        Operator::LessThan => resolved_number(resolved) < operand_number(operand),
        Operator::In => operand.is_list() && list_contains(resolved, operand),
        Operator::NotIn => operand.is_list() && !list_contains(resolved, operand),
        Operator::Unrecognized(_) => false,
    }
}

/// Compares the lowercased display text of both sides.
fn folded_text(
    resolved: Resolved<'_>,
    operand: &ConditionValue,
    test: impl Fn(&str, &str) -> bool,
) -> bool {
    let haystack = resolved_text(resolved).to_lowercase();
    let needle = operand_text(operand).to_lowercase();
    test(&haystack, &needle)
}

/// Evaluates every condition of a criteria and combines the results.
///
/// With no conditions, AND logic is true and OR logic is false.
pub fn evaluate_criteria<R: Record + ?Sized>(record: &R, criteria: &FilterCriteria) -> bool {
    let mut results = criteria
        .conditions
        .iter()
        .map(|condition| evaluate_condition(record, condition));

    match criteria.logic {
        Logic::And => results.all(|matched| matched),
        Logic::Or => results.any(|matched| matched),
    }
}

/// Returns the records matching a filter's criteria, in original order.
///
/// The filter's `is_active` flag is not consulted.
pub fn apply_filter<'b, R: Record>(records: &'b [R], filter: &Filter) -> Vec<&'b R> {
    FilterEvaluator::for_filter(filter).filter_records(records)
}

/// Narrows records through each active filter in turn.
///
/// The result is the conjunction of all active filters, whatever logic each
/// filter uses internally. Inactive filters have no effect; with no active
/// filters every record is returned.
pub fn apply_filters<'b, R: Record>(records: &'b [R], filters: &[Filter]) -> Vec<&'b R> {
    let mut current: Vec<&'b R> = records.iter().collect();

    for filter in filters {
        if !filter.is_active {
            tracing::trace!(filter = %filter.name, "skipping inactive filter");
            continue;
        }
        let evaluator = FilterEvaluator::for_filter(filter);
        current.retain(|record| evaluator.matches(*record));
    }

    current
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;

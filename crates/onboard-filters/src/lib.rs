//! Filter engine for onboarding record sets.
//!
//! This crate defines saved filters, validates untrusted filter input and
//! evaluates filters against JSON records. It performs no I/O; persistence
//! lives in `onboard-store`.

pub mod filter;

pub use filter::{
    apply_filter, apply_filters, prepare_filter_for_save, validate_filter, Condition,
    ConditionValue, Filter, FilterCriteria, FilterDraft, FilterError, FilterEvaluator,
    FilterResult, Logic, NewFilter, Operator, ValidationFailure, ValidationIssue,
};

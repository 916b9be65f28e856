//! Output formatting utilities for the onb CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by entity type:
//!
//! - [`filters`] - Filter output formatting (list, show, add, validate, apply, toggle, delete)
//! - [`keywords`] - Keyword output formatting (list, add, delete, categories)
//! - [`helpers`] - Common formatting utilities (truncation, timestamps, status)

mod filters;
pub mod helpers;
mod keywords;

// Filters
pub use filters::{
    format_applied_records_json, format_applied_records_lines, format_created_filter,
    format_deleted_filter, format_filter_details_json, format_filter_details_table,
    format_filters_json, format_filters_table, format_toggled_filter, format_valid_filter,
};

// Keywords
pub use keywords::{
    format_categories_json, format_categories_table, format_created_keywords,
    format_deleted_keyword, format_keywords_json, format_keywords_table,
};

//! Filter output formatting.

use chrono::{DateTime, Utc};
use onboard_filters::{Condition, Filter, FilterCriteria};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;

use super::helpers::{format_id, format_status, format_timestamp, truncate_str};

/// JSON output structure for filters list command.
#[derive(Serialize)]
pub struct FiltersListOutput<'a> {
    pub filters: Vec<FilterOutput<'a>>,
}

/// JSON output structure for a single filter.
#[derive(Serialize)]
pub struct FilterOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: &'a str,
    pub category: &'a str,
    pub criteria: &'a FilterCriteria,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<&'a DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<&'a DateTime<Utc>>,
}

impl<'a> From<&'a Filter> for FilterOutput<'a> {
    fn from(f: &'a Filter) -> Self {
        Self {
            id: f.id,
            name: &f.name,
            category: &f.category,
            criteria: &f.criteria,
            is_active: f.is_active,
            created_at: f.created_at.as_ref(),
            updated_at: f.updated_at.as_ref(),
        }
    }
}

/// Formats filters as JSON.
pub fn format_filters_json(filters: &[Filter]) -> Result<String, serde_json::Error> {
    let output = FiltersListOutput {
        filters: filters.iter().map(FilterOutput::from).collect(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats filters as a table.
pub fn format_filters_table(filters: &[Filter], use_colors: bool) -> String {
    if filters.is_empty() {
        return "No filters found.\n".to_string();
    }

    let mut output = String::new();

    let header = format!(
        "{:<6} {:<6} {:<25} {:<20} {}",
        "ID", "Status", "Name", "Category", "Conditions"
    );
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for filter in filters {
        // Pad before coloring so escape codes do not skew the columns.
        let status = format!("{:<6}", if filter.is_active { "on" } else { "off" });
        let status = if use_colors {
            format_status_padded(&status, filter.is_active)
        } else {
            status
        };
        let conditions = format!(
            "{} ({})",
            filter.criteria.conditions.len(),
            filter.criteria.logic
        );
        let line = format!(
            "{:<6} {} {:<25} {:<20} {}",
            format_id(filter.id),
            status,
            truncate_str(&filter.name, 25),
            truncate_str(&filter.category, 20),
            conditions
        );
        output.push_str(&line);
        output.push('\n');
    }

    output
}

fn format_status_padded(padded: &str, is_active: bool) -> String {
    if is_active {
        padded.green().to_string()
    } else {
        padded.dimmed().to_string()
    }
}

/// Formats filter details as JSON (filters show command).
pub fn format_filter_details_json(filter: &Filter) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&FilterOutput::from(filter))
}

/// Formats filter details as a human-readable table (filters show command).
pub fn format_filter_details_table(filter: &Filter, use_colors: bool) -> String {
    let mut output = String::new();

    let name_label = if use_colors {
        "Filter:".bold().to_string()
    } else {
        "Filter:".to_string()
    };
    output.push_str(&format!("{} {}\n", name_label, filter.name));
    output.push_str(&format!("ID: {}\n", format_id(filter.id)));
    output.push_str(&format!("Category: {}\n", filter.category));
    output.push_str(&format!(
        "Status: {}\n",
        format_status(filter.is_active, use_colors)
    ));
    output.push_str(&format!("Logic: {}\n", filter.criteria.logic));

    if filter.criteria.conditions.is_empty() {
        output.push_str("Conditions: (none)\n");
    } else {
        output.push_str("Conditions:\n");
        for condition in &filter.criteria.conditions {
            output.push_str(&format!("  {}\n", format_condition(condition, use_colors)));
        }
    }

    if filter.created_at.is_some() {
        output.push_str(&format!(
            "Created: {}\n",
            format_timestamp(filter.created_at.as_ref())
        ));
    }
    if filter.updated_at.is_some() {
        output.push_str(&format!(
            "Updated: {}\n",
            format_timestamp(filter.updated_at.as_ref())
        ));
    }

    output
}

/// Formats one condition as `field operator value`.
fn format_condition(condition: &Condition, use_colors: bool) -> String {
    let value = serde_json::to_string(&condition.value).unwrap_or_default();
    let operator = condition.operator.as_str();
    if use_colors {
        format!("{} {} {}", condition.field, operator.cyan(), value)
    } else {
        format!("{} {} {}", condition.field, operator, value)
    }
}

/// JSON output structure for a created filter.
#[derive(Serialize)]
pub struct CreatedFilterOutput<'a> {
    pub status: &'static str,
    pub filter: FilterOutput<'a>,
}

/// Formats a created filter as JSON.
pub fn format_created_filter(filter: &Filter) -> Result<String, serde_json::Error> {
    let output = CreatedFilterOutput {
        status: "created",
        filter: FilterOutput::from(filter),
    };
    serde_json::to_string_pretty(&output)
}

/// JSON output structure for a validated filter document.
#[derive(Serialize)]
pub struct ValidFilterOutput<'a> {
    pub valid: bool,
    pub filter: FilterOutput<'a>,
}

/// Formats a filter document that passed validation as JSON.
pub fn format_valid_filter(filter: &Filter) -> Result<String, serde_json::Error> {
    let output = ValidFilterOutput {
        valid: true,
        filter: FilterOutput::from(filter),
    };
    serde_json::to_string_pretty(&output)
}

/// JSON output structure for an enabled or disabled filter.
#[derive(Serialize)]
pub struct ToggledFilterOutput<'a> {
    pub id: Option<i64>,
    pub name: &'a str,
    pub is_active: bool,
}

/// Formats an enabled or disabled filter as JSON.
pub fn format_toggled_filter(filter: &Filter) -> Result<String, serde_json::Error> {
    let output = ToggledFilterOutput {
        id: filter.id,
        name: &filter.name,
        is_active: filter.is_active,
    };
    serde_json::to_string_pretty(&output)
}

/// JSON output structure for a deleted filter.
#[derive(Serialize)]
pub struct DeletedFilterOutput<'a> {
    pub id: Option<i64>,
    pub name: &'a str,
    pub status: &'static str,
}

/// Formats a deleted filter as JSON.
pub fn format_deleted_filter(filter: &Filter) -> Result<String, serde_json::Error> {
    let output = DeletedFilterOutput {
        id: filter.id,
        name: &filter.name,
        status: "deleted",
    };
    serde_json::to_string_pretty(&output)
}

/// JSON output structure for the filters apply command.
#[derive(Serialize)]
pub struct AppliedRecordsOutput<'a> {
    pub total: usize,
    pub matched: usize,
    pub filters: Vec<i64>,
    pub records: &'a [&'a Value],
}

/// Formats the records that survived `filters` as JSON.
pub fn format_applied_records_json(
    records: &[&Value],
    total: usize,
    filters: &[Filter],
) -> Result<String, serde_json::Error> {
    let output = AppliedRecordsOutput {
        total,
        matched: records.len(),
        filters: filters
            .iter()
            .filter(|f| f.is_active)
            .filter_map(|f| f.id)
            .collect(),
        records,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats matched records as one compact JSON document per line.
pub fn format_applied_records_lines(records: &[&Value]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for record in records {
        output.push_str(&serde_json::to_string(record)?);
        output.push('\n');
    }
    Ok(output)
}

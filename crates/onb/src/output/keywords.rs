//! Keyword output formatting.

use onboard_store::{Keyword, KeywordCategory};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::truncate_str;

/// JSON output structure for keywords list command.
#[derive(Serialize)]
pub struct KeywordsListOutput<'a> {
    pub keywords: &'a [&'a Keyword],
}

/// Formats keywords as JSON.
pub fn format_keywords_json(keywords: &[&Keyword]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&KeywordsListOutput { keywords })
}

/// Formats keywords as a table.
pub fn format_keywords_table(keywords: &[&Keyword], use_colors: bool) -> String {
    if keywords.is_empty() {
        return "No keywords found.\n".to_string();
    }

    let mut output = String::new();

    let header = format!("{:<6} {:<30} {}", "ID", "Keyword", "Category");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for keyword in keywords {
        let line = format!(
            "{:<6} {:<30} {}",
            keyword.id,
            truncate_str(&keyword.keyword, 30),
            keyword.category
        );
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// JSON output structure for keywords add command.
#[derive(Serialize)]
pub struct CreatedKeywordsOutput<'a> {
    pub status: &'static str,
    pub keywords: &'a [Keyword],
}

/// Formats newly added keywords as JSON.
pub fn format_created_keywords(keywords: &[Keyword]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CreatedKeywordsOutput {
        status: "created",
        keywords,
    })
}

/// JSON output structure for a deleted keyword.
#[derive(Serialize)]
pub struct DeletedKeywordOutput {
    pub id: i64,
    pub status: &'static str,
}

/// Formats a deleted keyword as JSON.
pub fn format_deleted_keyword(id: i64) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&DeletedKeywordOutput {
        id,
        status: "deleted",
    })
}

/// JSON output structure for keywords categories command.
#[derive(Serialize)]
pub struct CategoriesOutput<'a> {
    pub categories: &'a [KeywordCategory],
}

/// Formats keyword categories as JSON.
pub fn format_categories_json(categories: &[KeywordCategory]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CategoriesOutput { categories })
}

/// Formats keyword categories as a table.
///
/// Qualified categories are shown as `name_<persona>`.
pub fn format_categories_table(categories: &[KeywordCategory], use_colors: bool) -> String {
    let mut output = String::new();

    let header = format!("{:<40} {}", "Category", "Description");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for category in categories {
        let name = if category.qualified {
            format!("{}_<persona>", category.name)
        } else {
            category.name.clone()
        };
        output.push_str(&format!("{:<40} {}\n", name, category.description));
    }

    output
}

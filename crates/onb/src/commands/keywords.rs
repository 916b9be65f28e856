//! Keywords command implementation.
//!
//! Lists and manages the user's keywords and shows the known categories.

use onboard_store::{FilterManager, Keyword, StoreError, UserId};

use super::{CommandContext, Result};
use crate::output::{
    format_categories_json, format_categories_table, format_created_keywords,
    format_deleted_keyword, format_keywords_json, format_keywords_table,
};

/// Executes the keywords list command.
pub fn execute(
    ctx: &CommandContext,
    category: Option<&str>,
    manager: &FilterManager,
    user: &UserId,
) -> Result<()> {
    let keywords = manager.keywords(user, category);

    if ctx.json_output {
        println!("{}", format_keywords_json(&keywords)?);
    } else if !ctx.quiet {
        print!("{}", format_keywords_table(&keywords, ctx.use_colors));
    }

    Ok(())
}

/// Options for the keywords add command.
#[derive(Debug)]
pub struct KeywordsAddOptions {
    /// Keyword text; commas separate several keywords.
    pub keyword: String,
    /// Keyword category.
    pub category: String,
}

/// Splits comma-separated input into trimmed, non-empty keywords.
fn split_keywords(input: &str) -> Vec<&str> {
    input
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .collect()
}

/// Executes the keywords add command.
///
/// # Errors
///
/// Returns an error if the input holds no keyword or the category is unknown.
/// Keywords added before a failure stay saved.
pub async fn execute_add(
    ctx: &CommandContext,
    opts: &KeywordsAddOptions,
    manager: &mut FilterManager,
    user: &UserId,
) -> Result<()> {
    let pieces = split_keywords(&opts.keyword);
    if pieces.is_empty() {
        return Err(StoreError::EmptyKeyword.into());
    }

    let mut added: Vec<Keyword> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        added.push(manager.add_keyword(user, piece, &opts.category).await?);
    }

    if ctx.json_output {
        println!("{}", format_created_keywords(&added)?);
    } else if !ctx.quiet {
        for keyword in &added {
            println!(
                "Added keyword '{}' to {} ({})",
                keyword.keyword, keyword.category, keyword.id
            );
        }
    }

    Ok(())
}

/// Executes the keywords delete command.
///
/// # Errors
///
/// Returns a not-found error if the user has no keyword with this id.
pub async fn execute_delete(
    ctx: &CommandContext,
    id: i64,
    manager: &mut FilterManager,
    user: &UserId,
) -> Result<()> {
    if !manager.delete_keyword(user, id).await? {
        return Err(StoreError::NotFound {
            resource_type: "keyword",
            identifier: id.to_string(),
            suggestion: None,
        }
        .into());
    }

    if ctx.json_output {
        println!("{}", format_deleted_keyword(id)?);
    } else if !ctx.quiet {
        println!("Deleted keyword {id}");
    }

    Ok(())
}

/// Executes the keywords categories command.
pub fn execute_categories(ctx: &CommandContext, manager: &FilterManager) -> Result<()> {
    let categories = manager.categories();

    if ctx.json_output {
        println!("{}", format_categories_json(categories)?);
    } else if !ctx.quiet {
        print!("{}", format_categories_table(categories, ctx.use_colors));
    }

    Ok(())
}

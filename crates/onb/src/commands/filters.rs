//! Filters command implementation.
//!
//! Lists, creates, validates, applies and manages saved filters. Every
//! mutation goes through `FilterManager`, which persists before returning.

use onboard_filters::{apply_filters, validate_filter, Filter, FilterDraft};
use onboard_store::{FilterManager, UserId};
use serde_json::{json, Value};

use super::{read_input, CommandContext, CommandError, Result};
use crate::cli::LogicArg;
use crate::output::helpers::format_id;
use crate::output::{
    format_applied_records_json, format_applied_records_lines, format_created_filter,
    format_deleted_filter, format_filter_details_json, format_filter_details_table,
    format_filters_json, format_filters_table, format_toggled_filter, format_valid_filter,
};

/// Options for the filters list command.
#[derive(Debug, Default)]
pub struct FiltersListOptions {
    /// Only filters in this category.
    pub category: Option<String>,
}

/// Executes the filters list command.
pub fn execute(
    ctx: &CommandContext,
    opts: &FiltersListOptions,
    manager: &FilterManager,
    user: &UserId,
) -> Result<()> {
    let filters = manager.fetch_filters(user, opts.category.as_deref());

    if ctx.json_output {
        println!("{}", format_filters_json(&filters)?);
    } else if !ctx.quiet {
        print!("{}", format_filters_table(&filters, ctx.use_colors));
    }

    Ok(())
}

/// Executes the filters show command.
///
/// # Errors
///
/// Returns a not-found error if the user has no filter with this id.
pub fn execute_show(
    ctx: &CommandContext,
    id: i64,
    manager: &FilterManager,
    user: &UserId,
) -> Result<()> {
    let filter = manager.find_filter(user, id)?;

    if ctx.json_output {
        println!("{}", format_filter_details_json(filter)?);
    } else if !ctx.quiet {
        print!("{}", format_filter_details_table(filter, ctx.use_colors));
    }

    Ok(())
}

// ============================================================================
// Filters Add Command
// ============================================================================

/// Options for the filters add command.
#[derive(Debug)]
pub struct FiltersAddOptions {
    /// Filter name.
    pub name: String,
    /// Filter category.
    pub category: String,
    /// How the conditions combine.
    pub logic: LogicArg,
    /// Conditions as `FIELD:OPERATOR:VALUE`.
    pub conditions: Vec<String>,
    /// Criteria JSON file, `-` for stdin. Replaces `logic` and `conditions`.
    pub criteria_file: Option<String>,
    /// Save the filter switched off.
    pub inactive: bool,
}

/// Executes the filters add command.
///
/// The criteria are assembled as untyped JSON so that a bad operator or
/// value is reported by the validator with its path.
///
/// # Errors
///
/// Returns a usage error for a malformed `--where`, and a validation error
/// if the assembled filter does not validate.
pub async fn execute_add(
    ctx: &CommandContext,
    opts: &FiltersAddOptions,
    manager: &mut FilterManager,
    user: &UserId,
) -> Result<()> {
    let criteria = match opts.criteria_file {
        Some(ref path) => serde_json::from_str(&read_input(path).await?)?,
        None => build_criteria(opts.logic, &opts.conditions)?,
    };

    let draft = FilterDraft {
        name: Some(opts.name.clone()),
        category: Some(opts.category.clone()),
        criteria: Some(criteria),
        is_active: Some(!opts.inactive),
    };

    let filter = manager.create_filter(user, &draft).await?;

    if ctx.json_output {
        println!("{}", format_created_filter(&filter)?);
    } else if !ctx.quiet {
        println!(
            "Created filter {} ({}) with {} condition(s)",
            filter.name,
            format_id(filter.id),
            filter.criteria.conditions.len()
        );
    }

    Ok(())
}

/// Builds a criteria object from `--logic` and `--where` arguments.
fn build_criteria(logic: LogicArg, conditions: &[String]) -> Result<Value> {
    let conditions = conditions
        .iter()
        .map(|raw| parse_where(raw))
        .collect::<Result<Vec<Value>>>()?;
    let logic = match logic {
        LogicArg::And => "and",
        LogicArg::Or => "or",
    };
    Ok(json!({ "conditions": conditions, "logic": logic }))
}

/// Parses `FIELD:OPERATOR:VALUE` into a condition object.
///
/// VALUE may itself contain colons. It is read as a JSON literal when it
/// parses as one (`42`, `true`, `["a","b"]`, `"quoted"`), otherwise it is
/// taken as a plain string.
fn parse_where(raw: &str) -> Result<Value> {
    let mut parts = raw.splitn(3, ':');
    let (Some(field), Some(operator), Some(value)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(CommandError::Usage(format!(
            "invalid condition '{raw}': expected FIELD:OPERATOR:VALUE"
        )));
    };

    let field = field.trim();
    if field.is_empty() {
        return Err(CommandError::Usage(format!(
            "invalid condition '{raw}': field is empty"
        )));
    }

    let value = serde_json::from_str::<Value>(value)
        .unwrap_or_else(|_| Value::String(value.to_string()));

    Ok(json!({
        "field": field,
        "operator": operator.trim(),
        "value": value,
    }))
}

// ============================================================================
// Filters Validate Command
// ============================================================================

/// Executes the filters validate command.
///
/// # Errors
///
/// Returns `CommandError::Invalid` carrying every issue when the document
/// does not validate.
pub async fn execute_validate(ctx: &CommandContext, path: &str) -> Result<()> {
    let candidate: Value = serde_json::from_str(&read_input(path).await?)?;
    let filter = validate_filter(&candidate).map_err(CommandError::Invalid)?;

    if ctx.json_output {
        println!("{}", format_valid_filter(&filter)?);
    } else if !ctx.quiet {
        println!(
            "Filter '{}' is valid ({} condition(s), logic {})",
            filter.name,
            filter.criteria.conditions.len(),
            filter.criteria.logic
        );
    }

    Ok(())
}

// ============================================================================
// Filters Apply Command
// ============================================================================

/// Options for the filters apply command.
#[derive(Debug, Default)]
pub struct FiltersApplyOptions {
    /// Records JSON file, `-` for stdin.
    pub records: String,
    /// Only filters in this category.
    pub category: Option<String>,
    /// Only these filters.
    pub ids: Vec<i64>,
}

/// Executes the filters apply command.
///
/// Without `--id`, every active filter of the user (optionally within one
/// category) narrows the records. With `--id`, only the named filters do.
///
/// # Errors
///
/// Returns a usage error if the input is not a JSON array, and a not-found
/// error for an unknown id.
pub async fn execute_apply(
    ctx: &CommandContext,
    opts: &FiltersApplyOptions,
    manager: &FilterManager,
    user: &UserId,
) -> Result<()> {
    let input: Value = serde_json::from_str(&read_input(&opts.records).await?)?;
    let Value::Array(records) = input else {
        return Err(CommandError::Usage(
            "records input must be a JSON array".to_string(),
        ));
    };

    let filters = select_filters(opts, manager, user)?;
    let matched = apply_filters(&records, &filters);

    if ctx.verbose {
        eprintln!(
            "Matched {} of {} records using {} filter(s)",
            matched.len(),
            records.len(),
            filters.iter().filter(|f| f.is_active).count()
        );
    }

    if ctx.json_output {
        println!(
            "{}",
            format_applied_records_json(&matched, records.len(), &filters)?
        );
    } else if !ctx.quiet {
        print!("{}", format_applied_records_lines(&matched)?);
    }

    Ok(())
}

/// Picks the filters for an apply run.
fn select_filters(
    opts: &FiltersApplyOptions,
    manager: &FilterManager,
    user: &UserId,
) -> Result<Vec<Filter>> {
    if opts.ids.is_empty() {
        return Ok(manager.fetch_filters(user, opts.category.as_deref()));
    }

    let mut filters = Vec::with_capacity(opts.ids.len());
    for id in &opts.ids {
        let filter = manager.find_filter(user, *id)?;
        if opts
            .category
            .as_deref()
            .map_or(true, |category| filter.category == category)
        {
            filters.push(filter.clone());
        }
    }
    Ok(filters)
}

// ============================================================================
// Filters Enable/Disable/Delete Commands
// ============================================================================

/// Executes the filters enable and disable commands.
pub async fn execute_set_active(
    ctx: &CommandContext,
    id: i64,
    active: bool,
    manager: &mut FilterManager,
    user: &UserId,
) -> Result<()> {
    let filter = manager.set_active(user, id, active).await?;

    if ctx.json_output {
        println!("{}", format_toggled_filter(&filter)?);
    } else if !ctx.quiet {
        let verb = if active { "Enabled" } else { "Disabled" };
        println!("{verb} filter {} ({id})", filter.name);
    }

    Ok(())
}

/// Executes the filters delete command.
pub async fn execute_delete(
    ctx: &CommandContext,
    id: i64,
    manager: &mut FilterManager,
    user: &UserId,
) -> Result<()> {
    let filter = manager.delete_filter(user, id).await?;

    if ctx.json_output {
        println!("{}", format_deleted_filter(&filter)?);
    } else if !ctx.quiet {
        println!("Deleted filter {} ({id})", filter.name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_store::{DatabaseStore, StoreError};
    use tempfile::TempDir;

    fn quiet_ctx() -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            verbose: false,
        }
    }

    fn manager_in(dir: &TempDir) -> FilterManager {
        FilterManager::new(DatabaseStore::with_path(dir.path().join("store.json"))).unwrap()
    }

    fn add_opts(name: &str, conditions: &[&str]) -> FiltersAddOptions {
        FiltersAddOptions {
            name: name.to_string(),
            category: "personas".to_string(),
            logic: LogicArg::And,
            conditions: conditions.iter().map(|c| c.to_string()).collect(),
            criteria_file: None,
            inactive: false,
        }
    }

    #[test]
    fn test_parse_where_plain_string() {
        let condition = parse_where("title:contains:Police Chief").unwrap();
        assert_eq!(
            condition,
            json!({ "field": "title", "operator": "contains", "value": "Police Chief" })
        );
    }

    #[test]
    fn test_parse_where_json_literals() {
        assert_eq!(parse_where("age:greater_than:30").unwrap()["value"], json!(30));
        assert_eq!(parse_where("vip:equals:true").unwrap()["value"], json!(true));
        assert_eq!(
            parse_where("level:in:[\"A\",\"B\"]").unwrap()["value"],
            json!(["A", "B"])
        );
        assert_eq!(parse_where("code:equals:\"42\"").unwrap()["value"], json!("42"));
    }

    #[test]
    fn test_parse_where_value_keeps_colons() {
        let condition = parse_where("url:starts_with:https://example.com").unwrap();
        assert_eq!(condition["value"], json!("https://example.com"));
    }

    #[test]
    fn test_parse_where_empty_value_is_empty_string() {
        assert_eq!(parse_where("note:equals:").unwrap()["value"], json!(""));
    }

    #[test]
    fn test_parse_where_rejects_malformed() {
        assert!(matches!(parse_where("title"), Err(CommandError::Usage(_))));
        assert!(matches!(parse_where("title:contains"), Err(CommandError::Usage(_))));
        assert!(matches!(parse_where(":equals:x"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_build_criteria_logic() {
        let criteria = build_criteria(LogicArg::Or, &["a:equals:1".to_string()]).unwrap();
        assert_eq!(criteria["logic"], json!("or"));
        assert_eq!(criteria["conditions"].as_array().map(Vec::len), Some(1));

        let empty = build_criteria(LogicArg::And, &[]).unwrap();
        assert_eq!(empty, json!({ "conditions": [], "logic": "and" }));
    }

    #[tokio::test]
    async fn test_execute_add_persists_filter() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir);
        let user = UserId::new("alice");

        execute_add(&quiet_ctx(), &add_opts("Chiefs", &["title:contains:chief"]), &mut manager, &user)
            .await
            .unwrap();

        let filters = manager.fetch_filters(&user, None);
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].criteria.conditions[0].field, "title");
    }

    #[tokio::test]
    async fn test_execute_add_unknown_operator_reports_path() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir);

        let err = execute_add(
            &quiet_ctx(),
            &add_opts("Bad", &["title:contains:x", "title:matches:x"]),
            &mut manager,
            &UserId::anonymous(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CommandError::Store(StoreError::InvalidFilter(_))));
        let paths: Vec<&str> = err
            .issues()
            .unwrap()
            .iter()
            .map(|i| i.path.as_str())
            .collect();
        assert_eq!(paths, vec!["criteria.conditions.1.operator"]);
    }

    #[tokio::test]
    async fn test_execute_add_from_criteria_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("criteria.json");
        std::fs::write(
            &path,
            r#"{"conditions":[{"field":"state","operator":"in","value":["TX","OK"]}],"logic":"or"}"#,
        )
        .unwrap();

        let mut manager = manager_in(&dir);
        let user = UserId::anonymous();
        let mut opts = add_opts("States", &[]);
        opts.criteria_file = Some(path.display().to_string());
        opts.inactive = true;

        execute_add(&quiet_ctx(), &opts, &mut manager, &user).await.unwrap();

        let filter = manager.find_filter(&user, 1).unwrap();
        assert!(!filter.is_active);
        assert_eq!(filter.criteria.logic, onboard_filters::Logic::Or);
    }

    #[tokio::test]
    async fn test_execute_validate_reports_all_issues() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("filter.json");
        std::fs::write(
            &path,
            r#"{"name":"","category":"c","criteria":{"conditions":[{"field":"a","operator":"nope","value":1}]}}"#,
        )
        .unwrap();

        let err = execute_validate(&quiet_ctx(), &path.display().to_string())
            .await
            .unwrap_err();
        let CommandError::Invalid(failure) = err else {
            panic!("expected Invalid");
        };
        assert!(failure.has_path("name"));
        assert!(failure.has_path("criteria.conditions.0.operator"));
    }

    #[tokio::test]
    async fn test_execute_validate_missing_file() {
        let err = execute_validate(&quiet_ctx(), "/nonexistent/onb/filter.json")
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Usage(_)));
    }

    #[tokio::test]
    async fn test_execute_apply_rejects_non_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, r#"{"title":"x"}"#).unwrap();
        let manager = manager_in(&dir);

        let opts = FiltersApplyOptions {
            records: path.display().to_string(),
            ..FiltersApplyOptions::default()
        };
        let err = execute_apply(&quiet_ctx(), &opts, &manager, &UserId::anonymous())
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Usage(_)));
    }

    #[tokio::test]
    async fn test_select_filters_by_id_and_category() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir);
        let user = UserId::anonymous();
        execute_add(&quiet_ctx(), &add_opts("A", &[]), &mut manager, &user)
            .await
            .unwrap();
        let mut other = add_opts("B", &[]);
        other.category = "accounts".to_string();
        execute_add(&quiet_ctx(), &other, &mut manager, &user)
            .await
            .unwrap();

        let opts = FiltersApplyOptions {
            ids: vec![1, 2],
            category: Some("accounts".to_string()),
            ..FiltersApplyOptions::default()
        };
        let selected = select_filters(&opts, &manager, &user).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "B");

        let opts = FiltersApplyOptions {
            ids: vec![9],
            ..FiltersApplyOptions::default()
        };
        assert!(select_filters(&opts, &manager, &user).is_err());
    }

    #[tokio::test]
    async fn test_enable_disable_and_delete() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir);
        let user = UserId::anonymous();
        execute_add(&quiet_ctx(), &add_opts("A", &[]), &mut manager, &user)
            .await
            .unwrap();

        execute_set_active(&quiet_ctx(), 1, false, &mut manager, &user)
            .await
            .unwrap();
        assert!(!manager.find_filter(&user, 1).unwrap().is_active);

        execute_delete(&quiet_ctx(), 1, &mut manager, &user).await.unwrap();
        assert!(manager.fetch_filters(&user, None).is_empty());

        let err = execute_delete(&quiet_ctx(), 1, &mut manager, &user)
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Store(StoreError::NotFound { .. })));
    }
}

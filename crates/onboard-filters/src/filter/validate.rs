//! Validation of untrusted filter input.
//!
//! [`validate_filter`] walks an arbitrary JSON value and either produces a
//! typed [`Filter`] or a [`ValidationFailure`] listing every violated
//! constraint, each tagged with the dotted path of the offending field.
//! Fields are checked in declaration order; keys the model does not know are
//! ignored.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::error::{FilterError, FilterResult, ValidationFailure};
use super::model::{
    Condition, ConditionValue, Filter, FilterCriteria, FilterDraft, Logic, NewFilter, Operator,
};

/// Validates a candidate filter.
///
/// # Errors
///
/// Returns a [`ValidationFailure`] holding one issue per violated constraint.
///
/// # Example
///
/// ```
/// use onboard_filters::filter::validate_filter;
/// use serde_json::json;
///
/// let failure = validate_filter(&json!({
///     "name": "",
///     "category": "x",
///     "criteria": { "conditions": [], "logic": "and" }
/// }))
/// .unwrap_err();
/// assert!(failure.has_path("name"));
/// ```
pub fn validate_filter(candidate: &Value) -> Result<Filter, ValidationFailure> {
    let mut validator = Validator::default();
    let filter = validator.filter(candidate);
    match filter {
        Some(filter) if validator.failure.is_empty() => Ok(filter),
        _ => Err(validator.failure),
    }
}

/// Fills defaults into a partial filter and validates the result.
///
/// Absent `name` and `category` become empty strings, absent `criteria`
/// becomes an empty AND criteria, absent `is_active` becomes `true`. The
/// filled filter is then validated in full; empty names are rejected rather
/// than replaced with placeholder text.
///
/// # Errors
///
/// Returns [`FilterError::InvalidFilter`] carrying every validation issue.
pub fn prepare_filter_for_save(draft: &FilterDraft) -> FilterResult<NewFilter> {
    let criteria = draft.criteria.clone().unwrap_or_else(|| {
        serde_json::json!({ "conditions": [], "logic": Logic::And.as_str() })
    });

    let prepared = serde_json::json!({
        "name": draft.name.clone().unwrap_or_default(),
        "category": draft.category.clone().unwrap_or_default(),
        "criteria": criteria,
        "is_active": draft.is_active.unwrap_or(true),
    });

    let filter = validate_filter(&prepared).map_err(FilterError::InvalidFilter)?;
    Ok(NewFilter {
        name: filter.name,
        category: filter.category,
        criteria: filter.criteria,
        is_active: filter.is_active,
    })
}

/// Name of a JSON value's type as it appears in messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn expected(kind: &str, value: &Value) -> String {
    format!("Expected {kind}, received {}", type_name(value))
}

fn quoted_options<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[derive(Default)]
struct Validator {
    failure: ValidationFailure,
}

impl Validator {
    fn filter(&mut self, value: &Value) -> Option<Filter> {
        let Some(object) = self.object("", value) else {
            return None;
        };

        let id = self.optional_id(object);
        let name = self.non_empty_string(object, "", "name", "Name is required");
        let category = self.non_empty_string(object, "", "category", "Category is required");
        let criteria = match object.get("criteria") {
            None => {
                self.failure.push("criteria", "Required");
                None
            }
            Some(criteria) => self.criteria("criteria", criteria),
        };
        let is_active = self.optional_bool(object, "is_active").unwrap_or(true);
        let user_id = self.optional_string(object, "user_id");
        let created_at = self.optional_timestamp(object, "created_at");
        let updated_at = self.optional_timestamp(object, "updated_at");

        Some(Filter {
            id,
            name: name?,
            category: category?,
            criteria: criteria?,
            is_active,
            user_id,
            created_at,
            updated_at,
        })
    }

    fn criteria(&mut self, path: &str, value: &Value) -> Option<FilterCriteria> {
        let object = self.object(path, value)?;

        let conditions_path = join_path(path, "conditions");
        let conditions = match object.get("conditions") {
            None => {
                self.failure.push(conditions_path, "Required");
                None
            }
            Some(Value::Array(items)) => {
                let parsed: Vec<Option<Condition>> = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        self.condition(&join_path(&conditions_path, &index.to_string()), item)
                    })
                    .collect();
                parsed.into_iter().collect::<Option<Vec<_>>>()
            }
            Some(other) => {
                self.failure.push(conditions_path, expected("array", other));
                None
            }
        };

        let logic = self.logic(&join_path(path, "logic"), object.get("logic"));

        Some(FilterCriteria {
            conditions: conditions?,
            logic: logic?,
        })
    }

    fn condition(&mut self, path: &str, value: &Value) -> Option<Condition> {
        let object = self.object(path, value)?;

        let field = self.required_string(object, path, "field");
        let operator = self.operator(&join_path(path, "operator"), object.get("operator"));
        let value = self.condition_value(&join_path(path, "value"), object.get("value"));

        Some(Condition {
            field: field?,
            operator: operator?,
            value: value?,
        })
    }

    fn operator(&mut self, path: &str, value: Option<&Value>) -> Option<Operator> {
        let options = || quoted_options(Operator::ALL.iter().map(Operator::as_str));
        match value {
            None => {
                self.failure.push(path, "Required");
                None
            }
            Some(Value::String(name)) => match Operator::from_name(name) {
                Some(op) => Some(op),
                None => {
                    self.failure.push(
                        path,
                        format!("Invalid enum value. Expected {}, received '{name}'", options()),
                    );
                    None
                }
            },
            Some(other) => {
                self.failure.push(path, expected(&options(), other));
                None
            }
        }
    }

    fn condition_value(&mut self, path: &str, value: Option<&Value>) -> Option<ConditionValue> {
        let parsed = match value {
            None => {
                self.failure.push(path, "Required");
                return None;
            }
            Some(Value::String(s)) => Some(ConditionValue::Text(s.clone())),
            Some(Value::Number(n)) => n.as_f64().map(ConditionValue::Number),
            Some(Value::Bool(b)) => Some(ConditionValue::Bool(*b)),
            Some(Value::Array(items)) => list_value(items),
            Some(_) => None,
        };

        if parsed.is_none() {
            self.failure.push(path, "Invalid input");
        }
        parsed
    }

    fn logic(&mut self, path: &str, value: Option<&Value>) -> Option<Logic> {
        let options = || quoted_options([Logic::And, Logic::Or].iter().map(Logic::as_str));
        match value {
            None => Some(Logic::default()),
            Some(Value::String(s)) if s == "and" => Some(Logic::And),
            Some(Value::String(s)) if s == "or" => Some(Logic::Or),
            Some(Value::String(s)) => {
                self.failure.push(
                    path,
                    format!("Invalid enum value. Expected {}, received '{s}'", options()),
                );
                None
            }
            Some(other) => {
                self.failure.push(path, expected(&options(), other));
                None
            }
        }
    }

    fn object<'v>(&mut self, path: &str, value: &'v Value) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(object) => Some(object),
            other => {
                self.failure.push(path, expected("object", other));
                None
            }
        }
    }

    fn required_string(
        &mut self,
        object: &Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<String> {
        let path = join_path(parent, key);
        match object.get(key) {
            None => {
                self.failure.push(path, "Required");
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.failure.push(path, expected("string", other));
                None
            }
        }
    }

    fn non_empty_string(
        &mut self,
        object: &Map<String, Value>,
        parent: &str,
        key: &str,
        empty_message: &str,
    ) -> Option<String> {
        let value = self.required_string(object, parent, key)?;
        if value.is_empty() {
            self.failure.push(join_path(parent, key), empty_message);
            return None;
        }
        Some(value)
    }

    fn optional_id(&mut self, object: &Map<String, Value>) -> Option<i64> {
        match object.get("id") {
            None => None,
            Some(Value::Number(n)) => match n.as_i64() {
                Some(id) => Some(id),
                None => {
                    self.failure.push("id", "Expected integer, received float");
                    None
                }
            },
            Some(other) => {
                self.failure.push("id", expected("number", other));
                None
            }
        }
    }

    fn optional_bool(&mut self, object: &Map<String, Value>, key: &str) -> Option<bool> {
        match object.get(key) {
            None => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(other) => {
                self.failure.push(key, expected("boolean", other));
                None
            }
        }
    }

    fn optional_string(&mut self, object: &Map<String, Value>, key: &str) -> Option<String> {
        match object.get(key) {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.failure.push(key, expected("string", other));
                None
            }
        }
    }

    fn optional_timestamp(
        &mut self,
        object: &Map<String, Value>,
        key: &str,
    ) -> Option<DateTime<Utc>> {
        let raw = self.optional_string(object, key)?;
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(_) => {
                self.failure.push(key, "Invalid datetime");
                None
            }
        }
    }
}

/// Accepts a homogeneous list of strings or of numbers.
fn list_value(items: &[Value]) -> Option<ConditionValue> {
    if items.iter().all(Value::is_string) {
        let texts = items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect();
        return Some(ConditionValue::TextList(texts));
    }
    if items.iter().all(Value::is_number) {
        let numbers = items.iter().filter_map(Value::as_f64).collect();
        return Some(ConditionValue::NumberList(numbers));
    }
    None
}

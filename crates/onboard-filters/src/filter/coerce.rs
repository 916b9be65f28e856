//! Value coercions used by the comparison operators.
//!
//! Text operators compare display text, numeric operators compare parsed
//! numbers. Both are total: anything that cannot be read as a number
//! becomes NaN, which fails every comparison.

use serde_json::Value;

use super::model::ConditionValue;
use super::path::Resolved;

/// Display text of an absent field.
const ABSENT_TEXT: &str = "undefined";

/// Display text of a JSON object.
const OBJECT_TEXT: &str = "[object Object]";

/// Formats a number the way it is displayed to users: integral values have
/// no fractional part, and magnitudes from `1e21` up or below `1e-6` use
/// exponent form (`1e+21`, `1.5e-7`).
pub fn number_text(n: f64) -> String {
    let magnitude = n.abs();
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if magnitude >= 1e21 || (magnitude != 0.0 && magnitude < 1e-6) {
        exponent_text(n)
    } else if n == n.trunc() {
        // -0.0 displays as "0"
        format!("{:.0}", n + 0.0)
    } else {
        format!("{n}")
    }
}

/// Shortest exponent form with an explicit exponent sign.
fn exponent_text(n: f64) -> String {
    let formatted = format!("{n:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

/// Display text of a JSON value.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map(number_text).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => OBJECT_TEXT.to_string(),
    }
}

/// Display text of a resolved field.
pub fn resolved_text(resolved: Resolved<'_>) -> String {
    match resolved {
        Resolved::Missing => ABSENT_TEXT.to_string(),
        Resolved::Found(value) => value_text(value),
    }
}

/// Display text of a condition operand.
pub fn operand_text(operand: &ConditionValue) -> String {
    match operand {
        ConditionValue::Text(s) => s.clone(),
        ConditionValue::Number(n) => number_text(*n),
        ConditionValue::Bool(b) => b.to_string(),
        ConditionValue::TextList(items) => items.join(","),
        ConditionValue::NumberList(items) => items
            .iter()
            .map(|n| number_text(*n))
            .collect::<Vec<_>>()
            .join(","),
    }
}

/// Parses text as a number.
///
/// Surrounding whitespace is ignored and blank text is zero. Decimal
/// notation, exponents, `Infinity` and `0x`/`0o`/`0b` prefixed integers are
/// accepted; anything else is NaN.
pub fn text_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return radix_number(digits, radix);
        }
    }

    // Rust also accepts spellings such as "inf" and "nan" that are not numbers here.
    let is_decimal = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !is_decimal {
        return f64::NAN;
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Reads unsigned digits in `radix`. No sign, no separators, at least one
/// digit; values beyond `u64` keep growing as floats.
fn radix_number(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}

/// Numeric reading of a JSON value.
pub fn value_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => text_number(s),
        Value::Array(_) => text_number(&value_text(value)),
        Value::Object(_) => f64::NAN,
    }
}

/// Numeric reading of a resolved field.
pub fn resolved_number(resolved: Resolved<'_>) -> f64 {
    match resolved {
        Resolved::Missing => f64::NAN,
        Resolved::Found(value) => value_number(value),
    }
}

/// Numeric reading of a condition operand.
pub fn operand_number(operand: &ConditionValue) -> f64 {
    match operand {
        ConditionValue::Number(n) => *n,
        ConditionValue::Bool(b) => f64::from(u8::from(*b)),
        other => text_number(&operand_text(other)),
    }
}

/// Strict equality between a record value and a scalar operand.
///
/// Types must match exactly: the number `1` never equals the string `"1"`.
/// Sequence operands compare by identity and therefore never equal a record
/// value.
pub fn strict_equals(resolved: Resolved<'_>, operand: &ConditionValue) -> bool {
    let Resolved::Found(value) = resolved else {
        return false;
    };

    match (value, operand) {
        (Value::String(s), ConditionValue::Text(t)) => s == t,
        (Value::Number(n), ConditionValue::Number(m)) => n.as_f64() == Some(*m),
        (Value::Bool(b), ConditionValue::Bool(c)) => b == c,
        _ => false,
    }
}

/// Strict equality between a record value and one member of a sequence
/// operand.
pub fn list_contains(resolved: Resolved<'_>, operand: &ConditionValue) -> bool {
    let Resolved::Found(value) = resolved else {
        return false;
    };

    match (value, operand) {
        (Value::String(s), ConditionValue::TextList(items)) => items.iter().any(|t| t == s),
        (Value::Number(n), ConditionValue::NumberList(items)) => {
            n.as_f64().is_some_and(|n| items.iter().any(|m| *m == n))
        }
        _ => false,
    }
}

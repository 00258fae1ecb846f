use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::backend::error::FieldErrors;

/*
Per-field payload validation. Request bodies deserialize into structs of
Option<serde_json::Value> so that one bad field never hides another: each
helper records its problem under the field name and the handler bails
once with the full map. Amounts are accepted as JSON strings or numbers
and normalized to two decimal places on the way in.
 */

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
const NOT_A_STRING: &str = "Not a valid string.";
const INVALID_NUMBER: &str = "A valid number is required.";
const TOO_MANY_DECIMALS: &str = "Ensure that there are no more than 2 decimal places.";
const TOO_MANY_WHOLE_DIGITS: &str = "Ensure that there are no more than 8 digits before the decimal point.";
const BAD_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
const INVALID_INTEGER: &str = "A valid integer is required.";
const INVALID_BOOLEAN: &str = "Must be a valid boolean.";

/// Normalize to exactly two fractional digits so stored and serialized
/// amounts always read like money ("5" -> "5.00").
pub fn to_money(value: Decimal) -> Decimal {
    let mut v = value;
    v.rescale(2);
    v
}

/// Message for a cross-entity reference the caller cannot see, either
/// because it does not exist or belongs to someone else.
pub fn invalid_pk(id: i64) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

// JSON null counts as absent everywhere.
fn present(value: Option<&Value>) -> Option<&Value> {
    match value {
        Some(Value::Null) | None => None,
        Some(v) => Some(v),
    }
}

fn parse_string(
    errors: &mut FieldErrors,
    field: &str,
    value: &Value,
    max_chars: Option<usize>,
    allow_blank: bool,
) -> Option<String> {
    let Value::String(s) = value else {
        errors.push(field, NOT_A_STRING);
        return None;
    };
    if s.is_empty() && !allow_blank {
        errors.push(field, BLANK);
        return None;
    }
    if let Some(max) = max_chars {
        if s.chars().count() > max {
            errors.push(
                field,
                format!("Ensure this field has no more than {} characters.", max),
            );
            return None;
        }
    }
    Some(s.clone())
}

pub fn required_string(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
    max_chars: usize,
) -> Option<String> {
    let Some(value) = present(value) else {
        errors.push(field, REQUIRED);
        return None;
    };
    parse_string(errors, field, value, Some(max_chars), false)
}

// Required free text without a length cap (passwords, priorities,
// refresh tokens).
pub fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
) -> Option<String> {
    let Some(value) = present(value) else {
        errors.push(field, REQUIRED);
        return None;
    };
    parse_string(errors, field, value, None, false)
}

// Free-text columns without a length cap; blank is kept as-is.
pub fn optional_string(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
) -> Option<String> {
    let value = present(value)?;
    parse_string(errors, field, value, None, true)
}

fn parse_amount(errors: &mut FieldErrors, field: &str, value: &Value) -> Option<Decimal> {
    let parsed = match value {
        Value::String(s) => Decimal::from_str_exact(s.trim()).ok(),
        Value::Number(n) => Decimal::from_str_exact(&n.to_string()).ok(),
        _ => None,
    };
    let Some(amount) = parsed else {
        errors.push(field, INVALID_NUMBER);
        return None;
    };
    if amount.scale() > 2 {
        errors.push(field, TOO_MANY_DECIMALS);
        return None;
    }
    if amount.abs().trunc().to_string().len() > 8 {
        errors.push(field, TOO_MANY_WHOLE_DIGITS);
        return None;
    }
    Some(to_money(amount))
}

pub fn required_amount(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
) -> Option<Decimal> {
    let Some(value) = present(value) else {
        errors.push(field, REQUIRED);
        return None;
    };
    parse_amount(errors, field, value)
}

pub fn optional_amount(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
    default: Decimal,
) -> Option<Decimal> {
    let Some(value) = present(value) else {
        return Some(to_money(default));
    };
    parse_amount(errors, field, value)
}

fn parse_date(errors: &mut FieldErrors, field: &str, value: &Value) -> Option<NaiveDate> {
    let parsed = match value {
        Value::String(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
        _ => None,
    };
    if parsed.is_none() {
        errors.push(field, BAD_DATE);
    }
    parsed
}

pub fn required_date(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
) -> Option<NaiveDate> {
    let Some(value) = present(value) else {
        errors.push(field, REQUIRED);
        return None;
    };
    parse_date(errors, field, value)
}

pub fn optional_date(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
    default: NaiveDate,
) -> Option<NaiveDate> {
    let Some(value) = present(value) else {
        return Some(default);
    };
    parse_date(errors, field, value)
}

fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub fn required_int(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
) -> Option<i64> {
    let Some(value) = present(value) else {
        errors.push(field, REQUIRED);
        return None;
    };
    let parsed = parse_int(value);
    if parsed.is_none() {
        errors.push(field, INVALID_INTEGER);
    }
    parsed
}

pub fn optional_int(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
    default: i64,
) -> Option<i64> {
    let Some(value) = present(value) else {
        return Some(default);
    };
    let parsed = parse_int(value);
    if parsed.is_none() {
        errors.push(field, INVALID_INTEGER);
    }
    parsed
}

pub fn optional_bool(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
    default: bool,
) -> Option<bool> {
    let Some(value) = present(value) else {
        return Some(default);
    };
    let parsed = match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };
    if parsed.is_none() {
        errors.push(field, INVALID_BOOLEAN);
    }
    parsed
}

/// Foreign-key fields (`category`, `budget`). Existence is the
/// handler's job; this only gets the id out of the payload.
pub fn required_id(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
) -> Option<i64> {
    required_int(errors, field, value)
}

pub fn required_id_list(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
) -> Option<Vec<i64>> {
    let Some(value) = present(value) else {
        errors.push(field, REQUIRED);
        return None;
    };
    let Value::Array(items) = value else {
        errors.push(field, INVALID_INTEGER);
        return None;
    };
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        match parse_int(item) {
            Some(id) => ids.push(id),
            None => {
                errors.push(field, INVALID_INTEGER);
                return None;
            }
        }
    }
    Some(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn errs() -> FieldErrors {
        FieldErrors::new()
    }

    fn messages(errors: &FieldErrors) -> serde_json::Value {
        serde_json::to_value(errors).unwrap()
    }

    #[test]
    fn missing_required_string() {
        let mut errors = errs();
        assert!(required_string(&mut errors, "name", None, 100).is_none());
        assert_eq!(messages(&errors), json!({"name": ["This field is required."]}));
    }

    #[test]
    fn null_counts_as_missing() {
        let mut errors = errs();
        let null = json!(null);
        assert!(required_string(&mut errors, "name", Some(&null), 100).is_none());
        assert_eq!(messages(&errors), json!({"name": ["This field is required."]}));
    }

    #[test]
    fn blank_required_string() {
        let mut errors = errs();
        let blank = json!("");
        assert!(required_string(&mut errors, "name", Some(&blank), 100).is_none());
        assert_eq!(messages(&errors), json!({"name": ["This field may not be blank."]}));
    }

    #[test]
    fn overlong_string() {
        let mut errors = errs();
        let long = json!("x".repeat(101));
        assert!(required_string(&mut errors, "name", Some(&long), 100).is_none());
        assert_eq!(
            messages(&errors),
            json!({"name": ["Ensure this field has no more than 100 characters."]})
        );
    }

    #[test]
    fn amount_accepts_string_and_number() {
        let mut errors = errs();
        let s = json!("1000.00");
        let n = json!(99.5);
        assert_eq!(
            required_amount(&mut errors, "amount", Some(&s)).unwrap().to_string(),
            "1000.00"
        );
        assert_eq!(
            required_amount(&mut errors, "amount", Some(&n)).unwrap().to_string(),
            "99.50"
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn amount_is_normalized_to_two_places() {
        let mut errors = errs();
        let whole = json!("5");
        assert_eq!(
            required_amount(&mut errors, "amount", Some(&whole)).unwrap().to_string(),
            "5.00"
        );
    }

    #[test]
    fn amount_rejects_garbage() {
        let mut errors = errs();
        let bad = json!("not-a-number");
        assert!(required_amount(&mut errors, "amount", Some(&bad)).is_none());
        assert_eq!(messages(&errors), json!({"amount": ["A valid number is required."]}));
    }

    #[test]
    fn amount_rejects_three_decimal_places() {
        let mut errors = errs();
        let bad = json!("10.555");
        assert!(required_amount(&mut errors, "amount", Some(&bad)).is_none());
        assert_eq!(
            messages(&errors),
            json!({"amount": ["Ensure that there are no more than 2 decimal places."]})
        );
    }

    #[test]
    fn amount_rejects_nine_whole_digits() {
        let mut errors = errs();
        let bad = json!("123456789");
        assert!(required_amount(&mut errors, "amount", Some(&bad)).is_none());
        assert_eq!(
            messages(&errors),
            json!({"amount": ["Ensure that there are no more than 8 digits before the decimal point."]})
        );
    }

    #[test]
    fn negative_amounts_pass() {
        let mut errors = errs();
        let v = json!("-50.25");
        assert_eq!(
            required_amount(&mut errors, "amount", Some(&v)).unwrap().to_string(),
            "-50.25"
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn date_format_is_strict() {
        let mut errors = errs();
        let bad = json!("31-12-2025");
        assert!(required_date(&mut errors, "date", Some(&bad)).is_none());
        assert_eq!(
            messages(&errors),
            json!({"date": ["Date has wrong format. Use one of these formats instead: YYYY-MM-DD."]})
        );
    }

    #[test]
    fn optional_date_falls_back() {
        let mut errors = errs();
        let fallback = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(optional_date(&mut errors, "date", None, fallback), Some(fallback));
        assert!(errors.is_empty());
    }

    #[test]
    fn int_accepts_digit_strings() {
        let mut errors = errs();
        let v = json!("42");
        assert_eq!(required_int(&mut errors, "progress", Some(&v)), Some(42));
        let bad = json!("4.2");
        assert!(required_int(&mut errors, "progress", Some(&bad)).is_none());
        assert_eq!(
            messages(&errors),
            json!({"progress": ["A valid integer is required."]})
        );
    }

    #[test]
    fn bool_coercions() {
        let mut errors = errs();
        let t = json!("true");
        let one = json!(1);
        let bad = json!("yes-please");
        assert_eq!(optional_bool(&mut errors, "recurring", Some(&t), false), Some(true));
        assert_eq!(optional_bool(&mut errors, "recurring", Some(&one), false), Some(true));
        assert_eq!(optional_bool(&mut errors, "recurring", None, true), Some(true));
        assert!(optional_bool(&mut errors, "recurring", Some(&bad), false).is_none());
        assert_eq!(
            messages(&errors),
            json!({"recurring": ["Must be a valid boolean."]})
        );
    }

    #[test]
    fn id_list_rejects_non_integers() {
        let mut errors = errs();
        let good = json!([1, 2, "3"]);
        assert_eq!(
            required_id_list(&mut errors, "ids", Some(&good)),
            Some(vec![1, 2, 3])
        );
        let bad = json!([1, "x"]);
        assert!(required_id_list(&mut errors, "ids", Some(&bad)).is_none());
        assert_eq!(messages(&errors), json!({"ids": ["A valid integer is required."]}));
    }

    #[test]
    fn empty_id_list_is_allowed_here() {
        // The handler turns an empty effective set into 404; the parser
        // itself accepts it.
        let mut errors = errs();
        let empty = json!([]);
        assert_eq!(required_id_list(&mut errors, "ids", Some(&empty)), Some(vec![]));
        assert!(errors.is_empty());
    }
}

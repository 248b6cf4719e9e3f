//! Row matching against a WHERE condition tree.
//!
//! Equality is deliberately loose: clients mix quoted and unquoted literals
//! freely, so `id = '5'` must find the row whose integer `id` is 5.
//!
//! Rules, applied in order:
//! - NULL equals NULL and nothing else
//! - values of the same type use plain equality
//! - int against float truncates the float
//! - text against anything matches the other side's rendering, or the
//!   number the text parses to
//! - bytes against a number compare renderings

use crate::error::{Result, ServerError};
use crate::sql::{ColumnDef, Condition, Value};

/// Check that every column the condition names exists in `columns`.
pub fn validate_condition(cond: Option<&Condition>, columns: &[ColumnDef]) -> Result<()> {
    match cond {
        None => Ok(()),
        Some(Condition::Comparison { column, .. }) => {
            if columns.iter().any(|c| &c.name == column) {
                Ok(())
            } else {
                Err(ServerError::ColumnNotFound(column.clone()))
            }
        }
        Some(Condition::And(left, right)) | Some(Condition::Or(left, right)) => {
            validate_condition(Some(left), columns)?;
            validate_condition(Some(right), columns)
        }
    }
}

/// Whether `row` satisfies `cond`. A missing condition matches every row.
///
/// `row` holds one value per entry of `columns`. A comparison on a column
/// that is not in `columns` never matches; callers that want an error run
/// [`validate_condition`] first.
pub fn is_matched(cond: Option<&Condition>, columns: &[ColumnDef], row: &[Value]) -> bool {
    let Some(cond) = cond else {
        return true;
    };

    match cond {
        Condition::Comparison { column, value } => columns
            .iter()
            .position(|c| &c.name == column)
            .and_then(|idx| row.get(idx))
            .map(|stored| coerced_eq(stored, value))
            .unwrap_or(false),
        Condition::And(left, right) => {
            is_matched(Some(left), columns, row) && is_matched(Some(right), columns, row)
        }
        Condition::Or(left, right) => {
            is_matched(Some(left), columns, row) || is_matched(Some(right), columns, row)
        }
    }
}

/// Type-coercing equality used by [`is_matched`]. Symmetric.
pub fn coerced_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,

        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Bytes(x), Value::Bytes(y)) => x == y,

        (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => {
            truncate(*f) == Some(*i)
        }

        (Value::Text(s), other) | (other, Value::Text(s)) => text_eq(s, other),

        (Value::Bytes(_), _) | (_, Value::Bytes(_)) => a.to_string() == b.to_string(),
    }
}

fn text_eq(s: &str, other: &Value) -> bool {
    if *s == other.to_string() {
        return true;
    }
    let trimmed = s.trim();
    match other {
        Value::Int(i) => match trimmed.parse::<i64>() {
            Ok(parsed) => parsed == *i,
            Err(_) => trimmed
                .parse::<f64>()
                .ok()
                .and_then(truncate)
                .map(|t| t == *i)
                .unwrap_or(false),
        },
        Value::Float(f) => trimmed
            .parse::<f64>()
            .map(|parsed| parsed == *f)
            .unwrap_or(false),
        Value::Bytes(b) => s.as_bytes() == b.as_slice(),
        Value::Null | Value::Text(_) => false,
    }
}

fn truncate(f: f64) -> Option<i64> {
    let t = f.trunc();
    if t.is_finite() && t >= i64::MIN as f64 && t <= i64::MAX as f64 {
        Some(t as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::DataType;

    fn schema() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("id", DataType::Int),
            ColumnDef::new("name", DataType::Text),
            ColumnDef::new("score", DataType::Float),
        ]
    }

    fn row(id: i64, name: &str, score: f64) -> Vec<Value> {
        vec![Value::Int(id), Value::Text(name.into()), Value::Float(score)]
    }

    #[test]
    fn test_no_condition_matches() {
        assert!(is_matched(None, &schema(), &row(1, "a", 0.5)));
    }

    #[test]
    fn test_int_column_matches_string_literal() {
        let cond = Condition::equals("id", "5");
        assert!(is_matched(Some(&cond), &schema(), &row(5, "a", 0.0)));
        assert!(!is_matched(Some(&cond), &schema(), &row(6, "a", 0.0)));
    }

    #[test]
    fn test_and_or() {
        let r = row(5, "alice", 1.5);
        let s = schema();

        let both = Condition::equals("id", 5).and(Condition::equals("name", "alice"));
        assert!(is_matched(Some(&both), &s, &r));

        let one_wrong = Condition::equals("id", 5).and(Condition::equals("name", "bob"));
        assert!(!is_matched(Some(&one_wrong), &s, &r));

        let either = Condition::equals("id", 9).or(Condition::equals("name", "alice"));
        assert!(is_matched(Some(&either), &s, &r));

        let neither = Condition::equals("id", 9).or(Condition::equals("name", "bob"));
        assert!(!is_matched(Some(&neither), &s, &r));
    }

    #[test]
    fn test_unknown_column_never_matches() {
        let cond = Condition::equals("missing", 1);
        assert!(!is_matched(Some(&cond), &schema(), &row(1, "a", 0.0)));
        assert!(matches!(
            validate_condition(Some(&cond), &schema()).unwrap_err(),
            ServerError::ColumnNotFound(ref c) if c == "missing"
        ));
    }

    #[test]
    fn test_validate_walks_tree() {
        let ok = Condition::equals("id", 1).or(Condition::equals("name", "x"));
        assert!(validate_condition(Some(&ok), &schema()).is_ok());

        let bad = Condition::equals("id", 1).and(Condition::equals("nope", "x"));
        assert!(validate_condition(Some(&bad), &schema()).is_err());
    }

    #[test]
    fn test_coerced_eq_same_type() {
        assert!(coerced_eq(&Value::Int(3), &Value::Int(3)));
        assert!(!coerced_eq(&Value::Int(3), &Value::Int(4)));
        assert!(coerced_eq(&Value::Null, &Value::Null));
        assert!(coerced_eq(&Value::from(b"ab".to_vec()), &Value::from(b"ab".to_vec())));
    }

    #[test]
    fn test_coerced_eq_null_against_value() {
        assert!(!coerced_eq(&Value::Null, &Value::Int(0)));
        assert!(!coerced_eq(&Value::Text("NULL".into()), &Value::Null));
    }

    #[test]
    fn test_coerced_eq_text_number() {
        assert!(coerced_eq(&Value::Int(5), &Value::from("5")));
        assert!(coerced_eq(&Value::from("5"), &Value::Int(5)));
        assert!(coerced_eq(&Value::Int(5), &Value::from(" 5 ")));
        assert!(coerced_eq(&Value::Int(5), &Value::from("5.7")));
        assert!(coerced_eq(&Value::Float(2.5), &Value::from("2.5")));
        assert!(!coerced_eq(&Value::Int(5), &Value::from("five")));
        assert!(!coerced_eq(&Value::Float(2.5), &Value::from("2.6")));
    }

    #[test]
    fn test_coerced_eq_int_float_truncates() {
        assert!(coerced_eq(&Value::Int(5), &Value::Float(5.0)));
        assert!(coerced_eq(&Value::Int(5), &Value::Float(5.9)));
        assert!(coerced_eq(&Value::Float(-1.2), &Value::Int(-1)));
        assert!(!coerced_eq(&Value::Int(5), &Value::Float(6.0)));
        assert!(!coerced_eq(&Value::Int(0), &Value::Float(f64::NAN)));
    }

    #[test]
    fn test_coerced_eq_text_bytes() {
        assert!(coerced_eq(&Value::from(b"key1".to_vec()), &Value::from("key1")));
        assert!(!coerced_eq(&Value::from(b"key1".to_vec()), &Value::from("key2")));
    }

    #[test]
    fn test_coerced_eq_is_symmetric() {
        let values = [
            Value::Null,
            Value::Int(5),
            Value::Float(5.0),
            Value::Float(5.5),
            Value::from("5"),
            Value::from("abc"),
            Value::from(b"5".to_vec()),
        ];
        for a in &values {
            for b in &values {
                assert_eq!(coerced_eq(a, b), coerced_eq(b, a), "{:?} vs {:?}", a, b);
            }
        }
    }
}

//! Value enum for dynamic cell values

use std::cmp::Ordering;
use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// A dynamic value stored in a table cell.
///
/// Rows hold their cells as `Value`s so the engine can tell numbers apart from
/// text when sorting, while every value still has a display string for
/// searching, filtering and export.
///
/// # Type Mapping
///
/// | JSON input      | Rust Variant |
/// |-----------------|--------------|
/// | null            | `Null`       |
/// | true / false    | `Bool`       |
/// | fits in i32     | `Int`        |
/// | fits in i64     | `Long`       |
/// | other number    | `Float`      |
/// | string          | `String`     |
/// | array / object  | `Json`       |
///
/// `Decimal`, `Guid` and `DateTime` are never produced by deserialization
/// (JSON strings always stay strings); build them with `From`.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::Value;
///
/// let name = Value::from("Ann");
/// let age = Value::from(25);
/// assert!(age.is_numeric());
/// assert_eq!(name.to_string(), "Ann");
/// assert_eq!(Value::Null.to_string(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    Long(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(String),
    /// Arbitrary precision decimal.
    Decimal(Decimal),
    /// GUID/UUID value.
    Guid(Uuid),
    /// Date and time with timezone.
    DateTime(DateTime<Utc>),
    /// Fallback for arrays and objects.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the stored value is a number.
    ///
    /// This looks at the variant only; a string such as `"42"` is not numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Decimal(_)
        )
    }

    /// Returns the value as `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(f64::from(*n)),
            Value::Long(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            Value::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Returns the string slice if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Decimal(_) => "decimal",
            Value::Guid(_) => "guid",
            Value::DateTime(_) => "datetime",
            Value::Json(_) => "json",
        }
    }

    /// Compares two numeric values.
    ///
    /// Returns `None` unless both sides are numeric. Integer pairs compare
    /// exactly; anything involving a float or decimal goes through `f64`, and
    /// incomparable floats (NaN) are treated as equal.
    pub fn cmp_numeric(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Long(a), Value::Long(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Long(b)) => Some(i64::from(*a).cmp(b)),
            (Value::Long(a), Value::Int(b)) => Some(a.cmp(&i64::from(*b))),
            (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
            _ => {
                let a = self.as_f64()?;
                let b = other.as_f64()?;
                Some(a.partial_cmp(&b).unwrap_or(Ordering::Equal))
            }
        }
    }
}

/// Display string used for search, filtering, collation and export.
///
/// `Null` renders as the empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Guid(g) => write!(f, "{}", g),
            Value::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
            Value::Json(serde_json::Value::String(s)) => f.write_str(s),
            Value::Json(v) => write!(f, "{}", v),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Guid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_scalars() {
        let values: Vec<Value> =
            serde_json::from_str(r#"[null, true, 25, 3000000000, 2.5, "42", [1, 2]]"#).unwrap();

        assert_eq!(values[0], Value::Null);
        assert_eq!(values[1], Value::Bool(true));
        assert_eq!(values[2], Value::Int(25));
        assert_eq!(values[3], Value::Long(3_000_000_000));
        assert_eq!(values[4], Value::Float(2.5));
        assert_eq!(values[5], Value::String("42".to_string()));
        assert_eq!(values[6].type_name(), "json");
    }

    #[test]
    fn test_typed_variants_only_from_callers() {
        let json = r#"["2024-05-01T12:00:00Z", "67e55044-10b1-426f-9247-bb680e5fe0c8", "1.25"]"#;
        let values: Vec<Value> = serde_json::from_str(json).unwrap();
        assert!(values.iter().all(|v| v.type_name() == "string"));

        let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();

        assert_eq!(Value::from(at).type_name(), "datetime");
        assert_eq!(Value::from(at).to_string(), "2024-05-01T12:00:00+00:00");
        assert_eq!(Value::from(id).to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert_eq!(Value::from(Decimal::new(125, 2)).to_string(), "1.25");
    }

    #[test]
    fn test_numeric_strings_are_not_numeric() {
        assert!(!Value::from("42").is_numeric());
        assert!(Value::from(42).is_numeric());
        assert!(Value::from(Decimal::new(125, 2)).is_numeric());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Float(25.0).to_string(), "25");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Json(serde_json::json!([1, 2])).to_string(), "[1,2]");
    }

    #[test]
    fn test_cmp_numeric() {
        assert_eq!(
            Value::Int(3).cmp_numeric(&Value::Long(10)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Float(2.5).cmp_numeric(&Value::Int(2)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Value::Decimal(Decimal::new(150, 2)).cmp_numeric(&Value::Float(1.5)),
            Some(Ordering::Equal)
        );
        assert_eq!(Value::from("3").cmp_numeric(&Value::Int(3)), None);
    }
}

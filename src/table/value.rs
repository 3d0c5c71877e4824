//! Scalar types flowing through tables and their JSON-safe sanitization.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::fmt;

/// A cell value as delivered by a provider, before sanitization.
///
/// Every numeric width a provider may emit has its own variant so the
/// conversion into [`Scalar`] is explicit per representation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// The provider's null / NaN / NA marker
    Missing,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// A scalar of a type the decoder does not model, kept as its display form
    Other(String),
}

impl RawValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, RawValue::Missing)
    }

    /// The calendar date of a temporal value
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            RawValue::Date(d) => Some(*d),
            RawValue::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }
}

/// A JSON-safe scalar: the only value shape that leaves the serializer.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Scalar> for RawValue {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Null => RawValue::Missing,
            Scalar::Bool(b) => RawValue::Bool(b),
            Scalar::Int(i) => RawValue::I64(i),
            Scalar::Float(f) => RawValue::F64(f),
            Scalar::Str(s) => RawValue::Str(s),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Str(s) => write!(f, "{s}"),
        }
    }
}

/// Non-finite floats can only get here when a `Scalar` was built by hand;
/// they are written as their string form so the surrounding payload still encodes.
impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            Scalar::Float(v) => serializer.serialize_str(&v.to_string()),
            Scalar::Str(s) => serializer.serialize_str(s),
        }
    }
}

fn float(v: f64) -> Scalar {
    if v.is_finite() {
        Scalar::Float(v)
    } else {
        Scalar::Null
    }
}

/// Converts a provider value into a JSON-safe scalar.
///
/// Missing markers and non-finite floats become `Null`, every integer width
/// becomes a signed 64-bit integer, floats are widened to `f64`. Unsigned
/// values beyond `i64::MAX` keep their exact decimal digits as a string.
/// Temporal values reaching this point (outside a date-typed column) and
/// unmodelled scalars are rendered through their string form.
///
/// # Examples
/// ```
/// use soccerdata_api::table::{RawValue, Scalar, sanitize};
///
/// assert_eq!(sanitize(RawValue::F64(f64::NAN)), Scalar::Null);
/// assert_eq!(sanitize(RawValue::I16(7)), Scalar::Int(7));
/// ```
pub fn sanitize(value: RawValue) -> Scalar {
    match value {
        RawValue::Missing => Scalar::Null,
        RawValue::Bool(b) => Scalar::Bool(b),
        RawValue::I8(v) => Scalar::Int(v.into()),
        RawValue::I16(v) => Scalar::Int(v.into()),
        RawValue::I32(v) => Scalar::Int(v.into()),
        RawValue::I64(v) => Scalar::Int(v),
        RawValue::U8(v) => Scalar::Int(v.into()),
        RawValue::U16(v) => Scalar::Int(v.into()),
        RawValue::U32(v) => Scalar::Int(v.into()),
        RawValue::U64(v) => match i64::try_from(v) {
            Ok(i) => Scalar::Int(i),
            Err(_) => Scalar::Str(v.to_string()),
        },
        RawValue::F32(v) => float(v.into()),
        RawValue::F64(v) => float(v),
        RawValue::Str(s) => Scalar::Str(s),
        RawValue::Date(d) => Scalar::Str(d.to_string()),
        RawValue::DateTime(dt) => Scalar::Str(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        RawValue::Other(s) => Scalar::Str(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_floats_become_null() {
        assert_eq!(sanitize(RawValue::F64(f64::NAN)), Scalar::Null);
        assert_eq!(sanitize(RawValue::F64(f64::INFINITY)), Scalar::Null);
        assert_eq!(sanitize(RawValue::F64(f64::NEG_INFINITY)), Scalar::Null);
        assert_eq!(sanitize(RawValue::F32(f32::NAN)), Scalar::Null);
        assert_eq!(sanitize(RawValue::F32(f32::INFINITY)), Scalar::Null);
    }

    #[test]
    fn test_missing_becomes_null() {
        assert_eq!(sanitize(RawValue::Missing), Scalar::Null);
    }

    #[test]
    fn test_integers_keep_integer_type() {
        assert_eq!(sanitize(RawValue::I8(7)), Scalar::Int(7));
        assert_eq!(sanitize(RawValue::I16(7)), Scalar::Int(7));
        assert_eq!(sanitize(RawValue::I32(7)), Scalar::Int(7));
        assert_eq!(sanitize(RawValue::I64(7)), Scalar::Int(7));
        assert_eq!(sanitize(RawValue::U8(7)), Scalar::Int(7));
        assert_eq!(sanitize(RawValue::U16(7)), Scalar::Int(7));
        assert_eq!(sanitize(RawValue::U32(7)), Scalar::Int(7));
        assert_eq!(sanitize(RawValue::U64(7)), Scalar::Int(7));
        assert_eq!(sanitize(RawValue::I64(i64::MIN)), Scalar::Int(i64::MIN));
    }

    #[test]
    fn test_large_unsigned_is_kept_exact() {
        assert_eq!(
            sanitize(RawValue::U64(u64::MAX)),
            Scalar::Str("18446744073709551615".to_string())
        );
    }

    #[test]
    fn test_finite_floats_are_widened() {
        assert_eq!(sanitize(RawValue::F64(1.25)), Scalar::Float(1.25));
        assert_eq!(sanitize(RawValue::F32(0.5)), Scalar::Float(0.5));
        assert_eq!(sanitize(RawValue::F64(-0.0)), Scalar::Float(-0.0));
    }

    #[test]
    fn test_strings_and_bools_unchanged() {
        assert_eq!(
            sanitize(RawValue::Str("Haaland".to_string())),
            Scalar::Str("Haaland".to_string())
        );
        assert_eq!(sanitize(RawValue::Bool(true)), Scalar::Bool(true));
    }

    #[test]
    fn test_stray_temporal_and_other_values_use_string_form() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            sanitize(RawValue::Date(date)),
            Scalar::Str("2024-01-15".to_string())
        );
        let dt = date.and_hms_opt(18, 30, 0).unwrap();
        assert_eq!(
            sanitize(RawValue::DateTime(dt)),
            Scalar::Str("2024-01-15 18:30:00".to_string())
        );
        assert_eq!(
            sanitize(RawValue::Other("90 days".to_string())),
            Scalar::Str("90 days".to_string())
        );
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = vec![
            RawValue::Missing,
            RawValue::Bool(false),
            RawValue::I32(-3),
            RawValue::U64(u64::MAX),
            RawValue::F64(f64::NAN),
            RawValue::F64(2.5),
            RawValue::F32(f32::NEG_INFINITY),
            RawValue::Str(String::new()),
            RawValue::Date(NaiveDate::from_ymd_opt(2023, 8, 11).unwrap()),
        ];
        for input in inputs {
            let once = sanitize(input);
            let twice = sanitize(RawValue::from(once.clone()));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_scalar_accessors_match_variant() {
        assert!(sanitize(RawValue::F64(f64::NAN)).is_null());
        assert!(!sanitize(RawValue::I32(0)).is_null());
        assert_eq!(sanitize(RawValue::U16(90)).as_i64(), Some(90));
        assert_eq!(sanitize(RawValue::U16(90)).as_f64(), None);
        assert_eq!(sanitize(RawValue::F32(1.5)).as_f64(), Some(1.5));
        assert_eq!(sanitize(RawValue::F32(1.5)).as_i64(), None);
        assert_eq!(
            sanitize(RawValue::Str("Arsenal".to_string())).as_str(),
            Some("Arsenal")
        );
        assert_eq!(sanitize(RawValue::Missing).as_str(), None);
    }

    #[test]
    fn test_scalar_json_encoding() {
        let values = vec![
            Scalar::Null,
            Scalar::Bool(true),
            Scalar::Int(7),
            Scalar::Float(0.75),
            Scalar::Str("Arsenal".to_string()),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,true,7,0.75,"Arsenal"]"#);
    }

    #[test]
    fn test_hand_built_non_finite_float_encodes_as_string() {
        let json = serde_json::to_string(&Scalar::Float(f64::INFINITY)).unwrap();
        assert_eq!(json, r#""inf""#);
        let json = serde_json::to_string(&Scalar::Float(f64::NAN)).unwrap();
        assert_eq!(json, r#""NaN""#);
    }
}

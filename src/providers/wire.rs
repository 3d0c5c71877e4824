//! JSON wire format of tables served by the provider gateway.
//!
//! Tables arrive in split orientation with declared dtypes:
//!
//! ```json
//! {
//!   "index":   [{"name": "team", "dtype": "object"}],
//!   "columns": [{"name": ["Performance", "Gls"], "dtype": "int64"}],
//!   "data":    [["Arsenal", 91]]
//! }
//! ```
//!
//! Each data row lists the index values first, then the column values.
//! Multi-level column names are joined with `_`, skipping empty levels.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::table::{Column, ColumnType, RawValue, Table};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireName {
    Single(String),
    Levels(Vec<Option<String>>),
}

impl WireName {
    fn flatten(self) -> Option<String> {
        match self {
            WireName::Single(name) => Some(name),
            WireName::Levels(levels) => {
                let parts: Vec<String> = levels
                    .into_iter()
                    .flatten()
                    .map(|level| level.trim().to_string())
                    .filter(|level| !level.is_empty())
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("_"))
                }
            }
        }
    }
}

fn default_dtype() -> String {
    "object".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireColumn {
    #[serde(default)]
    pub name: Option<WireName>,
    #[serde(default = "default_dtype")]
    pub dtype: String,
}

impl WireColumn {
    fn into_column(self) -> Column {
        Column {
            name: self.name.and_then(WireName::flatten),
            dtype: ColumnType::from_dtype(&self.dtype),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireTable {
    #[serde(default)]
    pub index: Vec<WireColumn>,
    pub columns: Vec<WireColumn>,
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

impl WireTable {
    /// Decodes the rows against the declared dtypes.
    ///
    /// A row of the wrong width is an [`AppError::Serialization`]; a value
    /// that does not fit its column's dtype means the upstream schema changed
    /// and is reported as an unexpected structure for `url`.
    pub fn into_table(self, url: &str) -> Result<Table, AppError> {
        let index: Vec<Column> = self.index.into_iter().map(WireColumn::into_column).collect();
        let columns: Vec<Column> = self
            .columns
            .into_iter()
            .map(WireColumn::into_column)
            .collect();

        let mut table = Table::new(index, columns);
        let dtypes: Vec<(Option<String>, ColumnType)> = table
            .index()
            .iter()
            .chain(table.columns())
            .map(|c| (c.name.clone(), c.dtype))
            .collect();

        for (row_number, row) in self.data.into_iter().enumerate() {
            if row.len() != dtypes.len() {
                return Err(AppError::serialization(format!(
                    "row {row_number} has {} values, expected {}",
                    row.len(),
                    dtypes.len()
                )));
            }
            let decoded = row
                .iter()
                .zip(&dtypes)
                .map(|(value, (name, dtype))| {
                    decode_value(value, *dtype).map_err(|message| {
                        AppError::api_unexpected_structure(
                            format!(
                                "row {row_number}, column '{}': {message}",
                                name.as_deref().unwrap_or("<unnamed>")
                            ),
                            url,
                        )
                    })
                })
                .collect::<Result<Vec<_>, AppError>>()?;
            table.push_row(decoded)?;
        }

        Ok(table)
    }
}

fn integer<T: TryFrom<i64> + TryFrom<u64>>(value: &Value) -> Result<T, String> {
    let converted = match value {
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => <T as TryFrom<i64>>::try_from(i).ok(),
            (None, Some(u)) => <T as TryFrom<u64>>::try_from(u).ok(),
            _ => None,
        },
        _ => None,
    };
    converted.ok_or_else(|| format!("expected integer, found {value}"))
}

fn float(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| format!("expected float, found {n}")),
        // NaN and infinities cannot be JSON numbers; gateways send them as strings
        Value::String(s) => s
            .parse::<f64>()
            .map_err(|_| format!("expected float, found string '{s}'")),
        other => Err(format!("expected float, found {other}")),
    }
}

fn datetime(value: &Value) -> Result<NaiveDateTime, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| format!("invalid epoch milliseconds {n}")),
        Value::String(s) => parse_datetime(s).ok_or_else(|| format!("invalid datetime '{s}'")),
        other => Err(format!("expected datetime, found {other}")),
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    // Keep the wall-clock time at the value's own offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Decodes one JSON cell for a column of the given dtype.
pub fn decode_value(value: &Value, dtype: ColumnType) -> Result<RawValue, String> {
    if value.is_null() {
        return Ok(RawValue::Missing);
    }
    let decoded = match dtype {
        ColumnType::Int8 => RawValue::I8(integer(value)?),
        ColumnType::Int16 => RawValue::I16(integer(value)?),
        ColumnType::Int32 => RawValue::I32(integer(value)?),
        ColumnType::Int64 => RawValue::I64(integer(value)?),
        ColumnType::UInt8 => RawValue::U8(integer(value)?),
        ColumnType::UInt16 => RawValue::U16(integer(value)?),
        ColumnType::UInt32 => RawValue::U32(integer(value)?),
        ColumnType::UInt64 => RawValue::U64(integer(value)?),
        ColumnType::Float32 => RawValue::F32(float(value)? as f32),
        ColumnType::Float64 => RawValue::F64(float(value)?),
        ColumnType::Bool => match value {
            Value::Bool(b) => RawValue::Bool(*b),
            other => return Err(format!("expected boolean, found {other}")),
        },
        ColumnType::Str => match value {
            Value::String(s) => RawValue::Str(s.clone()),
            other => RawValue::Str(other.to_string()),
        },
        ColumnType::Date => RawValue::Date(datetime(value)?.date()),
        ColumnType::DateTime => RawValue::DateTime(datetime(value)?),
        ColumnType::Object => match value {
            Value::Bool(b) => RawValue::Bool(*b),
            Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
                (Some(i), _, _) => RawValue::I64(i),
                (None, Some(u), _) => RawValue::U64(u),
                (None, None, Some(f)) => RawValue::F64(f),
                _ => RawValue::Other(n.to_string()),
            },
            Value::String(s) => RawValue::Str(s.clone()),
            other => RawValue::Other(other.to_string()),
        },
    };
    Ok(decoded)
}

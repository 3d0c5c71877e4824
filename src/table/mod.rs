//! Tabular results exchanged with provider clients and their flattening into records.
//!
//! A [`Table`] is an ordered set of rows over named, typed columns. Zero or
//! more leading columns form the row index (possibly composite, e.g. team and
//! date). [`serialize`] turns a table into flat, JSON-safe [`Record`]s.

pub mod serializer;
pub mod value;

pub use serializer::{Record, serialize};
pub use value::{RawValue, Scalar, sanitize};

use crate::error::AppError;

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Bool,
    Str,
    Date,
    DateTime,
    /// Mixed or unknown content
    Object,
}

impl ColumnType {
    /// Date and datetime columns are rendered as `YYYY-MM-DD`.
    pub fn is_temporal(self) -> bool {
        matches!(self, ColumnType::Date | ColumnType::DateTime)
    }

    /// Parses a dtype name as providers report it (`int64`, `Float64`,
    /// `datetime64[ns]`, ...). Unknown names map to `Object`.
    pub fn from_dtype(dtype: &str) -> Self {
        let lower = dtype.to_ascii_lowercase();
        match lower.as_str() {
            "int8" => ColumnType::Int8,
            "int16" => ColumnType::Int16,
            "int32" => ColumnType::Int32,
            "int64" | "int" => ColumnType::Int64,
            "uint8" => ColumnType::UInt8,
            "uint16" => ColumnType::UInt16,
            "uint32" => ColumnType::UInt32,
            "uint64" => ColumnType::UInt64,
            "float32" => ColumnType::Float32,
            "float64" | "float" => ColumnType::Float64,
            "bool" | "boolean" => ColumnType::Bool,
            "string" | "str" => ColumnType::Str,
            "date" => ColumnType::Date,
            d if d.starts_with("datetime64") || d == "datetime" => ColumnType::DateTime,
            _ => ColumnType::Object,
        }
    }
}

/// A named, typed column. Index levels may be unnamed.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: Option<String>,
    pub dtype: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: Some(name.into()),
            dtype,
        }
    }

    pub fn unnamed(dtype: ColumnType) -> Self {
        Self { name: None, dtype }
    }
}

/// Rows are stored index values first, then value columns, positionally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    index: Vec<Column>,
    columns: Vec<Column>,
    rows: Vec<Vec<RawValue>>,
}

impl Table {
    pub fn new(index: Vec<Column>, columns: Vec<Column>) -> Self {
        Self {
            index,
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table without checking row widths; [`serialize`] rejects
    /// ragged rows.
    pub fn from_parts(index: Vec<Column>, columns: Vec<Column>, rows: Vec<Vec<RawValue>>) -> Self {
        Self {
            index,
            columns,
            rows,
        }
    }

    /// Appends a row after checking it covers every declared column.
    pub fn push_row(&mut self, row: Vec<RawValue>) -> Result<(), AppError> {
        if row.len() != self.width() {
            return Err(AppError::serialization(format!(
                "row {} has {} values, expected {}",
                self.rows.len(),
                row.len(),
                self.width()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Builder-style [`Table::push_row`].
    pub fn with_row(mut self, row: Vec<RawValue>) -> Result<Self, AppError> {
        self.push_row(row)?;
        Ok(self)
    }

    pub fn index(&self) -> &[Column] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<RawValue>] {
        &self.rows
    }

    /// Number of index levels plus value columns
    pub fn width(&self) -> usize {
        self.index.len() + self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

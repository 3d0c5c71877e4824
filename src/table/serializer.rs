//! Flattening of tables into JSON-safe records.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;
use std::sync::Arc;

use super::value::{RawValue, Scalar, sanitize};
use super::{Column, Table};
use crate::constants::{DATE_FORMAT, DEFAULT_INDEX_NAME};
use crate::error::AppError;

/// One table row as an ordered field name -> scalar mapping.
///
/// Field names are shared between all records of one serialized table.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(Arc<str>, Scalar)>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.fields
            .iter()
            .find(|(field, _)| field.as_ref() == name)
            .map(|(_, value)| value)
    }

    /// Field names in output order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(field, _)| field.as_ref())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, value) in &self.fields {
            map.serialize_entry(field.as_ref(), value)?;
        }
        map.end()
    }
}

/// Names the index levels: explicit names win, an unnamed single level is
/// `index` (or `level_0` when a value column already uses that name), and
/// unnamed levels of a composite index are `level_<n>`.
fn index_field_names(index: &[Column], columns: &[Column]) -> Vec<String> {
    let single = index.len() == 1;
    let index_taken = columns
        .iter()
        .any(|c| c.name.as_deref() == Some(DEFAULT_INDEX_NAME));

    index
        .iter()
        .enumerate()
        .map(|(level, column)| match &column.name {
            Some(name) => name.clone(),
            None if single && !index_taken => DEFAULT_INDEX_NAME.to_string(),
            None => format!("level_{level}"),
        })
        .collect()
}

fn field_names(table: &Table) -> Result<Vec<Arc<str>>, AppError> {
    let mut names = index_field_names(table.index(), table.columns());
    for (position, column) in table.columns().iter().enumerate() {
        match &column.name {
            Some(name) => names.push(name.clone()),
            None => {
                return Err(AppError::serialization(format!(
                    "value column {position} has no name"
                )));
            }
        }
    }

    let mut seen = HashSet::with_capacity(names.len());
    for name in &names {
        if !seen.insert(name.as_str()) {
            return Err(AppError::serialization(format!(
                "duplicate field name '{name}'"
            )));
        }
    }

    Ok(names.into_iter().map(Arc::from).collect())
}

fn format_date(value: &RawValue, field: &str, row: usize) -> Result<Scalar, AppError> {
    if value.is_missing() {
        return Ok(Scalar::Null);
    }
    match value.as_date() {
        Some(date) => Ok(Scalar::Str(date.format(DATE_FORMAT).to_string())),
        None => Err(AppError::serialization(format!(
            "row {row}: non-date value {value:?} in date column '{field}'"
        ))),
    }
}

/// Converts a table into one record per row, in row order.
///
/// Index levels become leading fields (in level order), followed by the value
/// columns in their original order. Date and datetime columns are written as
/// `YYYY-MM-DD`; every other value goes through [`sanitize`].
///
/// Fails with [`AppError::Serialization`] when a row does not cover every
/// declared column, when a value column is unnamed or when two fields end up
/// with the same name.
pub fn serialize(table: &Table) -> Result<Vec<Record>, AppError> {
    let names = field_names(table)?;
    let types: Vec<_> = table
        .index()
        .iter()
        .chain(table.columns())
        .map(|c| c.dtype)
        .collect();

    table
        .rows()
        .iter()
        .enumerate()
        .map(|(row_number, row)| {
            if row.len() != names.len() {
                return Err(AppError::serialization(format!(
                    "row {row_number} has {} values, expected {}",
                    row.len(),
                    names.len()
                )));
            }
            let fields = row
                .iter()
                .zip(&names)
                .zip(&types)
                .map(|((value, name), dtype)| {
                    let scalar = if dtype.is_temporal() {
                        format_date(value, name, row_number)?
                    } else {
                        sanitize(value.clone())
                    };
                    Ok((Arc::clone(name), scalar))
                })
                .collect::<Result<Vec<_>, AppError>>()?;
            Ok(Record { fields })
        })
        .collect()
}

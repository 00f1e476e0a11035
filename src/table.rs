//! In-memory record table threaded through the pipeline stages.
//!
//! A [`Table`] keeps an ordered list of column names and rows of optional
//! [`Value`] cells aligned to those names. Stages take a table by value and
//! hand back a new one, so no stage ever observes a half-updated table.
//!
//! Typed accessors ([`Table::float_column`] and friends) fail with
//! [`PipelineError::MissingField`] when a column is absent and with
//! [`PipelineError::UnexpectedType`] when a cell has not been coerced to the
//! type the caller requires.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::{
    data::Value,
    error::{PipelineError, Result},
};

pub type Row = Vec<Option<Value>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Builds a table, padding short rows with empty cells and dropping
    /// cells beyond the header count.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Row>) -> Self {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn push_row(&mut self, mut row: Row) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|header| header == name)
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| PipelineError::MissingField {
                column: name.to_string(),
            })
    }

    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        for name in names {
            self.column_index(name)?;
        }
        Ok(())
    }

    pub fn cell(&self, row: usize, name: &str) -> Result<Option<&Value>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.get(row).and_then(|r| r[idx].as_ref()))
    }

    pub fn column_values(&self, name: &str) -> Result<Vec<Option<&Value>>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row[idx].as_ref()).collect())
    }

    pub fn float_column(&self, name: &str) -> Result<Vec<f64>> {
        self.typed_column(name, "float", Value::as_f64)
    }

    pub fn integer_column(&self, name: &str) -> Result<Vec<i64>> {
        self.typed_column(name, "integer", Value::as_i64)
    }

    pub fn datetime_column(&self, name: &str) -> Result<Vec<NaiveDateTime>> {
        self.typed_column(name, "datetime", |value| value.as_datetime().copied())
    }

    fn typed_column<T>(
        &self,
        name: &str,
        expected: &'static str,
        extract: impl Fn(&Value) -> Option<T>,
    ) -> Result<Vec<T>> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells[idx]
                    .as_ref()
                    .and_then(&extract)
                    .ok_or_else(|| PipelineError::UnexpectedType {
                        column: name.to_string(),
                        row,
                        expected,
                    })
            })
            .collect()
    }

    /// Rewrites every cell of an existing column in place.
    pub fn map_column<F>(mut self, name: &str, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, Option<Value>) -> Result<Option<Value>>,
    {
        let idx = self.column_index(name)?;
        for (row, cells) in self.rows.iter_mut().enumerate() {
            let current = cells[idx].take();
            cells[idx] = f(row, current)?;
        }
        Ok(self)
    }

    /// Appends a column, or replaces its values when the name already exists.
    pub fn with_column(mut self, name: &str, values: Vec<Option<Value>>) -> Self {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.headers.iter().position(|header| header == name) {
            Some(idx) => {
                for (cells, value) in self.rows.iter_mut().zip(values) {
                    cells[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (cells, value) in self.rows.iter_mut().zip(values) {
                    cells.push(value);
                }
            }
        }
        self
    }

    pub fn retain_rows<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&Row) -> bool,
    {
        self.rows.retain(|row| keep(row));
        self
    }

    /// Stable reorder of the rows.
    pub fn sort_rows_by<F>(mut self, compare: F) -> Self
    where
        F: FnMut(&Row, &Row) -> Ordering,
    {
        self.rows.sort_by(compare);
        self
    }
}

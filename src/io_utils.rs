//! Load and persist boundaries of the pipeline.
//!
//! - **Load**: a JSON document becomes a [`Table`]. Three layouts are
//!   accepted: an array of record objects, an object of parallel column
//!   arrays, and an object of columns keyed by row label.
//! - **Persist**: a [`Table`] becomes a comma-separated file with a header
//!   row and no index column. Output goes to a `.partial` sibling first and
//!   is renamed into place once fully flushed, so a failed run leaves no CSV.
//! - The `-` path reads stdin or writes stdout.

use std::{
    ffi::OsString,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use csv::QuoteStyle;
use itertools::Itertools;
use serde_json::{Map, Value as JsonValue};

use crate::{
    coerce::REQUIRED_FIELDS,
    data::{self, Value},
    error::PipelineError,
    table::{Row, Table},
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn load_json_table(path: &Path) -> Result<Table> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    let document: JsonValue = serde_json::from_reader(reader)
        .with_context(|| format!("Parsing JSON from {path:?}"))?;
    let table = table_from_json(document)?;
    table
        .require_columns(REQUIRED_FIELDS)
        .with_context(|| format!("Validating fields of {path:?}"))?;
    Ok(table)
}

pub fn table_from_json(document: JsonValue) -> Result<Table, PipelineError> {
    match document {
        JsonValue::Array(records) => table_from_records(records),
        JsonValue::Object(columns) if columns.values().all(JsonValue::is_array) => {
            table_from_column_arrays(columns)
        }
        JsonValue::Object(columns) if columns.values().all(JsonValue::is_object) => {
            table_from_labelled_columns(columns)
        }
        JsonValue::Object(_) => Err(PipelineError::UnsupportedLayout(
            "object values must be all arrays or all objects".to_string(),
        )),
        other => Err(PipelineError::UnsupportedLayout(format!(
            "expected an array or object, found {}",
            json_kind(&other)
        ))),
    }
}

fn table_from_records(records: Vec<JsonValue>) -> Result<Table, PipelineError> {
    let mut objects = Vec::with_capacity(records.len());
    for (idx, record) in records.into_iter().enumerate() {
        match record {
            JsonValue::Object(map) => objects.push(map),
            other => {
                return Err(PipelineError::UnsupportedLayout(format!(
                    "record {idx} is {}, not an object",
                    json_kind(&other)
                )));
            }
        }
    }
    let headers = objects
        .iter()
        .flat_map(|map| map.keys().cloned())
        .unique()
        .collect::<Vec<_>>();
    let mut table = Table::new(headers.clone());
    for mut map in objects {
        let row = headers
            .iter()
            .map(|header| map.remove(header).and_then(json_to_cell))
            .collect();
        table.push_row(row);
    }
    Ok(table)
}

fn table_from_column_arrays(columns: Map<String, JsonValue>) -> Result<Table, PipelineError> {
    let mut headers = Vec::with_capacity(columns.len());
    let mut cells: Vec<Vec<JsonValue>> = Vec::with_capacity(columns.len());
    for (name, values) in columns {
        if let JsonValue::Array(values) = values {
            headers.push(name);
            cells.push(values);
        }
    }
    let row_count = cells.first().map_or(0, Vec::len);
    if let Some(idx) = cells.iter().position(|values| values.len() != row_count) {
        return Err(PipelineError::UnsupportedLayout(format!(
            "column '{}' has {} value(s) but '{}' has {row_count}",
            headers[idx],
            cells[idx].len(),
            headers[0]
        )));
    }
    let mut rows: Vec<Row> = (0..row_count).map(|_| Vec::with_capacity(headers.len())).collect();
    for values in cells {
        for (row, value) in rows.iter_mut().zip(values) {
            row.push(json_to_cell(value));
        }
    }
    Ok(Table::from_rows(headers, rows))
}

fn table_from_labelled_columns(columns: Map<String, JsonValue>) -> Result<Table, PipelineError> {
    let mut headers = Vec::with_capacity(columns.len());
    let mut maps = Vec::with_capacity(columns.len());
    for (name, values) in columns {
        if let JsonValue::Object(map) = values {
            headers.push(name);
            maps.push(map);
        }
    }
    let labels = maps
        .iter()
        .flat_map(|map| map.keys().cloned())
        .unique()
        .collect::<Vec<_>>();
    let rows = labels
        .iter()
        .map(|label| {
            maps.iter_mut()
                .map(|map| map.remove(label).and_then(json_to_cell))
                .collect::<Row>()
        })
        .collect();
    Ok(Table::from_rows(headers, rows))
}

fn json_to_cell(value: JsonValue) -> Option<Value> {
    match value {
        JsonValue::Null => None,
        JsonValue::Bool(b) => Some(Value::Boolean(b)),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Some(Value::Integer(i)),
            None => n.as_f64().map(Value::Float),
        },
        JsonValue::String(s) => Some(Value::String(s)),
        nested @ (JsonValue::Array(_) | JsonValue::Object(_)) => {
            Some(Value::String(nested.to_string()))
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Renders every cell as CSV text. Date/time columns drop the time part when
/// every value in the column falls on midnight.
pub fn render_rows(table: &Table) -> Vec<Vec<String>> {
    let date_only = (0..table.column_count())
        .map(|idx| {
            let mut datetimes = table
                .rows()
                .iter()
                .filter_map(|row| row[idx].as_ref().and_then(Value::as_datetime))
                .peekable();
            datetimes.peek().is_some() && datetimes.all(data::is_midnight)
        })
        .collect::<Vec<_>>();
    table
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .zip(&date_only)
                .map(|(cell, date_only)| match cell {
                    None => String::new(),
                    Some(Value::DateTime(dt)) => data::format_datetime(dt, *date_only),
                    Some(value) => value.as_display(),
                })
                .collect()
        })
        .collect()
}

pub fn open_csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(DEFAULT_CSV_DELIMITER)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true);
    builder.from_writer(writer)
}

pub fn write_table<W: Write>(writer: &mut csv::Writer<W>, table: &Table) -> Result<()> {
    writer
        .write_record(table.headers())
        .context("Writing output headers")?;
    for (idx, record) in render_rows(table).iter().enumerate() {
        writer
            .write_record(record)
            .with_context(|| format!("Writing output row {}", idx + 2))?;
    }
    writer.flush().context("Flushing output writer")?;
    Ok(())
}

pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".partial");
    PathBuf::from(name)
}

pub fn save_table_csv(table: &Table, path: &Path) -> Result<()> {
    if is_dash(path) {
        let mut writer = open_csv_writer(io::stdout().lock());
        return write_table(&mut writer, table);
    }
    let staging = partial_path(path);
    let outcome = File::create(&staging)
        .with_context(|| format!("Creating output file {staging:?}"))
        .and_then(|file| {
            let mut writer = open_csv_writer(BufWriter::new(file));
            write_table(&mut writer, table)
        })
        .and_then(|()| {
            fs::rename(&staging, path)
                .with_context(|| format!("Moving {staging:?} into place at {path:?}"))
        });
    if outcome.is_err() {
        let _ = fs::remove_file(&staging);
    }
    outcome
}

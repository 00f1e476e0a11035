#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use order_pipeline::coerce::convert_data_types;
use order_pipeline::io_utils::table_from_json;
use order_pipeline::table::Table;
use serde_json::{Value as JsonValue, json};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Serialises `orders` as a JSON array under the workspace.
    pub fn write_orders(&self, name: &str, orders: &[JsonValue]) -> PathBuf {
        let text = serde_json::to_string_pretty(orders).expect("serialise orders");
        self.write(name, &text)
    }
}

/// A raw order with unremarkable defaults for the fields a test does not vary.
pub fn order(id: i64, amount: &str, rating: f64, shipping_days: i64, country: &str) -> JsonValue {
    json!({
        "order_id": id,
        "total_amount": amount,
        "shipping_days": shipping_days,
        "customer_age": 30,
        "rating": rating,
        "order_date": "2024-01-10",
        "items_html": "<p>Widget</p>",
        "coupon_used": "SAVE10",
        "country": country,
    })
}

pub fn raw_table(orders: Vec<JsonValue>) -> Table {
    table_from_json(JsonValue::Array(orders)).expect("orders form a table")
}

pub fn coerced_table(orders: Vec<JsonValue>) -> Table {
    convert_data_types(raw_table(orders)).expect("orders coerce cleanly")
}

/// Display text of every cell in a column, empty cells as "".
pub fn column_text(table: &Table, name: &str) -> Vec<String> {
    table
        .column_values(name)
        .expect("column exists")
        .into_iter()
        .map(|cell| cell.map(|value| value.as_display()).unwrap_or_default())
        .collect()
}

pub fn order_ids(table: &Table) -> Vec<i64> {
    table.integer_column("order_id").expect("order ids")
}

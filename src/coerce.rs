//! Type coercion of the raw order fields loaded from JSON.

use anyhow::anyhow;
use log::debug;

use crate::{
    data::{
        Value, parse_currency_amount, parse_float, parse_integer_truncating,
        parse_order_datetime, truncate_to_i64,
    },
    error::{PipelineError, Result},
    table::Table,
};

pub const TOTAL_AMOUNT: &str = "total_amount";
pub const SHIPPING_DAYS: &str = "shipping_days";
pub const CUSTOMER_AGE: &str = "customer_age";
pub const RATING: &str = "rating";
pub const ORDER_DATE: &str = "order_date";
pub const ITEMS_HTML: &str = "items_html";
pub const COUPON_USED: &str = "coupon_used";
pub const COUNTRY: &str = "country";

pub const REQUIRED_FIELDS: &[&str] = &[
    TOTAL_AMOUNT,
    SHIPPING_DAYS,
    CUSTOMER_AGE,
    RATING,
    ORDER_DATE,
    ITEMS_HTML,
    COUPON_USED,
    COUNTRY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Currency,
    Integer,
    Float,
    DateTime,
}

impl Target {
    fn malformed(self, column: &str, row: usize, failure: Failure) -> PipelineError {
        let column = column.to_string();
        let Failure { value, reason } = failure;
        match self {
            Target::Currency => PipelineError::MalformedCurrency {
                column,
                row,
                value,
                reason,
            },
            Target::Integer => PipelineError::MalformedInteger {
                column,
                row,
                value,
                reason,
            },
            Target::Float => PipelineError::MalformedFloat {
                column,
                row,
                value,
                reason,
            },
            Target::DateTime => PipelineError::MalformedDate {
                column,
                row,
                value,
                reason,
            },
        }
    }
}

/// Raw text of a cell that failed to coerce, with the parser's explanation.
#[derive(Debug)]
struct Failure {
    value: String,
    reason: String,
}

const COERCIONS: &[(&str, Target)] = &[
    (TOTAL_AMOUNT, Target::Currency),
    (SHIPPING_DAYS, Target::Integer),
    (CUSTOMER_AGE, Target::Integer),
    (RATING, Target::Float),
    (ORDER_DATE, Target::DateTime),
];

/// Converts the amount, day count, age, rating and date columns to their
/// typed form. All other columns pass through untouched.
pub fn convert_data_types(table: Table) -> Result<Table> {
    let mut table = table;
    for (column, target) in COERCIONS {
        table = table.map_column(column, |row, cell| {
            coerce_cell(cell, *target)
                .map(Some)
                .map_err(|failure| target.malformed(column, row, failure))
        })?;
        debug!("Coerced column '{column}' to {target:?}");
    }
    Ok(table)
}

fn coerce_cell(cell: Option<Value>, target: Target) -> std::result::Result<Value, Failure> {
    let Some(value) = cell else {
        return Err(Failure {
            value: "null".to_string(),
            reason: "value is null".to_string(),
        });
    };
    let coerced = match (target, &value) {
        (Target::Currency, Value::String(s)) => parse_currency_amount(s).map(Value::Float),
        (Target::Float | Target::Currency, Value::Float(f)) => Ok(Value::Float(*f)),
        (Target::Float | Target::Currency, Value::Integer(i)) => Ok(Value::Float(*i as f64)),
        (Target::Float, Value::String(s)) => parse_float(s).map(Value::Float),
        (Target::Integer, Value::Integer(i)) => Ok(Value::Integer(*i)),
        (Target::Integer, Value::Float(f)) => truncate_to_i64(*f)
            .map(Value::Integer)
            .ok_or_else(|| anyhow!("{f} is out of range for a 64-bit integer")),
        (Target::Integer, Value::String(s)) => parse_integer_truncating(s).map(Value::Integer),
        (Target::DateTime, Value::DateTime(dt)) => Ok(Value::DateTime(*dt)),
        (Target::DateTime, Value::String(s)) => parse_order_datetime(s).map(Value::DateTime),
        (_, other) => Err(anyhow!("unsupported {} value", other.type_name())),
    };
    coerced.map_err(|err| Failure {
        value: value.as_display(),
        reason: format!("{err:#}"),
    })
}

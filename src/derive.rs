use std::{collections::HashMap, fmt};

use chrono::Datelike;
use log::debug;

use crate::{
    coerce::{COUNTRY, ORDER_DATE, RATING, SHIPPING_DAYS, TOTAL_AMOUNT},
    data::Value,
    error::{PipelineError, Result},
    table::Table,
};

pub const ORDER_MONTH: &str = "order_month";
pub const HIGH_VALUE_ORDER: &str = "high_value_order";
pub const AVERAGE_RATING_BY_COUNTRY: &str = "average_rating_by_country";
pub const DELIVERY_STATUS: &str = "delivery_status";

/// Orders shipping in more days than this are delayed.
pub const MAX_ON_TIME_SHIPPING_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    OnTime,
    Delayed,
}

impl DeliveryStatus {
    pub fn from_shipping_days(days: i64) -> Self {
        if days > MAX_ON_TIME_SHIPPING_DAYS {
            DeliveryStatus::Delayed
        } else {
            DeliveryStatus::OnTime
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::OnTime => "on time",
            DeliveryStatus::Delayed => "delayed",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn add_order_month(table: Table) -> Result<Table> {
    let months = table
        .datetime_column(ORDER_DATE)?
        .into_iter()
        .map(|date| Some(Value::Integer(i64::from(date.month()))))
        .collect();
    Ok(table.with_column(ORDER_MONTH, months))
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Flags orders above the mean amount of the table as it stands now.
pub fn add_high_value_order(table: Table) -> Result<Table> {
    let amounts = table.float_column(TOTAL_AMOUNT)?;
    let average = mean(&amounts).ok_or(PipelineError::EmptyDataset {
        stage: "flag high-value orders",
    })?;
    debug!("Mean {TOTAL_AMOUNT} across {} row(s): {average}", amounts.len());
    let flags = amounts
        .into_iter()
        .map(|amount| Some(Value::Boolean(amount > average)))
        .collect();
    Ok(table.with_column(HIGH_VALUE_ORDER, flags))
}

/// Attaches the mean rating of each country to every order from it.
/// Orders without a country get an empty cell. Countries group by exact
/// value, so the number `1` and the text `"1"` are different countries.
pub fn add_average_rating_by_country(table: Table) -> Result<Table> {
    if table.is_empty() {
        return Err(PipelineError::EmptyDataset {
            stage: "average ratings by country",
        });
    }
    let ratings = table.float_column(RATING)?;
    let countries = table
        .column_values(COUNTRY)?
        .into_iter()
        .map(|cell| cell.map(|value| (value.type_name(), value.as_display())))
        .collect::<Vec<_>>();

    let mut totals: HashMap<&(&str, String), (f64, usize)> = HashMap::new();
    for (country, rating) in countries.iter().zip(&ratings) {
        if let Some(country) = country {
            let entry = totals.entry(country).or_insert((0.0, 0));
            entry.0 += rating;
            entry.1 += 1;
        }
    }
    debug!("Averaged {RATING} across {} country group(s)", totals.len());

    let averages = countries
        .iter()
        .map(|country| {
            country
                .as_ref()
                .and_then(|key| totals.get(key))
                .map(|(sum, count)| Value::Float(sum / *count as f64))
        })
        .collect();
    Ok(table.with_column(AVERAGE_RATING_BY_COUNTRY, averages))
}

pub fn add_delivery_status(table: Table) -> Result<Table> {
    let statuses = table
        .integer_column(SHIPPING_DAYS)?
        .into_iter()
        .map(|days| {
            Some(Value::String(
                DeliveryStatus::from_shipping_days(days).to_string(),
            ))
        })
        .collect();
    Ok(table.with_column(DELIVERY_STATUS, statuses))
}

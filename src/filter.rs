use log::debug;

use crate::{
    coerce::{RATING, TOTAL_AMOUNT},
    error::Result,
    table::Table,
};

pub const MIN_FILTER_AMOUNT: f64 = 1000.0;
pub const MIN_FILTER_RATING: f64 = 4.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Gt,
    Ge,
    Lt,
    Le,
}

impl ComparisonOperator {
    pub fn holds(self, left: f64, right: f64) -> bool {
        match self {
            ComparisonOperator::Gt => left > right,
            ComparisonOperator::Ge => left >= right,
            ComparisonOperator::Lt => left < right,
            ComparisonOperator::Le => left <= right,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    pub column: String,
    pub operator: ComparisonOperator,
    pub threshold: f64,
}

impl FilterCondition {
    pub fn new(column: &str, operator: ComparisonOperator, threshold: f64) -> Self {
        Self {
            column: column.to_string(),
            operator,
            threshold,
        }
    }
}

/// `total_amount > 1000` and `rating > 4.5`.
pub fn high_value_high_rating_conditions() -> Vec<FilterCondition> {
    vec![
        FilterCondition::new(TOTAL_AMOUNT, ComparisonOperator::Gt, MIN_FILTER_AMOUNT),
        FilterCondition::new(RATING, ComparisonOperator::Gt, MIN_FILTER_RATING),
    ]
}

/// Keeps rows satisfying every condition. Columns must already be floats.
pub fn filter_rows(table: Table, conditions: &[FilterCondition]) -> Result<Table> {
    let mut keep = vec![true; table.row_count()];
    for condition in conditions {
        let values = table.float_column(&condition.column)?;
        for (flag, value) in keep.iter_mut().zip(values) {
            *flag = *flag && condition.operator.holds(value, condition.threshold);
        }
    }
    let before = table.row_count();
    let mut verdicts = keep.into_iter();
    let table = table.retain_rows(|_| verdicts.next().unwrap_or(false));
    debug!("Filter kept {} of {before} row(s)", table.row_count());
    Ok(table)
}

pub fn filter_high_value_high_rating(table: Table) -> Result<Table> {
    filter_rows(table, &high_value_high_rating_conditions())
}

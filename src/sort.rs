use std::cmp::Ordering;

use log::debug;

use crate::{coerce::TOTAL_AMOUNT, error::Result, table::Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Asc)
    }

    fn apply(self, ord: Ordering) -> Ordering {
        if self.is_ascending() {
            ord
        } else {
            ord.reverse()
        }
    }
}

/// Stable sort on a float column; equal keys keep their current order.
pub fn sort_by_float_column(table: Table, column: &str, direction: SortDirection) -> Result<Table> {
    let idx = table.column_index(column)?;
    // Validates every cell up front so the comparator never sees a gap.
    table.float_column(column)?;
    debug!("Sorting {} row(s) by '{column}' ({direction:?})", table.row_count());
    Ok(table.sort_rows_by(|a, b| {
        let left = a[idx].as_ref().and_then(|v| v.as_f64()).unwrap_or(f64::NAN);
        let right = b[idx].as_ref().and_then(|v| v.as_f64()).unwrap_or(f64::NAN);
        direction.apply(left.partial_cmp(&right).unwrap_or(Ordering::Equal))
    }))
}

pub fn sort_by_total_amount(table: Table) -> Result<Table> {
    sort_by_float_column(table, TOTAL_AMOUNT, SortDirection::Desc)
}

use log::debug;

use crate::{
    coerce::{COUPON_USED, ITEMS_HTML},
    data::Value,
    error::Result,
    table::Table,
    transform::string_ops::{normalize_coupon, strip_html},
};

/// Strips markup from `items_html`, keeping the column name and position.
/// Non-text cells are left alone.
pub fn clean_items_html(table: Table) -> Result<Table> {
    let mut changed = 0usize;
    let table = table.map_column(ITEMS_HTML, |_, cell| {
        Ok(cell.map(|value| match value {
            Value::String(text) => {
                let cleaned = strip_html(&text).into_owned();
                if cleaned != text {
                    changed += 1;
                }
                Value::String(cleaned)
            }
            other => other,
        }))
    })?;
    debug!("Cleaned markup in {changed} '{ITEMS_HTML}' value(s)");
    Ok(table)
}

/// Replaces empty `coupon_used` strings with `no coupon`.
pub fn clean_coupon_column(table: Table) -> Result<Table> {
    let mut replaced = 0usize;
    let table = table.map_column(COUPON_USED, |_, cell| {
        Ok(cell.map(|value| match value {
            Value::String(text) if text.is_empty() => {
                replaced += 1;
                Value::String(normalize_coupon(&text).into_owned())
            }
            other => other,
        }))
    })?;
    debug!("Filled {replaced} empty '{COUPON_USED}' value(s)");
    Ok(table)
}

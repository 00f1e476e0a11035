//! Fixed, ordered sequence of table stages.
//!
//! Each [`Stage`] consumes the table produced by the previous one. Flagging
//! high-value orders and sorting by amount are separate stages, and both the
//! flag and the country averages are computed before the filter removes any
//! rows.

use log::debug;

use crate::{clean, coerce, derive, error::Result, filter, sort, table::Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ConvertDataTypes,
    CleanItemsHtml,
    CleanCouponColumn,
    AddOrderMonth,
    AddHighValueOrder,
    SortByTotalAmount,
    AddAverageRatingByCountry,
    FilterHighValueHighRating,
    AddDeliveryStatus,
}

impl Stage {
    pub const ORDERED: [Stage; 9] = [
        Stage::ConvertDataTypes,
        Stage::CleanItemsHtml,
        Stage::CleanCouponColumn,
        Stage::AddOrderMonth,
        Stage::AddHighValueOrder,
        Stage::SortByTotalAmount,
        Stage::AddAverageRatingByCountry,
        Stage::FilterHighValueHighRating,
        Stage::AddDeliveryStatus,
    ];

    pub fn description(self) -> &'static str {
        match self {
            Stage::ConvertDataTypes => "Converting data types",
            Stage::CleanItemsHtml => "Cleaning items_html column",
            Stage::CleanCouponColumn => "Cleaning coupon_used column",
            Stage::AddOrderMonth => "Adding order_month column",
            Stage::AddHighValueOrder => "Adding high_value_order column and sorting",
            Stage::SortByTotalAmount => "Sorting by total_amount (descending)",
            Stage::AddAverageRatingByCountry => "Adding average rating by country",
            Stage::FilterHighValueHighRating => {
                "Filtering orders (total_amount > 1000 AND rating > 4.5)"
            }
            Stage::AddDeliveryStatus => "Adding delivery_status column",
        }
    }

    /// Step number shown in progress output. Flagging and sorting share
    /// step 5.
    pub fn progress_step(self) -> usize {
        match self {
            Stage::ConvertDataTypes => 1,
            Stage::CleanItemsHtml => 2,
            Stage::CleanCouponColumn => 3,
            Stage::AddOrderMonth => 4,
            Stage::AddHighValueOrder | Stage::SortByTotalAmount => 5,
            Stage::AddAverageRatingByCountry => 6,
            Stage::FilterHighValueHighRating => 7,
            Stage::AddDeliveryStatus => 8,
        }
    }

    /// Whether this stage begins a new progress step.
    pub fn opens_step(self) -> bool {
        self != Stage::SortByTotalAmount
    }

    /// Progress line printed once the stage succeeds. The filter reports row
    /// counts instead.
    pub fn completion(self) -> Option<&'static str> {
        match self {
            Stage::ConvertDataTypes => Some("Data types converted successfully"),
            Stage::CleanItemsHtml => Some("HTML tags removed from items_html"),
            Stage::CleanCouponColumn => Some("Empty coupons replaced with 'no coupon'"),
            Stage::AddOrderMonth => Some("order_month column added"),
            Stage::AddHighValueOrder => None,
            Stage::SortByTotalAmount => {
                Some("high_value_order column added and data sorted by total_amount")
            }
            Stage::AddAverageRatingByCountry => Some("average_rating_by_country column added"),
            Stage::FilterHighValueHighRating => None,
            Stage::AddDeliveryStatus => Some("delivery_status column added"),
        }
    }

    pub fn apply(self, table: Table) -> Result<Table> {
        match self {
            Stage::ConvertDataTypes => coerce::convert_data_types(table),
            Stage::CleanItemsHtml => clean::clean_items_html(table),
            Stage::CleanCouponColumn => clean::clean_coupon_column(table),
            Stage::AddOrderMonth => derive::add_order_month(table),
            Stage::AddHighValueOrder => derive::add_high_value_order(table),
            Stage::SortByTotalAmount => sort::sort_by_total_amount(table),
            Stage::AddAverageRatingByCountry => derive::add_average_rating_by_country(table),
            Stage::FilterHighValueHighRating => filter::filter_high_value_high_rating(table),
            Stage::AddDeliveryStatus => derive::add_delivery_status(table),
        }
    }
}

/// Progress step of the CSV save that follows the last stage.
pub const SAVE_STEP: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    pub step: usize,
    pub stage: Stage,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns: usize,
}

/// Runs every stage in order, calling `observer` after each one completes.
/// Stops at the first failing stage.
pub fn run<F>(table: Table, mut observer: F) -> Result<Table>
where
    F: FnMut(&StageReport),
{
    let mut table = table;
    for (idx, stage) in Stage::ORDERED.into_iter().enumerate() {
        let rows_before = table.row_count();
        table = stage.apply(table)?;
        let report = StageReport {
            step: idx + 1,
            stage,
            rows_before,
            rows_after: table.row_count(),
            columns: table.column_count(),
        };
        debug!("{report:?}");
        observer(&report);
    }
    Ok(table)
}

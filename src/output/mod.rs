mod format;
mod overview;
mod period;
mod proposals;
mod today;

use serde::Serialize;

use crate::cli::SortOrder;
use crate::error::AppError;

pub(crate) use format::{MoneyUnit, NumberFormat};
pub(crate) use overview::{
    output_summary_json, print_centers, print_frequent, print_issues, print_location, print_route,
    print_summary,
};
pub(crate) use period::{output_period_json, print_period_table};
pub(crate) use proposals::print_proposals;
pub(crate) use today::{print_day_sheet, print_fuel_page, print_record};

/// Display settings shared by every table
#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions {
    pub(crate) order: SortOrder,
    pub(crate) use_color: bool,
    pub(crate) compact: bool,
    pub(crate) number_format: NumberFormat,
    pub(crate) unit: MoneyUnit,
}

/// Pretty JSON for any report
pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(AppError::Encode)
}

//! Core module - records, business days, aggregation and trip timing

mod aggregator;
mod audit;
mod business_day;
pub(crate) mod lenient;
mod pairing;
mod types;
mod views;

#[cfg(test)]
pub(crate) mod test_support;

pub(crate) use aggregator::{aggregate_periods, records_in, summarize, total_row};
pub(crate) use audit::{DataQualityIssue, audit};
pub(crate) use business_day::BusinessDay;
pub(crate) use pairing::{TripStatus, chronological, format_duration};
pub(crate) use types::{Period, PeriodFilter, PeriodRow, Record, RecordType, Summary};
pub(crate) use views::{
    Cumulative, DaySheet, Frequent, SubsidyUsage, cumulative, day_sheet, frequent_locations, fuel_page,
    subsidy_usage,
};

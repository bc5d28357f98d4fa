//! Aggregation of records into summaries and period tables
//!
//! Every grouping key comes from the statistical date, so a 02:00 delivery
//! lands in the previous business day's bucket.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::consts::DATE_FORMAT;
use crate::core::business_day::BusinessDay;
use crate::core::pairing::total_duration;
use crate::core::types::{Period, PeriodFilter, PeriodRow, Record, RecordType, Summary};

fn finite(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Summary card totals. Cancelled and trip-ended rows are left out entirely.
pub(crate) fn summarize<'a, I>(records: I) -> Summary
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut s = Summary::default();
    for r in records {
        if !r.kind.counts_toward_totals() {
            continue;
        }
        s.income += r.income;
        s.expense += r.cost;
        match r.kind {
            RecordType::FuelStop => {
                s.fuel_cost += r.cost;
                s.fuel_liters += finite(r.liters);
            }
            RecordType::Transport => {
                s.distance += finite(r.distance);
                s.trip_count += 1;
            }
            _ => {}
        }
    }
    s.net_income = s.income - s.expense;
    s
}

/// Records whose statistical date passes `filter`
pub(crate) fn records_in<'a>(
    records: &'a [Record],
    business_day: &BusinessDay,
    filter: PeriodFilter,
) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|r| filter.contains(business_day.of(r)))
        .collect()
}

/// Week number inside the month, counting from the week holding the 1st (Sunday-first)
pub(crate) fn week_of_month(date: NaiveDate) -> u32 {
    let first_offset = date
        .with_day(1)
        .map(|first| first.weekday().num_days_from_sunday())
        .unwrap_or(0);
    (date.day() + first_offset).div_ceil(7)
}

pub(crate) fn period_key(date: NaiveDate, period: Period) -> String {
    match period {
        Period::Day => date.format(DATE_FORMAT).to_string(),
        Period::Week => format!("{}-W{}", date.format("%Y-%m"), week_of_month(date)),
        Period::Month => date.format("%Y-%m").to_string(),
        Period::Year => date.format("%Y").to_string(),
    }
}

#[derive(Debug, Default)]
struct RowAccumulator<'a> {
    income: i64,
    expense: i64,
    fuel_cost: i64,
    distance: f64,
    trip_count: u32,
    first_day: Option<u32>,
    last_day: Option<u32>,
    records: Vec<&'a Record>,
}

impl<'a> RowAccumulator<'a> {
    fn add(&mut self, record: &'a Record, statistical_date: NaiveDate) {
        if record.kind == RecordType::FuelStop {
            self.fuel_cost += record.cost;
        } else if record.kind.counts_toward_totals() {
            self.income += record.income;
            self.expense += record.cost;
        }
        if record.kind == RecordType::Transport {
            self.distance += finite(record.distance);
            self.trip_count += 1;
        }
        let day = statistical_date.day();
        self.first_day = Some(self.first_day.map_or(day, |d| d.min(day)));
        self.last_day = Some(self.last_day.map_or(day, |d| d.max(day)));
        self.records.push(record);
    }

    fn into_row(self, key: String, period: Period) -> PeriodRow {
        PeriodRow {
            key,
            income: self.income,
            expense: self.expense,
            fuel_cost: self.fuel_cost,
            net: self.income - self.expense - self.fuel_cost,
            distance: self.distance,
            trip_count: self.trip_count,
            duration: total_duration(self.records),
            day_span: match (period, self.first_day, self.last_day) {
                (Period::Week, Some(a), Some(b)) => Some((a, b)),
                _ => None,
            },
        }
    }
}

/// Period table rows for records inside `filter`, ascending by key
pub(crate) fn aggregate_periods(
    records: &[Record],
    business_day: &BusinessDay,
    filter: PeriodFilter,
    period: Period,
) -> Vec<PeriodRow> {
    let mut buckets: BTreeMap<String, RowAccumulator<'_>> = BTreeMap::new();

    for record in records {
        let date = business_day.of(record);
        if !filter.contains(date) {
            continue;
        }
        buckets
            .entry(period_key(date, period))
            .or_default()
            .add(record, date);
    }

    buckets
        .into_iter()
        .map(|(key, acc)| acc.into_row(key, period))
        .collect()
}

/// Column totals of a period table
pub(crate) fn total_row(rows: &[PeriodRow]) -> PeriodRow {
    let mut total = PeriodRow {
        key: "TOTAL".to_string(),
        income: 0,
        expense: 0,
        fuel_cost: 0,
        net: 0,
        distance: 0.0,
        trip_count: 0,
        duration: chrono::TimeDelta::zero(),
        day_span: None,
    };
    for row in rows {
        total.income += row.income;
        total.expense += row.expense;
        total.fuel_cost += row.fuel_cost;
        total.net += row.net;
        total.distance += row.distance;
        total.trip_count += row.trip_count;
        total.duration += row.duration;
    }
    total
}

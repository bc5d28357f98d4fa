//! Derived views: the day sheet, running totals, fuel subsidy and favourites

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::core::aggregator::{records_in, summarize};
use crate::core::business_day::BusinessDay;
use crate::core::pairing::{TripStatus, chronological, trip_status};
use crate::core::types::{PeriodFilter, Record, RecordType, Summary, ratio};

/// One row of the day sheet
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DayEntry<'a> {
    pub(crate) record: &'a Record,
    /// Stamped on the calendar day after the statistical date
    pub(crate) next_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) timing: Option<TripStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct DaySheet<'a> {
    pub(crate) date: NaiveDate,
    pub(crate) entries: Vec<DayEntry<'a>>,
    pub(crate) summary: Summary,
}

/// Records of one statistical date with their trip timing.
///
/// Timing looks at the whole store so the last trip of the night is closed by
/// whatever came next, even on the following business day.
pub(crate) fn day_sheet<'a>(
    records: &'a [Record],
    business_day: &BusinessDay,
    date: NaiveDate,
) -> DaySheet<'a> {
    let ordered = chronological(records);
    let mut entries = Vec::new();

    for (index, &record) in ordered.iter().enumerate() {
        if record.kind == RecordType::TripEnded || business_day.of(record) != date {
            continue;
        }
        entries.push(DayEntry {
            record,
            next_day: record.date != date,
            timing: trip_status(&ordered, index),
        });
    }

    DaySheet {
        date,
        entries,
        summary: summarize(records_in(records, business_day, PeriodFilter::Date(date))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Cumulative {
    pub(crate) operating_days: usize,
    pub(crate) total_mileage: f64,
    pub(crate) net_income: i64,
}

/// Lifetime figures; `mileage_correction` covers kilometres driven before tracking began
pub(crate) fn cumulative(
    records: &[Record],
    business_day: &BusinessDay,
    mileage_correction: f64,
) -> Cumulative {
    let counted: Vec<&Record> = records
        .iter()
        .filter(|r| r.kind.counts_toward_totals())
        .collect();
    let days: BTreeSet<NaiveDate> = counted.iter().map(|r| business_day.of(r)).collect();
    let summary = summarize(counted.iter().copied());
    Cumulative {
        operating_days: days.len(),
        total_mileage: summary.distance + mileage_correction,
        net_income: summary.net_income,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubsidyUsage {
    pub(crate) year: i32,
    pub(crate) month: u32,
    pub(crate) limit_liters: f64,
    pub(crate) used_liters: f64,
    /// Share of the limit used, capped at 100
    pub(crate) percent: f64,
}

/// Fuel litres bought in the statistical month of `today` against the subsidy limit
pub(crate) fn subsidy_usage(
    records: &[Record],
    business_day: &BusinessDay,
    today: NaiveDate,
    limit_liters: f64,
) -> SubsidyUsage {
    let used: f64 = records
        .iter()
        .filter(|r| r.kind == RecordType::FuelStop)
        .filter(|r| {
            let d = business_day.of(r);
            d.year() == today.year() && d.month() == today.month()
        })
        .map(|r| if r.liters.is_finite() { r.liters } else { 0.0 })
        .sum();
    let percent = if limit_liters > 0.0 {
        (100.0 * ratio(used, limit_liters)).min(100.0)
    } else {
        0.0
    };
    SubsidyUsage {
        year: today.year(),
        month: today.month(),
        limit_liters,
        used_liters: used,
        percent,
    }
}

/// Fuel stops newest first, one page at a time
pub(crate) fn fuel_page(records: &[Record], page: usize, page_size: usize) -> Vec<&Record> {
    let mut fuel = chronological(records.iter().filter(|r| r.kind == RecordType::FuelStop));
    fuel.reverse();
    fuel.into_iter()
        .skip(page.saturating_mul(page_size))
        .take(page_size)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Frequent {
    pub(crate) from: Vec<(String, usize)>,
    pub(crate) to: Vec<(String, usize)>,
}

fn top_n(counts: HashMap<&str, usize>, n: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}

/// Most used pickup and drop-off names over the last `window` before `now`
pub(crate) fn frequent_locations(
    records: &[Record],
    now: NaiveDateTime,
    window: TimeDelta,
    n: usize,
) -> Frequent {
    let cutoff = (now - window).date();
    let mut from: HashMap<&str, usize> = HashMap::new();
    let mut to: HashMap<&str, usize> = HashMap::new();

    for r in records
        .iter()
        .filter(|r| r.kind.has_route() && r.date >= cutoff)
    {
        if !r.from.is_empty() {
            *from.entry(r.from.as_str()).or_default() += 1;
        }
        if !r.to.is_empty() {
            *to.entry(r.to.as_str()).or_default() += 1;
        }
    }

    Frequent {
        from: top_n(from, n),
        to: top_n(to, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{expense, fuel, record, trip};
    use crate::utils::{parse_date, parse_time};

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        d(date).and_time(parse_time(time).unwrap())
    }

    #[test]
    fn day_sheet_hides_trip_ended_and_flags_next_day() {
        let records = vec![
            trip(1, "2025-05-01", "21:00", "A", "B", 10.0, 50_000),
            trip(2, "2025-05-02", "01:30", "B", "C", 12.0, 60_000),
            record(3, "2025-05-02", "03:00", RecordType::TripEnded),
            trip(4, "2025-05-02", "09:00", "C", "A", 8.0, 40_000),
        ];
        let sheet = day_sheet(&records, &BusinessDay::default(), d("2025-05-01"));
        let ids: Vec<i64> = sheet.entries.iter().map(|e| e.record.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(!sheet.entries[0].next_day);
        assert!(sheet.entries[1].next_day);
        assert_eq!(sheet.summary.income, 110_000);
    }

    #[test]
    fn day_sheet_closes_trips_with_next_record() {
        let records = vec![
            trip(1, "2025-05-01", "09:00", "A", "B", 10.0, 50_000),
            record(2, "2025-05-01", "09:45", RecordType::TripEnded),
        ];
        let sheet = day_sheet(&records, &BusinessDay::default(), d("2025-05-01"));
        match sheet.entries[0].timing {
            Some(TripStatus::Completed { elapsed, .. }) => assert_eq!(elapsed.num_minutes(), 45),
            ref other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn day_sheet_last_trip_in_progress_and_fuel_untimed() {
        let records = vec![
            fuel(1, "2025-05-01", "08:00", 80_000, 50.0),
            trip(2, "2025-05-01", "09:00", "A", "B", 10.0, 50_000),
        ];
        let sheet = day_sheet(&records, &BusinessDay::default(), d("2025-05-01"));
        assert!(sheet.entries[0].timing.is_none());
        assert_eq!(sheet.entries[1].timing, Some(TripStatus::InProgress));
    }

    #[test]
    fn cumulative_counts_distinct_business_days() {
        let mut cancelled = trip(4, "2025-05-09", "10:00", "A", "B", 99.0, 99_000);
        cancelled.kind = RecordType::TripCancelled;
        let records = vec![
            trip(1, "2025-05-01", "09:00", "A", "B", 10.0, 50_000),
            trip(2, "2025-05-02", "02:00", "B", "C", 5.0, 20_000),
            expense(3, "2025-05-03", "12:00", 10_000),
            cancelled,
        ];
        let c = cumulative(&records, &BusinessDay::default(), 1000.0);
        assert_eq!(c.operating_days, 2);
        assert_eq!(c.total_mileage, 1015.0);
        assert_eq!(c.net_income, 60_000);
    }

    #[test]
    fn subsidy_usage_caps_and_guards_zero_limit() {
        let records = vec![
            fuel(1, "2025-05-01", "09:00", 100_000, 300.0),
            fuel(2, "2025-05-20", "09:00", 100_000, 300.0),
            // belongs to April 30
            fuel(3, "2025-05-01", "03:00", 50_000, 50.0),
        ];
        let bd = BusinessDay::default();
        let usage = subsidy_usage(&records, &bd, d("2025-05-15"), 500.0);
        assert_eq!(usage.used_liters, 600.0);
        assert_eq!(usage.percent, 100.0);

        let none = subsidy_usage(&records, &bd, d("2025-05-15"), 0.0);
        assert_eq!(none.percent, 0.0);
    }

    #[test]
    fn fuel_page_is_newest_first() {
        let records: Vec<Record> = (1..=12)
            .map(|i| fuel(i, &format!("2025-05-{i:02}"), "10:00", 1_000 * i, 10.0))
            .collect();
        let first = fuel_page(&records, 0, 10);
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].id, 12);
        let second = fuel_page(&records, 1, 10);
        let ids: Vec<i64> = second.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(fuel_page(&records, 5, 10).is_empty());
    }

    #[test]
    fn frequent_locations_ranks_recent_routes() {
        let records = vec![
            trip(1, "2025-05-10", "09:00", "평택", "이천", 1.0, 1),
            trip(2, "2025-05-11", "09:00", "평택", "오산", 1.0, 1),
            trip(3, "2025-05-12", "09:00", "용인", "이천", 1.0, 1),
            // too old
            trip(4, "2025-04-01", "09:00", "용인", "용인", 1.0, 1),
            fuel(5, "2025-05-12", "10:00", 1, 1.0),
        ];
        let f = frequent_locations(&records, at("2025-05-15", "12:00"), TimeDelta::days(14), 5);
        assert_eq!(f.from[0], ("평택".to_string(), 2));
        assert_eq!(f.from[1], ("용인".to_string(), 1));
        assert_eq!(f.to[0], ("이천".to_string(), 2));
        assert_eq!(f.to.len(), 2);
    }
}

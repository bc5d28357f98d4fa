//! Core data types
//!
//! Records as they are stored, and the summaries computed from them.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::core::lenient;

/// Kind of event a record describes.
///
/// Stored with the Korean labels used by existing data files; English names
/// are accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub(crate) enum RecordType {
    #[serde(rename = "화물운송", alias = "transport")]
    Transport,
    #[serde(rename = "대기", alias = "waiting")]
    Waiting,
    #[serde(rename = "운행취소", alias = "trip_cancelled")]
    TripCancelled,
    #[serde(rename = "운행종료", alias = "trip_ended")]
    TripEnded,
    #[serde(rename = "주유소", alias = "fuel")]
    FuelStop,
    #[serde(rename = "지출", alias = "expense")]
    GeneralExpense,
    #[serde(rename = "수입", alias = "income")]
    GeneralIncome,
    #[serde(rename = "소모품", alias = "supply")]
    Supply,
    #[serde(rename = "기타", alias = "other")]
    Other,
}

impl RecordType {
    pub(crate) fn label(self) -> &'static str {
        match self {
            RecordType::Transport => "화물운송",
            RecordType::Waiting => "대기",
            RecordType::TripCancelled => "운행취소",
            RecordType::TripEnded => "운행종료",
            RecordType::FuelStop => "주유소",
            RecordType::GeneralExpense => "지출",
            RecordType::GeneralIncome => "수입",
            RecordType::Supply => "소모품",
            RecordType::Other => "기타",
        }
    }

    /// Cancelled and ended markers carry no money in any total
    pub(crate) fn counts_toward_totals(self) -> bool {
        !matches!(self, RecordType::TripCancelled | RecordType::TripEnded)
    }

    /// Rows that get an implied end time from the following record
    pub(crate) fn is_timed_trip(self) -> bool {
        matches!(
            self,
            RecordType::Transport | RecordType::Waiting | RecordType::TripCancelled
        )
    }

    /// Records whose from/to names identify a route
    pub(crate) fn has_route(self) -> bool {
        matches!(self, RecordType::Transport | RecordType::Waiting)
    }
}

/// One trip or expense event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Record {
    pub(crate) id: i64,
    /// Insertion sequence; breaks ties between records stamped with the same minute
    #[serde(default)]
    pub(crate) seq: u64,
    pub(crate) date: NaiveDate,
    #[serde(with = "lenient::hhmm")]
    pub(crate) time: NaiveTime,
    #[serde(rename = "type")]
    pub(crate) kind: RecordType,
    #[serde(default, deserialize_with = "lenient::text")]
    pub(crate) from: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub(crate) to: String,
    #[serde(default, deserialize_with = "lenient::float")]
    pub(crate) distance: f64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub(crate) income: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub(crate) cost: i64,
    #[serde(default, deserialize_with = "lenient::float")]
    pub(crate) liters: f64,
    #[serde(default, deserialize_with = "lenient::float")]
    pub(crate) unit_price: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub(crate) brand: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub(crate) expense_item: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub(crate) supply_item: String,
    #[serde(default, deserialize_with = "lenient::float")]
    pub(crate) mileage: f64,
}

impl Record {
    pub(crate) fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Canonical chronological ordering key
    pub(crate) fn order_key(&self) -> (NaiveDate, NaiveTime, u64) {
        (self.date, self.time, self.seq)
    }

    /// Free-text description for non-trip rows
    pub(crate) fn item_label(&self) -> &str {
        [&self.expense_item, &self.supply_item, &self.brand]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Money, fuel and distance totals over a set of records
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Summary {
    pub(crate) income: i64,
    /// Every counted cost, fuel included
    pub(crate) expense: i64,
    pub(crate) net_income: i64,
    pub(crate) distance: f64,
    pub(crate) trip_count: u32,
    pub(crate) fuel_cost: i64,
    pub(crate) fuel_liters: f64,
}

impl Summary {
    /// Kilometres per litre, 0 when no fuel was recorded
    pub(crate) fn fuel_economy(&self) -> f64 {
        ratio(self.distance, self.fuel_liters)
    }

    /// Won spent per kilometre driven, 0 when nothing was driven
    pub(crate) fn cost_per_km(&self) -> f64 {
        ratio(self.expense as f64, self.distance)
    }
}

pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        numerator / denominator
    }
}

/// Grouping granularity for period tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Period::Day => "date",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

/// One row of a period table. Fuel is kept out of `expense` here and netted separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PeriodRow {
    pub(crate) key: String,
    pub(crate) income: i64,
    pub(crate) expense: i64,
    pub(crate) fuel_cost: i64,
    pub(crate) net: i64,
    pub(crate) distance: f64,
    pub(crate) trip_count: u32,
    #[serde(serialize_with = "serialize_minutes")]
    pub(crate) duration: TimeDelta,
    /// First and last statistical day-of-month in the bucket (week rows)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) day_span: Option<(u32, u32)>,
}

fn serialize_minutes<S>(duration: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_i64(duration.num_minutes())
}

/// Which statistical dates a query covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PeriodFilter {
    All,
    Year(i32),
    Month(i32, u32),
    Date(NaiveDate),
}

impl PeriodFilter {
    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        match *self {
            PeriodFilter::All => true,
            PeriodFilter::Year(y) => date.year() == y,
            PeriodFilter::Month(y, m) => date.year() == y && date.month() == m,
            PeriodFilter::Date(d) => date == d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn record_type_serializes_with_korean_label() {
        let json = serde_json::to_string(&RecordType::FuelStop).unwrap();
        assert_eq!(json, "\"주유소\"");
        assert_eq!(RecordType::FuelStop.label(), "주유소");
    }

    #[test]
    fn record_type_accepts_english_alias() {
        let t: RecordType = serde_json::from_str("\"transport\"").unwrap();
        assert_eq!(t, RecordType::Transport);
    }

    #[test]
    fn cancelled_and_ended_do_not_count() {
        assert!(!RecordType::TripCancelled.counts_toward_totals());
        assert!(!RecordType::TripEnded.counts_toward_totals());
        assert!(RecordType::FuelStop.counts_toward_totals());
        assert!(RecordType::Transport.counts_toward_totals());
    }

    #[test]
    fn legacy_record_reads_with_string_amounts() {
        let json = r#"{"id":1700000000000,"date":"2025-03-01","time":"02:10","type":"화물운송",
            "from":"평택센터","to":"이천","distance":"85","income":"150,000","cost":"",
            "liters":0,"unitPrice":0,"brand":"","expenseItem":"","supplyItem":"","mileage":0}"#;
        let r: Record = serde_json::from_str(json).unwrap();
        assert_eq!(r.kind, RecordType::Transport);
        assert_eq!(r.income, 150_000);
        assert_eq!(r.cost, 0);
        assert_eq!(r.distance, 85.0);
        assert_eq!(r.seq, 0);
        assert_eq!(r.time, NaiveTime::from_hms_opt(2, 10, 0).unwrap());
    }

    #[test]
    fn record_time_written_as_hh_mm() {
        let json = r#"{"id":1,"date":"2025-03-01","time":"09:05","type":"대기"}"#;
        let r: Record = serde_json::from_str(json).unwrap();
        let out = serde_json::to_value(&r).unwrap();
        assert_eq!(out["time"], "09:05");
        assert_eq!(out["type"], "대기");
        assert_eq!(out["expenseItem"], "");
    }

    #[test]
    fn record_with_bad_date_is_rejected() {
        let json = r#"{"id":1,"date":"2025-13-01","time":"09:05","type":"대기"}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }

    #[test]
    fn summary_ratios_guard_zero() {
        let s = Summary::default();
        assert_eq!(s.fuel_economy(), 0.0);
        assert_eq!(s.cost_per_km(), 0.0);

        let s = Summary {
            distance: 300.0,
            fuel_liters: 60.0,
            expense: 150_000,
            ..Default::default()
        };
        assert_eq!(s.fuel_economy(), 5.0);
        assert_eq!(s.cost_per_km(), 500.0);
    }

    #[test]
    fn period_filter_month() {
        let f = PeriodFilter::Month(2025, 3);
        assert!(f.contains(d(2025, 3, 1)));
        assert!(f.contains(d(2025, 3, 31)));
        assert!(!f.contains(d(2025, 2, 28)));
        assert!(!f.contains(d(2024, 3, 10)));
    }

    #[test]
    fn period_filter_year_and_date() {
        assert!(PeriodFilter::Year(2024).contains(d(2024, 12, 31)));
        assert!(!PeriodFilter::Year(2024).contains(d(2025, 1, 1)));
        assert!(PeriodFilter::Date(d(2025, 1, 1)).contains(d(2025, 1, 1)));
        assert!(!PeriodFilter::Date(d(2025, 1, 1)).contains(d(2025, 1, 2)));
        assert!(PeriodFilter::All.contains(d(1999, 1, 1)));
    }

    #[test]
    fn item_label_prefers_expense_item() {
        let json = r#"{"id":1,"date":"2025-03-01","time":"09:05","type":"지출","expenseItem":"세차","brand":"x"}"#;
        let r: Record = serde_json::from_str(json).unwrap();
        assert_eq!(r.item_label(), "세차");
    }
}

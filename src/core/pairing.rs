//! Trip timing
//!
//! A trip row has no explicit end: it ends when the next record starts.
//! "Next" always means next in canonical order `(date, time, seq)`, not file
//! position, so back-dated entries slot in where they belong.

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::core::{Record, RecordType};

/// Records sorted into canonical chronological order
pub(crate) fn chronological<'a, I>(records: I) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut sorted: Vec<&Record> = records.into_iter().collect();
    sorted.sort_by_key(|r| r.order_key());
    sorted
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub(crate) enum TripStatus {
    /// No later record yet
    InProgress,
    Completed {
        end: NaiveDateTime,
        #[serde(rename = "minutes", serialize_with = "minutes")]
        elapsed: TimeDelta,
    },
}

fn minutes<S>(d: &TimeDelta, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_i64(d.num_minutes())
}

impl TripStatus {
    /// Callers pass `start` and `end` in canonical order, so `elapsed` is never negative.
    pub(crate) fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        TripStatus::Completed {
            end,
            elapsed: end - start,
        }
    }
}

/// Timing of the trip row at `index` in `ordered`, or `None` for non-trip rows
pub(crate) fn trip_status(ordered: &[&Record], index: usize) -> Option<TripStatus> {
    let record = ordered.get(index)?;
    if !record.kind.is_timed_trip() {
        return None;
    }
    Some(match ordered.get(index + 1) {
        Some(next) => TripStatus::between(record.timestamp(), next.timestamp()),
        None => TripStatus::InProgress,
    })
}

/// Sum of gaps between consecutive records, skipping gaps that follow a trip-ended marker
pub(crate) fn total_duration<'a, I>(records: I) -> TimeDelta
where
    I: IntoIterator<Item = &'a Record>,
{
    let sorted = chronological(records);
    sorted
        .windows(2)
        .filter(|pair| pair[0].kind != RecordType::TripEnded)
        .map(|pair| pair[1].timestamp() - pair[0].timestamp())
        .fold(TimeDelta::zero(), |acc, gap| acc + gap)
}

/// "Xh Ym", floored to the minute
pub(crate) fn format_duration(duration: TimeDelta) -> String {
    let total = duration.num_minutes();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!("{sign}{}h {}m", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::record;

    #[test]
    fn chronological_uses_seq_as_tie_breaker() {
        let mut a = record(1, "2025-04-01", "09:00", RecordType::Transport);
        let mut b = record(2, "2025-04-01", "09:00", RecordType::Waiting);
        a.seq = 5;
        b.seq = 3;
        let sorted = chronological([&a, &b]);
        assert_eq!(sorted[0].id, 2);
        assert_eq!(sorted[1].id, 1);
    }

    #[test]
    fn chronological_ignores_insertion_position() {
        let late = record(1, "2025-04-01", "18:00", RecordType::Transport);
        let backdated = record(2, "2025-04-01", "08:00", RecordType::Transport);
        let records = vec![late, backdated];
        let sorted = chronological(&records);
        assert_eq!(sorted[0].id, 2);
    }

    #[test]
    fn forty_five_minute_trip() {
        let a = record(1, "2025-04-01", "09:00", RecordType::Transport);
        let b = record(2, "2025-04-01", "09:45", RecordType::Transport);
        let ordered = chronological([&a, &b]);
        let status = trip_status(&ordered, 0).unwrap();
        match status {
            TripStatus::Completed { elapsed, .. } => {
                assert_eq!(format_duration(elapsed), "0h 45m")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn last_trip_is_in_progress() {
        let a = record(1, "2025-04-01", "09:00", RecordType::Transport);
        let ordered = chronological([&a]);
        assert_eq!(trip_status(&ordered, 0), Some(TripStatus::InProgress));
    }

    #[test]
    fn non_trip_rows_have_no_status() {
        let a = record(1, "2025-04-01", "09:00", RecordType::FuelStop);
        let b = record(2, "2025-04-01", "10:00", RecordType::Transport);
        let ordered = chronological([&a, &b]);
        assert_eq!(trip_status(&ordered, 0), None);
        assert_eq!(trip_status(&ordered, 5), None);
    }

    #[test]
    fn backdated_record_closes_the_earlier_trip() {
        let mut late = record(1, "2025-04-01", "12:00", RecordType::Transport);
        let mut backdated = record(2, "2025-04-01", "09:00", RecordType::Transport);
        late.seq = 1;
        backdated.seq = 2;
        let ordered = chronological([&late, &backdated]);
        match trip_status(&ordered, 0).unwrap() {
            TripStatus::Completed { end, elapsed } => {
                assert_eq!(end, late.timestamp());
                assert_eq!(elapsed.num_minutes(), 180);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(trip_status(&ordered, 1), Some(TripStatus::InProgress));
    }

    #[test]
    fn trip_spans_midnight() {
        let a = record(1, "2025-04-01", "23:30", RecordType::Waiting);
        let b = record(2, "2025-04-02", "01:10", RecordType::Transport);
        let ordered = chronological([&a, &b]);
        match trip_status(&ordered, 0).unwrap() {
            TripStatus::Completed { elapsed, .. } => assert_eq!(elapsed.num_minutes(), 100),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn total_duration_skips_gap_after_trip_ended() {
        let records = vec![
            record(1, "2025-04-01", "09:00", RecordType::Transport),
            record(2, "2025-04-01", "09:45", RecordType::TripEnded),
            record(3, "2025-04-01", "13:00", RecordType::Transport),
            record(4, "2025-04-01", "14:15", RecordType::TripEnded),
        ];
        let total = total_duration(&records);
        assert_eq!(total.num_minutes(), 45 + 75);
    }

    #[test]
    fn total_duration_of_trip_ended_pair_is_zero() {
        let records = vec![
            record(1, "2025-04-01", "09:00", RecordType::TripEnded),
            record(2, "2025-04-01", "09:45", RecordType::Transport),
        ];
        assert_eq!(total_duration(&records), TimeDelta::zero());
    }

    #[test]
    fn total_duration_zero_for_zero_or_one_record() {
        assert_eq!(total_duration(&Vec::<Record>::new()), TimeDelta::zero());
        let one = vec![record(1, "2025-04-01", "09:00", RecordType::Transport)];
        assert_eq!(total_duration(&one), TimeDelta::zero());
    }

    #[test]
    fn total_duration_sorts_before_summing() {
        let records = vec![
            record(1, "2025-04-01", "11:00", RecordType::Transport),
            record(2, "2025-04-01", "09:00", RecordType::Transport),
        ];
        assert_eq!(total_duration(&records).num_minutes(), 120);
    }

    #[test]
    fn format_duration_hours_and_minutes() {
        assert_eq!(format_duration(TimeDelta::minutes(0)), "0h 0m");
        assert_eq!(format_duration(TimeDelta::minutes(125)), "2h 5m");
        assert_eq!(format_duration(TimeDelta::seconds(59 * 60 + 59)), "0h 59m");
        assert_eq!(format_duration(TimeDelta::minutes(-30)), "-0h 30m");
    }
}

//! Data-quality checks. Findings are reported, never fatal.

use chrono::TimeDelta;
use serde::Serialize;
use std::collections::HashSet;

use crate::core::pairing::chronological;
use crate::core::types::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub(crate) enum DataQualityIssue {
    /// Entered after record `after` but stamped `minutes` before it
    BackDated { id: i64, after: i64, minutes: i64 },
    /// A trip endpoint that is not a registered center
    UnknownCenter { id: i64, name: String },
}

impl std::fmt::Display for DataQualityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataQualityIssue::BackDated { id, after, minutes } => write!(
                f,
                "record {id}: entered after record {after} but stamped {minutes} min earlier"
            ),
            DataQualityIssue::UnknownCenter { id, name } => {
                write!(f, "record {id}: \"{name}\" is not a registered center")
            }
        }
    }
}

/// Scan `records` for back-dated entries and unregistered endpoints.
///
/// Back-dating is judged in insertion (`seq`) order. Timing itself always
/// uses canonical order, so a back-dated entry still pairs correctly.
///
/// Unknown-center findings are only produced once at least one center is
/// registered; an empty registry means the driver doesn't use one.
pub(crate) fn audit(records: &[Record], centers: &[String]) -> Vec<DataQualityIssue> {
    let mut issues = Vec::new();

    let mut entered: Vec<&Record> = records.iter().collect();
    entered.sort_by_key(|r| r.seq);
    for pair in entered.windows(2) {
        let gap = pair[1].timestamp() - pair[0].timestamp();
        if gap < TimeDelta::zero() {
            issues.push(DataQualityIssue::BackDated {
                id: pair[1].id,
                after: pair[0].id,
                minutes: -gap.num_minutes(),
            });
        }
    }

    let ordered = chronological(records);

    if !centers.is_empty() {
        let known: HashSet<String> = centers.iter().map(|c| c.to_lowercase()).collect();
        for record in &ordered {
            if !record.kind.has_route() {
                continue;
            }
            for name in [&record.from, &record.to] {
                if !name.is_empty() && !known.contains(&name.to_lowercase()) {
                    issues.push(DataQualityIssue::UnknownCenter {
                        id: record.id,
                        name: name.clone(),
                    });
                }
            }
        }
    }

    issues
}

//! Business-day resolution
//!
//! Drivers work past midnight, so a day's statistics run from the configured
//! start hour to the same hour on the next calendar day. Anything stamped
//! before that hour belongs to the previous date.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::core::Record;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BusinessDay {
    start: NaiveTime,
}

impl Default for BusinessDay {
    fn default() -> Self {
        BusinessDay {
            start: NaiveTime::from_hms_opt(crate::consts::DEFAULT_DAY_START_HOUR, 0, 0)
                .unwrap_or(NaiveTime::MIN),
        }
    }
}

impl BusinessDay {
    pub(crate) fn new(start_hour: u32) -> Result<Self, AppError> {
        NaiveTime::from_hms_opt(start_hour, 0, 0)
            .map(|start| BusinessDay { start })
            .ok_or(AppError::InvalidDayStartHour { hour: start_hour })
    }

    pub(crate) fn start_hour(&self) -> u32 {
        use chrono::Timelike;
        self.start.hour()
    }

    /// Statistical date of an event at `date` `time`
    pub(crate) fn statistical_date(&self, date: NaiveDate, time: NaiveTime) -> NaiveDate {
        if time < self.start {
            date.checked_sub_days(Days::new(1)).unwrap_or(date)
        } else {
            date
        }
    }

    pub(crate) fn of(&self, record: &Record) -> NaiveDate {
        self.statistical_date(record.date, record.time)
    }

    pub(crate) fn at(&self, moment: NaiveDateTime) -> NaiveDate {
        self.statistical_date(moment.date(), moment.time())
    }
}

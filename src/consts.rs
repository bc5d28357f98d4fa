/// Standard date format used throughout the codebase: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stored time-of-day format: "04:30"
pub(crate) const TIME_FORMAT: &str = "%H:%M";

/// Hour at which a new business day starts when nothing is configured
pub(crate) const DEFAULT_DAY_START_HOUR: u32 = 4;

/// Records shown per page in the fuel list
pub(crate) const FUEL_PAGE_SIZE: usize = 10;

/// Window and size of the frequent-location ranking
pub(crate) const FREQUENT_WINDOW_DAYS: i64 = 14;
pub(crate) const FREQUENT_TOP_N: usize = 5;

/// One 만원 in won
pub(crate) const WON_PER_MANWON: i64 = 10_000;

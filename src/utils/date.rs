use chrono::{NaiveDate, NaiveTime};

use crate::consts::{DATE_FORMAT, WON_PER_MANWON};
use crate::error::AppError;

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    let s = s.trim();
    // Try YYYYMMDD
    if s.len() == 8
        && let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d")
    {
        return Ok(d);
    }
    // Try YYYY-MM-DD
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(d);
    }
    Err(AppError::InvalidDate {
        input: s.to_string(),
    })
}

pub(crate) fn parse_time(s: &str) -> Result<NaiveTime, AppError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| AppError::InvalidTime {
            input: s.to_string(),
        })
}

/// Parse a won amount: "120000", "120,000", "120,000원", "12.5만" or "12.5만원"
pub(crate) fn parse_amount(s: &str) -> Result<i64, AppError> {
    let invalid = || AppError::InvalidAmount {
        input: s.to_string(),
    };
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    let (number, scale) = if let Some(rest) = cleaned.strip_suffix("만원") {
        (rest, WON_PER_MANWON)
    } else if let Some(rest) = cleaned.strip_suffix('만') {
        (rest, WON_PER_MANWON)
    } else {
        (cleaned.strip_suffix('원').unwrap_or(&cleaned), 1)
    };
    let value: f64 = number.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok((value * scale as f64).round() as i64)
}

/// Parse a non-negative decimal such as a distance or litre count
pub(crate) fn parse_decimal(s: &str) -> Result<f64, AppError> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(AppError::InvalidAmount {
            input: s.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(parse_date("20250309").unwrap(), expected);
        assert_eq!(parse_date("2025-03-09").unwrap(), expected);
        assert!(parse_date("2025/03/09").is_err());
    }

    #[test]
    fn parse_time_with_and_without_seconds() {
        assert_eq!(
            parse_time("09:45").unwrap(),
            NaiveTime::from_hms_opt(9, 45, 0).unwrap()
        );
        assert_eq!(
            parse_time("23:59:30").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 30).unwrap()
        );
        assert!(parse_time("24:00").is_err());
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn parse_amount_plain_and_grouped() {
        assert_eq!(parse_amount("120000").unwrap(), 120_000);
        assert_eq!(parse_amount("120,000").unwrap(), 120_000);
        assert_eq!(parse_amount("120,000원").unwrap(), 120_000);
    }

    #[test]
    fn parse_amount_manwon_suffix() {
        assert_eq!(parse_amount("12.5만").unwrap(), 125_000);
        assert_eq!(parse_amount("3만원").unwrap(), 30_000);
    }

    #[test]
    fn parse_amount_rejects_non_numeric_and_negative() {
        assert!(matches!(
            parse_amount("twelve"),
            Err(AppError::InvalidAmount { .. })
        ));
        assert!(parse_amount("-500").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn parse_decimal_distance() {
        assert_eq!(parse_decimal("1,035.5").unwrap(), 1035.5);
        assert!(parse_decimal("-1").is_err());
        assert!(parse_decimal("NaN").is_err());
    }
}

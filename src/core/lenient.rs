//! Forgiving deserializers for hand-edited or legacy data files
//!
//! Older exports stored amounts as form strings ("120,000", "") or left them
//! out entirely. A bad amount reads as zero instead of failing the record.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

fn number_from_text(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numeric reading of a JSON value; anything unreadable is 0
pub(crate) fn value_to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => number_from_text(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

pub(crate) fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| value_to_f64(&value).round() as i64),
        other => value_to_f64(other).round() as i64,
    })
}

pub(crate) fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value))
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// "HH:MM" time-of-day, with seconds kept when present
pub(crate) mod hhmm {
    use super::*;
    use chrono::Timelike;

    pub(crate) fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let fmt = if time.second() == 0 { "%H:%M" } else { "%H:%M:%S" };
        serializer.serialize_str(&time.format(fmt).to_string())
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        crate::utils::parse_time(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Amounts {
        #[serde(default, deserialize_with = "int")]
        income: i64,
        #[serde(default, deserialize_with = "float")]
        distance: f64,
        #[serde(default, deserialize_with = "text")]
        memo: String,
    }

    fn read(json: &str) -> Amounts {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn numbers_pass_through() {
        let a = read(r#"{"income": 120000, "distance": 35.5}"#);
        assert_eq!(a.income, 120000);
        assert_eq!(a.distance, 35.5);
    }

    #[test]
    fn strings_with_separators_are_parsed() {
        let a = read(r#"{"income": "120,000", "distance": "1,035.5"}"#);
        assert_eq!(a.income, 120000);
        assert_eq!(a.distance, 1035.5);
    }

    #[test]
    fn garbage_reads_as_zero() {
        let a = read(r#"{"income": "abc", "distance": null}"#);
        assert_eq!(a.income, 0);
        assert_eq!(a.distance, 0.0);
    }

    #[test]
    fn empty_string_and_missing_read_as_zero() {
        let a = read(r#"{"income": ""}"#);
        assert_eq!(a.income, 0);
        assert_eq!(a.distance, 0.0);
    }

    #[test]
    fn fractional_income_rounds() {
        assert_eq!(read(r#"{"income": 1999.6}"#).income, 2000);
    }

    #[test]
    fn text_accepts_null_and_numbers() {
        assert_eq!(read(r#"{"memo": null}"#).memo, "");
        assert_eq!(read(r#"{"memo": 7}"#).memo, "7");
    }
}

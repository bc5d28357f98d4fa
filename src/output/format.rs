use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, TableComponent,
    modifiers::UTF8_SOLID_INNER_BORDERS, presets::UTF8_FULL,
};

use crate::consts::WON_PER_MANWON;
use crate::error::AppError;

#[derive(Debug, Clone, Copy)]
pub(crate) struct NumberFormat {
    group_sep: char,
    decimal_sep: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            group_sep: ',',
            decimal_sep: '.',
        }
    }
}

impl NumberFormat {
    pub(crate) fn from_locale(locale: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = locale else {
            return Ok(NumberFormat::default());
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(NumberFormat::default());
        }
        let base = trimmed
            .split(['-', '_'])
            .next()
            .unwrap_or(trimmed)
            .to_ascii_lowercase();

        let format = match base.as_str() {
            "de" => NumberFormat {
                group_sep: '.',
                decimal_sep: ',',
            },
            "fr" | "ru" => NumberFormat {
                group_sep: ' ',
                decimal_sep: ',',
            },
            "en" | "ko" | "zh" => NumberFormat::default(),
            _ => {
                return Err(AppError::UnsupportedLocale {
                    input: trimmed.to_string(),
                });
            }
        };

        Ok(format)
    }
}

/// How money amounts are shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum MoneyUnit {
    #[default]
    Won,
    /// Ten-thousands of won, the unit drivers quote fares in
    Manwon,
}

pub(super) fn format_number(n: i64, format: NumberFormat) -> String {
    let (sign, digits) = if n < 0 {
        ("-", n.unsigned_abs().to_string())
    } else {
        ("", n.to_string())
    };
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(format.group_sep);
        }
        result.push(c);
    }
    let formatted: String = result.chars().rev().collect();
    format!("{sign}{formatted}")
}

/// Fixed-point decimal with grouped integer part
pub(super) fn format_decimal(value: f64, places: usize, format: NumberFormat) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let text = format!("{:.*}", places, value.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let int_value: i64 = int_part.parse().unwrap_or(0);
    let sign = if value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    let grouped = format_number(int_value, format);
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}{}{frac_part}", format.decimal_sep)
    }
}

/// Format number in compact form (K, M, B suffixes)
pub(super) fn format_compact(n: i64, format: NumberFormat) -> String {
    let (sign, value) = if n < 0 { ("-", n.unsigned_abs()) } else { ("", n as u64) };
    let (scaled, suffix) = if value >= 1_000_000_000 {
        (value as f64 / 1_000_000_000.0, "B")
    } else if value >= 1_000_000 {
        (value as f64 / 1_000_000.0, "M")
    } else if value >= 1_000 {
        (value as f64 / 1_000.0, "K")
    } else {
        return format!("{sign}{value}");
    };
    let mut s = format!("{scaled:.1}");
    if format.decimal_sep != '.' {
        s = s.replace('.', &format.decimal_sep.to_string());
    }
    format!("{sign}{s}{suffix}")
}

/// Money amount in the chosen unit; compact shortens won to K/M
pub(super) fn format_money(won: i64, unit: MoneyUnit, format: NumberFormat, compact: bool) -> String {
    match unit {
        MoneyUnit::Won if compact => format_compact(won, format),
        MoneyUnit::Won => format_number(won, format),
        MoneyUnit::Manwon => format_decimal(won as f64 / WON_PER_MANWON as f64, 2, format),
    }
}

pub(super) fn money_header(label: &str, unit: MoneyUnit) -> String {
    match unit {
        MoneyUnit::Won => label.to_string(),
        MoneyUnit::Manwon => format!("{label} (만원)"),
    }
}

pub(super) fn styled_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    let mut cell = Cell::new(text);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    if bold {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

pub(super) fn header_cell(text: &str, use_color: bool) -> Cell {
    let mut cell = Cell::new(text).add_attribute(Attribute::Bold);
    if use_color {
        cell = cell.fg(Color::Cyan);
    }
    cell
}

/// Replace the double-line header separator (╞═╪═╡) with single-line (├─┼─┤)
fn normalize_header_separator(table: &mut Table) {
    table.set_style(TableComponent::HeaderLines, '─');
    table.set_style(TableComponent::LeftHeaderIntersection, '├');
    table.set_style(TableComponent::MiddleHeaderIntersections, '┼');
    table.set_style(TableComponent::RightHeaderIntersection, '┤');
}

/// Create a table with the standard preset, inner borders, and normalized header separator.
pub(super) fn create_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    normalize_header_separator(&mut table);
    table
}

pub(super) fn right_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    let mut cell = Cell::new(text).set_alignment(CellAlignment::Right);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    if bold {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

/// `Some(color)` only when colours are on
pub(super) fn tint(color: Color, use_color: bool) -> Option<Color> {
    use_color.then_some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_with_commas() {
        let fmt = NumberFormat::default();
        assert_eq!(format_number(0, fmt), "0");
        assert_eq!(format_number(999, fmt), "999");
        assert_eq!(format_number(1000, fmt), "1,000");
        assert_eq!(format_number(1_234_567, fmt), "1,234,567");
    }

    #[test]
    fn format_number_negative() {
        let fmt = NumberFormat::default();
        assert_eq!(format_number(-1234, fmt), "-1,234");
        assert_eq!(format_number(i64::MIN, fmt), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn format_compact_units() {
        let fmt = NumberFormat::default();
        assert_eq!(format_compact(999, fmt), "999");
        assert_eq!(format_compact(1_500, fmt), "1.5K");
        assert_eq!(format_compact(2_500_000, fmt), "2.5M");
        assert_eq!(format_compact(-150_000, fmt), "-150.0K");
    }

    #[test]
    fn format_decimal_groups_and_rounds() {
        let fmt = NumberFormat::default();
        assert_eq!(format_decimal(1234.567, 2, fmt), "1,234.57");
        assert_eq!(format_decimal(85.0, 1, fmt), "85.0");
        assert_eq!(format_decimal(-0.001, 2, fmt), "0.00");
        assert_eq!(format_decimal(-12.5, 1, fmt), "-12.5");
        assert_eq!(format_decimal(f64::NAN, 1, fmt), "0.0");
        assert_eq!(format_decimal(42.4, 0, fmt), "42");
    }

    #[test]
    fn money_in_manwon() {
        let fmt = NumberFormat::default();
        assert_eq!(format_money(150_000, MoneyUnit::Manwon, fmt, false), "15.00");
        assert_eq!(format_money(1_234_500, MoneyUnit::Manwon, fmt, false), "123.45");
        assert_eq!(format_money(150_000, MoneyUnit::Won, fmt, false), "150,000");
        assert_eq!(format_money(150_000, MoneyUnit::Won, fmt, true), "150.0K");
        assert_eq!(money_header("Income", MoneyUnit::Manwon), "Income (만원)");
    }

    #[test]
    fn from_locale_variants() {
        let de = NumberFormat::from_locale(Some("de-DE")).unwrap();
        assert_eq!(format_decimal(1234.5, 1, de), "1.234,5");
        let fr = NumberFormat::from_locale(Some("fr")).unwrap();
        assert_eq!(format_number(1000, fr), "1 000");
        let ko = NumberFormat::from_locale(Some("ko_KR")).unwrap();
        assert_eq!(format_number(1000, ko), "1,000");
        assert_eq!(format_number(1000, NumberFormat::from_locale(None).unwrap()), "1,000");
        assert!(NumberFormat::from_locale(Some("ja")).is_err());
    }
}

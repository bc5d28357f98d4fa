use comfy_table::{Cell, Color};
use serde::Serialize;

use crate::core::{Cumulative, DataQualityIssue, Frequent, SubsidyUsage};
use crate::error::AppError;
use crate::output::TableOptions;
use crate::output::format::{
    create_styled_table, format_decimal, format_money, format_number, header_cell, right_cell,
    styled_cell, tint,
};
use crate::output::to_json;
use crate::store::{Location, RouteDefaults};

pub(crate) fn print_summary(cumulative: &Cumulative, subsidy: &SubsidyUsage, opts: TableOptions) {
    let c = opts.use_color;
    let nf = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![header_cell("Item", c), header_cell("Value", c)]);

    let net_color = if cumulative.net_income < 0 { Color::Red } else { Color::Green };
    table.add_row(vec![
        Cell::new("Operating days"),
        right_cell(&format_number(cumulative.operating_days as i64, nf), None, false),
    ]);
    table.add_row(vec![
        Cell::new("Total mileage (km)"),
        right_cell(&format_decimal(cumulative.total_mileage, 1, nf), None, false),
    ]);
    table.add_row(vec![
        Cell::new("Net income"),
        right_cell(
            &format_money(cumulative.net_income, opts.unit, nf, false),
            tint(net_color, c),
            true,
        ),
    ]);

    let subsidy_label = format!("Fuel subsidy {}-{:02}", subsidy.year, subsidy.month);
    let subsidy_value = if subsidy.limit_liters > 0.0 {
        format!(
            "{} / {} L ({}%)",
            format_decimal(subsidy.used_liters, 2, nf),
            format_decimal(subsidy.limit_liters, 0, nf),
            format_decimal(subsidy.percent, 1, nf)
        )
    } else {
        format!("{} L (no limit set)", format_decimal(subsidy.used_liters, 2, nf))
    };
    let subsidy_color = if subsidy.percent >= 100.0 {
        tint(Color::Red, c)
    } else {
        None
    };
    table.add_row(vec![
        Cell::new(subsidy_label),
        right_cell(&subsidy_value, subsidy_color, false),
    ]);

    println!("\n  Cumulative summary\n");
    println!("{table}");
}

#[derive(Serialize)]
struct SummaryReport<'a> {
    cumulative: &'a Cumulative,
    subsidy: &'a SubsidyUsage,
}

pub(crate) fn output_summary_json(
    cumulative: &Cumulative,
    subsidy: &SubsidyUsage,
) -> Result<String, AppError> {
    to_json(&SummaryReport {
        cumulative,
        subsidy,
    })
}

pub(crate) fn print_frequent(frequent: &Frequent, window_days: i64, opts: TableOptions) {
    if frequent.from.is_empty() && frequent.to.is_empty() {
        println!("No trips in the last {window_days} days.");
        return;
    }
    let c = opts.use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("#", c),
        header_cell("Pickup", c),
        header_cell("Count", c),
        header_cell("Drop-off", c),
        header_cell("Count", c),
    ]);
    let rows = frequent.from.len().max(frequent.to.len());
    for i in 0..rows {
        let (from, from_n) = frequent
            .from
            .get(i)
            .map_or((String::new(), String::new()), |(n, k)| (n.clone(), k.to_string()));
        let (to, to_n) = frequent
            .to
            .get(i)
            .map_or((String::new(), String::new()), |(n, k)| (n.clone(), k.to_string()));
        table.add_row(vec![
            right_cell(&(i + 1).to_string(), None, false),
            Cell::new(from),
            right_cell(&from_n, None, false),
            Cell::new(to),
            right_cell(&to_n, None, false),
        ]);
    }
    println!("\n  Frequent places (last {window_days} days)\n");
    println!("{table}");
}

pub(crate) fn print_route(from: &str, to: &str, route: &RouteDefaults, opts: TableOptions) {
    let nf = opts.number_format;
    let show = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    println!(
        "{from} -> {to}: income {}, distance {} km, cost {}",
        show(route.income.map(|v| format_money(v, opts.unit, nf, false))),
        show(route.distance.map(|v| format_decimal(v, 1, nf))),
        show(route.cost.map(|v| format_money(v, opts.unit, nf, false))),
    );
}

pub(crate) fn print_location(name: &str, location: Option<&Location>) {
    match location {
        None => println!("{name}: no saved address or memo"),
        Some(loc) => {
            println!("{name}");
            println!("  address: {}", loc.address.as_deref().unwrap_or("-"));
            println!("  memo:    {}", loc.memo.as_deref().unwrap_or("-"));
        }
    }
}

pub(crate) fn print_centers(centers: &[&str]) {
    if centers.is_empty() {
        println!("No centers registered.");
        return;
    }
    for name in centers {
        println!("{name}");
    }
    println!("\n  {} centers", centers.len());
}

pub(crate) fn print_issues(issues: &[DataQualityIssue], opts: TableOptions) {
    if issues.is_empty() {
        println!("No data-quality issues found.");
        return;
    }
    let mut table = create_styled_table();
    table.set_header(vec![header_cell("Issue", opts.use_color)]);
    for issue in issues {
        let color = match issue {
            DataQualityIssue::BackDated { .. } => tint(Color::Red, opts.use_color),
            DataQualityIssue::UnknownCenter { .. } => tint(Color::Yellow, opts.use_color),
        };
        table.add_row(vec![styled_cell(&issue.to_string(), color, false)]);
    }
    println!("{table}");
    println!("\n  {} issues\n", issues.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_json_nests_both_parts() {
        let cumulative = Cumulative {
            operating_days: 3,
            total_mileage: 1234.5,
            net_income: 450_000,
        };
        let subsidy = SubsidyUsage {
            year: 2025,
            month: 5,
            limit_liters: 600.0,
            used_liters: 150.0,
            percent: 25.0,
        };
        let v: serde_json::Value =
            serde_json::from_str(&output_summary_json(&cumulative, &subsidy).unwrap()).unwrap();
        assert_eq!(v["cumulative"]["operatingDays"], 3);
        assert_eq!(v["cumulative"]["netIncome"], 450_000);
        assert_eq!(v["subsidy"]["percent"], 25.0);
        assert_eq!(v["subsidy"]["limitLiters"], 600.0);
    }
}

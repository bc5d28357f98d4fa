use comfy_table::{Cell, Color};
use serde::Serialize;

use crate::cli::SortOrder;
use crate::core::{Period, PeriodRow, Summary, format_duration, total_row};
use crate::error::AppError;
use crate::output::TableOptions;
use crate::output::format::{
    create_styled_table, format_decimal, format_money, format_number, header_cell, money_header,
    right_cell, styled_cell, tint,
};
use crate::output::to_json;

fn period_title(period: Period) -> &'static str {
    match period {
        Period::Day => "Daily Earnings",
        Period::Week => "Weekly Earnings",
        Period::Month => "Monthly Earnings",
        Period::Year => "Yearly Earnings",
    }
}

fn ordered(rows: &[PeriodRow], order: SortOrder) -> Vec<&PeriodRow> {
    let mut sorted: Vec<&PeriodRow> = rows.iter().collect();
    if matches!(order, SortOrder::Desc) {
        sorted.reverse();
    }
    sorted
}

fn row_label(row: &PeriodRow) -> String {
    match row.day_span {
        Some((first, last)) if first == last => format!("{} ({first})", row.key),
        Some((first, last)) => format!("{} ({first}~{last})", row.key),
        None => row.key.clone(),
    }
}

fn build_header(period: Period, opts: &TableOptions) -> Vec<Cell> {
    let c = opts.use_color;
    let label = match period {
        Period::Day => "Date",
        Period::Week => "Week",
        Period::Month => "Month",
        Period::Year => "Year",
    };
    let money = |name: &str| header_cell(&money_header(name, opts.unit), c);
    if opts.compact {
        return vec![
            header_cell(label, c),
            header_cell("Trips", c),
            money("Income"),
            money("Net"),
        ];
    }
    vec![
        header_cell(label, c),
        header_cell("Trips", c),
        header_cell("Km", c),
        money("Income"),
        money("Expense"),
        money("Fuel"),
        money("Net"),
        header_cell("Duration", c),
    ]
}

fn add_row(table: &mut comfy_table::Table, label: &str, row: &PeriodRow, opts: &TableOptions, total: bool) {
    let nf = opts.number_format;
    let money = |won: i64| format_money(won, opts.unit, nf, opts.compact);
    let key_color = if total { tint(Color::Cyan, opts.use_color) } else { None };
    let net_color = if row.net < 0 { Color::Red } else { Color::Green };

    let mut cells = vec![
        styled_cell(label, key_color, total),
        right_cell(&format_number(i64::from(row.trip_count), nf), key_color, total),
    ];
    if !opts.compact {
        cells.push(right_cell(&format_decimal(row.distance, 0, nf), key_color, total));
    }
    cells.push(right_cell(&money(row.income), tint(Color::Green, opts.use_color), total));
    if !opts.compact {
        cells.push(right_cell(&money(row.expense), tint(Color::Red, opts.use_color), total));
        cells.push(right_cell(&money(row.fuel_cost), tint(Color::Red, opts.use_color), total));
    }
    cells.push(right_cell(&money(row.net), tint(net_color, opts.use_color), total));
    if !opts.compact {
        cells.push(right_cell(&format_duration(row.duration), key_color, total));
    }
    table.add_row(cells);
}

/// One-line figures under a table
pub(super) fn summary_line(summary: &Summary, opts: &TableOptions) -> String {
    let nf = opts.number_format;
    let money = |won: i64| format_money(won, opts.unit, nf, false);
    format!(
        "Income {} | Expense {} | Net {} | {} km | {} trips | {} km/L | {} won/km",
        money(summary.income),
        money(summary.expense),
        money(summary.net_income),
        format_decimal(summary.distance, 1, nf),
        summary.trip_count,
        format_decimal(summary.fuel_economy(), 2, nf),
        format_decimal(summary.cost_per_km(), 0, nf),
    )
}

pub(crate) fn print_period_table(
    rows: &[PeriodRow],
    period: Period,
    scope: &str,
    summary: &Summary,
    opts: TableOptions,
) {
    if rows.is_empty() {
        println!("No records for {scope}.");
        return;
    }

    let mut table = create_styled_table();
    table.set_header(build_header(period, &opts));
    for row in ordered(rows, opts.order) {
        add_row(&mut table, &row_label(row), row, &opts, false);
    }
    add_row(&mut table, "TOTAL", &total_row(rows), &opts, true);

    println!("\n  {} - {scope}\n", period_title(period));
    println!("{table}");
    println!("\n  {}\n", summary_line(summary, &opts));
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryReport<'a> {
    #[serde(flatten)]
    summary: &'a Summary,
    fuel_economy: f64,
    cost_per_km: f64,
}

impl<'a> From<&'a Summary> for SummaryReport<'a> {
    fn from(summary: &'a Summary) -> Self {
        SummaryReport {
            summary,
            fuel_economy: summary.fuel_economy(),
            cost_per_km: summary.cost_per_km(),
        }
    }
}

#[derive(Serialize)]
struct PeriodReport<'a> {
    period: &'static str,
    scope: &'a str,
    rows: Vec<&'a PeriodRow>,
    total: PeriodRow,
    summary: SummaryReport<'a>,
}

pub(crate) fn output_period_json(
    rows: &[PeriodRow],
    period: Period,
    scope: &str,
    summary: &Summary,
    order: SortOrder,
) -> Result<String, AppError> {
    to_json(&PeriodReport {
        period: period.label(),
        scope,
        rows: ordered(rows, order),
        total: total_row(rows),
        summary: summary.into(),
    })
}

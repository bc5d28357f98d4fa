use comfy_table::{Cell, Color};

use crate::consts::TIME_FORMAT;
use crate::core::{DaySheet, Record, RecordType, TripStatus, format_duration};
use crate::output::TableOptions;
use crate::output::format::{
    create_styled_table, format_decimal, format_money, header_cell, money_header, right_cell,
    styled_cell, tint,
};
use crate::output::period::summary_line;

/// "to" column text: the destination for trips, the item or brand otherwise
fn detail(record: &Record) -> &str {
    if record.kind.has_route() || record.kind == RecordType::TripCancelled {
        &record.to
    } else {
        record.item_label()
    }
}

fn timing_cells(timing: Option<&TripStatus>, use_color: bool) -> [Cell; 3] {
    match timing {
        None => [Cell::new(""), Cell::new(""), Cell::new("")],
        Some(TripStatus::InProgress) => [
            Cell::new(""),
            Cell::new(""),
            styled_cell("in progress", tint(Color::Yellow, use_color), false),
        ],
        Some(TripStatus::Completed { end, elapsed }) => [
            Cell::new(end.format(TIME_FORMAT).to_string()),
            right_cell(&format_duration(*elapsed), None, false),
            Cell::new("done"),
        ],
    }
}

pub(crate) fn print_day_sheet(sheet: &DaySheet<'_>, opts: TableOptions) {
    if sheet.entries.is_empty() {
        println!("No records for {}.", sheet.date);
        return;
    }
    let c = opts.use_color;
    let nf = opts.number_format;
    let money = |won: i64| format_money(won, opts.unit, nf, opts.compact);

    let mut table = create_styled_table();
    let mut header = vec![
        header_cell("ID", c),
        header_cell("Time", c),
        header_cell("Type", c),
        header_cell("From", c),
        header_cell("To / Item", c),
    ];
    if !opts.compact {
        header.push(header_cell("Km", c));
    }
    header.extend([
        header_cell(&money_header("Income", opts.unit), c),
        header_cell(&money_header("Cost", opts.unit), c),
    ]);
    if !opts.compact {
        header.extend([header_cell("End", c), header_cell("Duration", c)]);
    }
    header.push(header_cell("Status", c));
    table.set_header(header);

    for entry in &sheet.entries {
        let r = entry.record;
        let time = if entry.next_day {
            format!("{} (+1)", r.time.format(TIME_FORMAT))
        } else {
            r.time.format(TIME_FORMAT).to_string()
        };
        let dim = if r.kind == RecordType::TripCancelled {
            tint(Color::DarkGrey, c)
        } else {
            None
        };
        let mut row = vec![
            right_cell(&r.id.to_string(), None, false),
            styled_cell(&time, dim, false),
            styled_cell(r.kind.label(), dim, false),
            styled_cell(&r.from, dim, false),
            styled_cell(detail(r), dim, false),
        ];
        if !opts.compact {
            let km = if r.distance > 0.0 {
                format_decimal(r.distance, 1, nf)
            } else {
                String::new()
            };
            row.push(right_cell(&km, dim, false));
        }
        row.extend([
            right_cell(&money(r.income), dim.or(tint(Color::Green, c)), false),
            right_cell(&money(r.cost), dim.or(tint(Color::Red, c)), false),
        ]);
        let [end, duration, status] = timing_cells(entry.timing.as_ref(), c);
        if !opts.compact {
            row.extend([end, duration]);
        }
        row.push(status);
        table.add_row(row);
    }

    println!("\n  {} (business day)\n", sheet.date);
    println!("{table}");
    println!("\n  {}\n", summary_line(&sheet.summary, &opts));
}

pub(crate) fn print_fuel_page(records: &[&Record], page: usize, opts: TableOptions) {
    if records.is_empty() {
        println!("No fuel records on page {}.", page + 1);
        return;
    }
    let c = opts.use_color;
    let nf = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("ID", c),
        header_cell("Date", c),
        header_cell("Brand", c),
        header_cell("Liters", c),
        header_cell("Unit price", c),
        header_cell(&money_header("Cost", opts.unit), c),
    ]);
    for r in records {
        table.add_row(vec![
            right_cell(&r.id.to_string(), None, false),
            Cell::new(format!("{} {}", r.date, r.time.format(TIME_FORMAT))),
            Cell::new(&r.brand),
            right_cell(&format_decimal(r.liters, 2, nf), None, false),
            right_cell(&format_decimal(r.unit_price, 0, nf), None, false),
            right_cell(
                &format_money(r.cost, opts.unit, nf, false),
                tint(Color::Red, c),
                false,
            ),
        ]);
    }
    println!("\n  Fuel records (page {})\n", page + 1);
    println!("{table}");
}

/// One-line confirmation after a change
pub(crate) fn print_record(verb: &str, record: &Record, opts: TableOptions) {
    let nf = opts.number_format;
    let mut line = format!(
        "{verb} #{} {} {} {}",
        record.id,
        record.date,
        record.time.format(TIME_FORMAT),
        record.kind.label()
    );
    if !record.from.is_empty() || !record.to.is_empty() {
        line.push_str(&format!(" {} -> {}", record.from, record.to));
    } else if !record.item_label().is_empty() {
        line.push_str(&format!(" {}", record.item_label()));
    }
    if record.distance > 0.0 {
        line.push_str(&format!(" {} km", format_decimal(record.distance, 1, nf)));
    }
    if record.income != 0 {
        line.push_str(&format!(" +{}", format_money(record.income, opts.unit, nf, false)));
    }
    if record.cost != 0 {
        line.push_str(&format!(" -{}", format_money(record.cost, opts.unit, nf, false)));
    }
    println!("{line}");
}

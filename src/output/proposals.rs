use comfy_table::{Cell, Color};

use crate::output::TableOptions;
use crate::output::format::{
    create_styled_table, format_decimal, format_money, header_cell, right_cell, styled_cell, tint,
};
use crate::parser::{Endpoint, MatchSource, Proposal};
use crate::store::DataSet;

fn endpoint_cell(endpoint: &Endpoint, use_color: bool) -> Cell {
    match endpoint.source {
        MatchSource::Center => styled_cell(&endpoint.name, tint(Color::Green, use_color), false),
        MatchSource::Word => styled_cell(
            &format!("{}?", endpoint.name),
            tint(Color::Yellow, use_color),
            false,
        ),
    }
}

/// Whether `name` already has a saved address
fn address_note(data: &DataSet, name: &str) -> &'static str {
    if data.location(name).is_some_and(|l| l.has_address()) {
        "saved"
    } else {
        "needed"
    }
}

fn address_cell(p: &Proposal, data: &DataSet, use_color: bool) -> Cell {
    let from = address_note(data, &p.from.name);
    let to = address_note(data, &p.to.name);
    let color = if from == "saved" && to == "saved" {
        None
    } else {
        tint(Color::Yellow, use_color)
    };
    styled_cell(&format!("from: {from} / to: {to}"), color, false)
}

/// Proposals with any saved route values and address status. Nothing is recorded until `confirm`.
pub(crate) fn print_proposals(proposals: &[Proposal], data: &DataSet, opts: TableOptions) {
    if proposals.is_empty() {
        println!("No pickup/drop-off pairs found.");
        return;
    }
    let c = opts.use_color;
    let nf = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Line", c),
        header_cell("From", c),
        header_cell("To", c),
        header_cell("Saved route", c),
        header_cell("Address", c),
        header_cell("Text", c),
    ]);
    for p in proposals {
        let route = data.route(&p.from.name, &p.to.name);
        let saved = match (route.distance, route.income) {
            (None, None) => "-".to_string(),
            (distance, income) => format!(
                "{} km / {}",
                distance.map_or("?".to_string(), |d| format_decimal(d, 1, nf)),
                income.map_or("?".to_string(), |i| format_money(i, opts.unit, nf, false))
            ),
        };
        table.add_row(vec![
            right_cell(&p.line.to_string(), None, false),
            endpoint_cell(&p.from, c),
            endpoint_cell(&p.to, c),
            Cell::new(saved),
            address_cell(p, data, c),
            Cell::new(&p.text),
        ]);
    }
    println!("{table}");
    println!("\n  Names marked ? were guessed from leftover words.");
    println!("  Record one with: haulbook confirm --line <N>");
    println!("  Add missing addresses with --from-address / --to-address.\n");
}

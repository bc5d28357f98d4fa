use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use log::{debug, info, warn};
use serde::Serialize;

use crate::cli::{
    CenterCommands, Cli, Commands, LocationCommands, PeriodArgs, RecordFields, RecordKind,
    TextInput, TripKind,
};
use crate::config::default_data_file;
use crate::consts::{FREQUENT_TOP_N, FREQUENT_WINDOW_DAYS, FUEL_PAGE_SIZE};
use crate::core::{
    BusinessDay, Period, PeriodFilter, Record, RecordType, aggregate_periods, audit,
    cumulative, day_sheet, frequent_locations, fuel_page, records_in, subsidy_usage, summarize,
};
use crate::error::{AppError, StoreError};
use crate::output::{
    NumberFormat, TableOptions, output_period_json, output_summary_json, print_centers,
    print_day_sheet, print_frequent, print_fuel_page, print_issues, print_location,
    print_period_table, print_proposals, print_record, print_route, print_summary, to_json,
};
use crate::parser::parse_dispatch_text;
use crate::store::{Confirmation, DataSet, JsonStore, RecordDraft, RecordPatch};
use crate::utils::{Timezone, parse_amount, parse_date, parse_decimal, parse_time};

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) store: JsonStore,
    pub(crate) data: DataSet,
    pub(crate) business_day: BusinessDay,
    /// Wall-clock minute used for every "now" in this run
    pub(crate) now: NaiveDateTime,
    pub(crate) table: TableOptions,
    skipped: usize,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(cli: &'a Cli) -> Result<Self, AppError> {
        let timezone = Timezone::parse(cli.timezone.as_deref())?;
        let number_format = NumberFormat::from_locale(cli.locale.as_deref())?;
        let business_day = match cli.day_start_hour {
            Some(hour) => BusinessDay::new(hour)?,
            None => BusinessDay::default(),
        };
        let path = cli.data_file.clone().unwrap_or_else(default_data_file);
        let store = JsonStore::new(path);
        let loaded = store.load()?;
        if loaded.skipped > 0 {
            warn!(
                "{} unreadable records in {} were skipped",
                loaded.skipped,
                store.path().display()
            );
        }
        debug!(
            "Business day starts at {:02}:00; data file {}",
            business_day.start_hour(),
            store.path().display()
        );

        Ok(CommandContext {
            cli,
            store,
            data: loaded.data,
            business_day,
            now: timezone.now(),
            table: TableOptions {
                order: cli.sort_order(),
                use_color: cli.use_color(),
                compact: cli.compact,
                number_format,
                unit: cli.money_unit(),
            },
            skipped: loaded.skipped,
        })
    }

    /// Statistical date of "now"
    fn today(&self) -> NaiveDate {
        self.business_day.at(self.now)
    }

    /// Unreadable records would be lost by the next write
    fn keep_original(&mut self) -> Result<(), AppError> {
        if self.skipped > 0 {
            self.store.backup()?;
            self.skipped = 0;
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), AppError> {
        self.keep_original()?;
        self.store.save(&self.data)?;
        Ok(())
    }

    fn subsidy_limit(&self) -> f64 {
        self.cli.fuel_subsidy_limit().unwrap_or(self.data.subsidy)
    }

    fn mileage_correction(&self) -> f64 {
        self.cli.mileage_correction().unwrap_or(self.data.correction)
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", to_json(value)?);
    Ok(())
}

fn amount(value: Option<&str>) -> Result<Option<i64>, AppError> {
    value.map(parse_amount).transpose()
}

fn decimal(value: Option<&str>) -> Result<Option<f64>, AppError> {
    value.map(parse_decimal).transpose()
}

fn text(value: &Option<String>) -> Option<String> {
    value.as_ref().map(|v| v.trim().to_string())
}

/// All field values are validated before anything is built
fn patch_from(kind: Option<RecordType>, fields: &RecordFields) -> Result<RecordPatch, AppError> {
    Ok(RecordPatch {
        kind,
        from: text(&fields.from),
        to: text(&fields.to),
        distance: decimal(fields.distance.as_deref())?,
        income: amount(fields.income.as_deref())?,
        cost: amount(fields.cost.as_deref())?,
        liters: decimal(fields.liters.as_deref())?,
        unit_price: decimal(fields.unit_price.as_deref())?,
        brand: text(&fields.brand),
        expense_item: text(&fields.item),
        supply_item: text(&fields.supply),
        mileage: decimal(fields.mileage.as_deref())?,
    })
}

/// Draft from command-line fields. Route values not given are taken from the route tables.
fn draft_from(
    ctx: &CommandContext<'_>,
    kind: RecordType,
    at: NaiveDateTime,
    fields: &RecordFields,
) -> Result<RecordDraft, AppError> {
    let patch = patch_from(None, fields)?;
    let mut draft = RecordDraft::new(kind, at);
    if kind.has_route() {
        let saved = ctx.data.route(
            patch.from.as_deref().unwrap_or(""),
            patch.to.as_deref().unwrap_or(""),
        );
        draft.income = patch.income.or(saved.income).unwrap_or(0);
        draft.distance = patch.distance.or(saved.distance).unwrap_or(0.0);
        draft.cost = patch.cost.or(saved.cost).unwrap_or(0);
    } else {
        draft.income = patch.income.unwrap_or(0);
        draft.distance = patch.distance.unwrap_or(0.0);
        draft.cost = patch.cost.unwrap_or(0);
    }
    draft.from = patch.from.unwrap_or_default();
    draft.to = patch.to.unwrap_or_default();
    draft.liters = patch.liters.unwrap_or(0.0);
    draft.unit_price = patch.unit_price.unwrap_or(0.0);
    draft.brand = patch.brand.unwrap_or_default();
    draft.expense_item = patch.expense_item.unwrap_or_default();
    draft.supply_item = patch.supply_item.unwrap_or_default();
    draft.mileage = patch.mileage.unwrap_or(0.0);
    Ok(draft)
}

fn report_change(ctx: &CommandContext<'_>, verb: &str, record: &Record) -> Result<(), AppError> {
    if ctx.cli.json {
        print_json(record)
    } else {
        print_record(verb, record, ctx.table);
        Ok(())
    }
}

fn handle_today(ctx: &CommandContext<'_>, date: Option<&str>) -> Result<(), AppError> {
    let date = match date {
        Some(raw) => parse_date(raw)?,
        None => ctx.today(),
    };
    debug!(
        "{} records on business day {date}",
        ctx.data.by_statistical_date(&ctx.business_day, date).len()
    );
    let sheet = day_sheet(&ctx.data.records, &ctx.business_day, date);
    if ctx.cli.json {
        print_json(&sheet)
    } else {
        print_day_sheet(&sheet, ctx.table);
        Ok(())
    }
}

fn month_or_current(ctx: &CommandContext<'_>, args: &PeriodArgs) -> Result<(i32, u32), AppError> {
    let today = ctx.today();
    let month = args.month.unwrap_or(today.month());
    if !(1..=12).contains(&month) {
        return Err(AppError::InvalidMonth { month });
    }
    Ok((args.year.unwrap_or(today.year()), month))
}

fn handle_period(
    ctx: &CommandContext<'_>,
    period: Period,
    filter: PeriodFilter,
    scope: &str,
) -> Result<(), AppError> {
    let records = &ctx.data.records;
    let rows = aggregate_periods(records, &ctx.business_day, filter, period);
    let summary = summarize(records_in(records, &ctx.business_day, filter));
    if ctx.cli.json {
        println!(
            "{}",
            output_period_json(&rows, period, scope, &summary, ctx.table.order)?
        );
    } else {
        print_period_table(&rows, period, scope, &summary, ctx.table);
    }
    Ok(())
}

fn handle_summary(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let records = &ctx.data.records;
    let totals = cumulative(records, &ctx.business_day, ctx.mileage_correction());
    let subsidy = subsidy_usage(records, &ctx.business_day, ctx.today(), ctx.subsidy_limit());
    if ctx.cli.json {
        println!("{}", output_summary_json(&totals, &subsidy)?);
    } else {
        print_summary(&totals, &subsidy, ctx.table);
    }
    Ok(())
}

fn handle_fuel(ctx: &CommandContext<'_>, page: usize) -> Result<(), AppError> {
    let index = page.saturating_sub(1);
    let records = fuel_page(&ctx.data.records, index, FUEL_PAGE_SIZE);
    if ctx.cli.json {
        print_json(&records)
    } else {
        print_fuel_page(&records, index, ctx.table);
        Ok(())
    }
}

fn handle_add(
    ctx: &mut CommandContext<'_>,
    kind: RecordKind,
    date: Option<&str>,
    time: Option<&str>,
    fields: &RecordFields,
) -> Result<(), AppError> {
    let date = date.map(parse_date).transpose()?.unwrap_or(ctx.now.date());
    let time = time.map(parse_time).transpose()?.unwrap_or(ctx.now.time());
    let draft = draft_from(ctx, kind.into(), date.and_time(time), fields)?;
    let record = ctx.data.register(draft)?;
    info!(
        "Record {} counts toward business day {}",
        record.id,
        ctx.business_day.of(&record)
    );
    ctx.save()?;
    report_change(ctx, "Added", &record)
}

/// Trip shortcuts stamped with "now"; no distance is required
fn handle_shortcut(
    ctx: &mut CommandContext<'_>,
    kind: RecordType,
    fields: &RecordFields,
    verb: &str,
) -> Result<(), AppError> {
    let draft = draft_from(ctx, kind, ctx.now, fields)?;
    let record = ctx.data.add(draft);
    ctx.save()?;
    report_change(ctx, verb, &record)
}

fn handle_edit(
    ctx: &mut CommandContext<'_>,
    id: i64,
    kind: Option<RecordKind>,
    fields: &RecordFields,
) -> Result<(), AppError> {
    let patch = patch_from(kind.map(RecordType::from), fields)?;
    if patch.is_empty() {
        let record = ctx
            .data
            .get(id)
            .cloned()
            .ok_or(AppError::RecordNotFound { id })?;
        info!("Nothing to change for record {id}");
        return report_change(ctx, "Unchanged", &record);
    }
    let record = ctx.data.edit(id, patch)?;
    ctx.save()?;
    report_change(ctx, "Updated", &record)
}

fn handle_restamp(ctx: &mut CommandContext<'_>, id: i64) -> Result<(), AppError> {
    let record = ctx.data.restamp(id, ctx.now)?;
    ctx.save()?;
    report_change(ctx, "Restamped", &record)
}

fn handle_delete(ctx: &mut CommandContext<'_>, id: i64) -> Result<(), AppError> {
    let record = ctx.data.delete(id)?;
    ctx.save()?;
    report_change(ctx, "Deleted", &record)
}

fn read_text(input: &TextInput) -> Result<String, AppError> {
    let text = match &input.input {
        Some(path) => std::fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| StoreError::Read {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            buf
        }
    };
    if text.trim().is_empty() {
        return Err(AppError::EmptyInput);
    }
    Ok(text)
}

fn handle_parse(ctx: &CommandContext<'_>, input: &TextInput) -> Result<(), AppError> {
    let text = read_text(input)?;
    let proposals = parse_dispatch_text(&text, &ctx.data.centers);
    debug!("{} proposals from {} lines", proposals.len(), text.lines().count());
    if ctx.cli.json {
        print_json(&proposals)
    } else {
        print_proposals(&proposals, &ctx.data, ctx.table);
        Ok(())
    }
}

fn handle_confirm(
    ctx: &mut CommandContext<'_>,
    line: usize,
    input: &TextInput,
    edits: Confirmation,
) -> Result<(), AppError> {
    let text = read_text(input)?;
    let proposals = parse_dispatch_text(&text, &ctx.data.centers);
    let proposal = proposals
        .iter()
        .find(|p| p.line == line)
        .ok_or(AppError::NoProposal { line })?;
    let record = ctx.data.confirm(proposal, edits, ctx.now)?;
    ctx.save()?;
    report_change(ctx, "Added", &record)
}

fn handle_center(ctx: &mut CommandContext<'_>, command: &CenterCommands) -> Result<(), AppError> {
    match command {
        CenterCommands::Add { names } => {
            let mut added = 0;
            for name in names {
                if ctx.data.add_center(name)? {
                    added += 1;
                } else {
                    info!("Center {name} is already registered");
                }
            }
            ctx.save()?;
            println!("Registered {added} of {} centers.", names.len());
        }
        CenterCommands::Remove { name } => {
            if !ctx.data.remove_center(name) {
                println!("No center named {name}.");
                return Ok(());
            }
            ctx.save()?;
            println!("Removed {name}.");
        }
        CenterCommands::List { filter } => {
            let names = ctx.data.centers_matching(filter.as_deref());
            if ctx.cli.json {
                return print_json(&names);
            }
            print_centers(&names);
        }
    }
    Ok(())
}

fn handle_location(ctx: &mut CommandContext<'_>, command: &LocationCommands) -> Result<(), AppError> {
    match command {
        LocationCommands::Set {
            name,
            address,
            memo,
        } => {
            if !ctx
                .data
                .upsert_location(name, address.as_deref(), memo.as_deref())?
            {
                println!("Nothing to save: give --address and/or --memo.");
                return Ok(());
            }
            ctx.save()?;
            print_location(name, ctx.data.location(name));
        }
        LocationCommands::Show { name } => {
            let location = ctx.data.location(name);
            if ctx.cli.json {
                return print_json(&location);
            }
            print_location(name, location);
        }
    }
    Ok(())
}

fn handle_route(ctx: &CommandContext<'_>, from: &str, to: &str) -> Result<(), AppError> {
    let route = ctx.data.route(from.trim(), to.trim());
    if ctx.cli.json {
        print_json(&route)
    } else {
        print_route(from.trim(), to.trim(), &route, ctx.table);
        Ok(())
    }
}

fn handle_frequent(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let frequent = frequent_locations(
        &ctx.data.records,
        ctx.now,
        TimeDelta::days(FREQUENT_WINDOW_DAYS),
        FREQUENT_TOP_N,
    );
    if ctx.cli.json {
        print_json(&frequent)
    } else {
        print_frequent(&frequent, FREQUENT_WINDOW_DAYS, ctx.table);
        Ok(())
    }
}

fn handle_check(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let issues = audit(&ctx.data.records, &ctx.data.centers);
    for issue in &issues {
        warn!("{issue}");
    }
    if ctx.cli.json {
        print_json(&issues)
    } else {
        print_issues(&issues, ctx.table);
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Settings {
    fuel_subsidy_limit: f64,
    mileage_correction: f64,
}

fn handle_settings(
    ctx: &mut CommandContext<'_>,
    limit: Option<&str>,
    correction: Option<&str>,
) -> Result<(), AppError> {
    let limit = decimal(limit)?;
    let correction = decimal(correction)?;
    if limit.is_some() || correction.is_some() {
        if let Some(limit) = limit {
            ctx.data.subsidy = limit;
        }
        if let Some(correction) = correction {
            ctx.data.correction = correction;
        }
        ctx.save()?;
    }
    if ctx.cli.fuel_subsidy_limit().is_some() || ctx.cli.mileage_correction().is_some() {
        info!("Config file values override the stored settings");
    }
    let settings = Settings {
        fuel_subsidy_limit: ctx.subsidy_limit(),
        mileage_correction: ctx.mileage_correction(),
    };
    if ctx.cli.json {
        return print_json(&settings);
    }
    println!("Fuel subsidy limit: {} L/month", settings.fuel_subsidy_limit);
    println!("Mileage correction: {} km", settings.mileage_correction);
    Ok(())
}

fn handle_export(ctx: &CommandContext<'_>, path: &Path) -> Result<(), AppError> {
    ctx.store.export(&ctx.data, path)?;
    println!(
        "Exported {} records to {}",
        ctx.data.records.len(),
        path.display()
    );
    Ok(())
}

fn handle_import(ctx: &mut CommandContext<'_>, path: &Path) -> Result<(), AppError> {
    ctx.keep_original()?;
    let loaded = ctx.store.import(path)?;
    println!(
        "Imported {} records from {}{}",
        loaded.data.records.len(),
        path.display(),
        if loaded.skipped > 0 {
            format!(" ({} unreadable records skipped)", loaded.skipped)
        } else {
            String::new()
        }
    );
    ctx.data = loaded.data;
    Ok(())
}

/// Run one command against the loaded data
pub(crate) fn run_command(ctx: &mut CommandContext<'_>) -> Result<(), AppError> {
    let cli = ctx.cli;
    let today = Commands::Today { date: None };
    let command = cli.command.as_ref().unwrap_or(&today);

    match command {
        Commands::Today { date } => handle_today(ctx, date.as_deref()),
        Commands::Daily(args) => {
            let (year, month) = month_or_current(ctx, args)?;
            let scope = format!("{year}-{month:02}");
            handle_period(ctx, Period::Day, PeriodFilter::Month(year, month), &scope)
        }
        Commands::Weekly(args) => {
            let (year, month) = month_or_current(ctx, args)?;
            let scope = format!("{year}-{month:02}");
            handle_period(ctx, Period::Week, PeriodFilter::Month(year, month), &scope)
        }
        Commands::Monthly { year } => {
            let year = year.unwrap_or(ctx.today().year());
            handle_period(ctx, Period::Month, PeriodFilter::Year(year), &year.to_string())
        }
        Commands::Yearly => handle_period(ctx, Period::Year, PeriodFilter::All, "all years"),
        Commands::Summary => handle_summary(ctx),
        Commands::Fuel { page } => handle_fuel(ctx, *page),
        Commands::Add {
            kind,
            date,
            time,
            fields,
        } => handle_add(ctx, *kind, date.as_deref(), time.as_deref(), fields),
        Commands::Start { kind, fields } => {
            let kind = match kind {
                TripKind::Transport => RecordType::Transport,
                TripKind::Waiting => RecordType::Waiting,
            };
            handle_shortcut(ctx, kind, fields, "Started")
        }
        Commands::End => handle_shortcut(ctx, RecordType::TripEnded, &RecordFields::default(), "Ended"),
        Commands::Cancel { fields } => {
            handle_shortcut(ctx, RecordType::TripCancelled, fields, "Cancelled")
        }
        Commands::Edit { id, kind, fields } => handle_edit(ctx, *id, *kind, fields),
        Commands::Restamp { id } => handle_restamp(ctx, *id),
        Commands::Delete { id } => handle_delete(ctx, *id),
        Commands::Parse { input } => handle_parse(ctx, input),
        Commands::Confirm {
            line,
            input,
            from,
            to,
            from_address,
            from_memo,
            to_address,
            to_memo,
        } => {
            let edits = Confirmation {
                from: from.clone(),
                to: to.clone(),
                from_address: from_address.clone(),
                from_memo: from_memo.clone(),
                to_address: to_address.clone(),
                to_memo: to_memo.clone(),
            };
            handle_confirm(ctx, *line, input, edits)
        }
        Commands::Center { command } => handle_center(ctx, command),
        Commands::Location { command } => handle_location(ctx, command),
        Commands::Route { from, to } => handle_route(ctx, from, to),
        Commands::Frequent => handle_frequent(ctx),
        Commands::Check => handle_check(ctx),
        Commands::Settings {
            fuel_subsidy_limit,
            mileage_correction,
        } => handle_settings(
            ctx,
            fuel_subsidy_limit.as_deref(),
            mileage_correction.as_deref(),
        ),
        Commands::Export { path } => handle_export(ctx, path),
        Commands::Import { path } => handle_import(ctx, path),
    }
}

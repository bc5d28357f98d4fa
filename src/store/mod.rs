//! Record store - the records plus the lookup tables that travel with them
//!
//! [`DataSet`] is the in-memory form of the data file. Mutations validate
//! first and only then touch the data, so a failed command leaves it as it was.

mod file;

pub(crate) use file::JsonStore;

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{BusinessDay, Record, RecordType, chronological};
use crate::error::AppError;
use crate::parser::Proposal;

/// Saved details for a named place
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) memo: Option<String>,
}

impl Location {
    pub(crate) fn has_address(&self) -> bool {
        self.address.as_deref().is_some_and(|a| !a.trim().is_empty())
    }
}

/// Last values used on a route, for prefilling the next entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub(crate) struct RouteDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) income: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) cost: Option<i64>,
}

/// `"{from}-{to}"` key of the fare, distance and cost tables
pub(crate) fn route_key(from: &str, to: &str) -> String {
    format!("{from}-{to}")
}

/// A record to be created; id and seq are assigned by the store
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordDraft {
    pub(crate) at: NaiveDateTime,
    pub(crate) kind: RecordType,
    pub(crate) from: String,
    pub(crate) to: String,
    pub(crate) distance: f64,
    pub(crate) income: i64,
    pub(crate) cost: i64,
    pub(crate) liters: f64,
    pub(crate) unit_price: f64,
    pub(crate) brand: String,
    pub(crate) expense_item: String,
    pub(crate) supply_item: String,
    pub(crate) mileage: f64,
}

impl RecordDraft {
    pub(crate) fn new(kind: RecordType, at: NaiveDateTime) -> Self {
        RecordDraft {
            at,
            kind,
            from: String::new(),
            to: String::new(),
            distance: 0.0,
            income: 0,
            cost: 0,
            liters: 0.0,
            unit_price: 0.0,
            brand: String::new(),
            expense_item: String::new(),
            supply_item: String::new(),
            mileage: 0.0,
        }
    }

    fn into_record(self, id: i64, seq: u64) -> Record {
        Record {
            id,
            seq,
            date: self.at.date(),
            time: self.at.time(),
            kind: self.kind,
            from: self.from,
            to: self.to,
            distance: self.distance,
            income: self.income,
            cost: self.cost,
            liters: self.liters,
            unit_price: self.unit_price,
            brand: self.brand,
            expense_item: self.expense_item,
            supply_item: self.supply_item,
            mileage: self.mileage,
        }
    }
}

/// Field changes for an existing record. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RecordPatch {
    pub(crate) kind: Option<RecordType>,
    pub(crate) from: Option<String>,
    pub(crate) to: Option<String>,
    pub(crate) distance: Option<f64>,
    pub(crate) income: Option<i64>,
    pub(crate) cost: Option<i64>,
    pub(crate) liters: Option<f64>,
    pub(crate) unit_price: Option<f64>,
    pub(crate) brand: Option<String>,
    pub(crate) expense_item: Option<String>,
    pub(crate) supply_item: Option<String>,
    pub(crate) mileage: Option<f64>,
}

impl RecordPatch {
    pub(crate) fn is_empty(&self) -> bool {
        *self == RecordPatch::default()
    }

    fn apply(self, record: &mut Record) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }
        set(&mut record.kind, self.kind);
        set(&mut record.from, self.from);
        set(&mut record.to, self.to);
        set(&mut record.distance, self.distance);
        set(&mut record.income, self.income);
        set(&mut record.cost, self.cost);
        set(&mut record.liters, self.liters);
        set(&mut record.unit_price, self.unit_price);
        set(&mut record.brand, self.brand);
        set(&mut record.expense_item, self.expense_item);
        set(&mut record.supply_item, self.supply_item);
        set(&mut record.mileage, self.mileage);
    }
}

/// User corrections applied when accepting a parser proposal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Confirmation {
    pub(crate) from: Option<String>,
    pub(crate) to: Option<String>,
    pub(crate) from_address: Option<String>,
    pub(crate) from_memo: Option<String>,
    pub(crate) to_address: Option<String>,
    pub(crate) to_memo: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Every table of the data file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DataSet {
    pub(crate) records: Vec<Record>,
    pub(crate) centers: Vec<String>,
    pub(crate) locations: BTreeMap<String, Location>,
    pub(crate) fares: BTreeMap<String, i64>,
    pub(crate) distances: BTreeMap<String, f64>,
    pub(crate) costs: BTreeMap<String, i64>,
    pub(crate) expense_items: Vec<String>,
    /// Monthly fuel-subsidy limit in litres
    pub(crate) subsidy: f64,
    /// Kilometres driven before tracking began
    pub(crate) correction: f64,
}

impl DataSet {
    fn next_id(&self) -> i64 {
        self.records.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    fn next_seq(&self) -> u64 {
        self.records.iter().map(|r| r.seq).max().unwrap_or(0) + 1
    }

    pub(crate) fn get(&self, id: i64) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: i64) -> Result<&mut Record, AppError> {
        self.records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(AppError::RecordNotFound { id })
    }

    /// Store a new record and remember its route values
    pub(crate) fn add(&mut self, draft: RecordDraft) -> Record {
        let record = draft.into_record(self.next_id(), self.next_seq());
        if record.kind.has_route() {
            self.upsert_route(
                &record.from,
                &record.to,
                RouteDefaults {
                    income: Some(record.income),
                    distance: Some(record.distance),
                    cost: Some(record.cost),
                },
            );
        }
        if record.kind == RecordType::GeneralExpense {
            self.register_expense_item(&record.expense_item);
        }
        debug!("Added record {} ({})", record.id, record.kind.label());
        self.records.push(record.clone());
        record
    }

    /// Manual entry. Transport records must carry a distance.
    pub(crate) fn register(&mut self, draft: RecordDraft) -> Result<Record, AppError> {
        if draft.kind == RecordType::Transport && (!draft.distance.is_finite() || draft.distance <= 0.0) {
            return Err(AppError::MissingDistance);
        }
        Ok(self.add(draft))
    }

    /// Change fields of a record; its date and time stay as they were
    pub(crate) fn edit(&mut self, id: i64, patch: RecordPatch) -> Result<Record, AppError> {
        let record = self.get_mut(id)?;
        patch.apply(record);
        let record = record.clone();
        if record.kind == RecordType::Transport {
            self.upsert_route(
                &record.from,
                &record.to,
                RouteDefaults {
                    income: Some(record.income),
                    distance: Some(record.distance),
                    cost: None,
                },
            );
        }
        Ok(record)
    }

    /// Move a record to `now`. It sorts after anything already stamped that minute.
    pub(crate) fn restamp(&mut self, id: i64, now: NaiveDateTime) -> Result<Record, AppError> {
        let seq = self.next_seq();
        let record = self.get_mut(id)?;
        record.date = now.date();
        record.time = now.time();
        record.seq = seq;
        Ok(record.clone())
    }

    pub(crate) fn delete(&mut self, id: i64) -> Result<Record, AppError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(AppError::RecordNotFound { id })?;
        Ok(self.records.remove(index))
    }

    /// Records of one statistical date, in canonical order
    pub(crate) fn by_statistical_date(
        &self,
        business_day: &BusinessDay,
        date: NaiveDate,
    ) -> Vec<&Record> {
        chronological(self.records.iter().filter(|r| business_day.of(r) == date))
    }

    /// Saved values for a route; absent tables give `None`
    pub(crate) fn route(&self, from: &str, to: &str) -> RouteDefaults {
        let key = route_key(from, to);
        RouteDefaults {
            income: self.fares.get(&key).copied(),
            distance: self.distances.get(&key).copied(),
            cost: self.costs.get(&key).copied(),
        }
    }

    /// Remember route values. Only positive values are written.
    pub(crate) fn upsert_route(&mut self, from: &str, to: &str, values: RouteDefaults) {
        if from.is_empty() || to.is_empty() {
            return;
        }
        let key = route_key(from, to);
        if let Some(income) = values.income.filter(|v| *v > 0) {
            self.fares.insert(key.clone(), income);
        }
        if let Some(distance) = values.distance.filter(|v| v.is_finite() && *v > 0.0) {
            self.distances.insert(key.clone(), distance);
        }
        if let Some(cost) = values.cost.filter(|v| *v > 0) {
            self.costs.insert(key.clone(), cost);
        }
        debug!("Route {key} now {:?}", self.route(from, to));
    }

    /// Set address and/or memo for a place. Returns false when nothing was given.
    pub(crate) fn upsert_location(
        &mut self,
        name: &str,
        address: Option<&str>,
        memo: Option<&str>,
    ) -> Result<bool, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::MissingLocationName);
        }
        let (address, memo) = (non_empty(address), non_empty(memo));
        if address.is_none() && memo.is_none() {
            return Ok(false);
        }
        let location = self.locations.entry(name.to_string()).or_default();
        if let Some(address) = address {
            location.address = Some(address.to_string());
        }
        if let Some(memo) = memo {
            location.memo = Some(memo.to_string());
        }
        debug!("Location {name} updated");
        Ok(true)
    }

    pub(crate) fn location(&self, name: &str) -> Option<&Location> {
        self.locations.get(name.trim())
    }

    /// Register a center name. Returns false if it is already known (ignoring case).
    pub(crate) fn add_center(&mut self, name: &str) -> Result<bool, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::MissingLocationName);
        }
        let lower = name.to_lowercase();
        if self.centers.iter().any(|c| c.to_lowercase() == lower) {
            return Ok(false);
        }
        self.centers.push(name.to_string());
        Ok(true)
    }

    pub(crate) fn remove_center(&mut self, name: &str) -> bool {
        let lower = name.trim().to_lowercase();
        let before = self.centers.len();
        self.centers.retain(|c| c.to_lowercase() != lower);
        self.centers.len() != before
    }

    /// Centers containing `filter` (ignoring case), sorted by name
    pub(crate) fn centers_matching(&self, filter: Option<&str>) -> Vec<&str> {
        let needle = filter.map(|f| f.trim().to_lowercase()).unwrap_or_default();
        let mut names: Vec<&str> = self
            .centers
            .iter()
            .map(String::as_str)
            .filter(|c| c.to_lowercase().contains(&needle))
            .collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn register_expense_item(&mut self, item: &str) {
        let item = item.trim();
        if !item.is_empty() && !self.expense_items.iter().any(|i| i == item) {
            self.expense_items.push(item.to_string());
        }
    }

    /// Accept a parser proposal as a Transport record stamped `now`.
    ///
    /// Address and memo are saved only for places with no address on file.
    /// Distance and income come from the route tables.
    pub(crate) fn confirm(
        &mut self,
        proposal: &Proposal,
        edits: Confirmation,
        now: NaiveDateTime,
    ) -> Result<Record, AppError> {
        let from = non_empty(edits.from.as_deref())
            .unwrap_or(proposal.from.name.trim())
            .to_string();
        let to = non_empty(edits.to.as_deref())
            .unwrap_or(proposal.to.name.trim())
            .to_string();
        if from.is_empty() || to.is_empty() {
            return Err(AppError::MissingLocationName);
        }

        for (name, address, memo) in [
            (&from, &edits.from_address, &edits.from_memo),
            (&to, &edits.to_address, &edits.to_memo),
        ] {
            if self.location(name).is_some_and(Location::has_address) {
                debug!("Keeping existing address for {name}");
                continue;
            }
            self.upsert_location(name, address.as_deref(), memo.as_deref())?;
        }

        let saved = self.route(&from, &to);
        let mut draft = RecordDraft::new(RecordType::Transport, now);
        draft.distance = saved.distance.unwrap_or(0.0);
        draft.income = saved.income.unwrap_or(0);
        draft.from = from;
        draft.to = to;
        Ok(self.add(draft))
    }
}

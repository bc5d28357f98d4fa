//! JSON data file. The backup export uses the same document layout.

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use super::{DataSet, Location};
use crate::core::Record;
use crate::core::lenient::{self, value_to_f64};
use crate::error::StoreError;

/// The document as found on disk. Records stay raw so one bad entry can be skipped.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    records: Vec<Value>,
    #[serde(default)]
    centers: Vec<Value>,
    #[serde(default)]
    locations: BTreeMap<String, Value>,
    #[serde(default)]
    fares: BTreeMap<String, Value>,
    #[serde(default)]
    distances: BTreeMap<String, Value>,
    #[serde(default)]
    costs: BTreeMap<String, Value>,
    #[serde(default)]
    expense_items: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::float")]
    subsidy: f64,
    #[serde(default, deserialize_with = "lenient::float")]
    correction: f64,
}

/// Result of reading a document
#[derive(Debug, Default)]
pub(crate) struct Loaded {
    pub(crate) data: DataSet,
    /// Records that could not be read and were dropped
    pub(crate) skipped: usize,
}

fn names(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
        .collect()
}

fn amounts<T>(table: BTreeMap<String, Value>, convert: impl Fn(f64) -> T) -> BTreeMap<String, T> {
    table
        .into_iter()
        .map(|(key, value)| (key, value_to_f64(&value)))
        .filter(|(_, n)| *n > 0.0)
        .map(|(key, n)| (key, convert(n)))
        .collect()
}

impl RawDocument {
    fn into_loaded(self) -> Loaded {
        let mut skipped = 0;
        let mut records = Vec::with_capacity(self.records.len());
        for (index, raw) in self.records.into_iter().enumerate() {
            match serde_json::from_value::<Record>(raw) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Skipping record #{} in data file: {e}", index + 1);
                    skipped += 1;
                }
            }
        }
        assign_missing_seqs(&mut records);

        let locations = self
            .locations
            .into_iter()
            .filter_map(|(name, value)| match serde_json::from_value::<Location>(value) {
                Ok(location) => Some((name, location)),
                Err(e) => {
                    warn!("Skipping location {name}: {e}");
                    None
                }
            })
            .collect();

        Loaded {
            data: DataSet {
                records,
                centers: names(self.centers),
                locations,
                fares: amounts(self.fares, |n| n.round() as i64),
                distances: amounts(self.distances, |n| n),
                costs: amounts(self.costs, |n| n.round() as i64),
                expense_items: names(self.expense_items),
                subsidy: self.subsidy.max(0.0),
                correction: self.correction,
            },
            skipped,
        }
    }
}

/// Older files have no `seq`; file position stands in for insertion order
fn assign_missing_seqs(records: &mut [Record]) {
    let mut next = records.iter().map(|r| r.seq).max().unwrap_or(0) + 1;
    for record in records.iter_mut().filter(|r| r.seq == 0) {
        record.seq = next;
        next += 1;
    }
}

/// Read a data or backup document
pub(crate) fn read_document(path: &Path) -> Result<Loaded, StoreError> {
    let file = File::open(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: RawDocument =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let loaded = raw.into_loaded();
    info!(
        "Read {} records from {} ({} skipped)",
        loaded.data.records.len(),
        path.display(),
        loaded.skipped
    );
    Ok(loaded)
}

/// Write `data` to `path` through a temporary sibling, so a crash never leaves half a file
pub(crate) fn write_document(path: &Path, data: &DataSet) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_vec_pretty(data).map_err(StoreError::Serialize)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(&tmp).map_err(write_err)?;
    file.write_all(&json).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);
    std::fs::rename(&tmp, path).map_err(write_err)?;
    debug!("Wrote {} records to {}", data.records.len(), path.display());
    Ok(())
}

/// The data file backing every command
#[derive(Debug, Clone)]
pub(crate) struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        JsonStore { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Load the data file. A missing file is an empty data set.
    pub(crate) fn load(&self) -> Result<Loaded, StoreError> {
        if !self.path.exists() {
            debug!("No data file at {}, starting empty", self.path.display());
            return Ok(Loaded::default());
        }
        read_document(&self.path)
    }

    pub(crate) fn save(&self, data: &DataSet) -> Result<(), StoreError> {
        write_document(&self.path, data)
    }

    /// Copy the current file to `<path>.bak` before a save would drop unreadable records
    pub(crate) fn backup(&self) -> Result<PathBuf, StoreError> {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        let target = PathBuf::from(name);
        std::fs::copy(&self.path, &target).map_err(|source| StoreError::Write {
            path: target.clone(),
            source,
        })?;
        warn!("Kept a copy of the original data file at {}", target.display());
        Ok(target)
    }

    pub(crate) fn export(&self, data: &DataSet, target: &Path) -> Result<(), StoreError> {
        write_document(target, data)
    }

    /// Replace the stored data with a backup document
    pub(crate) fn import(&self, source: &Path) -> Result<Loaded, StoreError> {
        let loaded = read_document(source)?;
        self.save(&loaded.data)?;
        Ok(loaded)
    }
}

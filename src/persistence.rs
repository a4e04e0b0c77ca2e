//! Per-generation fitness persistence.
//!
//! A [`FitnessSink`] receives one `(generation, best fitness)` record per
//! completed generation. [`CsvFitnessLog`] appends records tagged with a
//! run identifier, so earlier results are never rewritten; reading merges
//! them by `(generation, run)` key, later records winning. Re-running an
//! experiment under the same run identifier therefore updates its values
//! in place when loaded.
//!
//! # Format
//!
//! ```text
//! run,generation,fitness
//! rank_swap_uniform#0,1,2950
//! rank_swap_uniform#0,2,3010
//! ```

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

/// Receives the winner's primary fitness after each generation.
pub trait FitnessSink {
    /// Stores one record. Errors are reported by the caller, never retried.
    fn record(&mut self, generation: u32, fitness: f64) -> Result<(), PersistenceError>;
}

/// One persisted row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessRecord {
    /// Run identifier (experiment + repetition).
    pub run: String,
    /// Generation number, starting at 1.
    pub generation: u32,
    /// Best primary fitness of that generation.
    pub fitness: f64,
}

/// Append-only CSV log of fitness records for one run.
#[derive(Debug, Clone)]
pub struct CsvFitnessLog {
    path: PathBuf,
    run: String,
}

impl CsvFitnessLog {
    /// Creates a log writing to `path` under run identifier `run`.
    ///
    /// The file is created lazily on the first record.
    pub fn new(path: impl Into<PathBuf>, run: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            run: run.into(),
        }
    }

    /// File path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run identifier.
    pub fn run(&self) -> &str {
        &self.run
    }

    /// Reads every record in `path` and merges them by `(generation, run)`.
    pub fn load(path: impl AsRef<Path>) -> Result<FitnessTable, PersistenceError> {
        let mut reader = csv::Reader::from_reader(File::open(path)?);
        let headers = reader.headers()?.clone();
        let mut row = csv::StringRecord::new();
        let mut table = FitnessTable::default();

        while reader.read_record(&mut row)? {
            let record: FitnessRecord = row.deserialize(Some(&headers))?;
            if !record.fitness.is_finite() {
                return Err(PersistenceError::Malformed {
                    line: row.position().map_or(0, |pos| pos.line()),
                    message: format!("non-finite fitness {}", record.fitness),
                });
            }
            table.insert(record);
        }
        Ok(table)
    }
}

impl FitnessSink for CsvFitnessLog {
    fn record(&mut self, generation: u32, fitness: f64) -> Result<(), PersistenceError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(FitnessRecord {
            run: self.run.clone(),
            generation,
            fitness,
        })?;
        writer.flush()?;
        Ok(())
    }
}

/// Fitness values keyed by generation, then run identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitnessTable {
    rows: BTreeMap<u32, BTreeMap<String, f64>>,
    records: usize,
}

impl FitnessTable {
    /// Inserts a record, replacing any earlier value for the same key.
    pub fn insert(&mut self, record: FitnessRecord) {
        self.records += 1;
        self.rows
            .entry(record.generation)
            .or_default()
            .insert(record.run, record.fitness);
    }

    /// Number of raw records read (including superseded ones).
    pub fn len(&self) -> usize {
        self.records
    }

    /// Returns `true` if nothing was read.
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Value for `(generation, run)`.
    pub fn get(&self, generation: u32, run: &str) -> Option<f64> {
        self.rows.get(&generation)?.get(run).copied()
    }

    /// All values of one generation, keyed by run.
    pub fn generation(&self, generation: u32) -> Option<&BTreeMap<String, f64>> {
        self.rows.get(&generation)
    }

    /// Fitness history of one run, ordered by generation.
    pub fn run_history(&self, run: &str) -> Vec<(u32, f64)> {
        self.rows
            .iter()
            .filter_map(|(&g, runs)| runs.get(run).map(|&f| (g, f)))
            .collect()
    }

    /// Mean fitness across runs for every generation.
    pub fn generation_means(&self) -> Vec<(u32, f64)> {
        self.rows
            .iter()
            .filter(|(_, runs)| !runs.is_empty())
            .map(|(&g, runs)| (g, runs.values().sum::<f64>() / runs.len() as f64))
            .collect()
    }
}

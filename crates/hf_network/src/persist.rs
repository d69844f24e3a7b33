//! Hand-off of relaxation results.
//!
//! After a full run the network passes its bond matrix and the backbone to
//! a `BondSink`. The file sink writes a small named-array dump as JSON:
//!
//! ```json
//! { "bonds": [[0.0, ...], ...], "chain": [[0.0, 1.0, ...], ...] }
//! ```
//!
//! The dump is meant for external analysis; nothing in hopfold reads it back.
//!

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use log::info;
use ndarray::Array2;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;


/// File name used when no explicit dump path is given.
pub const DEFAULT_DUMP_FILE: &str = "connectivity.json";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write bond dump: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode bond dump: {0}")]
    Json(#[from] serde_json::Error),
}

/// Receiver of the final bond matrix and backbone of a run.
pub trait BondSink {
    fn persist(&mut self, bonds: &Array2<f64>, chain: &Array2<f64>) -> Result<(), PersistError>;
}

/// The named arrays of a dump, row by row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondDump {
    pub bonds: Vec<Vec<f64>>,
    pub chain: Vec<Vec<f64>>,
}

impl BondDump {
    pub fn new(bonds: &Array2<f64>, chain: &Array2<f64>) -> Self {
        Self {
            bonds: rows(bonds),
            chain: rows(chain),
        }
    }
}

fn rows(m: &Array2<f64>) -> Vec<Vec<f64>> {
    m.outer_iter().map(|row| row.to_vec()).collect()
}

/// Collects dumps in memory.
impl BondSink for Vec<BondDump> {
    fn persist(&mut self, bonds: &Array2<f64>, chain: &Array2<f64>) -> Result<(), PersistError> {
        self.push(BondDump::new(bonds, chain));
        Ok(())
    }
}

/// Writes each dump as pretty-printed JSON to a fixed path, replacing
/// any previous content.
#[derive(Debug, Clone)]
pub struct JsonDumpFile {
    path: PathBuf,
}

impl JsonDumpFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonDumpFile {
    fn default() -> Self {
        Self::new(DEFAULT_DUMP_FILE)
    }
}

impl BondSink for JsonDumpFile {
    fn persist(&mut self, bonds: &Array2<f64>, chain: &Array2<f64>) -> Result<(), PersistError> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &BondDump::new(bonds, chain))?;
        writer.flush()?;
        info!("Wrote bond dump to {}.", self.path.display());
        Ok(())
    }
}

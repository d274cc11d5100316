pub mod report;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::http_probe::result::CheckResult;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history file error: {0}")]
    Io(#[from] io::Error),

    #[error("history file is not a valid check log: {0}")]
    Json(#[from] serde_json::Error),
}

/// Every check ever recorded, in the order it was made.
/// The whole list is rewritten to `path` as a JSON array after each new record.
#[derive(Debug)]
pub struct History {
    path: PathBuf,
    records: Vec<CheckResult>,
}

impl History {
    /// Load the history stored at `path`.
    /// A missing, unreadable or corrupt file gives an empty history.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = if path.exists() {
            match read_records(&path) {
                Ok(records) => {
                    log::info!("Loaded {} previous checks from {}", records.len(), path.display());
                    records
                }
                Err(e) => {
                    log::warn!("Starting with an empty history, could not load {}: {}", path.display(), e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Self { path, records }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[CheckResult] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The last `count` records, oldest first.
    pub fn recent(&self, count: usize) -> &[CheckResult] {
        let start = self.records.len().saturating_sub(count);
        &self.records[start..]
    }

    /// Append a record and persist the full history.
    /// The record is kept in memory even when writing the file fails.
    pub fn record(&mut self, result: CheckResult) -> Result<(), HistoryError> {
        self.records.push(result);
        self.save()
    }

    pub fn save(&self) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

fn read_records(path: &Path) -> Result<Vec<CheckResult>, HistoryError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

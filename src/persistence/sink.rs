use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SinkError;
use crate::simulation::SimulationResults;

/// Destination for finished simulation bundles, keyed by condition.
pub trait ResultSink {
    /// Persist one bundle. Returns where it was written, if anywhere.
    fn persist(&mut self, results: &SimulationResults) -> Result<Option<PathBuf>, SinkError>;
}

/// Keeps bundles in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    bundles: Vec<SimulationResults>,
}

impl MemorySink {
    pub fn bundles(&self) -> &[SimulationResults] {
        &self.bundles
    }
}

impl ResultSink for MemorySink {
    fn persist(&mut self, results: &SimulationResults) -> Result<Option<PathBuf>, SinkError> {
        self.bundles.push(results.clone());
        Ok(None)
    }
}

/// Writes each bundle to `<data_dir>/data_<condition>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    data_dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        JsonFileSink {
            data_dir: data_dir.into(),
        }
    }

    /// Path a condition's bundle is written to. Characters outside
    /// `[A-Za-z0-9._-]` are replaced so the label cannot escape `data_dir`.
    pub fn path_for(&self, condition: &str) -> PathBuf {
        let safe: String = condition
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.data_dir.join(format!("data_{safe}.json"))
    }
}

impl ResultSink for JsonFileSink {
    fn persist(&mut self, results: &SimulationResults) -> Result<Option<PathBuf>, SinkError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| SinkError::CreateDir {
            path: self.data_dir.clone(),
            source: e,
        })?;

        let final_path = self.path_for(&results.condition);
        let tmp_path = final_path.with_extension("json.tmp");

        let json = serde_json::to_string(results)?;
        fs::write(&tmp_path, json)?;
        // Atomic rename
        fs::rename(&tmp_path, &final_path)?;

        debug!(path = %final_path.display(), "wrote results");
        Ok(Some(final_path))
    }
}

/// Read a bundle written by [`JsonFileSink`].
pub fn load_results(path: &Path) -> Result<SimulationResults, SinkError> {
    let json = fs::read_to_string(path).map_err(|e| SinkError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&json).map_err(|e| SinkError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

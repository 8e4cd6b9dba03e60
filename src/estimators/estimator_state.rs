use crate::error::Result;
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Plain copy of a [`WelfordEstimator`](crate::WelfordEstimator)'s statistics.
///
/// The arrays are `None` while the estimator has not seen a sample. Values
/// are stored exactly, so restoring a state and continuing to fit gives the
/// same bits as never having stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorState {
    pub mean: Option<ArrayD<f64>>,
    pub sum_sq_dev: Option<ArrayD<f64>>,
    pub sample_count: u64,
    pub nonzero_count: Option<ArrayD<u64>>,
}

impl EstimatorState {
    /// Writes the state as JSON.
    ///
    /// Non-finite values have no JSON representation and are written as
    /// `null`, which [`load`](Self::load) rejects.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut w, self)?;
        w.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let r = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(r)?)
    }
}

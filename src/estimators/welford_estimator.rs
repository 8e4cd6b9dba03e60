use crate::config::EstimatorParams;
use crate::error::{Error, PreconditionError, Result, ShapeError};
use crate::estimators::{Estimator, EstimatorState};
use ndarray::{ArrayD, ArrayViewD, IxDyn, Zip};

/// Per-location running statistics. Exists only once the feature shape is known.
#[derive(Debug, Clone, PartialEq)]
struct Moments {
    mean: ArrayD<f64>,
    sum_sq_dev: ArrayD<f64>,
    nonzero_count: ArrayD<u64>,
}

impl Moments {
    fn zeros(shape: &[usize]) -> Self {
        Self {
            mean: ArrayD::zeros(IxDyn(shape)),
            sum_sq_dev: ArrayD::zeros(IxDyn(shape)),
            nonzero_count: ArrayD::zeros(IxDyn(shape)),
        }
    }

    #[inline]
    fn shape(&self) -> &[usize] {
        self.mean.shape()
    }

    /// One Welford step with `k` the sample count after this sample.
    ///
    /// The deviation product pairs the updated mean with the previous one.
    /// Restored estimators depend on this exact sequence of operations to
    /// stay bit-identical with the estimator they were taken from.
    fn update(&mut self, x: &ArrayViewD<'_, f64>, k: f64) {
        Zip::from(&mut self.mean)
            .and(&mut self.sum_sq_dev)
            .and(&mut self.nonzero_count)
            .and(x)
            .for_each(|m, s, nz, &xi| {
                if xi != 0.0 {
                    *nz += 1;
                }
                let old_m = *m;
                *m = old_m + (xi - old_m) / k;
                *s = *s + (xi - *m) * (xi - old_m);
            });
    }
}

/// Streaming estimator of per-location mean, standard deviation and activity
/// over feature-map samples, using Welford's single-pass recurrence.
///
/// The estimator starts uninitialized; the first sample fixes the feature
/// shape and every later sample must match it. Only the owner mutates it, so
/// sharing across threads needs external locking around [`Estimator::fit`]
/// and [`WelfordEstimator::restore`].
///
/// ```
/// use ibamoments::{Estimator, WelfordEstimator};
/// use ndarray::array;
///
/// let mut est = WelfordEstimator::new();
/// est.fit(&array![1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(est.sample_count(), 3);
/// assert_eq!(est.std().unwrap().into_raw_vec_and_offset().0, vec![1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct WelfordEstimator {
    moments: Option<Moments>,
    sample_count: u64,
    params: EstimatorParams,
}

impl WelfordEstimator {
    pub fn new() -> Self {
        Self::with_params(EstimatorParams::default())
    }

    pub fn with_params(params: EstimatorParams) -> Self {
        Self {
            moments: None,
            sample_count: 0,
            params,
        }
    }

    pub fn params(&self) -> &EstimatorParams {
        &self.params
    }

    pub fn is_initialized(&self) -> bool {
        self.moments.is_some()
    }

    /// Running mean, or `None` before the first sample.
    pub fn mean(&self) -> Option<&ArrayD<f64>> {
        self.moments.as_ref().map(|m| &m.mean)
    }

    /// Running sum of squared deviations from the mean.
    pub fn sum_sq_dev(&self) -> Option<&ArrayD<f64>> {
        self.moments.as_ref().map(|m| &m.sum_sq_dev)
    }

    /// Per-location count of samples that were nonzero there.
    pub fn nonzero_count(&self) -> Option<&ArrayD<u64>> {
        self.moments.as_ref().map(|m| &m.nonzero_count)
    }

    /// Unbiased sample variance, `sum_sq_dev / (n - 1)`.
    ///
    /// Requires at least two samples.
    pub fn variance(&self) -> Result<ArrayD<f64>> {
        let moments = self.require("variance", 2)?;
        let denom = (self.sample_count - 1) as f64;
        Ok(moments.sum_sq_dev.mapv(|s| s / denom))
    }

    /// Sample standard deviation, `sqrt(sum_sq_dev / (n - 1))`.
    ///
    /// Requires at least two samples; with fewer the divisor is zero or
    /// negative, so a [`PreconditionError`] is returned instead of NaNs.
    pub fn std(&self) -> Result<ArrayD<f64>> {
        let moments = self.require("std", 2)?;
        let denom = (self.sample_count - 1) as f64;
        Ok(moments.sum_sq_dev.mapv(|s| (s / denom).sqrt()))
    }

    /// Mask of locations with `nonzero_count / sample_count > threshold`.
    ///
    /// Requires at least one sample.
    pub fn active_mask(&self, threshold: f64) -> Result<ArrayD<bool>> {
        let moments = self.require("active_mask", 1)?;
        let n = self.sample_count as f64;
        Ok(moments.nonzero_count.mapv(|c| c as f64 / n > threshold))
    }

    /// [`active_mask`](Self::active_mask) at the configured threshold.
    pub fn active_neurons(&self) -> Result<ArrayD<bool>> {
        self.active_mask(self.params.active_threshold)
    }

    pub fn snapshot(&self) -> EstimatorState {
        EstimatorState {
            mean: self.mean().cloned(),
            sum_sq_dev: self.sum_sq_dev().cloned(),
            sample_count: self.sample_count,
            nonzero_count: self.nonzero_count().cloned(),
        }
    }

    /// Replaces the current statistics with `state`.
    ///
    /// The state is validated first; on error the estimator is unchanged. A
    /// state with zero samples restores to the uninitialized estimator.
    pub fn restore(&mut self, state: EstimatorState) -> Result<()> {
        let samples = state.sample_count;
        self.moments = Self::moments_from_state(state)?;
        self.sample_count = samples;
        tracing::debug!(
            samples = self.sample_count,
            shape = ?self.feature_shape(),
            "restored estimator state"
        );
        Ok(())
    }

    fn moments_from_state(state: EstimatorState) -> Result<Option<Moments>> {
        let samples = state.sample_count;
        if samples == 0 {
            return Ok(None);
        }
        let missing = |field| PreconditionError::IncompleteSnapshot { field, samples };
        let mean = state.mean.ok_or_else(|| missing("mean"))?;
        let sum_sq_dev = state.sum_sq_dev.ok_or_else(|| missing("sum_sq_dev"))?;
        let nonzero_count = state.nonzero_count.ok_or_else(|| missing("nonzero_count"))?;

        let check = |field, found: &[usize]| -> std::result::Result<(), ShapeError> {
            if found == mean.shape() {
                Ok(())
            } else {
                Err(ShapeError::Inconsistent {
                    field,
                    expected: mean.shape().to_vec(),
                    found: found.to_vec(),
                })
            }
        };
        check("sum_sq_dev", sum_sq_dev.shape())?;
        check("nonzero_count", nonzero_count.shape())?;

        if let Some(&count) = nonzero_count.iter().find(|&&c| c > samples) {
            return Err(PreconditionError::CountExceedsSamples { count, samples }.into());
        }

        Ok(Some(Moments {
            mean,
            sum_sq_dev,
            nonzero_count,
        }))
    }

    fn require(&self, operation: &'static str, required: u64) -> Result<&Moments> {
        match &self.moments {
            Some(m) if self.sample_count >= required => Ok(m),
            _ => Err(Error::from(PreconditionError::NotEnoughSamples {
                operation,
                required,
                seen: self.sample_count,
            })),
        }
    }
}

impl Default for WelfordEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl Estimator for WelfordEstimator {
    fn fit_sample(&mut self, sample: ArrayViewD<'_, f64>) -> Result<()> {
        if let Some(expected) = self.feature_shape() {
            if expected != sample.shape() {
                return Err(ShapeError::Mismatch {
                    expected: expected.to_vec(),
                    found: sample.shape().to_vec(),
                }
                .into());
            }
        }
        let moments = self.moments.get_or_insert_with(|| {
            tracing::debug!(shape = ?sample.shape(), "initializing estimator");
            Moments::zeros(sample.shape())
        });
        let k = self.sample_count + 1;
        moments.update(&sample, k as f64);
        self.sample_count = k;
        Ok(())
    }

    fn sample_count(&self) -> u64 {
        self.sample_count
    }

    fn feature_shape(&self) -> Option<&[usize]> {
        self.moments.as_ref().map(Moments::shape)
    }

    fn reset(&mut self) {
        tracing::debug!(samples = self.sample_count, "resetting estimator");
        self.moments = None;
        self.sample_count = 0;
    }
}

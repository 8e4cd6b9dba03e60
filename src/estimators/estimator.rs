use crate::error::{Result, ShapeError};
use ndarray::{ArrayBase, ArrayViewD, Axis, Data, Dimension};

/// Online estimator over a stream of same-shaped samples.
///
/// Implementations fold samples in one at a time via [`fit_sample`] and never
/// keep the samples themselves. All samples must share the feature shape
/// established by the first one.
///
/// [`fit_sample`]: Estimator::fit_sample
pub trait Estimator {
    /// Folds a single sample into the running statistics.
    ///
    /// Returns a [`ShapeError`] without touching any state if the sample does
    /// not have the established feature shape.
    fn fit_sample(&mut self, sample: ArrayViewD<'_, f64>) -> Result<()>;

    /// Number of samples folded so far.
    fn sample_count(&self) -> u64;

    /// Shape of a single sample, once the first sample has fixed it.
    fn feature_shape(&self) -> Option<&[usize]>;

    /// Forgets everything, including the feature shape.
    fn reset(&mut self);

    /// Folds every sample of `batch` (stacked on axis 0) in order and hands
    /// the batch back unchanged, so the call can be chained inline.
    ///
    /// The trailing dimensions are checked against the feature shape before
    /// the first sample is folded, so a mismatching batch leaves the
    /// estimator untouched.
    fn fit<'a, S, D>(&mut self, batch: &'a ArrayBase<S, D>) -> Result<&'a ArrayBase<S, D>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
        Self: Sized,
    {
        if batch.ndim() == 0 {
            return Err(ShapeError::MissingBatchAxis.into());
        }
        if let Some(expected) = self.feature_shape() {
            let found = &batch.shape()[1..];
            if expected != found {
                return Err(ShapeError::Mismatch {
                    expected: expected.to_vec(),
                    found: found.to_vec(),
                }
                .into());
            }
        }
        for sample in batch.view().into_dyn().axis_iter(Axis(0)) {
            self.fit_sample(sample)?;
        }
        tracing::trace!(
            samples = batch.len_of(Axis(0)),
            total = self.sample_count(),
            "folded batch"
        );
        Ok(batch)
    }
}

use ndarray::{Array1, Array2, Array3, ArrayD, IxDyn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Batch of scalar-shaped samples (feature shape `()`).
pub fn scalar_batch(values: &[f64]) -> Array1<f64> {
    Array1::from(values.to_vec())
}

/// Seeded batch of `n` ReLU-like activations of the given feature shape;
/// roughly a third of the entries are exactly zero.
pub fn random_batch(seed: u64, n: usize, feature_shape: &[usize]) -> ArrayD<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut shape = Vec::with_capacity(feature_shape.len() + 1);
    shape.push(n);
    shape.extend_from_slice(feature_shape);
    ArrayD::from_shape_simple_fn(IxDyn(&shape), || {
        rng.random_range(-1.0..2.0f64).max(0.0)
    })
}

/// Channel-first capacity array filled with `value`.
pub fn constant_capacity(channels: usize, height: usize, width: usize, value: f64) -> Array3<f64> {
    Array3::from_elem((channels, height, width), value)
}

/// Positive map that varies slowly in both directions.
pub fn smooth_map(height: usize, width: usize) -> Array2<f64> {
    Array2::from_shape_fn((height, width), |(r, c)| {
        1.0 + 0.5 * (r as f64 * 0.4).sin() + 0.25 * (c as f64 * 0.3).cos()
    })
}

//! Bilinear resampling of 2-D maps.
//!
//! Output pixel `o` samples the input at `(o + 0.5) * in / out - 0.5`, so pixel
//! centres line up and corners are not stretched. Samples falling outside the
//! input are taken from the whole-sample mirror of the border
//! (`.. c b | a b .. y z | y x ..`). When shrinking, a Gaussian pre-filter with
//! `sigma = (factor - 1) / 2` per axis suppresses aliasing. The result is
//! clipped to the input's value range and never renormalized.

use crate::saliency::TargetShape;
use ndarray::{Array2, ArrayView2, Axis, Zip};

/// Gaussian support in standard deviations.
const TRUNCATE: f64 = 4.0;

#[derive(Debug, Clone, Copy)]
struct Tap {
    lo: usize,
    hi: usize,
    t: f64,
}

/// Index into `0..n` mirrored about the first and last samples.
#[inline]
fn reflect(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n as isize - 1);
    let i = i.rem_euclid(period);
    if i >= n as isize { (period - i) as usize } else { i as usize }
}

fn taps(n_in: usize, n_out: usize) -> Vec<Tap> {
    let factor = n_in as f64 / n_out as f64;
    (0..n_out)
        .map(|o| {
            let x = (o as f64 + 0.5) * factor - 0.5;
            let x0 = x.floor();
            let i0 = x0 as isize;
            Tap {
                lo: reflect(i0, n_in),
                hi: reflect(i0 + 1, n_in),
                t: x - x0,
            }
        })
        .collect()
}

fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x * x) as f64 / (sigma * sigma)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

fn blur_axis(src: &Array2<f64>, axis: Axis, sigma: f64) -> Array2<f64> {
    if sigma <= 1e-15 {
        return src.clone();
    }
    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    let mut out = Array2::zeros(src.raw_dim());
    Zip::from(src.lanes(axis))
        .and(out.lanes_mut(axis))
        .for_each(|lane, mut dst| {
            let n = lane.len();
            for (i, d) in dst.iter_mut().enumerate() {
                *d = kernel
                    .iter()
                    .enumerate()
                    .map(|(k, w)| w * lane[reflect(i as isize + k as isize - radius, n)])
                    .sum();
            }
        });
    out
}

/// Separable Gaussian blur with per-axis standard deviations.
pub fn gaussian_blur(map: ArrayView2<'_, f64>, sigma_rows: f64, sigma_cols: f64) -> Array2<f64> {
    let blurred = blur_axis(&map.to_owned(), Axis(0), sigma_rows);
    blur_axis(&blurred, Axis(1), sigma_cols)
}

/// Resamples `map` to `target` with bilinear interpolation.
///
/// `map` must not be empty.
pub fn resize_bilinear(
    map: ArrayView2<'_, f64>,
    target: TargetShape,
    anti_aliasing: bool,
) -> Array2<f64> {
    let (ho, wo) = map.dim();
    let (h, w) = (target.height(), target.width());
    let fy = ho as f64 / h as f64;
    let fx = wo as f64 / w as f64;

    let source = if anti_aliasing && (fy > 1.0 || fx > 1.0) {
        gaussian_blur(map, ((fy - 1.0) / 2.0).max(0.0), ((fx - 1.0) / 2.0).max(0.0))
    } else {
        map.to_owned()
    };

    let rows = taps(ho, h);
    let cols = taps(wo, w);
    let mut out = Array2::from_shape_fn((h, w), |(r, c)| {
        let (ry, cx) = (rows[r], cols[c]);
        let top = source[[ry.lo, cx.lo]] + cx.t * (source[[ry.lo, cx.hi]] - source[[ry.lo, cx.lo]]);
        let bottom =
            source[[ry.hi, cx.lo]] + cx.t * (source[[ry.hi, cx.hi]] - source[[ry.hi, cx.lo]]);
        top + ry.t * (bottom - top)
    });

    let (lo, hi) = map
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if lo <= hi {
        out.mapv_inplace(|v| v.clamp(lo, hi));
    }
    out
}

use crate::config::SaliencyParams;
use crate::error::{Result, ShapeError};
use crate::saliency::resize::resize_bilinear;
use crate::saliency::{Layout, TargetShape};
use crate::utils::math::{NanPolicy, nats_to_bits, sum_axis};
use ndarray::{Array2, ArrayBase, Data, Dimension, Ix2};

/// Converts a capacity array (nats per channel and location) into a 2-D
/// saliency map in bits per pixel.
///
/// Channels are summed with NaN treated as zero, so a location whose channels
/// are all NaN becomes `0.0`. When `target_shape` is given, values are first
/// scaled by `(ho * wo) / (h * w)` so the total number of bits survives the
/// change in pixel count, and the map is then resampled bilinearly with
/// anti-aliasing. See [`SaliencyConverter`] to control anti-aliasing.
///
/// The capacity must reduce to exactly two dimensions: rank 3 in either
/// layout.
pub fn to_saliency_map<S, D>(
    capacity: &ArrayBase<S, D>,
    target_shape: Option<TargetShape>,
    layout: Layout,
) -> Result<Array2<f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    convert(capacity, target_shape, layout, true)
}

/// Sum of all bits in a saliency map.
pub fn total_bits<S>(map: &ArrayBase<S, Ix2>) -> f64
where
    S: Data<Elem = f64>,
{
    map.sum()
}

fn convert<S, D>(
    capacity: &ArrayBase<S, D>,
    target_shape: Option<TargetShape>,
    layout: Layout,
    anti_aliasing: bool,
) -> Result<Array2<f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let ndim = capacity.ndim();
    if ndim < 2 {
        return Err(ShapeError::Rank { min: 2, found: ndim }.into());
    }
    if ndim != 3 {
        return Err(ShapeError::NotAMap { found: ndim }.into());
    }

    let reduced = sum_axis(capacity, layout.channel_axis(ndim), NanPolicy::TreatAsZero);
    let mut map = reduced
        .into_dimensionality::<Ix2>()
        .map_err(|_| ShapeError::NotAMap { found: ndim })?;
    map.mapv_inplace(nats_to_bits);

    let Some(target) = target_shape else {
        return Ok(map);
    };

    let (ho, wo) = map.dim();
    if ho == 0 || wo == 0 {
        return Err(ShapeError::EmptyMap {
            height: ho,
            width: wo,
        }
        .into());
    }
    let scale = (ho * wo) as f64 / target.pixels() as f64;
    map.mapv_inplace(|v| v * scale);
    tracing::debug!(
        from = ?(ho, wo),
        to = ?(target.height(), target.width()),
        scale,
        "resampling saliency map"
    );
    Ok(resize_bilinear(map.view(), target, anti_aliasing))
}

/// Saliency conversion with a fixed, validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SaliencyConverter {
    layout: Layout,
    target_shape: Option<TargetShape>,
    anti_aliasing: bool,
}

impl SaliencyConverter {
    pub fn new(params: &SaliencyParams) -> std::result::Result<Self, ShapeError> {
        Ok(Self {
            layout: params.layout,
            target_shape: params.target()?,
            anti_aliasing: params.anti_aliasing,
        })
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn target_shape(&self) -> Option<TargetShape> {
        self.target_shape
    }

    pub fn convert<S, D>(&self, capacity: &ArrayBase<S, D>) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        convert(capacity, self.target_shape, self.layout, self.anti_aliasing)
    }
}

impl Default for SaliencyConverter {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            target_shape: None,
            anti_aliasing: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing::fixtures::{constant_capacity, smooth_map};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::{Array1, Array3, Axis, array};
    use std::f64::consts::LN_2;

    #[test]
    fn ln2_everywhere_gives_channel_count_in_bits() {
        for (c, h, w) in [(4, 3, 5), (1, 7, 2), (16, 1, 1)] {
            let capacity = constant_capacity(c, h, w, LN_2);
            let map = to_saliency_map(&capacity, None, Layout::ChannelFirst).unwrap();
            assert_eq!(map.dim(), (h, w));
            assert_abs_diff_eq!(map, Array2::from_elem((h, w), c as f64), epsilon = 1e-12);
        }
    }

    #[test]
    fn channel_last_reduces_the_last_axis() {
        let capacity = constant_capacity(3, 4, 6, LN_2);
        let hwc = capacity.view().permuted_axes([1, 2, 0]);
        let map = to_saliency_map(&hwc, None, Layout::ChannelLast).unwrap();
        assert_eq!(map.dim(), (4, 6));
        assert_abs_diff_eq!(map, Array2::from_elem((4, 6), 3.0), epsilon = 1e-12);
    }

    #[test]
    fn all_nan_location_becomes_zero_not_nan() {
        let mut capacity = constant_capacity(2, 2, 2, LN_2);
        capacity[[0, 0, 0]] = f64::NAN;
        capacity[[1, 0, 0]] = f64::NAN;
        capacity[[0, 1, 1]] = f64::NAN;

        let map = to_saliency_map(&capacity, None, Layout::ChannelFirst).unwrap();
        assert_eq!(map[[0, 0]], 0.0);
        assert_abs_diff_eq!(map[[1, 1]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(map[[0, 1]], 2.0, epsilon = 1e-12);
        assert!(map.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn upsampling_preserves_total_bits() {
        let native = smooth_map(10, 10);
        let capacity = native.clone().insert_axis(Axis(0)).mapv(|v| v * LN_2);
        let s = total_bits(&native);

        let target = TargetShape::new(20, 20).unwrap();
        let resized = to_saliency_map(&capacity, Some(target), Layout::ChannelFirst).unwrap();
        assert_eq!(resized.dim(), (20, 20));
        assert_relative_eq!(total_bits(&resized), s, max_relative = 1e-2);
    }

    #[test]
    fn downsampling_preserves_total_bits_of_uniform_map() {
        let capacity = constant_capacity(2, 20, 30, LN_2);
        let target = TargetShape::new(10, 15).unwrap();
        let resized = to_saliency_map(&capacity, Some(target), Layout::ChannelFirst).unwrap();
        assert_abs_diff_eq!(resized, Array2::from_elem((10, 15), 8.0), epsilon = 1e-9);
        assert_relative_eq!(total_bits(&resized), 2.0 * 600.0, max_relative = 1e-9);
    }

    #[test]
    fn rescale_factor_uses_pixel_ratio() {
        let capacity = constant_capacity(1, 4, 4, LN_2);
        let target = TargetShape::new(8, 2).unwrap();
        let resized = to_saliency_map(&capacity, Some(target), Layout::ChannelFirst).unwrap();
        assert_abs_diff_eq!(resized, Array2::from_elem((8, 2), 1.0), epsilon = 1e-12);
    }

    #[test]
    fn native_resolution_when_no_target() {
        let capacity = Array3::from_shape_fn((2, 3, 3), |(c, r, k)| (c + r + k) as f64);
        let map = to_saliency_map(&capacity, None, Layout::ChannelFirst).unwrap();
        assert_abs_diff_eq!(map[[2, 1]], (3.0 + 4.0) / LN_2, epsilon = 1e-12);
    }

    #[test]
    fn invalid_ranks_are_shape_errors() {
        let v = Array1::<f64>::zeros(5);
        assert!(matches!(
            to_saliency_map(&v, None, Layout::ChannelFirst),
            Err(Error::Shape(ShapeError::Rank { min: 2, found: 1 }))
        ));

        let m = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(matches!(
            to_saliency_map(&m, None, Layout::ChannelFirst),
            Err(Error::Shape(ShapeError::NotAMap { found: 2 }))
        ));

        let batched = ndarray::Array4::<f64>::zeros((1, 2, 3, 3));
        assert!(matches!(
            to_saliency_map(&batched, None, Layout::ChannelLast),
            Err(Error::Shape(ShapeError::NotAMap { found: 4 }))
        ));
    }

    #[test]
    fn empty_map_cannot_be_resampled() {
        let capacity = Array3::<f64>::zeros((2, 0, 4));
        let target = TargetShape::new(3, 3).unwrap();
        assert!(to_saliency_map(&capacity, None, Layout::ChannelFirst).is_ok());
        assert!(matches!(
            to_saliency_map(&capacity, Some(target), Layout::ChannelFirst),
            Err(Error::Shape(ShapeError::EmptyMap { height: 0, width: 4 }))
        ));
    }

    #[test]
    fn converter_applies_its_params() {
        let params = SaliencyParams {
            layout: Layout::ChannelLast,
            target_shape: Some(vec![6, 6]),
            anti_aliasing: false,
        };
        let conv = SaliencyConverter::new(&params).unwrap();
        assert_eq!(conv.layout(), Layout::ChannelLast);
        assert_eq!(conv.target_shape(), Some(TargetShape::new(6, 6).unwrap()));

        let capacity = Array3::from_elem((3, 3, 2), LN_2);
        let map = conv.convert(&capacity).unwrap();
        assert_abs_diff_eq!(map, Array2::from_elem((6, 6), 0.5), epsilon = 1e-12);
    }

    #[test]
    fn converter_rejects_malformed_target() {
        let params = SaliencyParams {
            target_shape: Some(vec![6]),
            ..SaliencyParams::default()
        };
        assert_eq!(
            SaliencyConverter::new(&params),
            Err(ShapeError::TargetShape { found: vec![6] })
        );
    }

    #[test]
    fn default_converter_matches_free_function() {
        let capacity = constant_capacity(2, 5, 5, 0.3);
        assert_eq!(
            SaliencyConverter::default().convert(&capacity).unwrap(),
            to_saliency_map(&capacity, None, Layout::ChannelFirst).unwrap()
        );
    }
}

use ndarray::{ArrayBase, ArrayD, Axis, Data, Dimension};

/// How not-a-number entries take part in a channel reduction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NanPolicy {
    /// NaN contributes zero; a lane of only NaNs sums to `0.0`.
    #[default]
    TreatAsZero,
    /// NaN poisons the sum of its lane.
    Propagate,
}

#[inline]
pub fn nats_to_bits(nats: f64) -> f64 {
    nats / std::f64::consts::LN_2
}

/// Sums `values` along `axis` under the given NaN policy.
pub fn sum_axis<S, D>(values: &ArrayBase<S, D>, axis: Axis, policy: NanPolicy) -> ArrayD<f64>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let view = values.view().into_dyn();
    match policy {
        NanPolicy::TreatAsZero => {
            view.fold_axis(axis, 0.0, |&acc, &v| if v.is_nan() { acc } else { acc + v })
        }
        NanPolicy::Propagate => view.fold_axis(axis, 0.0, |&acc, &v| acc + v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn ln2_nats_is_one_bit() {
        assert_eq!(nats_to_bits(std::f64::consts::LN_2), 1.0);
        assert_eq!(nats_to_bits(0.0), 0.0);
    }

    #[test]
    fn nan_lanes_reduce_to_zero_when_treated_as_zero() {
        let a = array![[1.0, f64::NAN, f64::NAN], [2.0, 3.0, f64::NAN]];
        let s = sum_axis(&a, Axis(0), NanPolicy::TreatAsZero);
        assert_eq!(s, array![3.0, 3.0, 0.0].into_dyn());
    }

    #[test]
    fn nan_propagates_when_asked() {
        let a = array![[1.0, f64::NAN], [2.0, 3.0]];
        let s = sum_axis(&a, Axis(0), NanPolicy::Propagate);
        assert_eq!(s[[0]], 3.0);
        assert!(s[[1]].is_nan());
    }

    #[test]
    fn reduces_last_axis() {
        let a = array![[1.0, 2.0], [f64::NAN, 4.0]];
        let s = sum_axis(&a, Axis(1), NanPolicy::default());
        assert_eq!(s, array![3.0, 4.0].into_dyn());
    }
}

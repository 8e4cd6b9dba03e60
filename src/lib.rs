//! Numerical core of information bottleneck attribution: a streaming
//! estimator of per-location feature-map statistics and the conversion of
//! per-location capacity (nats) into saliency maps (bits per pixel).

pub mod config;
pub mod error;
pub mod estimators;
pub mod saliency;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{Error, PreconditionError, Result, ShapeError};
pub use estimators::{Estimator, EstimatorState, WelfordEstimator};
pub use saliency::{Layout, SaliencyConverter, TargetShape, to_saliency_map};

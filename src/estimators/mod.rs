mod estimator;
mod estimator_state;
mod welford_estimator;

pub use estimator::Estimator;
pub use estimator_state::EstimatorState;
pub use welford_estimator::WelfordEstimator;

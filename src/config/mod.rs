mod estimator_params;
mod saliency_params;

pub use estimator_params::EstimatorParams;
pub use saliency_params::SaliencyParams;

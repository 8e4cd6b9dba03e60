use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_active_threshold() -> f64 {
    0.01
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EstimatorParams {
    #[serde(default = "default_active_threshold")]
    #[schemars(
        title = "Active threshold",
        description = "A location is active when its nonzero fraction over the stream exceeds this value.",
        default = "default_active_threshold"
    )]
    pub active_threshold: f64,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        Self {
            active_threshold: default_active_threshold(),
        }
    }
}

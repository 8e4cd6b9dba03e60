use crate::error::ShapeError;
use crate::saliency::{Layout, TargetShape};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_anti_aliasing() -> bool {
    true
}

/// Parameters for [`SaliencyConverter`](crate::saliency::SaliencyConverter).
///
/// `target_shape` is kept as a plain list so that configuration files can be
/// read before validation; [`SaliencyParams::target`] turns it into a
/// [`TargetShape`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SaliencyParams {
    #[serde(default)]
    #[schemars(
        title = "Layout",
        description = "Position of the channel axis in the capacity array (nchw or nhwc)."
    )]
    pub layout: Layout,

    #[serde(default)]
    #[schemars(
        title = "Target shape",
        description = "Output (height, width). Omit to keep the native resolution."
    )]
    pub target_shape: Option<Vec<usize>>,

    #[serde(default = "default_anti_aliasing")]
    #[schemars(
        title = "Anti-aliasing",
        description = "Gaussian pre-filter before downsampling.",
        default = "default_anti_aliasing"
    )]
    pub anti_aliasing: bool,
}

impl SaliencyParams {
    pub fn target(&self) -> Result<Option<TargetShape>, ShapeError> {
        self.target_shape
            .as_deref()
            .map(TargetShape::try_from)
            .transpose()
    }
}

impl Default for SaliencyParams {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            target_shape: None,
            anti_aliasing: default_anti_aliasing(),
        }
    }
}

use ndarray::Axis;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Position of the channel axis in a capacity array.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Layout {
    /// Channels on axis 0 (`C x H x W`).
    #[default]
    #[serde(rename = "nchw")]
    #[strum(serialize = "nchw")]
    ChannelFirst,
    /// Channels on the last axis (`H x W x C`).
    #[serde(rename = "nhwc")]
    #[strum(serialize = "nhwc")]
    ChannelLast,
}

impl Layout {
    pub fn channel_axis(self, ndim: usize) -> Axis {
        match self {
            Layout::ChannelFirst => Axis(0),
            Layout::ChannelLast => Axis(ndim.saturating_sub(1)),
        }
    }
}

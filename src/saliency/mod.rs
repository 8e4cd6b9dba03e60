mod layout;
pub mod resize;
mod saliency_converter;
mod target_shape;

pub use layout::Layout;
pub use saliency_converter::{SaliencyConverter, to_saliency_map, total_bits};
pub use target_shape::TargetShape;

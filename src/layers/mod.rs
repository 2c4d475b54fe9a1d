pub mod base;
pub mod compositor;
pub mod image;

pub use base::{Layer, LayerControl};
pub use compositor::LayerCompositor;
pub use image::DeepImageLayer;

//! # deepzoom
//!
//! A backend-agnostic "deep zoom" engine for viewing tiled multi-resolution
//! images far larger than fit in memory at full size.
//!
//! The engine owns the pyramid geometry, viewport projection, pan/zoom
//! interaction, tile addressing and caching, and two-level LOD crossfade
//! compositing. It never touches a concrete rendering API: backends implement
//! [`rendering::TileRenderer`] ("draw this tile at this rectangle with this
//! opacity") and hosts supply a tile URL scheme per layer.

pub mod animation;
pub mod core;
pub mod engine;
pub mod input;
pub mod layers;
pub mod rendering;
pub mod tiles;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{DeepImageLayerOptions, DeepZoomItem, EngineOptions},
    geo::{Point, Rect, TileCoord},
    pyramid::{PyramidGeometry, PyramidLevel},
    viewport::Viewport,
};

pub use input::{events::InputEvent, handler::InteractionController};

pub use animation::{move_towards, ZoomAnimator};

pub use tiles::{
    address::{TileAddress, TileAddressGenerator},
    cache::{TileCache, TileState},
    loader::{FetchFn, TileLoadResult, TileLoader},
    pool::ObjectPool,
    source::{DirectoryTileSource, TileSource, UrlFn},
};

pub use layers::{base::Layer, compositor::LayerCompositor, image::DeepImageLayer};

pub use rendering::context::{RecordingRenderer, TileRenderer};

pub use engine::{CancellationToken, DeepZoomEngine};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, DeepZoomError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum DeepZoomError {
    #[error("invalid pyramid config: {0}")]
    InvalidPyramidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("render error: {0}")]
    Render(String),

    #[error("layer error: {0}")]
    Layer(String),

    #[cfg(feature = "fetch")]
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Error type alias for convenience
pub type Error = DeepZoomError;

//! Engine-wide default values

/// Default zoom animation speed in zoom levels per second
pub const DEFAULT_ZOOM_SPEED: f64 = 2.0;

/// Default upper bound for `desiredZoom`: never zoom past full pyramid
/// resolution at level 0 unless a layer defines otherwise
pub const DEFAULT_MAX_ZOOM_IN: f64 = 0.0;

/// Default frame rate for the built-in run loop
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Default layer opacity
pub const DEFAULT_OPACITY: f64 = 1.0;

/// Default layer tint color
pub const DEFAULT_LAYER_COLOR: &str = "rgba(0,0,0,.25)";

/// Default layer zoom range
pub const DEFAULT_MIN_ZOOM: i32 = -18;
pub const DEFAULT_MAX_ZOOM: i32 = 0;

/// Levels drawn with a weight below this are skipped entirely
pub const MIN_VISIBLE_OPACITY: f64 = 1e-3;

//! Engine and layer configuration
//!
//! Options are plain structs with sensible defaults; the `DeepZoomItem`
//! descriptor mirrors the JSON format hosts use to describe a deep-zoom
//! image and its layers.

use crate::core::constants;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Engine-level behavior tuning
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Zoom easing rate in zoom levels per second
    pub zoom_animation_speed: f64,
    /// Upper clamp for the desired zoom (0 = never magnify past full
    /// resolution)
    pub max_zoom_in: f64,
    /// Frame rate target for the built-in run loop
    pub target_fps: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            zoom_animation_speed: constants::DEFAULT_ZOOM_SPEED,
            max_zoom_in: constants::DEFAULT_MAX_ZOOM_IN,
            target_fps: constants::DEFAULT_TARGET_FPS,
        }
    }
}

/// Construction options for a deep image layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepImageLayerOptions {
    /// Tile edge length in source pixels
    pub tile_size: u32,
    /// Shared border in pixels baked into each tile image to hide seams
    pub tile_overlap: u32,
    /// World-space extent the full image spans
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Full-resolution image dimensions in pixels
    pub content_width: u32,
    pub content_height: u32,
    pub min_zoom: i32,
    pub max_zoom: i32,
    pub opacity: f64,
    pub visible: bool,
    pub color: String,
}

impl Default for DeepImageLayerOptions {
    fn default() -> Self {
        Self {
            tile_size: 256,
            tile_overlap: 0,
            viewport_width: 0.0,
            viewport_height: 0.0,
            content_width: 0,
            content_height: 0,
            min_zoom: constants::DEFAULT_MIN_ZOOM,
            max_zoom: constants::DEFAULT_MAX_ZOOM,
            opacity: constants::DEFAULT_OPACITY,
            visible: true,
            color: constants::DEFAULT_LAYER_COLOR.to_string(),
        }
    }
}

/// JSON descriptor of one deep-zoom item: a shared world viewport plus a
/// stack of layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepZoomItem {
    pub options: DeepZoomItemOptions,
    pub layers: Vec<DeepZoomItemLayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepZoomItemOptions {
    pub viewport: ViewportSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

/// Layer entry of a deep-zoom item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DeepZoomItemLayer {
    DeepImage(DeepImageItemLayer),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepImageItemLayer {
    #[serde(default)]
    pub title: String,
    pub image_src: String,
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
    pub tile_overlap: u32,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: i32,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: i32,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub exclusive: bool,
    #[serde(default)]
    pub preview_image: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_min_zoom() -> i32 {
    constants::DEFAULT_MIN_ZOOM
}

fn default_max_zoom() -> i32 {
    constants::DEFAULT_MAX_ZOOM
}

fn default_opacity() -> f64 {
    constants::DEFAULT_OPACITY
}

fn default_visible() -> bool {
    true
}

fn default_color() -> String {
    constants::DEFAULT_LAYER_COLOR.to_string()
}

impl DeepZoomItem {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl DeepImageItemLayer {
    /// Layer options for this entry, laid out in the item's shared world
    /// viewport
    pub fn layer_options(&self, viewport: ViewportSize) -> DeepImageLayerOptions {
        DeepImageLayerOptions {
            tile_size: self.tile_size,
            tile_overlap: self.tile_overlap,
            viewport_width: viewport.width,
            viewport_height: viewport.height,
            content_width: self.width,
            content_height: self.height,
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            opacity: self.opacity,
            visible: self.visible,
            color: self.color.clone(),
        }
    }
}

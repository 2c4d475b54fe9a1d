use crate::core::constants;
use crate::core::viewport::Viewport;
use crate::rendering::context::TileRenderer;
use crate::Result;

/// Capability interface every layer implements, regardless of what it draws.
///
/// The compositor owns layers through this trait; backends are selected by
/// constructing the right implementation, not by inheritance.
pub trait Layer: Send {
    /// Called when the layer joins a host of the given pixel size
    fn on_add(&mut self, width: f64, height: f64) -> Result<()> {
        let _ = (width, height);
        Ok(())
    }

    /// Called when the layer leaves its host
    fn on_remove(&mut self) {}

    /// Host container was resized
    fn on_resize(&mut self, width: f64, height: f64) {
        let _ = (width, height);
    }

    /// Draw one frame. `zoom` is the engine's continuous zoom value.
    fn render(
        &mut self,
        viewport: &Viewport,
        zoom: f64,
        renderer: &mut dyn TileRenderer,
    ) -> Result<()>;

    fn opacity(&self) -> f64;
    fn set_opacity(&mut self, opacity: f64);

    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    /// Release every backend resource. Must be idempotent and must stop any
    /// further tile fetches from being issued.
    fn dispose(&mut self);
}

/// Host-facing control block for one registered layer: what a layer picker
/// UI shows and toggles.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerControl {
    pub name: String,
    pub title: String,
    pub opacity: f64,
    pub opacity_control: bool,
    pub visible: bool,
    /// Turning this layer on force-hides its exclusive siblings
    pub exclusive: bool,
    pub preview_image: String,
    pub color: String,
}

impl LayerControl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Default for LayerControl {
    fn default() -> Self {
        Self {
            name: String::new(),
            title: String::new(),
            opacity: constants::DEFAULT_OPACITY,
            opacity_control: true,
            visible: true,
            exclusive: false,
            preview_image: String::new(),
            color: constants::DEFAULT_LAYER_COLOR.to_string(),
        }
    }
}

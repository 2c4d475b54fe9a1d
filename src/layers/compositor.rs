use crate::core::constants::MIN_VISIBLE_OPACITY;
use crate::core::viewport::Viewport;
use crate::layers::base::{Layer, LayerControl};
use crate::rendering::context::TileRenderer;
use crate::Result;

struct LayerEntry {
    control: LayerControl,
    layer: Box<dyn Layer>,
}

/// Ordered stack of layers sharing one viewport.
///
/// Registration order is paint order: the first layer added is drawn first
/// and everything later composites over it. Host-facing state lives in each
/// layer's [`LayerControl`]; the compositor pushes it into the layer right
/// before rendering, so UI toggles take effect on the next frame without the
/// host touching the layer itself.
pub struct LayerCompositor {
    entries: Vec<LayerEntry>,
    width: f64,
    height: f64,
    disposed: bool,
}

impl LayerCompositor {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            entries: Vec::new(),
            width,
            height,
            disposed: false,
        }
    }

    /// Appends a layer to the top of the stack. Fails if the control's name
    /// collides with a registered layer.
    pub fn add_layer(&mut self, control: LayerControl, mut layer: Box<dyn Layer>) -> Result<()> {
        if self.entries.iter().any(|e| e.control.name == control.name) {
            return Err(crate::DeepZoomError::Layer(format!(
                "duplicate layer name: {}",
                control.name
            )));
        }

        layer.on_add(self.width, self.height)?;
        log::debug!("layer '{}' added", control.name);
        self.entries.push(LayerEntry { control, layer });
        Ok(())
    }

    /// Removes and disposes the named layer. Returns `false` when no layer
    /// has that name.
    pub fn remove_layer(&mut self, name: &str) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.control.name == name) else {
            return false;
        };
        let mut entry = self.entries.remove(index);
        entry.layer.on_remove();
        entry.layer.dispose();
        log::debug!("layer '{}' removed", name);
        true
    }

    pub fn control(&self, name: &str) -> Option<&LayerControl> {
        self.entries
            .iter()
            .find(|e| e.control.name == name)
            .map(|e| &e.control)
    }

    pub fn control_mut(&mut self, name: &str) -> Option<&mut LayerControl> {
        self.entries
            .iter_mut()
            .find(|e| e.control.name == name)
            .map(|e| &mut e.control)
    }

    /// Controls in paint order
    pub fn controls(&self) -> impl Iterator<Item = &LayerControl> {
        self.entries.iter().map(|e| &e.control)
    }

    pub fn set_opacity(&mut self, name: &str, opacity: f64) {
        if let Some(control) = self.control_mut(name) {
            control.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    pub fn set_visible(&mut self, name: &str, visible: bool) {
        if let Some(control) = self.control_mut(name) {
            control.visible = visible;
        }
    }

    /// Shows the named layer and hides every other layer marked exclusive,
    /// so exclusive layers behave like a radio group while non-exclusive
    /// layers are unaffected.
    pub fn show_exclusive(&mut self, name: &str) {
        for entry in &mut self.entries {
            if entry.control.name == name {
                entry.control.visible = true;
            } else if entry.control.exclusive {
                entry.control.visible = false;
            }
        }
    }

    /// Propagates a host container resize to every layer
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        for entry in &mut self.entries {
            entry.layer.on_resize(width, height);
        }
    }

    /// Draws every visible layer in paint order, syncing control state into
    /// the layers first.
    pub fn render(
        &mut self,
        viewport: &Viewport,
        zoom: f64,
        renderer: &mut dyn TileRenderer,
    ) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        for entry in &mut self.entries {
            entry.layer.set_opacity(entry.control.opacity);
            entry.layer.set_visible(entry.control.visible);

            if !entry.control.visible || entry.control.opacity < MIN_VISIBLE_OPACITY {
                continue;
            }
            entry.layer.render(viewport, zoom, renderer)?;
        }
        Ok(())
    }

    /// Disposes every layer and empties the stack. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for entry in &mut self.entries {
            entry.layer.dispose();
        }
        self.entries.clear();
        self.disposed = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for LayerCompositor {
    fn drop(&mut self) {
        self.dispose();
    }
}

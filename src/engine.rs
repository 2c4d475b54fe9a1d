//! The engine: one viewport, one interaction controller, one layer stack,
//! advanced by an explicit tick.
//!
//! Hosts either call [`DeepZoomEngine::tick`] from their own frame callback
//! or hand a renderer to [`DeepZoomEngine::run`], which paces frames itself
//! until the [`CancellationToken`] fires.

use crate::animation::ZoomAnimator;
use crate::core::config::{DeepZoomItem, DeepZoomItemLayer, EngineOptions};
use crate::core::geo::Point;
use crate::core::viewport::Viewport;
use crate::input::events::InputEvent;
use crate::input::handler::InteractionController;
use crate::layers::base::{Layer, LayerControl};
use crate::layers::compositor::LayerCompositor;
use crate::layers::image::DeepImageLayer;
use crate::rendering::context::TileRenderer;
use crate::tiles::loader::{FetchFn, TileLoader};
use crate::tiles::source::DirectoryTileSource;
use crate::Result;
use instant::Instant;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cooperative stop signal for [`DeepZoomEngine::run`]. Clone it, hand the
/// clone to another thread, cancel from there.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Deep-zoom engine driving a stack of layers through a shared viewport.
///
/// All interaction flows through [`handle_event`](Self::handle_event); all
/// drawing happens inside [`tick`](Self::tick). Nothing runs between ticks,
/// so the host decides when (and whether) frames happen.
pub struct DeepZoomEngine {
    options: EngineOptions,
    viewport: Viewport,
    controller: InteractionController,
    animator: ZoomAnimator,
    compositor: LayerCompositor,
    zoom: f64,
    disposed: bool,
}

impl DeepZoomEngine {
    pub fn new(width: f64, height: f64, options: EngineOptions) -> Self {
        let mut viewport = Viewport::new(width, height);
        let controller = InteractionController::new(options.max_zoom_in);
        viewport.update(controller.view_center(), 0.0);

        Self {
            animator: ZoomAnimator::new(options.zoom_animation_speed),
            compositor: LayerCompositor::new(width, height),
            viewport,
            controller,
            options,
            zoom: 0.0,
            disposed: false,
        }
    }

    /// Builds an engine from a parsed deep-zoom item descriptor, creating one
    /// deep image layer per entry with the conventional directory tile
    /// layout. Tiles resolve through `fetch`.
    pub fn from_item(
        width: f64,
        height: f64,
        item: &DeepZoomItem,
        options: EngineOptions,
        fetch: FetchFn,
    ) -> Result<Self> {
        let mut engine = Self::new(width, height, options);

        for (index, entry) in item.layers.iter().enumerate() {
            let DeepZoomItemLayer::DeepImage(image) = entry;

            let name = if image.title.is_empty() {
                format!("layer-{}", index)
            } else {
                image.title.clone()
            };
            let control = LayerControl {
                title: image.title.clone(),
                opacity: image.opacity,
                visible: image.visible,
                exclusive: image.exclusive,
                preview_image: image.preview_image.clone(),
                color: image.color.clone(),
                ..LayerControl::new(name)
            };

            let layer_options = image.layer_options(item.options.viewport);
            let source = DirectoryTileSource::new(&image.image_src, image.min_zoom, image.max_zoom);
            let layer =
                DeepImageLayer::new(layer_options, Box::new(source), TileLoader::new(fetch.clone()))?;

            engine.add_layer(control, Box::new(layer))?;
        }

        Ok(engine)
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The continuous zoom currently on screen (the eased value, not the
    /// target)
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    pub fn compositor(&self) -> &LayerCompositor {
        &self.compositor
    }

    pub fn compositor_mut(&mut self) -> &mut LayerCompositor {
        &mut self.compositor
    }

    pub fn add_layer(&mut self, control: LayerControl, layer: Box<dyn Layer>) -> Result<()> {
        self.compositor.add_layer(control, layer)
    }

    /// Routes one input event. Resizes reshape the viewport in place, keeping
    /// the world center and zoom; everything else feeds the interaction
    /// controller.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Resize { width, height } => {
                self.viewport
                    .resize(width, height, self.controller.view_center(), self.zoom);
                self.compositor.resize(width, height);
            }
            other => self.controller.handle_event(other, &self.viewport),
        }
    }

    /// Jump the view to a given center and zoom target without animation
    pub fn set_view(&mut self, center: Point, zoom: f64) {
        self.controller.set_view_center(center);
        self.controller.set_desired_zoom(zoom);
        self.zoom = self.controller.desired_zoom();
        self.viewport.update(center, self.zoom);
    }

    /// Advances one frame: eases the zoom, recomputes the viewport from the
    /// interaction state and draws every layer. `dt` is the seconds elapsed
    /// since the previous tick.
    pub fn tick(&mut self, dt: f64, renderer: &mut dyn TileRenderer) -> Result<()> {
        if self.disposed {
            return Ok(());
        }

        self.zoom = self
            .animator
            .advance(self.zoom, self.controller.desired_zoom(), dt);
        self.viewport.update(self.controller.view_center(), self.zoom);

        renderer.begin_frame(&self.viewport)?;
        renderer.clear()?;
        self.compositor.render(&self.viewport, self.zoom, renderer)
    }

    /// Ticks at the configured frame rate until the token is cancelled.
    /// Blocks the calling thread; cancel from another thread or from a
    /// renderer callback holding a token clone.
    pub fn run(&mut self, renderer: &mut dyn TileRenderer, token: &CancellationToken) -> Result<()> {
        let frame_budget = Duration::from_secs_f64(1.0 / self.options.target_fps.max(1) as f64);
        let mut last = Instant::now();

        while !token.is_cancelled() {
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f64();
            last = now;

            self.tick(dt, renderer)?;

            let spent = now.elapsed();
            if spent < frame_budget {
                std::thread::sleep(frame_budget - spent);
            }
        }

        log::debug!("run loop cancelled");
        Ok(())
    }

    /// Disposes every layer. Idempotent; a disposed engine ignores ticks.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.compositor.dispose();
        self.disposed = true;
    }
}

impl Drop for DeepZoomEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::events::PointerButton;
    use crate::rendering::context::RecordingRenderer;

    fn engine() -> DeepZoomEngine {
        DeepZoomEngine::new(100.0, 100.0, EngineOptions::default())
    }

    #[test]
    fn test_zoom_eases_toward_wheel_target() {
        let mut engine = engine();
        let mut renderer = RecordingRenderer::new();

        engine.handle_event(InputEvent::Wheel { delta_y: 1.0 });
        assert_eq!(engine.controller().desired_zoom(), -1.0);

        // Default speed is 2 levels/second: a quarter-second tick covers
        // half the distance
        engine.tick(0.25, &mut renderer).unwrap();
        assert_eq!(engine.zoom(), -0.5);

        engine.tick(0.25, &mut renderer).unwrap();
        assert_eq!(engine.zoom(), -1.0);

        // Settled: further ticks change nothing
        engine.tick(0.25, &mut renderer).unwrap();
        assert_eq!(engine.zoom(), -1.0);
    }

    #[test]
    fn test_drag_pans_the_viewport() {
        let mut engine = engine();
        let mut renderer = RecordingRenderer::new();

        engine.handle_event(InputEvent::PointerDown {
            position: Point::new(50.0, 50.0),
            button: PointerButton::Primary,
        });
        engine.handle_event(InputEvent::PointerMove {
            position: Point::new(70.0, 50.0),
        });
        engine.handle_event(InputEvent::PointerUp);

        engine.tick(0.016, &mut renderer).unwrap();
        // 20px right at scale 1 moves the world window 20 units left
        assert_eq!(engine.viewport().left, -70.0);
        assert_eq!(engine.viewport().right, 30.0);
    }

    #[test]
    fn test_resize_keeps_center_and_zoom() {
        let mut engine = engine();
        let mut renderer = RecordingRenderer::new();

        engine.set_view(Point::new(10.0, 20.0), 0.0);
        engine.handle_event(InputEvent::Resize {
            width: 200.0,
            height: 50.0,
        });
        engine.tick(0.016, &mut renderer).unwrap();

        let viewport = engine.viewport();
        assert_eq!((viewport.left + viewport.right) / 2.0, 10.0);
        assert_eq!((viewport.top + viewport.bottom) / 2.0, 20.0);
        assert_eq!(viewport.right - viewport.left, 200.0);
        assert_eq!(viewport.bottom - viewport.top, 50.0);
    }

    #[test]
    fn test_set_view_clamps_zoom() {
        let mut engine = engine();
        engine.set_view(Point::default(), 3.0);
        // Never magnified past full resolution
        assert_eq!(engine.zoom(), 0.0);
    }

    #[test]
    fn test_tick_clears_before_drawing() {
        let mut engine = engine();
        let mut renderer = RecordingRenderer::new();

        engine.tick(0.016, &mut renderer).unwrap();
        engine.tick(0.016, &mut renderer).unwrap();

        assert_eq!(renderer.frames_begun, 2);
        assert_eq!(renderer.clears, 2);
    }

    #[test]
    fn test_run_stops_on_cancellation() {
        let mut engine = engine();
        let mut renderer = RecordingRenderer::new();
        let token = CancellationToken::new();

        let remote = token.clone();
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(60));
            remote.cancel();
        });

        engine.run(&mut renderer, &token).unwrap();
        canceller.join().unwrap();

        assert!(token.is_cancelled());
        // ~60ms at 60fps: a handful of frames, not thousands
        assert!(renderer.frames_begun >= 1);
        assert!(renderer.frames_begun < 100);
    }

    #[test]
    fn test_dispose_stops_ticking() {
        let mut engine = engine();
        let mut renderer = RecordingRenderer::new();

        engine.dispose();
        engine.dispose();
        engine.tick(0.016, &mut renderer).unwrap();
        assert_eq!(renderer.frames_begun, 0);
    }

    #[test]
    fn test_from_item_builds_layer_stack() {
        let json = r#"{
            "options": { "viewport": { "width": 100, "height": 100 } },
            "layers": [
                {
                    "type": "deep-image",
                    "title": "Recto",
                    "imageSrc": "tiles/recto",
                    "width": 512,
                    "height": 512,
                    "tileSize": 256,
                    "tileOverlap": 0,
                    "minZoom": -1,
                    "maxZoom": 0,
                    "exclusive": true
                },
                {
                    "type": "deep-image",
                    "imageSrc": "tiles/verso",
                    "width": 512,
                    "height": 512,
                    "tileSize": 256,
                    "tileOverlap": 0,
                    "minZoom": -1,
                    "maxZoom": 0
                }
            ]
        }"#;
        let item = DeepZoomItem::from_json(json).unwrap();

        let engine = DeepZoomEngine::from_item(
            100.0,
            100.0,
            &item,
            EngineOptions::default(),
            Arc::new(|_: &str| Err("offline".into())),
        )
        .unwrap();

        assert_eq!(engine.compositor().len(), 2);
        let names: Vec<_> = engine
            .compositor()
            .controls()
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(names, vec!["Recto", "layer-1"]);
        assert!(engine.compositor().control("Recto").unwrap().exclusive);
    }
}

use crate::core::config::DeepImageLayerOptions;
use crate::core::constants::MIN_VISIBLE_OPACITY;
use crate::core::geo::{Rect, TileCoord};
use crate::core::pyramid::PyramidGeometry;
use crate::core::viewport::Viewport;
use crate::layers::base::Layer;
use crate::rendering::context::TileRenderer;
use crate::tiles::{ObjectPool, TileAddressGenerator, TileCache, TileLoader, TileSource};
use crate::Result;
use std::sync::Arc;

/// Observer invoked when a tile fetch fails. The tile is skipped either way;
/// this only lets the host see the failures it would otherwise never hear
/// about.
pub type TileErrorHook = Box<dyn Fn(TileCoord, &str) + Send + Sync>;

/// Pooled draw primitive filled in per visible tile each frame
#[derive(Debug, Clone, Default)]
struct DrawCommand {
    dest: Rect,
    source: Rect,
    opacity: f64,
    data: Option<Arc<Vec<u8>>>,
}

/// A tiled multi-resolution image layer.
///
/// Owns the pyramid geometry and tile cache for one image and composites the
/// two integer zoom levels adjacent to the engine's continuous zoom with a
/// linear crossfade, so zooming never snaps between discrete levels.
pub struct DeepImageLayer {
    options: DeepImageLayerOptions,
    pyramid: PyramidGeometry,
    generator: TileAddressGenerator,
    cache: TileCache,
    loader: TileLoader,
    source: Box<dyn TileSource>,
    pool: ObjectPool<DrawCommand>,
    on_tile_error: Option<TileErrorHook>,
    opacity: f64,
    visible: bool,
    disposed: bool,
}

impl DeepImageLayer {
    /// Builds the layer and its pyramid. Fails with `InvalidPyramidConfig`
    /// for non-positive dimensions or an inverted zoom range; nothing is
    /// fetched yet.
    pub fn new(
        options: DeepImageLayerOptions,
        source: Box<dyn TileSource>,
        loader: TileLoader,
    ) -> Result<Self> {
        let pyramid = PyramidGeometry::build(
            options.content_width,
            options.content_height,
            options.tile_size,
            options.viewport_width,
            options.viewport_height,
            options.min_zoom,
            options.max_zoom,
        )?;

        let generator = TileAddressGenerator::new(options.tile_overlap, options.max_zoom);

        log::debug!(
            "deep image layer: {}x{} px, {} levels",
            options.content_width,
            options.content_height,
            pyramid.level_count()
        );

        Ok(Self {
            opacity: options.opacity,
            visible: options.visible,
            options,
            pyramid,
            generator,
            cache: TileCache::new(),
            loader,
            source,
            pool: ObjectPool::new(DrawCommand::default, 0),
            on_tile_error: None,
            disposed: false,
        })
    }

    /// Observe tile fetch failures instead of having them silently swallowed
    pub fn with_tile_error_hook(mut self, hook: TileErrorHook) -> Self {
        self.on_tile_error = Some(hook);
        self
    }

    pub fn options(&self) -> &DeepImageLayerOptions {
        &self.options
    }

    pub fn pyramid(&self) -> &PyramidGeometry {
        &self.pyramid
    }

    pub fn cache(&self) -> &TileCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut TileCache {
        &mut self.cache
    }

    /// Write completed fetches back into the cache. Runs on the render
    /// tick's thread, keeping the cache single-writer.
    fn absorb_loaded_tiles(&mut self) {
        for result in self.loader.drain() {
            match result.data {
                Ok(bytes) => {
                    self.cache.put(result.coord, Arc::new(bytes));
                }
                Err(e) => {
                    log::warn!("skipping tile {}: {}", result.coord, e);
                    self.cache.mark_failed(result.coord);
                    if let Some(hook) = &self.on_tile_error {
                        hook(result.coord, &e);
                    }
                }
            }
        }
    }

    /// Queue every visible tile of one integer level into the frame pool at
    /// the given effective opacity, issuing fetches for tiles not yet cached.
    fn queue_level(&mut self, zoom: i32, opacity: f64, view: &Rect) {
        if opacity < MIN_VISIBLE_OPACITY {
            return;
        }
        let Some(level) = self.pyramid.level(zoom) else {
            return;
        };

        for address in self.generator.visible_tiles(level, view) {
            if let Some(data) = self.cache.ready(&address.coord) {
                let command = self.pool.next();
                command.dest = address.dest;
                command.source = address.source;
                command.opacity = opacity;
                command.data = Some(data);
            } else if self.cache.mark_loading(address.coord) {
                self.loader.start(self.source.as_ref(), address.coord);
            }
        }
    }
}

impl Layer for DeepImageLayer {
    fn render(
        &mut self,
        viewport: &Viewport,
        zoom: f64,
        renderer: &mut dyn TileRenderer,
    ) -> Result<()> {
        if self.disposed {
            return Ok(());
        }

        self.absorb_loaded_tiles();

        // Crossfade between the two integer levels around the continuous
        // zoom: the coarser level carries 1-blend, the finer carries blend,
        // so the weights always sum to the layer opacity. At an exact
        // integer zoom only that level draws.
        let z = zoom + self.options.max_zoom as f64;
        let z1 = z.floor();
        let blend = z - z1;

        let view = viewport.world_rect();
        self.pool.begin();
        self.queue_level(z1 as i32, (1.0 - blend) * self.opacity, &view);
        self.queue_level(z1 as i32 + 1, blend * self.opacity, &view);

        for command in self.pool.in_use() {
            if let Some(data) = &command.data {
                renderer.draw_tile(command.dest, command.source, data, command.opacity)?;
            }
        }

        Ok(())
    }

    fn opacity(&self) -> f64 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.cache.clear();
        self.pool.clear();
        self.disposed = true;
        log::debug!("deep image layer disposed");
    }
}

impl Drop for DeepImageLayer {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;
    use crate::rendering::context::RecordingRenderer;
    use crate::tiles::source::UrlFn;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn options() -> DeepImageLayerOptions {
        DeepImageLayerOptions {
            tile_size: 256,
            tile_overlap: 0,
            viewport_width: 100.0,
            viewport_height: 100.0,
            content_width: 512,
            content_height: 512,
            min_zoom: -1,
            max_zoom: 0,
            ..Default::default()
        }
    }

    fn layer_with_fetch(
        fetch: impl Fn(&str) -> std::result::Result<Vec<u8>, String> + Send + Sync + 'static,
    ) -> DeepImageLayer {
        DeepImageLayer::new(
            options(),
            Box::new(UrlFn(|zoom: i32, x: u32, y: u32| {
                format!("{}/{}_{}", zoom, x, y)
            })),
            TileLoader::new(Arc::new(fetch)),
        )
        .unwrap()
    }

    fn viewport() -> Viewport {
        let mut viewport = Viewport::new(100.0, 100.0);
        viewport.update(Point::new(50.0, 50.0), 0.0);
        viewport
    }

    fn fill_cache(layer: &mut DeepImageLayer) {
        for zoom in [-1, 0] {
            let level = *layer.pyramid().level(zoom).unwrap();
            for x in 0..level.tile_columns {
                for y in 0..level.tile_rows {
                    layer
                        .cache_mut()
                        .put(TileCoord::new(x, y, zoom), Arc::new(vec![0u8; 4]));
                }
            }
        }
    }

    #[test]
    fn test_integer_zoom_draws_single_level() {
        let mut layer = layer_with_fetch(|_| Err("offline".into()));
        fill_cache(&mut layer);

        let mut renderer = RecordingRenderer::new();
        layer.render(&viewport(), 0.0, &mut renderer).unwrap();

        // All four full-resolution tiles, each at full weight
        assert_eq!(renderer.calls.len(), 4);
        for call in &renderer.calls {
            assert_eq!(call.opacity, 1.0);
        }
    }

    #[test]
    fn test_fractional_zoom_crossfades_adjacent_levels() {
        let mut layer = layer_with_fetch(|_| Err("offline".into()));
        fill_cache(&mut layer);

        let mut viewport = Viewport::new(100.0, 100.0);
        viewport.update(Point::new(50.0, 50.0), -0.25);

        let mut renderer = RecordingRenderer::new();
        layer.render(&viewport, -0.25, &mut renderer).unwrap();

        // z = -0.25: level -1 at 0.25, level 0 at 0.75
        let coarse: Vec<_> = renderer
            .calls
            .iter()
            .filter(|c| (c.opacity - 0.25).abs() < 1e-12)
            .collect();
        let fine: Vec<_> = renderer
            .calls
            .iter()
            .filter(|c| (c.opacity - 0.75).abs() < 1e-12)
            .collect();

        assert_eq!(coarse.len(), 1, "one tile at level -1");
        assert_eq!(fine.len(), 4, "four tiles at level 0");
        assert_eq!(coarse.len() + fine.len(), renderer.calls.len());
    }

    #[test]
    fn test_blend_weights_sum_to_one() {
        for zoom in [-0.75f64, -0.5, -0.1, 0.0] {
            let z1 = zoom.floor();
            let blend: f64 = zoom - z1;
            assert!((blend + (1.0 - blend) - 1.0).abs() < 1e-12);
            if zoom == zoom.floor() {
                assert_eq!(blend, 0.0);
            }
        }
    }

    #[test]
    fn test_unresolved_tiles_are_skipped_and_fetched_once() {
        static FETCHES: AtomicUsize = AtomicUsize::new(0);
        let mut layer = layer_with_fetch(|_| {
            FETCHES.fetch_add(1, Ordering::SeqCst);
            // Never resolves within the test window
            std::thread::sleep(std::time::Duration::from_secs(5));
            Ok(vec![])
        });

        let mut renderer = RecordingRenderer::new();
        // Two frames before any fetch resolves
        layer.render(&viewport(), 0.0, &mut renderer).unwrap();
        layer.render(&viewport(), 0.0, &mut renderer).unwrap();

        assert!(renderer.calls.is_empty(), "pending tiles are not drawn");
        assert_eq!(layer.cache().len(), 4, "all visible tiles marked in-flight");
        // Spawned exactly one worker per tile despite two frames
        std::thread::sleep(std::time::Duration::from_millis(50));
        assert_eq!(FETCHES.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_failed_fetch_invokes_hook_and_skips() {
        static ERRORS: AtomicUsize = AtomicUsize::new(0);
        let mut layer = layer_with_fetch(|_| Err("404".into()))
            .with_tile_error_hook(Box::new(|_, _| {
                ERRORS.fetch_add(1, Ordering::SeqCst);
            }));

        let mut renderer = RecordingRenderer::new();
        layer.render(&viewport(), 0.0, &mut renderer).unwrap();

        // Wait for the failures to come back, then absorb them
        std::thread::sleep(std::time::Duration::from_millis(100));
        layer.render(&viewport(), 0.0, &mut renderer).unwrap();

        assert_eq!(ERRORS.load(Ordering::SeqCst), 4);
        assert!(renderer.calls.is_empty());
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut layer = layer_with_fetch(|_| Err("offline".into()));
        fill_cache(&mut layer);

        layer.dispose();
        assert!(layer.cache().is_empty());
        layer.dispose();

        // A disposed layer renders nothing
        let mut renderer = RecordingRenderer::new();
        layer.render(&viewport(), 0.0, &mut renderer).unwrap();
        assert!(renderer.calls.is_empty());
    }

    #[test]
    fn test_invalid_options_fail_at_construction() {
        let mut bad = options();
        bad.content_width = 0;
        let result = DeepImageLayer::new(
            bad,
            Box::new(UrlFn(|_, _, _| String::new())),
            TileLoader::new(Arc::new(|_: &str| Err("".into()))),
        );
        assert!(result.is_err());
    }
}

use crate::core::geo::Rect;
use crate::core::viewport::Viewport;
use crate::Result;
use std::sync::Arc;

/// Output contract between the engine and a rendering backend.
///
/// Destination rectangles are in world space; `begin_frame` hands the
/// backend the current viewport so it can set up the world-to-screen
/// transform however its API wants (2D context transform, orthographic
/// camera, CSS grid...). Tile bytes are whatever the layer's fetch function
/// produced; decoding and upload are the backend's business.
pub trait TileRenderer {
    /// Called once per tick before any drawing, with the projection for the
    /// frame
    fn begin_frame(&mut self, viewport: &Viewport) -> Result<()> {
        let _ = viewport;
        Ok(())
    }

    /// Erase the previous frame
    fn clear(&mut self) -> Result<()>;

    /// Draw `source` cropped out of the tile resource into the world-space
    /// `dest` rectangle at the given opacity
    fn draw_tile(
        &mut self,
        dest: Rect,
        source: Rect,
        data: &Arc<Vec<u8>>,
        opacity: f64,
    ) -> Result<()>;
}

/// One recorded `draw_tile` invocation
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub dest: Rect,
    pub source: Rect,
    pub opacity: f64,
    pub byte_len: usize,
}

/// Backend that records draw calls instead of rasterizing, for tests and
/// headless use.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames_begun: usize,
    pub clears: usize,
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total crossfade weight drawn, useful for asserting blend invariants
    pub fn total_opacity(&self) -> f64 {
        self.calls.iter().map(|c| c.opacity).sum()
    }
}

impl TileRenderer for RecordingRenderer {
    fn begin_frame(&mut self, _viewport: &Viewport) -> Result<()> {
        self.frames_begun += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.clears += 1;
        self.calls.clear();
        Ok(())
    }

    fn draw_tile(
        &mut self,
        dest: Rect,
        source: Rect,
        data: &Arc<Vec<u8>>,
        opacity: f64,
    ) -> Result<()> {
        self.calls.push(DrawCall {
            dest,
            source,
            opacity,
            byte_len: data.len(),
        });
        Ok(())
    }
}

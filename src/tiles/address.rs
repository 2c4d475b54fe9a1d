use crate::core::geo::{Rect, TileCoord};
use crate::core::pyramid::PyramidLevel;

/// One visible tile: its coordinate, the crop within the raw tile image
/// (source pixels) and where it lands in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileAddress {
    pub coord: TileCoord,
    pub source: Rect,
    pub dest: Rect,
}

/// Enumerates the tiles of one pyramid level covering a world-space
/// rectangle, with per-tile source crops and destination rectangles.
///
/// A tile is included whenever its world rectangle intersects the viewport
/// rectangle even partially. Raw tile images carry `overlap` extra pixels on
/// every edge that does not touch the image boundary; the source crop trims
/// those interior borders so adjacent tiles meet without seams.
#[derive(Debug, Clone, Copy)]
pub struct TileAddressGenerator {
    overlap: u32,
    max_zoom: i32,
}

impl TileAddressGenerator {
    pub fn new(overlap: u32, max_zoom: i32) -> Self {
        Self { overlap, max_zoom }
    }

    /// Whether a level at `zoom` contributes anything to the composite.
    /// Far past the coarsest useful level (beyond twice the zoom range) it
    /// never does.
    pub fn level_contributes(&self, zoom: i32) -> bool {
        zoom - 2 * self.max_zoom <= 0
    }

    /// Inclusive tile index range `[min_x, max_x] × [min_y, max_y]` covering
    /// `view`, clamped to the level's grid. `None` when nothing is visible.
    pub fn visible_range(
        &self,
        level: &PyramidLevel,
        view: &Rect,
    ) -> Option<(u32, u32, u32, u32)> {
        if !self.level_contributes(level.zoom) {
            return None;
        }

        let min_x = (view.x / level.world_tile_width).floor().max(0.0) as i64;
        let min_y = (view.y / level.world_tile_height).floor().max(0.0) as i64;
        let max_x = ((view.right() / level.world_tile_width).ceil() as i64)
            .min(level.tile_columns as i64 - 1);
        let max_y = ((view.bottom() / level.world_tile_height).ceil() as i64)
            .min(level.tile_rows as i64 - 1);

        if min_x > max_x || min_y > max_y {
            return None;
        }

        Some((min_x as u32, max_x as u32, min_y as u32, max_y as u32))
    }

    /// Source crop and destination rectangle of the tile at `(x, y)`
    pub fn address(&self, level: &PyramidLevel, x: u32, y: u32) -> TileAddress {
        let (content_w, content_h) = level.tile_content_size(x, y);
        let (world_w, world_h) = level.world_tile_size(x, y);

        // The raw tile image has overlap pixels on interior edges only;
        // offset past the leading border and keep exactly the content.
        let sx = if x > 0 { self.overlap } else { 0 };
        let sy = if y > 0 { self.overlap } else { 0 };

        TileAddress {
            coord: TileCoord::new(x, y, level.zoom),
            source: Rect::new(sx as f64, sy as f64, content_w as f64, content_h as f64),
            dest: Rect::new(
                x as f64 * level.world_tile_width,
                y as f64 * level.world_tile_height,
                world_w,
                world_h,
            ),
        }
    }

    /// Iterates the addresses of every tile covering `view`
    pub fn visible_tiles<'a>(
        &self,
        level: &'a PyramidLevel,
        view: &Rect,
    ) -> VisibleTiles<'a> {
        let range = self.visible_range(level, view);
        VisibleTiles {
            generator: *self,
            level,
            range,
            x: range.map(|(min_x, ..)| min_x).unwrap_or(0),
            y: range.map(|(_, _, min_y, _)| min_y).unwrap_or(0),
        }
    }
}

/// Iterator over the visible tile addresses of one level
pub struct VisibleTiles<'a> {
    generator: TileAddressGenerator,
    level: &'a PyramidLevel,
    range: Option<(u32, u32, u32, u32)>,
    x: u32,
    y: u32,
}

impl Iterator for VisibleTiles<'_> {
    type Item = TileAddress;

    fn next(&mut self) -> Option<TileAddress> {
        let (min_x, max_x, _min_y, max_y) = self.range?;

        if self.y > max_y {
            return None;
        }

        let address = self.generator.address(self.level, self.x, self.y);

        if self.x < max_x {
            self.x += 1;
        } else {
            self.x = min_x;
            self.y += 1;
        }
        if self.y > max_y {
            self.range = None;
        }

        Some(address)
    }
}

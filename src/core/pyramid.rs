use crate::{DeepZoomError, Result};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Geometry of one resolution tier of an image pyramid.
///
/// `last_column_excess`/`last_row_excess` give the content size in pixels of
/// the final (possibly partial) tile; when the content is an exact multiple
/// of the tile size the excess equals the full tile size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PyramidLevel {
    pub zoom: i32,
    pub tile_size: u32,
    pub content_width: u32,
    pub content_height: u32,
    pub tile_columns: u32,
    pub tile_rows: u32,
    pub last_column_excess: u32,
    pub last_row_excess: u32,
    /// World-space span of one full tile. Full tiles span the viewport
    /// uniformly; the boundary tile is scaled by its excess fraction.
    pub world_tile_width: f64,
    pub world_tile_height: f64,
    /// World-space span of the last column/row tile
    pub world_excess_width: f64,
    pub world_excess_height: f64,
}

impl PyramidLevel {
    /// Content size in source pixels of the tile at `(col, row)`
    pub fn tile_content_size(&self, col: u32, row: u32) -> (u32, u32) {
        let w = if col == self.tile_columns - 1 {
            self.last_column_excess
        } else {
            self.tile_size
        };
        let h = if row == self.tile_rows - 1 {
            self.last_row_excess
        } else {
            self.tile_size
        };
        (w, h)
    }

    /// World-space span of the tile at `(col, row)`
    pub fn world_tile_size(&self, col: u32, row: u32) -> (f64, f64) {
        let w = if col == self.tile_columns - 1 && self.world_excess_width > 0.0 {
            self.world_excess_width
        } else {
            self.world_tile_width
        };
        let h = if row == self.tile_rows - 1 && self.world_excess_height > 0.0 {
            self.world_excess_height
        } else {
            self.world_tile_height
        };
        (w, h)
    }
}

/// Immutable zoom→level mapping for one layer, computed once at attach time
/// by halving the full-resolution content with ceiling division per step.
#[derive(Debug, Clone)]
pub struct PyramidGeometry {
    levels: FxHashMap<i32, PyramidLevel>,
    tile_size: u32,
    min_zoom: i32,
    max_zoom: i32,
}

impl PyramidGeometry {
    /// Builds every level between `min_zoom` and `max_zoom` (inclusive),
    /// where level `max_zoom` holds the full `content_width × content_height`
    /// image.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        content_width: u32,
        content_height: u32,
        tile_size: u32,
        viewport_width: f64,
        viewport_height: f64,
        min_zoom: i32,
        max_zoom: i32,
    ) -> Result<Self> {
        if tile_size == 0 {
            return Err(DeepZoomError::InvalidPyramidConfig(
                "tile size must be positive".into(),
            ));
        }
        if content_width == 0 || content_height == 0 {
            return Err(DeepZoomError::InvalidPyramidConfig(format!(
                "content dimensions must be positive, got {}x{}",
                content_width, content_height
            )));
        }
        if min_zoom > max_zoom {
            return Err(DeepZoomError::InvalidPyramidConfig(format!(
                "min zoom {} exceeds max zoom {}",
                min_zoom, max_zoom
            )));
        }

        let mut levels = FxHashMap::default();
        let mut w = content_width;
        let mut h = content_height;

        for zoom in (min_zoom..=max_zoom).rev() {
            let tile_columns = w.div_ceil(tile_size);
            let tile_rows = h.div_ceil(tile_size);

            let excess_x = tile_size - (tile_columns * tile_size - w);
            let excess_y = tile_size - (tile_rows * tile_size - h);

            let ts = tile_size as f64;
            let world_tile_width =
                viewport_width / (tile_columns as f64 - 1.0 + excess_x as f64 / ts);
            let world_tile_height =
                viewport_height / (tile_rows as f64 - 1.0 + excess_y as f64 / ts);

            levels.insert(
                zoom,
                PyramidLevel {
                    zoom,
                    tile_size,
                    content_width: w,
                    content_height: h,
                    tile_columns,
                    tile_rows,
                    last_column_excess: excess_x,
                    last_row_excess: excess_y,
                    world_tile_width,
                    world_tile_height,
                    world_excess_width: excess_x as f64 / ts * world_tile_width,
                    world_excess_height: excess_y as f64 / ts * world_tile_height,
                },
            );

            w = w.div_ceil(2);
            h = h.div_ceil(2);
        }

        Ok(Self {
            levels,
            tile_size,
            min_zoom,
            max_zoom,
        })
    }

    pub fn level(&self, zoom: i32) -> Option<&PyramidLevel> {
        self.levels.get(&zoom)
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn min_zoom(&self) -> i32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> i32 {
        self.max_zoom
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

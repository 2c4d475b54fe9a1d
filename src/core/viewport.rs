use crate::core::geo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// The visible world-space rectangle and its pixel dimensions.
///
/// The rectangle is screen-down (`top < bottom`) and is recomputed every
/// frame from the continuous zoom and the view center; it is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub view_width: f64,
    pub view_height: f64,
}

impl Viewport {
    pub fn new(view_width: f64, view_height: f64) -> Self {
        let mut viewport = Self {
            left: 0.0,
            right: 0.0,
            top: 0.0,
            bottom: 0.0,
            view_width,
            view_height,
        };
        viewport.update(Point::default(), 0.0);
        viewport
    }

    /// World units per screen pixel on each axis. Zero for a degenerate
    /// viewport.
    pub fn scale(&self) -> Point {
        if self.view_width <= 0.0 || self.view_height <= 0.0 {
            return Point::default();
        }
        Point::new(
            (self.right - self.left) / self.view_width,
            (self.bottom - self.top) / self.view_height,
        )
    }

    /// Recomputes the world rectangle for the given view center and
    /// continuous zoom. One zoom unit halves or doubles the visible world
    /// extent: `zDiv = 2^zoom`, half extent = `viewSize / (2 * zDiv)`.
    pub fn update(&mut self, view_center: Point, zoom: f64) {
        let z_div = 2_f64.powf(zoom);

        let half_width = self.view_width / (2.0 * z_div);
        let half_height = self.view_height / (2.0 * z_div);

        self.left = view_center.x - half_width;
        self.right = view_center.x + half_width;
        self.top = view_center.y - half_height;
        self.bottom = view_center.y + half_height;
    }

    /// Updates the pixel dimensions, keeping center and zoom. A zero-area
    /// container produces a degenerate but non-crashing rectangle.
    pub fn resize(&mut self, view_width: f64, view_height: f64, view_center: Point, zoom: f64) {
        self.view_width = view_width.max(0.0);
        self.view_height = view_height.max(0.0);
        self.update(view_center, zoom);
    }

    /// Projects a world point to screen pixels
    pub fn project(&self, world: &Point) -> Point {
        let scale = self.scale();
        if scale.x == 0.0 || scale.y == 0.0 {
            return Point::default();
        }
        Point::new((world.x - self.left) / scale.x, (world.y - self.top) / scale.y)
    }

    /// Projects a screen pixel position into world space
    pub fn unproject(&self, screen: &Point) -> Point {
        let scale = self.scale();
        Point::new(screen.x * scale.x + self.left, screen.y * scale.y + self.top)
    }

    /// The visible world rectangle
    pub fn world_rect(&self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.right - self.left,
            self.bottom - self.top,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

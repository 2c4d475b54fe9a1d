use serde::{Deserialize, Serialize};

/// Represents a point in world or screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn floor(&self) -> Point {
        Point::new(self.x.floor(), self.y.floor())
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Axis-aligned rectangle, origin at the top-left corner (screen-down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_corners(min: Point, max: Point) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Checks whether two rectangles overlap, touching edges included
    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.right() < self.x
            || other.x > self.right()
            || other.bottom() < self.y
            || other.y > self.bottom())
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// Address of one tile inside an image pyramid. Identity is the ordered
/// triple, never the resource behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    /// Pyramid zoom level. By convention 0 is full resolution and levels
    /// going toward the coarse end are negative.
    pub zoom: i32,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, zoom: i32) -> Self {
        Self { x, y, zoom }
    }

    /// Parent tile one level coarser, covering this tile's area
    pub fn parent(&self) -> TileCoord {
        TileCoord::new(self.x / 2, self.y / 2, self.zoom - 1)
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.x, self.y, self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_math() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, 2.0);

        assert_eq!(a.add(&b), Point::new(4.0, 6.0));
        assert_eq!(a.subtract(&b), Point::new(2.0, 2.0));
        assert_eq!(b.multiply(2.0), Point::new(2.0, 4.0));
        assert_eq!(Point::new(0.0, 0.0).distance_to(&a), 5.0);
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(20.0, 20.0, 5.0, 5.0);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));

        // Touching edges count as intersecting (no sub-pixel culling)
        let d = Rect::new(10.0, 0.0, 5.0, 5.0);
        assert!(a.intersects(&d));
    }

    #[test]
    fn test_tile_coord_identity() {
        let a = TileCoord::new(1, 2, -3);
        let b = TileCoord::new(1, 2, -3);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "1-2--3");
        assert_eq!(a.parent(), TileCoord::new(0, 1, -4));
    }
}

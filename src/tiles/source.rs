use crate::core::geo::TileCoord;

/// Trait representing anything that can produce tile URLs for a given
/// coordinate. Supplied per layer by the host; the engine never interprets
/// the URL itself.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`
    fn url(&self, coord: TileCoord) -> String;
}

/// Adapter turning a plain `getTileURL(zoom, x, y)` closure into a
/// [`TileSource`]
pub struct UrlFn<F>(pub F);

impl<F> TileSource for UrlFn<F>
where
    F: Fn(i32, u32, u32) -> String + Send + Sync,
{
    fn url(&self, coord: TileCoord) -> String {
        (self.0)(coord.zoom, coord.x, coord.y)
    }
}

/// Tile source for the conventional deep-zoom directory layout
/// `{base}/{levelDir}/{x}_{y}.jpg`, where level directories count up from
/// the coarsest stored level.
pub struct DirectoryTileSource {
    base_url: String,
    max_zoom: i32,
    level_count: i32,
}

impl DirectoryTileSource {
    pub fn new(base_url: impl Into<String>, min_zoom: i32, max_zoom: i32) -> Self {
        Self {
            base_url: base_url.into(),
            max_zoom,
            level_count: max_zoom - min_zoom + 1,
        }
    }
}

impl TileSource for DirectoryTileSource {
    fn url(&self, coord: TileCoord) -> String {
        let level_dir = self.level_count - 1 + (coord.zoom - self.max_zoom);
        format!(
            "{}/{}/{}_{}.jpg",
            self.base_url.trim_end_matches('/'),
            level_dir,
            coord.x,
            coord.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_fn_adapter() {
        let source = UrlFn(|zoom: i32, x: u32, y: u32| format!("t/{}/{}/{}", zoom, x, y));
        assert_eq!(source.url(TileCoord::new(2, 3, -1)), "t/-1/2/3");
    }

    #[test]
    fn test_directory_layout() {
        // Five levels -4..=0 stored in directories 0..=4
        let source = DirectoryTileSource::new("https://host/tiles/", -4, 0);

        assert_eq!(source.url(TileCoord::new(0, 0, 0)), "https://host/tiles/4/0_0.jpg");
        assert_eq!(source.url(TileCoord::new(1, 2, -4)), "https://host/tiles/0/1_2.jpg");
    }
}

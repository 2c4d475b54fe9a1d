pub mod address;
pub mod cache;
pub mod loader;
pub mod pool;
pub mod source;

pub use address::{TileAddress, TileAddressGenerator};
pub use cache::{TileCache, TileState};
pub use loader::{FetchFn, TileLoadResult, TileLoader};
pub use pool::ObjectPool;
pub use source::{DirectoryTileSource, TileSource, UrlFn};

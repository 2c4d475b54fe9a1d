pub mod context;

pub use context::{DrawCall, RecordingRenderer, TileRenderer};

use crate::core::geo::TileCoord;
use crate::tiles::source::TileSource;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread;

#[cfg(feature = "fetch")]
use once_cell::sync::Lazy;
#[cfg(feature = "fetch")]
use reqwest::blocking::Client;

/// Shared blocking HTTP client with a custom User-Agent so that public tile
/// servers don't reject the request. Building the client once avoids the
/// cost of TLS and connection pool setup for every tile.
#[cfg(feature = "fetch")]
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("deepzoom/0.1 (+https://github.com/example/deepzoom)")
        .build()
        .expect("failed to build reqwest blocking client")
});

/// Resolution function the host supplies to turn a tile URL into raw
/// resource bytes. Errors are reported as strings; the engine never retries.
pub type FetchFn = Arc<dyn Fn(&str) -> std::result::Result<Vec<u8>, String> + Send + Sync>;

/// Outcome of one tile fetch, delivered back to the render tick
#[derive(Debug)]
pub struct TileLoadResult {
    pub coord: TileCoord,
    pub data: std::result::Result<Vec<u8>, String>,
}

/// Fetches tiles on detached worker threads and sends the resulting bytes
/// back over a channel. The render tick drains completed results between
/// viewport update and drawing, so cache writes stay on one thread.
pub struct TileLoader {
    fetch: FetchFn,
    tx: Sender<TileLoadResult>,
    rx: Receiver<TileLoadResult>,
}

impl TileLoader {
    /// Create a loader around a host-supplied fetch function
    pub fn new(fetch: FetchFn) -> Self {
        let (tx, rx) = unbounded();
        Self { fetch, tx, rx }
    }

    /// Create a loader backed by the shared blocking HTTP client
    #[cfg(feature = "fetch")]
    pub fn http() -> Self {
        Self::new(Arc::new(|url: &str| {
            let resp = HTTP_CLIENT.get(url).send().map_err(|e| e.to_string())?;
            if !resp.status().is_success() {
                return Err(format!("HTTP {}", resp.status()));
            }
            let bytes = resp.bytes().map_err(|e| e.to_string())?;
            Ok(bytes.to_vec())
        }))
    }

    /// Start fetching the specified tile. The fetch occurs on a detached
    /// thread so it never blocks the render tick; when it finishes
    /// (successfully or not), the result lands in this loader's channel.
    pub fn start(&self, source: &dyn TileSource, coord: TileCoord) {
        let url = source.url(coord);
        let fetch = Arc::clone(&self.fetch);
        let tx = self.tx.clone();

        thread::spawn(move || {
            log::debug!("fetch tile {} from {}", coord, url);
            let data = fetch(&url);
            match &data {
                Ok(bytes) => log::debug!("fetched tile {} ({} bytes)", coord, bytes.len()),
                Err(e) => log::warn!("tile {} fetch failed: {}", coord, e),
            }
            // The receiver may be gone if the layer was disposed mid-fetch
            let _ = tx.send(TileLoadResult { coord, data });
        });
    }

    /// Drain every completed fetch without blocking
    pub fn drain(&self) -> Vec<TileLoadResult> {
        self.rx.try_iter().collect()
    }
}

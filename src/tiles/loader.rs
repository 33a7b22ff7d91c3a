use super::source::TileSource;
use crate::core::geo::TileCoord;
use crate::net;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

/// Attempts per tile before the download is abandoned. A dropped tile is not
/// an error state: it is simply requested again the next time it scrolls into
/// view.
const ATTEMPTS: u32 = 2;
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Fetches tiles on detached background threads and hands the raw bytes back
/// over an `mpsc` channel, so the frame loop never blocks on the network.
pub struct TileLoader {
    tx: Sender<(TileCoord, Vec<u8>)>,
}

impl TileLoader {
    pub fn new(tx: Sender<(TileCoord, Vec<u8>)>) -> Self {
        Self { tx }
    }

    /// Kicks off a download for `coord`. The bytes arrive on the channel
    /// when, and only if, the request succeeds.
    pub fn start_download(&self, source: &dyn TileSource, coord: TileCoord) {
        let url = source.url(coord);
        let tx = self.tx.clone();

        thread::spawn(move || match fetch_tile(&url) {
            Ok(bytes) => {
                log::trace!(
                    "tile {}/{}/{} ready ({} bytes)",
                    coord.z,
                    coord.x,
                    coord.y,
                    bytes.len()
                );
                let _ = tx.send((coord, bytes));
            }
            Err(e) => {
                log::warn!("tile {}/{}/{} unavailable: {}", coord.z, coord.x, coord.y, e);
            }
        });
    }
}

/// Fetches one tile, retrying a transient failure once before giving up.
fn fetch_tile(url: &str) -> crate::Result<Vec<u8>> {
    let mut attempt = 1;
    loop {
        match net::get_bytes(url) {
            Ok(bytes) => return Ok(bytes),
            Err(e) if attempt < ATTEMPTS => {
                log::debug!("retrying {} after: {}", url, e);
                attempt += 1;
                thread::sleep(RETRY_DELAY);
            }
            Err(e) => return Err(e),
        }
    }
}

//! Typed client for the USGS GeoJSON earthquake summary feed.
//!
//! The feed is fetched exactly once, as a single background task whose
//! completion is an explicit `Result`: there is no retry, no timeout beyond
//! the network stack's own, and no recovery. A failed fetch leaves the map
//! without markers.

use crate::{core::geo::LatLng, net, MapError, Result};
use serde::Deserialize;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;

/// Weekly summary endpoint, magnitude 1.0+; no query parameters, no auth
pub const FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/1.0_week.geojson";

/// Feed-level metadata block
#[derive(Debug, Clone, Deserialize)]
pub struct FeedMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Per-event properties consumed by the viewer. The feed contract guarantees
/// these fields are present and well-typed; a document that breaks that fails
/// as one feed-level parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct QuakeProperties {
    pub mag: f64,
    pub place: String,
    /// Event time in epoch milliseconds
    pub time: i64,
}

/// Point geometry: ordered triple of longitude, latitude, depth in km
#[derive(Debug, Clone, Deserialize)]
pub struct QuakeGeometry {
    pub coordinates: [f64; 3],
}

/// One earthquake event record
#[derive(Debug, Clone, Deserialize)]
pub struct QuakeFeature {
    #[serde(default)]
    pub id: Option<String>,
    pub properties: QuakeProperties,
    pub geometry: QuakeGeometry,
}

impl QuakeFeature {
    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.geometry.coordinates[1], self.geometry.coordinates[0])
    }

    pub fn magnitude(&self) -> f64 {
        self.properties.mag
    }

    pub fn depth_km(&self) -> f64 {
        self.geometry.coordinates[2]
    }
}

/// Root feed document
#[derive(Debug, Clone, Deserialize)]
pub struct QuakeFeed {
    #[serde(default)]
    pub metadata: Option<FeedMetadata>,
    pub features: Vec<QuakeFeature>,
}

impl QuakeFeed {
    /// Parses a feed document from raw JSON
    pub fn from_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn fetch(url: &str) -> Result<QuakeFeed> {
    let bytes = net::get_bytes(url)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// One-shot background fetch of the feed.
///
/// The request runs on a detached thread and reports its outcome over an
/// mpsc channel; `poll` yields the `Result` exactly once when it arrives.
pub struct FeedTask {
    rx: Receiver<Result<QuakeFeed>>,
    delivered: bool,
}

impl FeedTask {
    /// Spawns the fetch against the fixed USGS endpoint
    pub fn spawn() -> Self {
        Self::spawn_url(FEED_URL)
    }

    /// Spawns the fetch against an arbitrary feed URL
    pub fn spawn_url(url: &str) -> Self {
        let (tx, rx) = channel();
        let url = url.to_string();

        thread::spawn(move || {
            log::debug!("fetching earthquake feed from {}", url);
            let result = fetch(&url);
            match &result {
                Ok(feed) => log::info!("feed fetched: {} features", feed.len()),
                Err(e) => log::warn!("feed fetch failed: {}", e),
            }
            let _ = tx.send(result);
        });

        Self {
            rx,
            delivered: false,
        }
    }

    /// Non-blocking check for the fetch outcome. Returns the result once,
    /// then `None` forever after.
    pub fn poll(&mut self) -> Option<Result<QuakeFeed>> {
        if self.delivered {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.delivered = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.delivered = true;
                Some(Err(MapError::Feed("feed task vanished".to_string())))
            }
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    {
        "type": "FeatureCollection",
        "metadata": {"title": "USGS Magnitude 1.0+ Earthquakes, Past Week", "count": 2},
        "features": [
            {
                "type": "Feature",
                "id": "ak0231",
                "properties": {"mag": 2.4, "place": "42 km W of Anchor Point, Alaska", "time": 1700000000000},
                "geometry": {"type": "Point", "coordinates": [-152.4, 59.7, 61.2]}
            },
            {
                "type": "Feature",
                "properties": {"mag": -0.3, "place": "8 km NW of The Geysers, CA", "time": 1700000100000},
                "geometry": {"type": "Point", "coordinates": [-122.8, 38.8, 1.4]}
            }
        ]
    }
    "#;

    #[test]
    fn test_feed_parsing() {
        let feed = QuakeFeed::from_str(SAMPLE).unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(
            feed.metadata.unwrap().title.unwrap(),
            "USGS Magnitude 1.0+ Earthquakes, Past Week"
        );

        let first = &feed.features[0];
        assert_eq!(first.magnitude(), 2.4);
        assert_eq!(first.depth_km(), 61.2);
        assert_eq!(first.lat_lng(), LatLng::new(59.7, -152.4));
        assert_eq!(first.id.as_deref(), Some("ak0231"));

        // Negative magnitudes come through unchanged
        assert_eq!(feed.features[1].magnitude(), -0.3);
    }

    #[test]
    fn test_document_order_preserved() {
        let feed = QuakeFeed::from_str(SAMPLE).unwrap();
        let places: Vec<&str> = feed
            .features
            .iter()
            .map(|f| f.properties.place.as_str())
            .collect();
        assert_eq!(
            places,
            vec![
                "42 km W of Anchor Point, Alaska",
                "8 km NW of The Geysers, CA"
            ]
        );
    }

    #[test]
    fn test_malformed_document_is_one_feed_error() {
        let err = QuakeFeed::from_str(r#"{"type": "FeatureCollection"}"#).unwrap_err();
        assert!(matches!(err, MapError::Serialization(_)));
    }

    #[test]
    fn test_feed_task_delivers_exactly_once() {
        // Port 0 is never connectable, so the fetch fails fast.
        let mut task = FeedTask::spawn_url("http://127.0.0.1:0/");

        let outcome = loop {
            if let Some(result) = task.poll() {
                break result;
            }
            thread::sleep(std::time::Duration::from_millis(10));
        };
        assert!(outcome.is_err());
        assert!(task.is_delivered());

        // The outcome was consumed; later polls stay quiet even though the
        // worker thread has hung up its sender.
        for _ in 0..3 {
            assert!(task.poll().is_none());
        }
    }
}

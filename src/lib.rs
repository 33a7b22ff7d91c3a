//! # seismap
//!
//! An interactive viewer for the USGS live earthquake feed, built as a
//! Leaflet-style slippy map on top of egui.
//!
//! The library provides the map substrate (Web Mercator geo types, viewport,
//! tile layers on street/topographic basemaps), a typed client for the USGS
//! weekly GeoJSON summary feed, and the earthquake overlay that draws one
//! circle marker per event: radius scales with magnitude, fill color encodes
//! depth. A legend, an info panel and a layer toggle ride on top of the map.

pub mod core;
pub mod data;
pub mod layers;
mod net;
pub mod style;
pub mod tiles;
pub mod ui;

// Re-export public API
pub use crate::core::{
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::Map,
    viewport::Viewport,
};

pub use layers::{base::Layer, quake::QuakeLayer, tile::TileLayer};

pub use data::feed::{FeedTask, QuakeFeature, QuakeFeed};

pub use style::{marker_color, marker_size, style_for, MarkerStyle};

pub use ui::{popup::Popup, widget::MapWidget};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),
}

/// Error type alias for convenience
pub type Error = MapError;

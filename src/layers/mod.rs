pub mod base;
pub mod quake;
pub mod tile;

pub use base::{Layer, LayerKind, LayerProperties};
pub use quake::{CircleMarker, QuakeLayer};
pub use tile::{TileLayer, TileLayerOptions};

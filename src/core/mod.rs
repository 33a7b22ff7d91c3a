pub mod geo;
pub mod map;
pub mod viewport;

pub use geo::{LatLng, LatLngBounds, Point, TileCoord};
pub use map::Map;
pub use viewport::Viewport;

use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Pixel size of one tile at zoom 0
pub const TILE_SIZE: f64 = 256.0;

/// The current view of the map: center, zoom, and screen dimensions.
///
/// All pixel math is Web Mercator (EPSG:3857) in a coordinate space where the
/// map center sits at the middle of the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }

    pub fn set_center(&mut self, center: LatLng) {
        self.center = center;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let scale = TILE_SIZE * 2_f64.powf(zoom.unwrap_or(self.zoom));
        let lat_rad = LatLng::clamp_lat(lat_lng.lat).to_radians();

        let x = (lat_lng.lng + 180.0) / 360.0 * scale;
        let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * scale;

        Point::new(x, y)
    }

    /// Unprojects world pixel coordinates back to a LatLng
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let scale = TILE_SIZE * 2_f64.powf(zoom.unwrap_or(self.zoom));

        let lng = pixel.x / scale * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * pixel.y / scale)).sinh().atan().to_degrees();

        LatLng::new(lat, lng)
    }

    /// Converts a geographical coordinate to viewport-relative pixel coordinates
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let world = self.project(lat_lng, None);
        let center = self.project(&self.center, None);

        Point::new(
            world.x - center.x + self.size.x / 2.0,
            world.y - center.y + self.size.y / 2.0,
        )
    }

    /// Converts viewport-relative pixel coordinates back to a geographical coordinate
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let center = self.project(&self.center, None);
        let world = Point::new(
            center.x + pixel.x - self.size.x / 2.0,
            center.y + pixel.y - self.size.y / 2.0,
        );
        self.unproject(&world, None)
    }

    /// Pans the view by a drag delta in pixels. Dragging the map right moves
    /// the center west, so the center shifts against the delta.
    pub fn pan(&mut self, delta: Point) {
        let center_px = self.project(&self.center, None);
        let shifted = center_px.subtract(&delta);
        self.center = self.unproject(&shifted, None);
    }

    /// Zooms to a level, keeping the given viewport pixel geographically
    /// stationary when a focus point is provided.
    pub fn zoom_to(&mut self, zoom: f64, focus: Option<Point>) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < 0.001 {
            return;
        }

        match focus {
            Some(focus_px) => {
                let anchor = self.pixel_to_lat_lng(&focus_px);
                self.zoom = new_zoom;
                let drifted = self.lat_lng_to_pixel(&anchor);
                let correction = drifted.subtract(&focus_px);
                let center_px = self.project(&self.center, None);
                self.center = self.unproject(&center_px.add(&correction), None);
            }
            None => self.zoom = new_zoom,
        }
    }

    /// Geographic bounds currently visible in the viewport
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.pixel_to_lat_lng(&Point::new(self.size.x, self.size.y));

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }
}

//! The earthquake overlay: one circle marker per feed feature, in feed
//! document order, styled by the style resolver and carrying a popup string
//! built from the feature's place, time, magnitude and depth.

use crate::{
    core::{
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    data::feed::{QuakeFeature, QuakeFeed},
    layers::base::{Layer, LayerKind, LayerProperties},
    style::{style_for, MarkerStyle},
    Result,
};

/// A styled point marker with popup content
#[derive(Debug, Clone)]
pub struct CircleMarker {
    position: LatLng,
    style: MarkerStyle,
    popup_text: String,
}

impl CircleMarker {
    pub fn new(position: LatLng, style: MarkerStyle) -> Self {
        Self {
            position,
            style,
            popup_text: String::new(),
        }
    }

    pub fn with_popup(mut self, text: String) -> Self {
        self.popup_text = text;
        self
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    pub fn popup_text(&self) -> &str {
        &self.popup_text
    }
}

/// Popup content for one event: place, formatted time, magnitude, depth.
/// Direct interpolation of feed values, no escaping.
pub fn popup_text(feature: &QuakeFeature) -> String {
    let when = chrono::DateTime::from_timestamp_millis(feature.properties.time)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| feature.properties.time.to_string());

    format!(
        "{}\n{}\nMagnitude: {}\nDepth: {} km",
        feature.properties.place,
        when,
        feature.magnitude(),
        feature.depth_km()
    )
}

fn marker_for(feature: &QuakeFeature) -> CircleMarker {
    CircleMarker::new(feature.lat_lng(), style_for(feature)).with_popup(popup_text(feature))
}

/// Togglable overlay holding all earthquake markers
pub struct QuakeLayer {
    properties: LayerProperties,
    markers: Vec<CircleMarker>,
}

impl QuakeLayer {
    pub fn new(id: String, name: String) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerKind::Overlay),
            markers: Vec::new(),
        }
    }

    /// Rebuild the marker set from a fetched feed, preserving document order.
    /// Markers from a previous populate are discarded.
    pub fn populate(&mut self, feed: &QuakeFeed) {
        self.markers = feed.features.iter().map(marker_for).collect();
        log::info!("quake layer populated with {} markers", self.markers.len());
    }

    pub fn markers(&self) -> &[CircleMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Find the marker under a viewport-relative pixel, if any. Markers are
    /// tested back-to-front so the topmost drawn marker wins ties.
    pub fn hit_test(&self, viewport: &Viewport, pixel: &Point) -> Option<usize> {
        for (idx, marker) in self.markers.iter().enumerate().rev() {
            let center = viewport.lat_lng_to_pixel(&marker.position);
            let reach = marker.style.radius.max(6.0);
            if center.distance_to(pixel) <= reach {
                return Some(idx);
            }
        }
        None
    }
}

impl Layer for QuakeLayer {
    fn id(&self) -> &str {
        &self.properties.id
    }

    fn name(&self) -> &str {
        &self.properties.name
    }

    fn kind(&self) -> LayerKind {
        self.properties.kind
    }

    fn z_index(&self) -> i32 {
        self.properties.z_index
    }

    fn is_visible(&self) -> bool {
        self.properties.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.properties.visible = visible;
    }

    fn render(&mut self, painter: &egui::Painter, viewport: &Viewport) -> Result<()> {
        if !self.is_visible() {
            return Ok(());
        }

        let origin = painter.clip_rect().min;
        let clip = painter.clip_rect();

        for marker in &self.markers {
            let px = viewport.lat_lng_to_pixel(&marker.position);
            let center = origin + egui::vec2(px.x as f32, px.y as f32);
            let radius = marker.style.radius as f32;

            if radius <= 0.0 {
                // Degenerate radii (zero or negative magnitudes) draw nothing
                continue;
            }
            if !clip.expand(radius).contains(center) {
                continue;
            }

            painter.circle_filled(center, radius, marker.style.fill());
            painter.circle_stroke(center, radius, marker.style.stroke());
        }

        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::feed::QuakeFeed;

    fn sample_feed() -> QuakeFeed {
        QuakeFeed::from_str(
            r#"
            {
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "properties": {"mag": 4.5, "place": "120 km SSW of Severo-Kuril'sk, Russia", "time": 1700000000000},
                        "geometry": {"type": "Point", "coordinates": [155.6, 49.5, 48.0]}
                    },
                    {
                        "type": "Feature",
                        "properties": {"mag": 1.2, "place": "6 km ENE of Pahala, Hawaii", "time": 1700003600000},
                        "geometry": {"type": "Point", "coordinates": [-155.4, 19.2, 31.5]}
                    },
                    {
                        "type": "Feature",
                        "properties": {"mag": 2.8, "place": "48 km S of Whites City, New Mexico", "time": 1700007200000},
                        "geometry": {"type": "Point", "coordinates": [-104.4, 31.7, 5.9]}
                    }
                ]
            }
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_populate_one_marker_per_feature() {
        let mut layer = QuakeLayer::new("quakes".into(), "Earthquakes".into());
        let feed = sample_feed();
        layer.populate(&feed);

        assert_eq!(layer.len(), feed.len());
        for (marker, feature) in layer.markers().iter().zip(&feed.features) {
            assert!(!marker.popup_text().is_empty());
            assert!(marker.popup_text().contains(&feature.properties.place));
            assert!(marker
                .popup_text()
                .contains(&feature.magnitude().to_string()));
            assert_eq!(marker.position(), feature.lat_lng());
        }
    }

    #[test]
    fn test_populate_preserves_document_order() {
        let mut layer = QuakeLayer::new("quakes".into(), "Earthquakes".into());
        layer.populate(&sample_feed());

        assert!(layer.markers()[0].popup_text().contains("Severo-Kuril'sk"));
        assert!(layer.markers()[1].popup_text().contains("Pahala"));
        assert!(layer.markers()[2].popup_text().contains("Whites City"));
    }

    #[test]
    fn test_repopulate_replaces_markers() {
        let mut layer = QuakeLayer::new("quakes".into(), "Earthquakes".into());
        layer.populate(&sample_feed());
        layer.populate(&sample_feed());
        assert_eq!(layer.len(), 3);
    }

    #[test]
    fn test_popup_formats_time_and_depth() {
        let feed = sample_feed();
        let text = popup_text(&feed.features[0]);
        assert!(text.contains("2023-11-14 22:13:20 UTC"));
        assert!(text.contains("Magnitude: 4.5"));
        assert!(text.contains("Depth: 48 km"));
    }

    #[test]
    fn test_hit_test_finds_marker_under_cursor() {
        use crate::core::geo::Point;
        use crate::core::viewport::Viewport;

        let mut layer = QuakeLayer::new("quakes".into(), "Earthquakes".into());
        let feed = sample_feed();
        layer.populate(&feed);

        let viewport = Viewport::new(feed.features[0].lat_lng(), 5.0, Point::new(800.0, 600.0));
        // First feature sits at the viewport center
        let hit = layer.hit_test(&viewport, &Point::new(400.0, 300.0));
        assert_eq!(hit, Some(0));

        let miss = layer.hit_test(&viewport, &Point::new(50.0, 50.0));
        assert_eq!(miss, None);
    }
}

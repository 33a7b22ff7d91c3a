//! The style resolver: maps one earthquake's magnitude to a marker radius and
//! its depth to a fill color bucket. The depth table here is the single source
//! of truth shared by marker painting and the legend.

use crate::data::feed::QuakeFeature;
use egui::Color32;

/// Linear scale applied to magnitude to get a marker radius in pixels
pub const MARKER_SCALE: f64 = 4.0;

/// Depth thresholds in km paired with fill colors, strictly descending.
/// A depth belongs to the first bucket whose threshold it exceeds.
pub const DEPTH_BUCKETS: [(f64, &str); 7] = [
    (150.0, "#d73027"),
    (100.0, "#f46d43"),
    (50.0, "#fdae61"),
    (25.0, "#fee08b"),
    (10.0, "#d9ef8b"),
    (5.0, "#a6d96a"),
    (2.0, "#66bd63"),
];

/// Color of the open-ended shallowest bucket (depth <= 2 km)
pub const SHALLOW_COLOR: &str = "#1a9850";

/// Marker radius as a linear function of magnitude. Total over the reals:
/// negative feed magnitudes pass through unclamped.
pub fn marker_size(magnitude: f64) -> f64 {
    magnitude * MARKER_SCALE
}

/// Ordered threshold lookup over [`DEPTH_BUCKETS`]. The comparison is a
/// strict greater-than, so a depth exactly equal to a threshold falls into
/// the next lower bucket.
pub fn marker_color(depth_km: f64) -> &'static str {
    for (threshold, color) in DEPTH_BUCKETS {
        if depth_km > threshold {
            return color;
        }
    }
    SHALLOW_COLOR
}

/// Complete visual style for one circle marker, computed fresh per feature
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill_color: &'static str,
    pub color: Color32,
    pub weight: f32,
    pub opacity: f32,
    pub fill_opacity: f32,
}

impl MarkerStyle {
    /// Fill color with the style's fill opacity applied
    pub fn fill(&self) -> Color32 {
        let rgb = hex_color(self.fill_color);
        Color32::from_rgba_unmultiplied(rgb.r(), rgb.g(), rgb.b(), (self.fill_opacity * 255.0) as u8)
    }

    /// Stroke for the marker outline
    pub fn stroke(&self) -> egui::Stroke {
        egui::Stroke::new(self.weight, self.color)
    }
}

/// Composes [`marker_size`] and [`marker_color`] into the full style record
pub fn style_for(feature: &QuakeFeature) -> MarkerStyle {
    MarkerStyle {
        radius: marker_size(feature.magnitude()),
        fill_color: marker_color(feature.depth_km()),
        color: Color32::BLACK,
        weight: 1.0,
        opacity: 1.0,
        fill_opacity: 0.7,
    }
}

/// Parses a `#rrggbb` hex string into an opaque color. Falls back to gray on
/// anything that is not six hex digits.
pub fn hex_color(hex: &str) -> Color32 {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 {
        return Color32::GRAY;
    }
    match u32::from_str_radix(digits, 16) {
        Ok(rgb) => Color32::from_rgb(
            ((rgb >> 16) & 0xff) as u8,
            ((rgb >> 8) & 0xff) as u8,
            (rgb & 0xff) as u8,
        ),
        Err(_) => Color32::GRAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::feed::{QuakeGeometry, QuakeProperties};

    fn feature(mag: f64, depth: f64) -> QuakeFeature {
        QuakeFeature {
            id: Some("test".into()),
            properties: QuakeProperties {
                mag,
                place: "10km W of Somewhere".into(),
                time: 1_700_000_000_000,
            },
            geometry: QuakeGeometry {
                coordinates: [-95.71, 37.09, depth],
            },
        }
    }

    #[test]
    fn test_marker_size_is_linear() {
        for m in [-3.0, 0.0, 0.5, 2.0, 5.0, 9.1] {
            assert_eq!(marker_size(2.0 * m), 2.0 * marker_size(m));
        }
        assert_eq!(marker_size(5.0), 20.0);
        assert_eq!(marker_size(0.0), 0.0);
        // No clamping of negative magnitudes
        assert_eq!(marker_size(-1.0), -4.0);
    }

    #[test]
    fn test_marker_color_concrete_depths() {
        assert_eq!(marker_color(0.0), "#1a9850");
        assert_eq!(marker_color(3.0), "#66bd63");
        assert_eq!(marker_color(151.0), "#d73027");
        assert_eq!(marker_color(150.0), "#f46d43");
    }

    #[test]
    fn test_marker_color_boundary_law() {
        // Exactly at a threshold the strict comparison falls through to the
        // next lower bucket; just above it the bucket at that threshold wins.
        for i in 0..DEPTH_BUCKETS.len() {
            let (threshold, color) = DEPTH_BUCKETS[i];
            let below = DEPTH_BUCKETS.get(i + 1).map(|b| b.1).unwrap_or(SHALLOW_COLOR);
            assert_eq!(marker_color(threshold), below);
            assert_eq!(marker_color(threshold + 1e-9), color);
        }
    }

    #[test]
    fn test_thresholds_strictly_decreasing() {
        for pair in DEPTH_BUCKETS.windows(2) {
            assert!(pair[0].0 > pair[1].0);
        }
    }

    #[test]
    fn test_style_for_composes_both_lookups() {
        let style = style_for(&feature(5.0, 30.0));
        assert_eq!(style.radius, 20.0);
        assert_eq!(style.fill_color, "#fee08b");
        assert_eq!(style.color, Color32::BLACK);
        assert_eq!(style.weight, 1.0);
        assert_eq!(style.opacity, 1.0);
        assert_eq!(style.fill_opacity, 0.7);
    }

    #[test]
    fn test_hex_color_parsing() {
        assert_eq!(hex_color("#d73027"), Color32::from_rgb(0xd7, 0x30, 0x27));
        assert_eq!(hex_color("#1a9850"), Color32::from_rgb(0x1a, 0x98, 0x50));
        assert_eq!(hex_color("nonsense"), Color32::GRAY);
    }
}

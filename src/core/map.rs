use crate::{
    core::{
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    layers::{
        base::{Layer, LayerKind},
        tile::TileLayer,
    },
    MapError, Result,
};

/// The composed application context: viewport plus the full layer set.
///
/// Everything the original viewer kept as top-level globals (base layers,
/// overlay, map handle) lives here as explicit fields, constructed once and
/// handed to the widget and panels. The map enforces base-layer exclusivity:
/// exactly one base layer is visible at a time, while overlays toggle
/// independently.
pub struct Map {
    viewport: Viewport,
    /// Layers in render order (sorted by z-index, base below overlays)
    layers: Vec<Box<dyn Layer>>,
}

impl Map {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            viewport: Viewport::new(center, zoom, size),
            layers: Vec::new(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Adds a layer, keeping render order sorted by z-index. Adding a second
    /// base layer leaves only the first one visible.
    pub fn add_layer(&mut self, layer: Box<dyn Layer>) -> Result<()> {
        if self.layers.iter().any(|l| l.id() == layer.id()) {
            return Err(MapError::Layer(format!("duplicate layer id: {}", layer.id())));
        }

        let mut layer = layer;
        if layer.kind() == LayerKind::Base && self.active_base().is_some() {
            layer.set_visible(false);
        }

        let z = layer.z_index();
        let pos = self
            .layers
            .iter()
            .position(|l| l.z_index() > z)
            .unwrap_or(self.layers.len());
        self.layers.insert(pos, layer);
        Ok(())
    }

    pub fn layer(&self, id: &str) -> Option<&dyn Layer> {
        self.layers.iter().find(|l| l.id() == id).map(|l| l.as_ref())
    }

    /// Applies a function to a specific layer mutably
    pub fn with_layer_mut<F, R>(&mut self, id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn Layer) -> R,
    {
        self.layers
            .iter_mut()
            .find(|l| l.id() == id)
            .map(|l| f(l.as_mut()))
    }

    /// Mutable access to a layer downcast to its concrete type
    pub fn layer_mut_as<T: 'static>(&mut self, id: &str) -> Option<&mut T> {
        self.layers
            .iter_mut()
            .find(|l| l.id() == id)
            .and_then(|l| l.as_any_mut().downcast_mut::<T>())
    }

    /// Ids and names of all base layers, in render order
    pub fn base_layers(&self) -> Vec<(String, String)> {
        self.layers
            .iter()
            .filter(|l| l.kind() == LayerKind::Base)
            .map(|l| (l.id().to_string(), l.name().to_string()))
            .collect()
    }

    /// Ids and names of all overlays, in render order
    pub fn overlays(&self) -> Vec<(String, String)> {
        self.layers
            .iter()
            .filter(|l| l.kind() == LayerKind::Overlay)
            .map(|l| (l.id().to_string(), l.name().to_string()))
            .collect()
    }

    /// Id of the currently visible base layer
    pub fn active_base(&self) -> Option<&str> {
        self.layers
            .iter()
            .find(|l| l.kind() == LayerKind::Base && l.is_visible())
            .map(|l| l.id())
    }

    /// Makes `id` the one visible base layer
    pub fn set_base_layer(&mut self, id: &str) {
        for layer in &mut self.layers {
            if layer.kind() == LayerKind::Base {
                layer.set_visible(layer.id() == id);
            }
        }
        log::debug!("base layer switched to {}", id);
    }

    /// Toggles an overlay on or off
    pub fn set_overlay_visible(&mut self, id: &str, visible: bool) {
        if let Some(layer) = self.layers.iter_mut().find(|l| l.id() == id) {
            if layer.kind() == LayerKind::Overlay {
                layer.set_visible(visible);
            }
        }
    }

    pub fn is_layer_visible(&self, id: &str) -> bool {
        self.layer(id).map(|l| l.is_visible()).unwrap_or(false)
    }

    /// Attribution string of the active base layer
    pub fn attribution(&self) -> Option<String> {
        let id = self.active_base()?;
        let layer = self.layer(id)?;
        layer
            .as_any()
            .downcast_ref::<TileLayer>()
            .map(|t| t.attribution().to_string())
    }

    /// Renders all visible layers in z order
    pub fn render(&mut self, painter: &egui::Painter) -> Result<()> {
        let viewport = self.viewport.clone();
        for layer in &mut self.layers {
            if layer.is_visible() {
                layer.render(painter, &viewport)?;
            }
        }
        Ok(())
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::quake::QuakeLayer;

    fn test_map() -> Map {
        let mut map = Map::new(LatLng::new(37.09, -95.71), 3.5, Point::new(1200.0, 800.0));
        map.add_layer(Box::new(TileLayer::street(
            "street".into(),
            "Street Map".into(),
        )))
        .unwrap();
        map.add_layer(Box::new(TileLayer::topographic(
            "topo".into(),
            "Topographic Map".into(),
        )))
        .unwrap();
        map.add_layer(Box::new(QuakeLayer::new(
            "quakes".into(),
            "Earthquakes".into(),
        )))
        .unwrap();
        map
    }

    #[test]
    fn test_one_base_layer_active() {
        let map = test_map();
        assert_eq!(map.active_base(), Some("street"));
        assert!(!map.is_layer_visible("topo"));
        assert!(map.is_layer_visible("quakes"));
    }

    #[test]
    fn test_base_switch_is_exclusive() {
        let mut map = test_map();
        map.set_base_layer("topo");
        assert_eq!(map.active_base(), Some("topo"));
        assert!(!map.is_layer_visible("street"));
        // Overlay untouched by the base switch
        assert!(map.is_layer_visible("quakes"));
    }

    #[test]
    fn test_overlay_toggles_independently() {
        let mut map = test_map();
        map.set_overlay_visible("quakes", false);
        assert!(!map.is_layer_visible("quakes"));
        assert_eq!(map.active_base(), Some("street"));

        map.set_overlay_visible("quakes", true);
        assert!(map.is_layer_visible("quakes"));
    }

    #[test]
    fn test_overlay_renders_above_base() {
        let map = test_map();
        let bases = map.base_layers();
        assert_eq!(bases.len(), 2);
        let overlays = map.overlays();
        assert_eq!(overlays, vec![("quakes".to_string(), "Earthquakes".to_string())]);
    }

    #[test]
    fn test_duplicate_layer_id_rejected() {
        let mut map = test_map();
        let err = map
            .add_layer(Box::new(QuakeLayer::new(
                "quakes".into(),
                "Earthquakes".into(),
            )))
            .unwrap_err();
        assert!(matches!(err, MapError::Layer(_)));
    }

    #[test]
    fn test_attribution_follows_active_base() {
        let mut map = test_map();
        assert!(map.attribution().unwrap().contains("OpenStreetMap"));
        map.set_base_layer("topo");
        assert!(map.attribution().unwrap().contains("OpenTopoMap"));
    }
}

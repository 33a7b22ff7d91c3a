use crate::{
    core::{
        geo::{LatLng, TileCoord},
        viewport::Viewport,
    },
    layers::base::{Layer, LayerKind, LayerProperties},
    tiles::{loader::TileLoader, source::TemplateSource, source::TileSource},
    Result,
};
use std::{
    collections::{HashMap, HashSet},
    sync::mpsc::{channel, Receiver, TryRecvError},
};

/// Configuration for a tile layer
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TileLayerOptions {
    /// URL template for tiles (e.g. "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png")
    pub url_template: String,
    /// Available subdomains for load balancing
    pub subdomains: Vec<String>,
    /// Attribution text shown on the map
    pub attribution: String,
    /// Tile size in pixels
    pub tile_size: u32,
    /// Maximum zoom level for this tile source
    pub max_zoom: u8,
    /// Minimum zoom level for this tile source
    pub min_zoom: u8,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            attribution: "© OpenStreetMap contributors".to_string(),
            tile_size: 256,
            max_zoom: 18,
            min_zoom: 0,
        }
    }
}

/// A base layer that paints slippy map tiles from a public tile server.
///
/// Downloads happen on background threads via [`TileLoader`]; finished tiles
/// are decoded into egui textures as they arrive and painted with a
/// parent-tile fallback while the exact zoom level is still loading.
pub struct TileLayer {
    properties: LayerProperties,
    options: TileLayerOptions,
    source: TemplateSource,
    loader: TileLoader,
    tile_rx: Receiver<(TileCoord, Vec<u8>)>,
    textures: HashMap<TileCoord, egui::TextureHandle>,
    loading: HashSet<TileCoord>,
}

impl TileLayer {
    pub fn with_options(id: String, name: String, options: TileLayerOptions) -> Self {
        let properties = LayerProperties::new(id, name, LayerKind::Base);
        let source = TemplateSource::new(options.url_template.clone(), options.subdomains.clone());
        let (tx, rx) = channel();

        Self {
            properties,
            options,
            source,
            loader: TileLoader::new(tx),
            tile_rx: rx,
            textures: HashMap::new(),
            loading: HashSet::new(),
        }
    }

    /// OpenStreetMap street basemap
    pub fn street(id: String, name: String) -> Self {
        Self::with_options(id, name, TileLayerOptions::default())
    }

    /// OpenTopoMap topographic basemap
    pub fn topographic(id: String, name: String) -> Self {
        let options = TileLayerOptions {
            url_template: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "Map data: © OpenStreetMap contributors, SRTM | Map style: © OpenTopoMap (CC-BY-SA)"
                .to_string(),
            max_zoom: 17,
            ..TileLayerOptions::default()
        };
        Self::with_options(id, name, options)
    }

    pub fn options(&self) -> &TileLayerOptions {
        &self.options
    }

    pub fn attribution(&self) -> &str {
        &self.options.attribution
    }

    /// Enumerate the tile coordinates covering the viewport, with a one-tile
    /// buffer around the visible edge.
    fn visible_tiles(&self, viewport: &Viewport) -> Vec<TileCoord> {
        let zoom = (viewport.zoom.floor() as u8).clamp(self.options.min_zoom, self.options.max_zoom);
        let tiles_per_axis = 1u32 << zoom;

        let bounds = viewport.bounds();

        let ll_to_tile = |lat: f64, lng: f64| -> (f64, f64) {
            let lat_rad = LatLng::clamp_lat(lat).to_radians();
            let x = (lng + 180.0) / 360.0 * tiles_per_axis as f64;
            let y = (1.0 - lat_rad.tan().asinh() / std::f64::consts::PI) / 2.0
                * tiles_per_axis as f64;
            (x, y)
        };

        let (min_x_f, min_y_f) = ll_to_tile(bounds.north_east.lat, bounds.south_west.lng);
        let (max_x_f, max_y_f) = ll_to_tile(bounds.south_west.lat, bounds.north_east.lng);

        let margin: i32 = 1;
        let min_x = (min_x_f.floor() as i32 - margin).max(0) as u32;
        let max_x = (max_x_f.ceil() as i32 + margin).min(tiles_per_axis as i32 - 1) as u32;
        let min_y = (min_y_f.floor() as i32 - margin).max(0) as u32;
        let max_y = (max_y_f.ceil() as i32 + margin).min(tiles_per_axis as i32 - 1) as u32;

        let mut tiles = Vec::new();
        for x in min_x..=max_x {
            for y in min_y..=max_y {
                tiles.push(TileCoord { x, y, z: zoom });
            }
        }
        tiles
    }

    /// Drain finished downloads, decode them into textures, request missing
    /// tiles and prune tiles far from the current zoom. Called once per frame
    /// from `render`.
    fn update_tiles(&mut self, ctx: &egui::Context, viewport: &Viewport) {
        loop {
            match self.tile_rx.try_recv() {
                Ok((coord, data)) => {
                    self.loading.remove(&coord);
                    match decode_tile(&data) {
                        Ok(color_image) => {
                            let name = format!(
                                "{}-tile-{}-{}-{}",
                                self.properties.id, coord.z, coord.x, coord.y
                            );
                            let handle = ctx.load_texture(
                                name,
                                color_image,
                                egui::TextureOptions::LINEAR,
                            );
                            self.textures.insert(coord, handle);
                        }
                        Err(e) => log::warn!("tile {:?} decode failed: {}", coord, e),
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        // Bounded requests per frame to avoid long stalls
        const MAX_LOAD_PER_CALL: usize = 4;
        let mut started = 0;
        for coord in self.visible_tiles(viewport) {
            if started >= MAX_LOAD_PER_CALL {
                break;
            }
            if !self.textures.contains_key(&coord) && !self.loading.contains(&coord) {
                self.loading.insert(coord);
                self.loader.start_download(&self.source, coord);
                started += 1;
            }
        }

        // Keep near-zoom tiles around for fallback while zooming; purge the rest
        let current_z = viewport.zoom.floor() as i32;
        self.textures
            .retain(|coord, _| (coord.z as i32 - current_z).abs() < 2);
    }

    /// Locate the best texture for a coordinate: the exact tile, or the
    /// nearest parent up the pyramid.
    fn best_texture(&self, coord: TileCoord) -> Option<(TileCoord, &egui::TextureHandle)> {
        if let Some(handle) = self.textures.get(&coord) {
            return Some((coord, handle));
        }
        let mut current = coord;
        while let Some(parent) = current.parent() {
            if let Some(handle) = self.textures.get(&parent) {
                return Some((parent, handle));
            }
            current = parent;
        }
        None
    }

    pub fn is_loading(&self) -> bool {
        !self.loading.is_empty()
    }
}

fn decode_tile(data: &[u8]) -> Result<egui::ColorImage> {
    let decoded = image::load_from_memory(data)
        .map_err(|e| crate::MapError::Render(format!("tile decode: {}", e)))?;
    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, &rgba))
}

impl Layer for TileLayer {
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

        self.update_tiles(painter.ctx(), viewport);

        let origin = painter.clip_rect().min;
        for coord in self.visible_tiles(viewport) {
            if let Some((tile_coord, handle)) = self.best_texture(coord) {
                let tile_bounds = tile_coord.bounds();
                let mut min = viewport.lat_lng_to_pixel(&tile_bounds.south_west);
                let mut max = viewport.lat_lng_to_pixel(&tile_bounds.north_east);
                if min.x > max.x {
                    std::mem::swap(&mut min.x, &mut max.x);
                }
                if min.y > max.y {
                    std::mem::swap(&mut min.y, &mut max.y);
                }

                let rect = egui::Rect::from_min_max(
                    origin + egui::vec2(min.x as f32, min.y as f32),
                    origin + egui::vec2(max.x as f32, max.y as f32),
                );
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(handle.id(), rect, uv, egui::Color32::WHITE);
            }
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
    use crate::core::geo::Point;

    #[test]
    fn test_street_layer() {
        let layer = TileLayer::street("street".to_string(), "Street Map".to_string());
        assert!(layer.options().url_template.contains("openstreetmap.org"));
        assert!(layer.attribution().contains("OpenStreetMap"));
        assert_eq!(layer.kind(), LayerKind::Base);
    }

    #[test]
    fn test_topographic_layer() {
        let layer = TileLayer::topographic("topo".to_string(), "Topographic Map".to_string());
        assert!(layer.options().url_template.contains("opentopomap.org"));
        assert!(layer.attribution().contains("OpenTopoMap"));
        assert_eq!(layer.options().max_zoom, 17);
    }

    #[test]
    fn test_visible_tiles_cover_viewport() {
        let layer = TileLayer::street("street".to_string(), "Street Map".to_string());
        let viewport = Viewport::new(LatLng::new(37.09, -95.71), 3.5, Point::new(1200.0, 800.0));

        let tiles = layer.visible_tiles(&viewport);
        assert!(!tiles.is_empty());

        let center_tile = TileCoord::from_lat_lng(&viewport.center, 3);
        assert!(tiles.contains(&center_tile));
        assert!(tiles.iter().all(|t| t.is_valid()));
    }
}

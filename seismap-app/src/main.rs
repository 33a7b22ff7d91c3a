use seismap::{
    core::geo::{LatLng, Point},
    data::feed::FeedTask,
    layers::{quake::QuakeLayer, tile::TileLayer},
    ui::widget::MapWidget,
    Map,
};

const STREET_ID: &str = "street";
const TOPO_ID: &str = "topo";
const QUAKES_ID: &str = "earthquakes";

/// Standalone earthquake feed viewer
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Seismap - USGS Earthquake Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "seismap-app",
        options,
        Box::new(|cc| Box::new(SeismapApp::new(cc))),
    )?;

    Ok(())
}

/// The main application struct
struct SeismapApp {
    map_widget: MapWidget,
}

impl SeismapApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        // Center on the continental US, matching the feed's home turf
        let center = LatLng::new(37.09, -95.71);
        let zoom = 3.5;
        let size = Point::new(1200.0, 800.0);

        let mut map = Map::new(center, zoom, size);

        // Street basemap loads first and starts active; topo joins hidden
        let street = TileLayer::street(STREET_ID.to_string(), "Street Map".to_string());
        let topo = TileLayer::topographic(TOPO_ID.to_string(), "Topographic Map".to_string());
        let quakes = QuakeLayer::new(QUAKES_ID.to_string(), "Earthquakes".to_string());

        if let Err(e) = map.add_layer(Box::new(street)) {
            log::error!("failed to add street layer: {}", e);
        }
        if let Err(e) = map.add_layer(Box::new(topo)) {
            log::error!("failed to add topo layer: {}", e);
        }
        if let Err(e) = map.add_layer(Box::new(quakes)) {
            log::error!("failed to add earthquake overlay: {}", e);
        }

        // One-shot fetch; no retry or timeout beyond the network stack's own
        let feed = FeedTask::spawn();
        let map_widget = MapWidget::new(map).with_feed(feed, QUAKES_ID);

        Self { map_widget }
    }
}

impl eframe::App for SeismapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.map_widget.show(ui);
            });
    }
}

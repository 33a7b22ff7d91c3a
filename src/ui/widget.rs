use crate::{
    core::{geo::Point, map::Map},
    data::feed::FeedTask,
    layers::quake::QuakeLayer,
    ui::{
        controls::LayerControl,
        panels::{InfoPanel, LegendPanel, Position},
        popup::Popup,
    },
};
use egui::{Align2, Color32, FontId, Rect, Response, Sense, Ui, Vec2};

/// The egui widget that drives the whole viewer each frame: polls the feed
/// task, renders the layer stack, handles pan/zoom/click input and draws the
/// popup, legend, info panel, attribution and layer control on top.
pub struct MapWidget {
    map: Map,
    feed_task: Option<FeedTask>,
    quake_layer_id: Option<String>,
    popup: Option<Popup>,
    layer_control: LayerControl,
    legend: LegendPanel,
    info: InfoPanel,
    background: Color32,
}

impl MapWidget {
    pub fn new(map: Map) -> Self {
        Self {
            map,
            feed_task: None,
            quake_layer_id: None,
            popup: None,
            layer_control: LayerControl::new(),
            legend: LegendPanel::new(),
            info: InfoPanel::new(),
            background: Color32::from_rgb(221, 221, 221),
        }
    }

    /// Attach the one-shot feed fetch; its features will populate the quake
    /// overlay with the given layer id when the response arrives.
    pub fn with_feed(mut self, task: FeedTask, quake_layer_id: impl Into<String>) -> Self {
        self.feed_task = Some(task);
        self.quake_layer_id = Some(quake_layer_id.into());
        self
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    /// Drains the feed task if its result is in. Success populates the
    /// overlay; failure is logged and the map stays empty (no retry).
    fn poll_feed(&mut self) {
        let Some(task) = &mut self.feed_task else {
            return;
        };
        let Some(result) = task.poll() else {
            return;
        };

        match result {
            Ok(feed) => {
                if let Some(id) = self.quake_layer_id.clone() {
                    if let Some(layer) = self.map.layer_mut_as::<QuakeLayer>(&id) {
                        layer.populate(&feed);
                    } else {
                        log::warn!("no quake layer registered under id {}", id);
                    }
                }
            }
            Err(e) => log::warn!("earthquake feed unavailable: {}", e),
        }
    }

    fn handle_input(&mut self, ui: &Ui, response: &Response, rect: Rect) {
        if response.dragged() {
            let delta = response.drag_delta();
            if delta != Vec2::ZERO {
                self.map
                    .viewport_mut()
                    .pan(Point::new(delta.x as f64, delta.y as f64));
                self.popup = None;
            }
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.0 {
                let focus = response
                    .hover_pos()
                    .map(|p| Point::new((p.x - rect.min.x) as f64, (p.y - rect.min.y) as f64));
                let viewport = self.map.viewport_mut();
                let target = viewport.zoom + (scroll as f64) * 0.003;
                viewport.zoom_to(target, focus);
            }
        }

        if response.clicked() {
            self.popup = None;
            if let Some(pos) = response.interact_pointer_pos() {
                let pixel = Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
                self.open_popup_at(&pixel);
            }
        }
    }

    fn open_popup_at(&mut self, pixel: &Point) {
        let Some(id) = self.quake_layer_id.clone() else {
            return;
        };
        if !self.map.is_layer_visible(&id) {
            return;
        }
        let viewport = self.map.viewport().clone();
        if let Some(layer) = self.map.layer_mut_as::<QuakeLayer>(&id) {
            if let Some(idx) = layer.hit_test(&viewport, pixel) {
                let marker = &layer.markers()[idx];
                self.popup = Some(Popup::new(
                    marker.position(),
                    marker.popup_text().to_string(),
                ));
            }
        }
    }

    fn draw_attribution(&self, painter: &egui::Painter, rect: Rect) {
        let Some(text) = self.map.attribution() else {
            return;
        };
        let font = FontId::proportional(10.0);
        let galley = painter.layout_no_wrap(text, font.clone(), Color32::DARK_GRAY);
        let size = galley.size() + Vec2::new(8.0, 4.0);
        let bar = Position::BottomLeft.calculate_rect(rect, size, 0.0);
        painter.rect_filled(bar, 0.0, Color32::from_rgba_premultiplied(250, 250, 250, 200));
        painter.galley(bar.min + Vec2::new(4.0, 2.0), galley, Color32::DARK_GRAY);
    }

    /// Renders one frame of the viewer into the available space.
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());

        self.map.viewport_mut().set_size(Point::new(
            rect.width() as f64,
            rect.height() as f64,
        ));

        self.poll_feed();
        self.handle_input(ui, &response, rect);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, self.background);

        if let Err(e) = self.map.render(&painter) {
            log::error!("layer render failed: {}", e);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "render error",
                FontId::proportional(14.0),
                Color32::RED,
            );
        }

        if let Some(popup) = &self.popup {
            popup.render(&painter, rect, self.map.viewport());
        }

        self.legend.render(&painter, rect);
        self.info.render(&painter, rect);
        self.draw_attribution(&painter, rect);
        self.layer_control.show(ui.ctx(), rect, &mut self.map);

        // Keep the frame loop alive while background downloads trickle in
        ui.ctx()
            .request_repaint_after(std::time::Duration::from_millis(150));

        response
    }
}

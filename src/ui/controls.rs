use crate::core::map::Map;
use egui::{Align2, Context, Rect};

/// Floating layer control: radio choice between the base layers and a
/// checkbox per overlay. Always expanded.
pub struct LayerControl {
    margin: f32,
}

impl LayerControl {
    pub fn new() -> Self {
        Self { margin: 10.0 }
    }

    pub fn show(&mut self, ctx: &Context, container: Rect, map: &mut Map) {
        egui::Area::new("seismap-layer-control")
            .fixed_pos(container.left_top() + egui::vec2(self.margin, self.margin))
            .pivot(Align2::LEFT_TOP)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(egui::RichText::new("Layers").strong());
                    ui.separator();

                    let mut active = map.active_base().unwrap_or_default().to_string();
                    for (id, name) in map.base_layers() {
                        ui.radio_value(&mut active, id, name);
                    }
                    if map.active_base() != Some(active.as_str()) && !active.is_empty() {
                        map.set_base_layer(&active);
                    }

                    ui.separator();
                    for (id, name) in map.overlays() {
                        let mut visible = map.is_layer_visible(&id);
                        if ui.checkbox(&mut visible, name).changed() {
                            map.set_overlay_visible(&id, visible);
                        }
                    }
                });
            });
    }
}

impl Default for LayerControl {
    fn default() -> Self {
        Self::new()
    }
}

use crate::core::{geo::LatLng, viewport::Viewport};
use egui::{Color32, FontId, Painter, Pos2, Rect, Vec2};

#[derive(Debug, Clone)]
pub struct PopupStyle {
    pub background_color: Color32,
    pub border_color: Color32,
    pub border_width: f32,
    pub rounding: f32,
    pub padding: f32,
    pub font_id: FontId,
    pub text_color: Color32,
    pub max_width: f32,
}

impl Default for PopupStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::WHITE,
            border_color: Color32::GRAY,
            border_width: 1.0,
            rounding: 4.0,
            padding: 8.0,
            font_id: FontId::proportional(12.0),
            text_color: Color32::BLACK,
            max_width: 300.0,
        }
    }
}

/// The one open popup, anchored to a marker's geographic position
pub struct Popup {
    pub position: LatLng,
    pub content: String,
    pub style: PopupStyle,
}

impl Popup {
    pub fn new(position: LatLng, content: String) -> Self {
        Self {
            position,
            content,
            style: PopupStyle::default(),
        }
    }

    /// Paints the popup above its anchor point; returns the rect it covered.
    pub fn render(&self, painter: &Painter, container: Rect, viewport: &Viewport) -> Rect {
        let px = viewport.lat_lng_to_pixel(&self.position);
        let anchor = container.min + egui::vec2(px.x as f32, px.y as f32);

        let galley = painter.layout(
            self.content.clone(),
            self.style.font_id.clone(),
            self.style.text_color,
            self.style.max_width - self.style.padding * 2.0,
        );

        let size = Vec2::new(
            galley.size().x + self.style.padding * 2.0,
            galley.size().y + self.style.padding * 2.0,
        );

        // Centered horizontally over the anchor, floating above it
        let mut min = Pos2::new(anchor.x - size.x / 2.0, anchor.y - size.y - 12.0);
        min.x = min.x.clamp(container.min.x, (container.max.x - size.x).max(container.min.x));
        min.y = min.y.max(container.min.y);
        let rect = Rect::from_min_size(min, size);

        painter.rect_filled(rect, self.style.rounding, self.style.background_color);
        painter.rect_stroke(
            rect,
            self.style.rounding,
            (self.style.border_width, self.style.border_color),
        );
        painter.galley(
            rect.min + Vec2::splat(self.style.padding),
            galley,
            self.style.text_color,
        );

        rect
    }
}

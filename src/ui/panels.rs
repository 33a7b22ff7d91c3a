//! Static overlay panels: the depth legend and the info box. Both are built
//! from fixed content — the legend from the depth bucket table, the info box
//! from a constant description — and never depend on fetched data.

use crate::style::{hex_color, marker_color, DEPTH_BUCKETS};
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Vec2};

/// Anchor corner for a floating panel inside the map rect
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Position {
    pub fn calculate_rect(&self, container: Rect, size: Vec2, margin: f32) -> Rect {
        let pos = match self {
            Position::TopLeft => container.min + Vec2::splat(margin),
            Position::TopRight => Pos2::new(container.max.x - margin - size.x, container.min.y + margin),
            Position::BottomLeft => Pos2::new(container.min.x + margin, container.max.y - margin - size.y),
            Position::BottomRight => container.max - Vec2::splat(margin) - size,
        };
        Rect::from_min_size(pos, size)
    }
}

/// One legend entry: a swatch color and its depth range label
#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub color: &'static str,
    pub label: String,
}

/// Builds the legend rows from the fixed depth bucket table, in ascending
/// display order: `0–2` through `100–150`, then the open-ended `150+`.
/// The swatch color is sampled one kilometre inside each bucket, so the
/// strict-threshold lookup lands in the right bucket. Pure and idempotent.
pub fn legend_rows() -> Vec<LegendRow> {
    let mut grades: Vec<f64> = DEPTH_BUCKETS.iter().map(|(t, _)| *t).collect();
    grades.push(0.0);
    grades.reverse();

    grades
        .iter()
        .enumerate()
        .map(|(i, &lower)| {
            let label = match grades.get(i + 1) {
                Some(upper) => format!("{}\u{2013}{}", lower, upper),
                None => format!("{}+", lower),
            };
            LegendRow {
                color: marker_color(lower + 1.0),
                label,
            }
        })
        .collect()
}

const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 250, 235);
const PANEL_MARGIN: f32 = 10.0;
const PANEL_PADDING: f32 = 8.0;

fn panel_frame(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 4.0, PANEL_BG);
    painter.rect_stroke(rect, 4.0, (1.0, Color32::from_gray(160)));
}

/// Depth legend, drawn bottom-right. Built once from the bucket table and
/// never refreshed; it reflects the thresholds, not observed data.
pub struct LegendPanel {
    rows: Vec<LegendRow>,
    heading: String,
}

impl LegendPanel {
    pub fn new() -> Self {
        Self {
            rows: legend_rows(),
            heading: "Depth (km)".to_string(),
        }
    }

    pub fn rows(&self) -> &[LegendRow] {
        &self.rows
    }

    pub fn render(&self, painter: &Painter, container: Rect) {
        let font = FontId::proportional(12.0);
        let row_h = 16.0;
        let swatch = 12.0;

        let label_w = self
            .rows
            .iter()
            .map(|r| {
                painter
                    .layout_no_wrap(r.label.clone(), font.clone(), Color32::BLACK)
                    .size()
                    .x
            })
            .fold(0.0_f32, f32::max);

        let size = Vec2::new(
            swatch + 6.0 + label_w.max(70.0) + PANEL_PADDING * 2.0,
            row_h * (self.rows.len() as f32 + 1.0) + PANEL_PADDING * 2.0,
        );
        let rect = Position::BottomRight.calculate_rect(container, size, PANEL_MARGIN);
        panel_frame(painter, rect);

        let mut cursor = rect.min + Vec2::splat(PANEL_PADDING);
        painter.text(
            cursor,
            Align2::LEFT_TOP,
            &self.heading,
            FontId::proportional(13.0),
            Color32::BLACK,
        );
        cursor.y += row_h;

        for row in &self.rows {
            let swatch_rect = Rect::from_min_size(cursor + egui::vec2(0.0, 2.0), Vec2::splat(swatch));
            painter.rect_filled(swatch_rect, 2.0, hex_color(row.color));
            painter.text(
                Pos2::new(cursor.x + swatch + 6.0, cursor.y),
                Align2::LEFT_TOP,
                &row.label,
                font.clone(),
                Color32::BLACK,
            );
            cursor.y += row_h;
        }
    }
}

impl Default for LegendPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Static text block describing the visual encoding, drawn top-right.
pub struct InfoPanel {
    heading: String,
    body: String,
}

impl InfoPanel {
    pub fn new() -> Self {
        let mut panel = Self {
            heading: String::new(),
            body: String::new(),
        };
        panel.update(None);
        panel
    }

    /// Accepts feature properties to mirror the hover-update hook of the
    /// original control, but always renders the same fixed text.
    pub fn update(&mut self, _props: Option<&crate::data::feed::QuakeProperties>) {
        self.heading = "USGS Live Earthquake Feed For 7 days".to_string();
        self.body = "Circle radius is a function of magnitude\nCircle color is a function of depth"
            .to_string();
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn render(&self, painter: &Painter, container: Rect) {
        let heading_font = FontId::proportional(13.0);
        let body_font = FontId::proportional(12.0);

        let heading_galley =
            painter.layout_no_wrap(self.heading.clone(), heading_font.clone(), Color32::BLACK);
        let body_galley = painter.layout(
            self.body.clone(),
            body_font,
            Color32::DARK_GRAY,
            300.0,
        );

        let size = Vec2::new(
            heading_galley.size().x.max(body_galley.size().x) + PANEL_PADDING * 2.0,
            heading_galley.size().y + 4.0 + body_galley.size().y + PANEL_PADDING * 2.0,
        );
        let rect = Position::TopRight.calculate_rect(container, size, PANEL_MARGIN);
        panel_frame(painter, rect);

        let cursor = rect.min + Vec2::splat(PANEL_PADDING);
        painter.galley(cursor, heading_galley.clone(), Color32::BLACK);
        painter.galley(
            cursor + egui::vec2(0.0, heading_galley.size().y + 4.0),
            body_galley,
            Color32::DARK_GRAY,
        );
    }
}

impl Default for InfoPanel {
    fn default() -> Self {
        Self::new()
    }
}

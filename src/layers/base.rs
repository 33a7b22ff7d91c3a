use crate::{core::viewport::Viewport, Result};

/// Role a layer plays in the map stack. Base layers are mutually exclusive,
/// overlays toggle independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Base,
    Overlay,
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKind::Base => write!(f, "base"),
            LayerKind::Overlay => write!(f, "overlay"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub kind: LayerKind,
    pub z_index: i32,
    pub visible: bool,
}

impl LayerProperties {
    pub fn new(id: String, name: String, kind: LayerKind) -> Self {
        let z_index = match kind {
            LayerKind::Base => 0,
            LayerKind::Overlay => 10,
        };
        Self {
            id,
            name,
            kind,
            z_index,
            visible: true,
        }
    }
}

/// Anything the map can composite: identified, ordered, toggleable,
/// and able to paint itself for the current viewport.
pub trait Layer {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn kind(&self) -> LayerKind;

    fn z_index(&self) -> i32;

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    fn render(&mut self, painter: &egui::Painter, viewport: &Viewport) -> Result<()>;

    fn as_any(&self) -> &dyn std::any::Any;

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_properties_defaults() {
        let base = LayerProperties::new("street".into(), "Street Map".into(), LayerKind::Base);
        assert_eq!(base.z_index, 0);
        assert!(base.visible);

        let overlay =
            LayerProperties::new("quakes".into(), "Earthquakes".into(), LayerKind::Overlay);
        assert_eq!(overlay.z_index, 10);
        assert_eq!(overlay.kind, LayerKind::Overlay);
    }

    #[test]
    fn test_layer_kind_display() {
        assert_eq!(LayerKind::Base.to_string(), "base");
        assert_eq!(LayerKind::Overlay.to_string(), "overlay");
    }
}

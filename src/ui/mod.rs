pub mod controls;
pub mod panels;
pub mod popup;
pub mod widget;

pub use controls::LayerControl;
pub use panels::{legend_rows, InfoPanel, LegendPanel, LegendRow, Position};
pub use popup::{Popup, PopupStyle};
pub use widget::MapWidget;

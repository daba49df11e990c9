//! Data models for the imagemark document.

mod labels;
mod marker_tool;
mod rectangle_label;

pub use labels::{Labels, SelectionOperation};
pub use marker_tool::MarkerTool;
pub use rectangle_label::RectangleLabel;

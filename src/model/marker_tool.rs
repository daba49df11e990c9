//! Interaction modes of the image marker.

use serde::{Deserialize, Serialize};

/// Active tool on the marker canvas.
///
/// Persisted as its integer tag, so the discriminants are part of the file
/// format and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum MarkerTool {
    /// Pan the image by dragging
    #[default]
    Move = 0,
    /// Draw rectangle labels by dragging
    Rectangle = 1,
}

impl MarkerTool {
    /// Get the display name for this tool.
    pub fn name(&self) -> &'static str {
        match self {
            MarkerTool::Move => "Move",
            MarkerTool::Rectangle => "Rectangle",
        }
    }

    /// Get all tools in toolbar order.
    pub fn all() -> &'static [MarkerTool] {
        &[MarkerTool::Move, MarkerTool::Rectangle]
    }
}

impl From<MarkerTool> for u8 {
    fn from(tool: MarkerTool) -> Self {
        tool as u8
    }
}

impl TryFrom<u8> for MarkerTool {
    type Error = String;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        MarkerTool::all()
            .iter()
            .copied()
            .find(|tool| u8::from(*tool) == tag)
            .ok_or_else(|| format!("unknown marker tool tag {}", tag))
    }
}

//! Tool state for the board.

use corkboard_core::note::{Rgba, ShapeKind};
use serde::{Deserialize, Serialize};

/// Available board tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tool {
    #[default]
    Select,
    Text,
    Image,
    Draw,
    Shape,
}

impl Tool {
    /// Short label for toolbars.
    pub fn label(self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Text => "Text",
            Tool::Image => "Image",
            Tool::Draw => "Draw",
            Tool::Shape => "Shape",
        }
    }
}

/// Holds the active tool and the creation defaults that travel with it.
#[derive(Debug, Clone)]
pub struct ToolManager {
    active: Tool,
    /// Shape kind used by the Shape tool.
    pub shape_kind: ShapeKind,
    /// Fill color for new shape notes.
    pub shape_color: Rgba,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            active: Tool::default(),
            shape_kind: ShapeKind::default(),
            shape_color: Rgba::from_hex("#facc15"),
        }
    }
}

impl ToolManager {
    /// Create a tool manager with the select tool active.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active tool.
    pub fn active(&self) -> Tool {
        self.active
    }

    /// Switch tools.
    pub fn set_tool(&mut self, tool: Tool) {
        self.active = tool;
    }
}

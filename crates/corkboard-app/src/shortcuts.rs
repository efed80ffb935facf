//! Keyboard shortcut registry and resolution.

use corkboard_core::input::Modifiers;

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    /// Ctrl on most platforms, Cmd on macOS.
    pub command: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        command: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            command,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Actions a shortcut can trigger on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    SelectTextTool,
    SelectImageTool,
    SelectDrawTool,
    Undo,
    Redo,
    ExportDrawing,
    Cancel,
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("T", true, false, "Select text tool"),
            Shortcut::new("I", true, false, "Select image tool"),
            Shortcut::new("D", true, false, "Select draw tool"),
            Shortcut::new("Z", true, false, "Undo drawing stroke"),
            Shortcut::new("Z", true, true, "Redo drawing stroke"),
            Shortcut::new("S", true, false, "Export drawing as PNG"),
            Shortcut::new("Escape", false, false, "Cancel active gesture or edit"),
        ]
    }

    /// Map a key press to its board action, if any.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<BoardAction> {
        if !modifiers.command() {
            return match key {
                "Escape" => Some(BoardAction::Cancel),
                _ => None,
            };
        }
        match key.to_ascii_lowercase().as_str() {
            "t" => Some(BoardAction::SelectTextTool),
            "i" => Some(BoardAction::SelectImageTool),
            "d" => Some(BoardAction::SelectDrawTool),
            "z" if modifiers.shift => Some(BoardAction::Redo),
            "z" => Some(BoardAction::Undo),
            "s" => Some(BoardAction::ExportDrawing),
            _ => None,
        }
    }
}

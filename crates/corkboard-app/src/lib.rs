//! Corkboard application layer.
//!
//! Headless composition of the core engine: the board controller, tool
//! state, keyboard shortcuts, the clipboard paste pipeline and the
//! identity-provider contract. Rendering and routing between logged-in
//! and logged-out views belong to the embedding shell.

pub mod auth;
pub mod board;
pub mod clipboard;
pub mod shortcuts;
pub mod tools;

pub use auth::{AuthError, IdentityProvider, Session, SessionGate};
pub use board::{BoardController, BoardEvent};
pub use clipboard::{MAX_PASTED_IMAGE_SIDE, PasteError, PastedImage};
pub use shortcuts::{BoardAction, Shortcut, ShortcutRegistry};
pub use tools::{Tool, ToolManager};

//! Board controller: composition root for the interactive surface.
//!
//! Wires the note store, the drag/resize controller and the drawing
//! overlay together, and routes double-clicks, paste payloads, tool
//! switches and keyboard shortcuts.

use crate::clipboard;
use crate::shortcuts::{BoardAction, ShortcutRegistry};
use crate::tools::{Tool, ToolManager};
use corkboard_core::drawing::DrawingEngine;
use corkboard_core::geometry::MIN_NOTE_SIZE;
use corkboard_core::input::{InputState, Modifiers, PointerEvent, PointerId, PointerInput};
use corkboard_core::interaction::{InteractionController, InteractionUpdate};
use corkboard_core::note::{Note, NoteId};
use corkboard_core::snap::{self, GRID_SIZE, SnapMode};
use corkboard_core::store::{NotePatch, NoteStore};
use kurbo::{Point, Rect, Size};

/// Side length of the resize corner region on a note.
const RESIZE_HANDLE_SIZE: f64 = 16.0;

/// Where pasted image notes land.
const PASTE_POSITION: Point = Point::new(100.0, 100.0);

/// The inline text editor opened by double-clicking empty canvas.
#[derive(Debug, Clone)]
struct EditorState {
    position: Point,
    buffer: String,
}

/// An in-progress shape drag-out.
#[derive(Debug, Clone, Copy)]
struct ShapeDraft {
    start: Point,
}

/// Out-of-band results of keyboard handling.
#[derive(Debug, Clone)]
pub enum BoardEvent {
    /// Ctrl/Cmd+S produced a PNG of the drawing overlay.
    DrawingExported(Vec<u8>),
}

/// The interactive board.
pub struct BoardController {
    pub store: NoteStore,
    pub interaction: InteractionController,
    pub drawing: DrawingEngine,
    pub tools: ToolManager,
    /// Snapping applied to shape-tool corners.
    pub snap_mode: SnapMode,
    input: InputState,
    editor: Option<EditorState>,
    shape_draft: Option<ShapeDraft>,
}

impl Default for BoardController {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardController {
    /// Create a board with an empty store and an inactive overlay.
    pub fn new() -> Self {
        Self {
            store: NoteStore::new(),
            interaction: InteractionController::new(),
            drawing: DrawingEngine::new(),
            tools: ToolManager::new(),
            snap_mode: SnapMode::None,
            input: InputState::new(),
            editor: None,
            shape_draft: None,
        }
    }

    /// Switch the active tool. The drawing overlay consumes pointer
    /// input only while the Draw tool is selected.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tools.set_tool(tool);
        self.drawing.set_active(tool == Tool::Draw);
    }

    /// Whether the inline text editor is open.
    pub fn editor_open(&self) -> bool {
        self.editor.is_some()
    }

    /// Current editor content, if open.
    pub fn editor_text(&self) -> Option<&str> {
        self.editor.as_ref().map(|e| e.buffer.as_str())
    }

    /// Double-click on the canvas. Opens the inline editor only on
    /// empty canvas space (no note hit, no editor already open) and
    /// only for the Select/Text tools.
    pub fn double_click(&mut self, position: Point) {
        if self.editor.is_some() {
            return;
        }
        if !matches!(self.tools.active(), Tool::Select | Tool::Text) {
            return;
        }
        if self.store.note_at_point(position).is_some() {
            return;
        }
        self.editor = Some(EditorState {
            position,
            buffer: String::new(),
        });
    }

    /// Replace the editor buffer with the field's current text.
    pub fn editor_input(&mut self, text: &str) {
        if let Some(editor) = self.editor.as_mut() {
            editor.buffer = text.to_string();
        }
    }

    /// Key press inside the editor. Enter (no modifier) commits,
    /// discarding whitespace-only content; Escape always discards.
    /// Returns the created note's id on commit.
    pub fn editor_key(&mut self, key: &str, modifiers: Modifiers) -> Option<NoteId> {
        match key {
            "Enter" if modifiers.is_empty() => {
                let editor = self.editor.take()?;
                if editor.buffer.trim().is_empty() {
                    return None;
                }
                Some(self.store.add_text_note(editor.position, editor.buffer))
            }
            "Escape" => {
                self.editor = None;
                None
            }
            _ => None,
        }
    }

    /// Paste a clipboard item. Non-image payloads and undecodable bytes
    /// are ignored. Pasted images are pre-fit to the display bound
    /// before entering the store.
    pub fn paste(&mut self, mime: &str, bytes: &[u8]) -> Option<NoteId> {
        let pasted = match clipboard::decode_pasted_image(mime, bytes) {
            Ok(pasted) => pasted,
            Err(err) => {
                log::debug!("paste ignored: {err}");
                return None;
            }
        };
        Some(self.store.add_image_note(
            PASTE_POSITION,
            pasted.data_uri.clone(),
            pasted.display_size(),
        ))
    }

    /// Pointer pressed on the board.
    pub fn pointer_down(&mut self, pointer: &PointerInput) {
        self.input.handle_pointer_event(&PointerEvent::Down(*pointer));

        if self.input.is_double_click()
            && matches!(self.tools.active(), Tool::Select | Tool::Text)
        {
            self.double_click(pointer.position);
            if self.editor_open() {
                return;
            }
        }

        match self.tools.active() {
            Tool::Draw => self.drawing.pointer_down(pointer),
            Tool::Shape => {
                self.shape_draft = Some(ShapeDraft {
                    start: self.snapped(pointer.position),
                });
            }
            Tool::Select | Tool::Text | Tool::Image => {
                if self.editor.is_some() {
                    return;
                }
                let Some(note) = self.store.note_at_point(pointer.position) else {
                    return;
                };
                let id = note.id();
                let bounds = note.bounds();
                let size = note.size();
                let aspect = note.locked_aspect_ratio();
                self.store.bring_to_front(id);

                if resize_corner(bounds).contains(pointer.position) {
                    self.interaction
                        .begin_resize(id, pointer.position, size, aspect);
                } else {
                    self.interaction
                        .begin_drag(id, pointer.position, bounds.origin());
                }
            }
        }
    }

    /// Pointer moved.
    pub fn pointer_move(&mut self, pointer: &PointerInput) {
        self.input.handle_pointer_event(&PointerEvent::Move(*pointer));

        if self.tools.active() == Tool::Draw {
            self.drawing.pointer_move(pointer);
            return;
        }
        if let Some(update) = self.interaction.pointer_move(pointer.position) {
            self.apply_update(update);
        }
    }

    /// Pointer released.
    pub fn pointer_up(&mut self, pointer: &PointerInput) {
        self.input.handle_pointer_event(&PointerEvent::Up(*pointer));

        match self.tools.active() {
            Tool::Draw => {
                self.drawing.pointer_up(pointer);
            }
            Tool::Shape => {
                if let Some(draft) = self.shape_draft.take() {
                    let end = self.snapped(pointer.position);
                    self.create_shape(draft.start, end);
                }
            }
            _ => self.interaction.end(),
        }
    }

    /// The platform lost a pointer (leave-while-down, window blur).
    /// Equivalent to release, but nothing commits.
    pub fn pointer_cancel(&mut self, id: PointerId) {
        self.input.handle_pointer_event(&PointerEvent::Cancel(id));

        if self.tools.active() == Tool::Draw {
            self.drawing.pointer_cancel(id);
            return;
        }
        self.shape_draft = None;
        self.interaction.end();
    }

    /// Key press outside the editor. Returns an event when the action
    /// produced output (drawing export).
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> Option<BoardEvent> {
        self.input.set_modifiers(modifiers);
        if self.editor.is_some() {
            self.editor_key(key, modifiers);
            return None;
        }

        match ShortcutRegistry::resolve(key, modifiers)? {
            BoardAction::SelectTextTool => self.set_tool(Tool::Text),
            BoardAction::SelectImageTool => self.set_tool(Tool::Image),
            BoardAction::SelectDrawTool => self.set_tool(Tool::Draw),
            BoardAction::Undo => {
                self.drawing.undo();
            }
            BoardAction::Redo => {
                self.drawing.redo();
            }
            BoardAction::ExportDrawing => {
                return self.drawing.export_png().map(BoardEvent::DrawingExported);
            }
            BoardAction::Cancel => self.cancel_active(),
        }
        None
    }

    /// Terminate whatever gesture is in flight. Drag/resize keep their
    /// last applied frame; an in-flight stroke is discarded.
    fn cancel_active(&mut self) {
        self.drawing.cancel();
        self.interaction.cancel();
        self.shape_draft = None;
    }

    fn apply_update(&mut self, update: InteractionUpdate) {
        match update {
            InteractionUpdate::Moved { id, position } => {
                self.store.update_note(id, NotePatch::position(position));
            }
            InteractionUpdate::Resized { id, size } => {
                // Text notes resize in width only; height stays intrinsic
                let patch = match self.store.get(id) {
                    Some(Note::Text(_)) => NotePatch {
                        width: Some(size.width),
                        ..NotePatch::default()
                    },
                    _ => NotePatch::size(size),
                };
                self.store.update_note(id, patch);
            }
        }
    }

    fn create_shape(&mut self, start: Point, end: Point) {
        let rect = Rect::from_points(start, end);
        let size = Size::new(
            rect.width().max(MIN_NOTE_SIZE),
            rect.height().max(MIN_NOTE_SIZE),
        );
        self.store.add_shape_note(
            rect.origin(),
            self.tools.shape_kind,
            size,
            self.tools.shape_color,
        );
    }

    fn snapped(&self, point: Point) -> Point {
        snap::snap_point(point, self.snap_mode, GRID_SIZE, &[], &[], snap::SNAP_THRESHOLD).point
    }
}

/// The resize-handle region at a note's bottom-right corner.
fn resize_corner(bounds: Rect) -> Rect {
    Rect::new(
        bounds.x1 - RESIZE_HANDLE_SIZE,
        bounds.y1 - RESIZE_HANDLE_SIZE,
        bounds.x1,
        bounds.y1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use corkboard_core::Surface;
    use corkboard_core::note::{Rgba, ShapeKind};

    fn board() -> BoardController {
        BoardController::new()
    }

    fn square_at(board: &mut BoardController, origin: Point) -> NoteId {
        board.store.add_shape_note(
            origin,
            ShapeKind::Square,
            Size::new(200.0, 200.0),
            Rgba::black(),
        )
    }

    #[test]
    fn test_double_click_opens_editor_on_empty_canvas() {
        let mut board = board();
        board.double_click(Point::new(50.0, 60.0));
        assert!(board.editor_open());
    }

    #[test]
    fn test_double_click_on_note_does_nothing() {
        let mut board = board();
        square_at(&mut board, Point::new(0.0, 0.0));
        board.double_click(Point::new(50.0, 50.0));
        assert!(!board.editor_open());
    }

    #[test]
    fn test_rapid_clicks_open_editor_via_pointer_path() {
        let mut board = board();
        let pos = PointerInput::mouse(Point::new(50.0, 60.0));

        board.pointer_down(&pos);
        board.pointer_up(&pos);
        assert!(!board.editor_open());

        board.pointer_down(&pos);
        assert!(board.editor_open());
    }

    #[test]
    fn test_double_click_needs_select_or_text_tool() {
        let mut board = board();
        board.set_tool(Tool::Draw);
        board.double_click(Point::new(50.0, 60.0));
        assert!(!board.editor_open());
    }

    #[test]
    fn test_editor_commit_creates_note() {
        let mut board = board();
        board.double_click(Point::new(40.0, 80.0));
        board.editor_input("hello board");

        let id = board
            .editor_key("Enter", Modifiers::default())
            .expect("commit");
        assert!(!board.editor_open());

        let note = board.store.get(id).unwrap();
        assert_eq!(note.position(), Point::new(40.0, 80.0));
        match note {
            Note::Text(t) => assert_eq!(t.content, "hello board"),
            _ => panic!("expected text note"),
        }
    }

    #[test]
    fn test_whitespace_only_editor_discards() {
        let mut board = board();
        board.double_click(Point::new(40.0, 80.0));
        board.editor_input("   \n  ");

        assert!(board.editor_key("Enter", Modifiers::default()).is_none());
        assert!(!board.editor_open());
        assert!(board.store.is_empty());
    }

    #[test]
    fn test_modified_enter_does_not_commit() {
        let mut board = board();
        board.double_click(Point::new(40.0, 80.0));
        board.editor_input("hello");

        let shifted = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        assert!(board.editor_key("Enter", shifted).is_none());
        assert!(board.editor_open());
    }

    #[test]
    fn test_escape_discards_editor() {
        let mut board = board();
        board.double_click(Point::new(40.0, 80.0));
        board.editor_input("draft");
        board.handle_key("Escape", Modifiers::default());

        assert!(!board.editor_open());
        assert!(board.store.is_empty());
    }

    #[test]
    fn test_paste_scales_to_bound() {
        let mut board = board();
        let png = Surface::new(600, 400).to_png().unwrap();

        let id = board.paste("image/png", &png).expect("image note");
        let note = board.store.get(id).unwrap();
        let size = note.size();
        assert!((size.width - 300.0).abs() < 1e-9);
        assert!((size.height - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_paste_ignores_non_images() {
        let mut board = board();
        assert!(board.paste("text/plain", b"hello").is_none());
        assert!(board.store.is_empty());
    }

    #[test]
    fn test_draw_tool_toggles_overlay() {
        let mut board = board();
        assert!(!board.drawing.is_active());
        board.set_tool(Tool::Draw);
        assert!(board.drawing.is_active());
        board.set_tool(Tool::Select);
        assert!(!board.drawing.is_active());
    }

    #[test]
    fn test_drag_moves_note() {
        let mut board = board();
        let id = square_at(&mut board, Point::new(0.0, 0.0));

        board.pointer_down(&PointerInput::mouse(Point::new(50.0, 50.0)));
        board.pointer_move(&PointerInput::mouse(Point::new(70.0, 80.0)));
        board.pointer_up(&PointerInput::mouse(Point::new(70.0, 80.0)));

        assert_eq!(
            board.store.get(id).unwrap().position(),
            Point::new(20.0, 30.0)
        );
        assert!(!board.interaction.is_active());
    }

    #[test]
    fn test_corner_drag_resizes_with_floor() {
        let mut board = board();
        let id = square_at(&mut board, Point::new(0.0, 0.0));

        board.pointer_down(&PointerInput::mouse(Point::new(195.0, 195.0)));
        board.pointer_move(&PointerInput::mouse(Point::new(-305.0, -305.0)));
        board.pointer_up(&PointerInput::mouse(Point::new(-305.0, -305.0)));

        let size = board.store.get(id).unwrap().size();
        assert_eq!(size, Size::new(100.0, 100.0));
    }

    #[test]
    fn test_image_resize_preserves_aspect() {
        let mut board = board();
        let id = board.store.add_image_note(
            Point::new(0.0, 0.0),
            "data:image/png;base64,".to_string(),
            Size::new(300.0, 150.0),
        );

        board.pointer_down(&PointerInput::mouse(Point::new(295.0, 145.0)));
        board.pointer_move(&PointerInput::mouse(Point::new(395.0, 145.0)));

        let size = board.store.get(id).unwrap().size();
        assert!((size.width / size.height - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_click_brings_note_to_front() {
        let mut board = board();
        let a = square_at(&mut board, Point::new(0.0, 0.0));
        let b = square_at(&mut board, Point::new(150.0, 150.0));
        assert!(board.store.get(b).unwrap().z_index() > board.store.get(a).unwrap().z_index());

        // (50,50) hits only the bottom note
        board.pointer_down(&PointerInput::mouse(Point::new(50.0, 50.0)));
        board.pointer_up(&PointerInput::mouse(Point::new(50.0, 50.0)));

        assert!(board.store.get(a).unwrap().z_index() > board.store.get(b).unwrap().z_index());
    }

    #[test]
    fn test_shape_tool_drag_out() {
        let mut board = board();
        board.set_tool(Tool::Shape);
        board.tools.shape_kind = ShapeKind::Circle;

        board.pointer_down(&PointerInput::mouse(Point::new(10.0, 10.0)));
        board.pointer_up(&PointerInput::mouse(Point::new(150.0, 170.0)));

        assert_eq!(board.store.len(), 1);
        let note = board.store.snapshot().pop().unwrap();
        assert_eq!(note.position(), Point::new(10.0, 10.0));
        assert_eq!(note.size(), Size::new(140.0, 160.0));
        match note {
            Note::Shape(s) => assert_eq!(s.kind, ShapeKind::Circle),
            _ => panic!("expected shape note"),
        }
    }

    #[test]
    fn test_tiny_shape_drag_gets_floor() {
        let mut board = board();
        board.set_tool(Tool::Shape);
        board.pointer_down(&PointerInput::mouse(Point::new(10.0, 10.0)));
        board.pointer_up(&PointerInput::mouse(Point::new(14.0, 12.0)));

        let note = board.store.snapshot().pop().unwrap();
        assert_eq!(note.size(), Size::new(MIN_NOTE_SIZE, MIN_NOTE_SIZE));
    }

    #[test]
    fn test_shape_corners_snap_to_grid() {
        let mut board = board();
        board.set_tool(Tool::Shape);
        board.snap_mode = SnapMode::Grid;

        board.pointer_down(&PointerInput::mouse(Point::new(28.0, 28.0)));
        board.pointer_up(&PointerInput::mouse(Point::new(152.0, 148.0)));

        let note = board.store.snapshot().pop().unwrap();
        assert_eq!(note.position(), Point::new(20.0, 20.0));
        assert_eq!(note.size(), Size::new(140.0, 120.0));
    }

    #[test]
    fn test_tool_shortcuts_switch_tools() {
        let mut board = board();
        let command = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        board.handle_key("d", command);
        assert_eq!(board.tools.active(), Tool::Draw);
        assert!(board.drawing.is_active());

        board.handle_key("t", command);
        assert_eq!(board.tools.active(), Tool::Text);
        assert!(!board.drawing.is_active());
    }

    #[test]
    fn test_undo_shortcut_reaches_drawing() {
        let mut board = board();
        board.set_tool(Tool::Draw);
        board.drawing.ensure_surface(64, 64);

        board.pointer_down(&PointerInput::mouse(Point::new(10.0, 10.0)));
        board.pointer_move(&PointerInput::mouse(Point::new(50.0, 50.0)));
        board.pointer_up(&PointerInput::mouse(Point::new(50.0, 50.0)));
        assert!(!board.drawing.surface().unwrap().is_blank());

        let command = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        board.handle_key("z", command);
        assert!(board.drawing.surface().unwrap().is_blank());

        let redo = Modifiers {
            ctrl: true,
            shift: true,
            ..Modifiers::default()
        };
        board.handle_key("z", redo);
        assert!(!board.drawing.surface().unwrap().is_blank());
    }

    #[test]
    fn test_export_shortcut_returns_png() {
        let mut board = board();
        board.set_tool(Tool::Draw);
        board.drawing.ensure_surface(32, 32);

        let command = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        let event = board.handle_key("s", command).expect("export event");
        let BoardEvent::DrawingExported(data) = event;
        assert_eq!(&data[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_escape_cancels_drag_session() {
        let mut board = board();
        let id = square_at(&mut board, Point::new(0.0, 0.0));

        board.pointer_down(&PointerInput::mouse(Point::new(50.0, 50.0)));
        board.pointer_move(&PointerInput::mouse(Point::new(70.0, 80.0)));
        board.handle_key("Escape", Modifiers::default());

        // Session gone; the last applied frame stands
        assert!(!board.interaction.is_active());
        assert_eq!(
            board.store.get(id).unwrap().position(),
            Point::new(20.0, 30.0)
        );

        // Later moves are ignored
        board.pointer_move(&PointerInput::mouse(Point::new(500.0, 500.0)));
        assert_eq!(
            board.store.get(id).unwrap().position(),
            Point::new(20.0, 30.0)
        );
    }

    #[test]
    fn test_pointer_cancel_ends_drag() {
        let mut board = board();
        let id = square_at(&mut board, Point::new(0.0, 0.0));

        let pointer = PointerInput::mouse(Point::new(50.0, 50.0));
        board.pointer_down(&pointer);
        board.pointer_move(&PointerInput::mouse(Point::new(70.0, 80.0)));
        board.pointer_cancel(pointer.id);

        assert!(!board.interaction.is_active());
        // Further moves no longer track the note
        board.pointer_move(&PointerInput::mouse(Point::new(300.0, 300.0)));
        assert_eq!(
            board.store.get(id).unwrap().position(),
            Point::new(20.0, 30.0)
        );
    }

    #[test]
    fn test_drag_updates_apply_in_event_order() {
        let mut board = board();
        let id = square_at(&mut board, Point::new(0.0, 0.0));

        board.pointer_down(&PointerInput::mouse(Point::new(10.0, 10.0)));
        for step in 1..=10 {
            let p = Point::new(10.0 + step as f64, 10.0);
            board.pointer_move(&PointerInput::mouse(p));
        }
        board.pointer_up(&PointerInput::mouse(Point::new(20.0, 10.0)));

        // Final settled position reflects the last frame before release
        assert_eq!(
            board.store.get(id).unwrap().position(),
            Point::new(10.0, 0.0)
        );
    }
}

//! Note entity store: the single source of truth for the note collection.
//!
//! All reads go through snapshots or subscriptions and all writes go
//! through the operations below. Every mutation applies atomically and
//! notifies subscribers exactly once with the post-mutation state.

use crate::note::{ImageNote, Note, NoteId, Rgba, ShapeKind, ShapeNote, TextNote};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Handle returned by [`NoteStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A partial update merged into an existing note.
///
/// Fields irrelevant to the target variant are ignored. A patch can
/// never change a note's variant, id or z-index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotePatch {
    pub position: Option<Point>,
    pub content: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Option<Rgba>,
}

impl NotePatch {
    /// Patch that only moves a note.
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Patch that only resizes a note.
    pub fn size(size: Size) -> Self {
        Self {
            width: Some(size.width),
            height: Some(size.height),
            ..Self::default()
        }
    }
}

type Listener = Box<dyn FnMut(&[Note])>;

/// Owner of the note collection.
pub struct NoteStore {
    notes: Vec<Note>,
    /// Monotonic z-index pool; never reset or compacted.
    next_z: i64,
    listeners: HashMap<SubscriptionId, Listener>,
    next_subscription: u64,
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteStore")
            .field("notes", &self.notes)
            .field("next_z", &self.next_z)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl NoteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            notes: Vec::new(),
            next_z: 0,
            listeners: HashMap::new(),
            next_subscription: 0,
        }
    }

    /// Create a text note. Empty content is accepted; guarding against
    /// it is caller policy.
    pub fn add_text_note(&mut self, position: Point, content: String) -> NoteId {
        let mut note = TextNote::new(position, content);
        note.z_index = self.take_z();
        let id = note.id;
        self.notes.push(Note::Text(note));
        self.notify();
        id
    }

    /// Create an image note. The store does not re-scale; callers fit
    /// `size` to the paste bound beforehand.
    pub fn add_image_note(&mut self, position: Point, url: String, size: Size) -> NoteId {
        let mut note = ImageNote::new(position, url, size);
        note.z_index = self.take_z();
        let id = note.id;
        self.notes.push(Note::Image(note));
        self.notify();
        id
    }

    /// Create a shape note.
    pub fn add_shape_note(
        &mut self,
        position: Point,
        kind: ShapeKind,
        size: Size,
        color: Rgba,
    ) -> NoteId {
        let mut note = ShapeNote::new(position, kind, size, color);
        note.z_index = self.take_z();
        let id = note.id;
        self.notes.push(Note::Shape(note));
        self.notify();
        id
    }

    /// Merge a patch into an existing note. Unknown ids are a silent
    /// no-op: drag callbacks may fire after a note was deleted
    /// mid-gesture.
    pub fn update_note(&mut self, id: NoteId, patch: NotePatch) {
        let Some(note) = self.notes.iter_mut().find(|n| n.id() == id) else {
            log::debug!("update_note: unknown note {id}");
            return;
        };

        if let Some(position) = patch.position {
            note.set_position(position);
        }
        match note {
            Note::Text(text) => {
                if let Some(content) = patch.content {
                    text.content = content;
                }
                if let Some(width) = patch.width {
                    text.width = width;
                }
            }
            Note::Image(image) => {
                if let Some(width) = patch.width {
                    image.width = width;
                }
                if let Some(height) = patch.height {
                    image.height = height;
                }
            }
            Note::Shape(shape) => {
                if let Some(width) = patch.width {
                    shape.width = width;
                }
                if let Some(height) = patch.height {
                    shape.height = height;
                }
                if let Some(color) = patch.color {
                    shape.color = color;
                }
            }
        }
        self.notify();
    }

    /// Remove a note. Idempotent; unknown ids change nothing.
    pub fn delete_note(&mut self, id: NoteId) {
        let before = self.notes.len();
        self.notes.retain(|n| n.id() != id);
        if self.notes.len() != before {
            self.notify();
        }
    }

    /// Raise a note above everything else. No-op if `id` is absent.
    pub fn bring_to_front(&mut self, id: NoteId) {
        if !self.notes.iter().any(|n| n.id() == id) {
            return;
        }
        let z = self.take_z();
        if let Some(note) = self.notes.iter_mut().find(|n| n.id() == id) {
            note.set_z_index(z);
        }
        self.notify();
    }

    /// Get a note by id.
    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id() == id)
    }

    /// Number of notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Check if the board is empty.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes in paint order (ascending z-index).
    pub fn notes_ordered(&self) -> Vec<&Note> {
        let mut ordered: Vec<&Note> = self.notes.iter().collect();
        ordered.sort_by_key(|n| n.z_index());
        ordered
    }

    /// The top-most note containing `point`, if any.
    pub fn note_at_point(&self, point: Point) -> Option<&Note> {
        self.notes_ordered()
            .into_iter()
            .rev()
            .find(|n| n.hit_test(point))
    }

    /// Clone of the current collection, in paint order.
    pub fn snapshot(&self) -> Vec<Note> {
        self.notes_ordered().into_iter().cloned().collect()
    }

    /// Register a listener invoked with the post-mutation snapshot
    /// after every store operation.
    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.insert(id, listener);
        id
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.remove(&id);
    }

    fn take_z(&mut self) -> i64 {
        self.next_z += 1;
        self.next_z
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in self.listeners.values_mut() {
            listener(&snapshot);
        }
    }
}

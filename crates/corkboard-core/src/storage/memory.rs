//! In-memory storage implementation.

use super::{
    BoardDocument, BoardStorage, BoxFuture, ChangeListener, StorageError, StorageResult, WatchId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

/// In-memory storage for testing and ephemeral boards.
#[derive(Default)]
pub struct MemoryStorage {
    boards: RwLock<HashMap<String, BoardDocument>>,
    listeners: Mutex<HashMap<WatchId, (String, ChangeListener)>>,
    next_watch: AtomicU64,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    fn notify(&self, id: &str, document: &BoardDocument) {
        let mut listeners = match self.listeners.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for (board_id, listener) in listeners.values_mut() {
            if board_id == id {
                listener(document);
            }
        }
    }
}

impl BoardStorage for MemoryStorage {
    fn save(&self, id: &str, document: &BoardDocument) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let document = document.clone();
        Box::pin(async move {
            {
                let mut boards = self
                    .boards
                    .write()
                    .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
                boards.insert(id.clone(), document.clone());
            }
            self.notify(&id, &document);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<BoardDocument>> {
        let id = id.to_string();
        Box::pin(async move {
            let boards = self
                .boards
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            boards.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut boards = self
                .boards
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            boards.remove(&id);
            Ok(())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let boards = self
                .boards
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            Ok(boards.contains_key(&id))
        })
    }

    fn subscribe(&self, id: &str, listener: ChangeListener) -> WatchId {
        let watch = WatchId(self.next_watch.fetch_add(1, Ordering::Relaxed));
        let mut listeners = match self.listeners.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        listeners.insert(watch, (id.to_string(), listener));
        watch
    }

    fn unsubscribe(&self, watch: WatchId) {
        let mut listeners = match self.listeners.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        listeners.remove(&watch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::TextNote;
    use crate::note::Note;
    use kurbo::Point;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        // Simple blocking executor for tests
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {}
            }
        }
    }

    fn sample_board(id: &str) -> BoardDocument {
        let mut doc = BoardDocument::new(id);
        doc.notes
            .push(Note::Text(TextNote::new(Point::new(1.0, 2.0), "hi".to_string())));
        doc
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let doc = sample_board("board-1");

        block_on(storage.save("board-1", &doc)).unwrap();
        let loaded = block_on(storage.load("board-1")).unwrap();

        assert_eq!(loaded.id, doc.id);
        assert_eq!(loaded.notes.len(), 1);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = MemoryStorage::new();
        let doc = sample_board("board-1");

        assert!(!block_on(storage.exists("board-1")).unwrap());
        block_on(storage.save("board-1", &doc)).unwrap();
        assert!(block_on(storage.exists("board-1")).unwrap());

        block_on(storage.delete("board-1")).unwrap();
        assert!(!block_on(storage.exists("board-1")).unwrap());
    }

    #[test]
    fn test_subscribe_fires_on_save() {
        let storage = MemoryStorage::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        storage.subscribe(
            "board-1",
            Box::new(move |doc| {
                assert_eq!(doc.id, "board-1");
                count_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        block_on(storage.save("board-1", &sample_board("board-1"))).unwrap();
        block_on(storage.save("board-1", &sample_board("board-1"))).unwrap();
        // Saves to other boards do not fire
        block_on(storage.save("board-2", &sample_board("board-2"))).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let storage = MemoryStorage::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        let watch = storage.subscribe(
            "board-1",
            Box::new(move |_| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );
        storage.unsubscribe(watch);

        block_on(storage.save("board-1", &sample_board("board-1"))).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_wire_format_roundtrip() {
        let doc = sample_board("board-1");
        let json = doc.to_json().unwrap();
        let back = BoardDocument::from_json(&json).unwrap();
        assert_eq!(back.id, doc.id);
        assert_eq!(back.notes[0].id(), doc.notes[0].id());
    }
}

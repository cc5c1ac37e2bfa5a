use serde::Serialize;

use crate::error::ErrorKind;

// BatchObserver: receives progress of a batch, always on the batch's single callback thread.
// Implementations must not block on worker-side work; post to a UI queue instead.
pub trait BatchObserver: Send {
    fn progress_changed(&mut self, completed: usize, total: usize);
    fn file_succeeded(&mut self, path: &str);
    fn file_failed(&mut self, path: &str, kind: ErrorKind);
    fn batch_completed(&mut self);
}

/// A single notification destined for a [`BatchObserver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BatchEvent {
    ProgressChanged { completed: usize, total: usize },
    FileSucceeded { path: String },
    FileFailed { path: String, kind: ErrorKind },
    BatchCompleted,
}

impl BatchEvent {
    pub fn deliver<O: BatchObserver + ?Sized>(&self, observer: &mut O) {
        match self {
            BatchEvent::ProgressChanged { completed, total } => {
                observer.progress_changed(*completed, *total)
            }
            BatchEvent::FileSucceeded { path } => observer.file_succeeded(path),
            BatchEvent::FileFailed { path, kind } => observer.file_failed(path, *kind),
            BatchEvent::BatchCompleted => observer.batch_completed(),
        }
    }
}

// Recording observer: keeps every event in delivery order.
impl BatchObserver for Vec<BatchEvent> {
    fn progress_changed(&mut self, completed: usize, total: usize) {
        self.push(BatchEvent::ProgressChanged { completed, total });
    }

    fn file_succeeded(&mut self, path: &str) {
        self.push(BatchEvent::FileSucceeded { path: path.to_string() });
    }

    fn file_failed(&mut self, path: &str, kind: ErrorKind) {
        self.push(BatchEvent::FileFailed { path: path.to_string(), kind });
    }

    fn batch_completed(&mut self) {
        self.push(BatchEvent::BatchCompleted);
    }
}

impl<O: BatchObserver + ?Sized> BatchObserver for Box<O> {
    fn progress_changed(&mut self, completed: usize, total: usize) {
        (**self).progress_changed(completed, total)
    }

    fn file_succeeded(&mut self, path: &str) {
        (**self).file_succeeded(path)
    }

    fn file_failed(&mut self, path: &str, kind: ErrorKind) {
        (**self).file_failed(path, kind)
    }

    fn batch_completed(&mut self) {
        (**self).batch_completed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deliver_roundtrips_through_recorder() {
        let events = vec![
            BatchEvent::FileSucceeded { path: "a.txt".into() },
            BatchEvent::ProgressChanged { completed: 1, total: 2 },
            BatchEvent::FileFailed { path: "b.txt".into(), kind: ErrorKind::DecodeFailed },
            BatchEvent::ProgressChanged { completed: 2, total: 2 },
            BatchEvent::BatchCompleted,
        ];
        let mut recorder: Vec<BatchEvent> = Vec::new();
        for event in &events {
            event.deliver(&mut recorder);
        }
        assert_eq!(recorder, events);
    }

    #[test]
    fn test_boxed_observer_forwards() {
        let mut boxed: Box<Vec<BatchEvent>> = Box::default();
        boxed.batch_completed();
        assert_eq!(*boxed, vec![BatchEvent::BatchCompleted]);
    }

    #[test]
    fn test_event_json_shape() {
        let event = BatchEvent::FileFailed { path: "x".into(), kind: ErrorKind::FileNotFound };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"event":"file_failed","path":"x","kind":"FileNotFound"}"#);
    }
}

use std::cell::Cell;
use std::rc::Rc;

use crate::render::Repainter;

/// Repainter that shares its request counter with the host.
///
/// The surface owns the boxed repainter, so the counter lives behind an `Rc`
/// that callers keep a clone of.
#[derive(Debug, Clone, Default)]
pub struct RecordingRepainter {
    requests: Rc<Cell<u64>>,
}

impl RecordingRepainter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn requests(&self) -> u64 {
        self.requests.get()
    }

    pub fn clear(&self) {
        self.requests.set(0);
    }
}

impl Repainter for RecordingRepainter {
    fn request_repaint(&mut self) {
        self.requests.set(self.requests.get() + 1);
    }
}

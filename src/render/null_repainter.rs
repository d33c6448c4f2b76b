use crate::render::Repainter;

/// No-op repainter used by tests and headless usage.
///
/// It still counts requests so tests can assert that a change scheduled a redraw.
#[derive(Debug, Default)]
pub struct NullRepainter {
    pub requests: u64,
}

impl Repainter for NullRepainter {
    fn request_repaint(&mut self) {
        self.requests += 1;
    }
}

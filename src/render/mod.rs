mod null_repainter;
mod primitives;
mod recording_repainter;

pub use null_repainter::NullRepainter;
pub use primitives::Color;
pub use recording_repainter::RecordingRepainter;

/// Contract implemented by the host's drawing surface.
///
/// Navigation code never draws; after any range or marker change it asks the
/// host to schedule a repaint of the owning plot.
pub trait Repainter {
    fn request_repaint(&mut self);
}

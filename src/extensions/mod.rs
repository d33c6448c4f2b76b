//! Measurement tools layered on top of the axes: draggable handles, cursor
//! pairs with readouts, and trace lookup for tracking mode.

mod axis_handle;
mod cursor;
mod cursor_controller;
mod cursor_pair;
mod readouts;
mod trace;

pub use axis_handle::{
    AxisHandle, BarVisibility, DEFAULT_GRAB_TOLERANCE_PX, HandleEvent, HandlePos,
};
pub use cursor::Cursor;
pub use cursor_controller::CursorController;
pub use cursor_pair::{CursorPairController, CursorSlot, TrackingPoint};
pub use readouts::{CursorReadouts, DEFAULT_READOUT_PRECISION, PairReadout, ValueFormatter};
pub use trace::{SampleSeries, TraceSource};

pub mod axis;
pub mod observer;
pub mod primitives;
pub mod scale;
pub mod surface;
pub mod types;

pub use axis::{Axis, AxisEvent, AxisId, AxisPosition, IntervalChange, RescaleCause};
pub use observer::{Observers, SubscriptionId};
pub use primitives::fuzzy_eq;
pub use scale::{LinearScale, ScaleMap};
pub use surface::PlotSurface;
pub use types::{CanvasSize, DataRect, Interval, Orientation, PixelPoint, PixelRect};

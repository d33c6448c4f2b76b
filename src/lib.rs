//! plotnav: headless navigation and measurement for 2D plots.
//!
//! Rectangle zoom, wheel magnify/pan, per-axis undo history, cross-plot
//! synchronization and measurement cursors, driven by host input events and
//! independent of any GUI toolkit.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{
    CursorConfig, NavigatorConfig, PlotNavigator, PlotWidget, sync_plot_navigators,
    unsync_plot_navigators,
};
pub use error::{NavError, NavResult};

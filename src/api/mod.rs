//! Navigation state per plot, cross-plot synchronization and the host
//! facade tying axes, channels, navigator and cursors together.

mod channel;
mod cursor_config;
mod history;
mod json_contract;
mod navigation_domain;
mod navigator_config;
mod plot_navigator;
mod plot_widget;
mod sync;

pub use channel::{ChannelId, ChannelKind, PlotChannel};
pub use cursor_config::CursorConfig;
pub use history::{DEFAULT_HISTORY_LIMIT, History, NavigationKind};
pub use json_contract::{
    CURSOR_CONFIG_JSON_SCHEMA_V1, CursorConfigJsonContractV1, NAVIGATOR_CONFIG_JSON_SCHEMA_V1,
    NavigatorConfigJsonContractV1,
};
pub use navigation_domain::NavigationDomain;
pub use navigator_config::{NavigationStyle, NavigatorConfig};
pub use plot_navigator::{EventOrigin, NavigatorEvent, PlotNavigator};
pub use plot_widget::PlotWidget;
pub use sync::{SharedPlot, Synchronizer, sync_plot_navigators, unsync_plot_navigators};

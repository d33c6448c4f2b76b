use thiserror::Error;

use crate::api::ChannelId;
use crate::core::AxisId;

pub type NavResult<T> = Result<T, NavError>;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("invalid canvas size: width={width}, height={height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("degenerate axis range: min={min}, max={max}")]
    DegenerateRange { min: f64, max: f64 },

    #[error("unknown axis: {0}")]
    UnknownAxis(AxisId),

    #[error("unknown channel: {0:?}")]
    UnknownChannel(ChannelId),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

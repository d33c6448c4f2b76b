use serde::{Deserialize, Serialize};

use crate::error::{NavError, NavResult};

use super::{CursorConfig, NavigatorConfig};

pub const NAVIGATOR_CONFIG_JSON_SCHEMA_V1: u32 = 1;
pub const CURSOR_CONFIG_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigatorConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: NavigatorConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: CursorConfig,
}

impl NavigatorConfig {
    pub fn to_json_pretty(self) -> NavResult<String> {
        serde_json::to_string_pretty(&self).map_err(|e| {
            NavError::InvalidData(format!("failed to serialize navigator config json: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(self) -> NavResult<String> {
        let payload = NavigatorConfigJsonContractV1 {
            schema_version: NAVIGATOR_CONFIG_JSON_SCHEMA_V1,
            config: self,
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            NavError::InvalidData(format!(
                "failed to serialize navigator config contract v1: {e}"
            ))
        })
    }

    /// Accepts either the bare config or a versioned contract payload and
    /// validates the result.
    pub fn from_json_compat_str(input: &str) -> NavResult<Self> {
        if let Ok(config) = serde_json::from_str::<NavigatorConfig>(input) {
            if !is_contract_payload(input) {
                return config.validate();
            }
        }
        let payload: NavigatorConfigJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            NavError::InvalidData(format!("failed to parse navigator config json payload: {e}"))
        })?;
        if payload.schema_version != NAVIGATOR_CONFIG_JSON_SCHEMA_V1 {
            return Err(NavError::InvalidData(format!(
                "unsupported navigator config schema version: {}",
                payload.schema_version
            )));
        }
        payload.config.validate()
    }
}

impl CursorConfig {
    pub fn to_json_pretty(self) -> NavResult<String> {
        serde_json::to_string_pretty(&self).map_err(|e| {
            NavError::InvalidData(format!("failed to serialize cursor config json: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(self) -> NavResult<String> {
        let payload = CursorConfigJsonContractV1 {
            schema_version: CURSOR_CONFIG_JSON_SCHEMA_V1,
            config: self,
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            NavError::InvalidData(format!("failed to serialize cursor config contract v1: {e}"))
        })
    }

    pub fn from_json_compat_str(input: &str) -> NavResult<Self> {
        if let Ok(config) = serde_json::from_str::<CursorConfig>(input) {
            if !is_contract_payload(input) {
                return config.validate();
            }
        }
        let payload: CursorConfigJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            NavError::InvalidData(format!("failed to parse cursor config json payload: {e}"))
        })?;
        if payload.schema_version != CURSOR_CONFIG_JSON_SCHEMA_V1 {
            return Err(NavError::InvalidData(format!(
                "unsupported cursor config schema version: {}",
                payload.schema_version
            )));
        }
        payload.config.validate()
    }
}

/// Every config field is defaulted, so a contract payload also parses as a
/// bare config. Tell them apart by the envelope's version key.
fn is_contract_payload(input: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(input)
        .is_ok_and(|value| value.get("schema_version").is_some())
}

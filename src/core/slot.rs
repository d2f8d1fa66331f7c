use crate::utils::error::{AdapterError, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

const SLOT_TAG_DELIMITER: char = '.';

#[derive(Debug, Deserialize)]
struct SlotParams {
    #[serde(default)]
    slot_tag: String,
}

/// Decoded `slot_tag` param: `<network>.<slot>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSpec {
    pub network: String,
    pub slot: String,
}

impl SlotSpec {
    /// Decode a unit's bidder params, e.g. `{"slot_tag": "network.slot"}`.
    pub fn from_params(params: &serde_json::Value) -> Result<Self> {
        let params = SlotParams::deserialize(params).map_err(|e| {
            AdapterError::invalid_input(format!("Malformed bidder params: {}", e))
        })?;
        params.slot_tag.parse()
    }

    /// The tag sent to the endpoint as `imp.tagid`.
    pub fn tag(&self) -> String {
        self.to_string()
    }
}

impl FromStr for SlotSpec {
    type Err = AdapterError;

    fn from_str(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(AdapterError::invalid_input("Missing slot_tag param"));
        }
        let parts: Vec<&str> = raw.split(SLOT_TAG_DELIMITER).collect();
        match parts.as_slice() {
            [network, slot] if !network.is_empty() && !slot.is_empty() => Ok(Self {
                network: network.to_string(),
                slot: slot.to_string(),
            }),
            _ => Err(AdapterError::invalid_input(format!(
                "Invalid slot_tag param '{}'",
                raw
            ))),
        }
    }
}

impl fmt::Display for SlotSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.network, SLOT_TAG_DELIMITER, self.slot)
    }
}

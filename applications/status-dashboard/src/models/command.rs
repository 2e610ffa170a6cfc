use serde::{Deserialize, Serialize};

/// Request to change a device's state, forwarded to `/api/switch`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchCommand {
    pub device: String,
    /// Stringified boolean or number, e.g. `"true"` or `"75"`
    pub value: String,
    /// Seconds
    pub duration: i64,
}

impl SwitchCommand {
    pub fn new(device: impl Into<String>, value: impl Into<String>, duration: i64) -> Self {
        Self {
            device: device.into(),
            value: value.into(),
            duration,
        }
    }
}

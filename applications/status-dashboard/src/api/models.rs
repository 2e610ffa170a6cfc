use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::SwitchCommand;

fn default_duration() -> i64 {
    1
}

/// Body of POST /api/switch. `value` may be a string, boolean or number;
/// it is forwarded in string form.
#[derive(Debug, Clone, Deserialize)]
pub struct SwitchRequest {
    pub device: String,
    pub value: Value,
    #[serde(default = "default_duration")]
    pub duration: i64,
}

impl SwitchRequest {
    pub fn into_command(self) -> Result<SwitchCommand> {
        let device = self.device.trim();
        if device.is_empty() {
            return Err(AppError::InvalidInput("device is required".to_string()));
        }

        if self.duration < 0 {
            return Err(AppError::InvalidInput(
                "duration must be non-negative".to_string(),
            ));
        }

        let value = match self.value {
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(AppError::InvalidInput(format!(
                    "value must be a string, boolean or number, got {}",
                    other
                )))
            }
        };

        Ok(SwitchCommand::new(device, value, self.duration))
    }
}

#[derive(Debug, Serialize)]
pub struct SwitchAccepted {
    #[serde(flatten)]
    pub command: SwitchCommand,
    pub status: &'static str,
}

impl From<&SwitchCommand> for SwitchAccepted {
    fn from(command: &SwitchCommand) -> Self {
        Self {
            command: command.clone(),
            status: "pending",
        }
    }
}

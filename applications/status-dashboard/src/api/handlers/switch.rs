use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, warn};

use super::AppState;
use crate::{
    api::models::{SwitchAccepted, SwitchRequest},
    error::Result,
};

/// POST /api/switch
/// Validates the command and forwards it without waiting for the device.
/// Returns 202 Accepted; delivery failures are only logged.
pub async fn switch_device(
    State(state): State<AppState>,
    Json(request): Json<SwitchRequest>,
) -> Result<(StatusCode, Json<SwitchAccepted>)> {
    let command = request.into_command()?;

    info!(
        "Switching {} to {} for {}s",
        command.device, command.value, command.duration
    );

    let accepted = SwitchAccepted::from(&command);
    let sink = state.commands.clone();
    tokio::spawn(async move {
        let device = command.device.clone();
        if let Err(e) = sink.switch_device(command).await {
            warn!("Switch command for {} failed: {}", device, e);
        }
    });

    Ok((StatusCode::ACCEPTED, Json(accepted)))
}

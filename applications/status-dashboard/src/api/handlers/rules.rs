use axum::{extract::State, response::Html};

use super::AppState;
use crate::error::Result;

/// GET /rules/add-single-use
/// Proxies the single-use rule editor fragment for the popup
pub async fn single_use_rule_form(State(state): State<AppState>) -> Result<Html<String>> {
    let fragment = state.rules.single_use_rule_form().await?;
    Ok(Html(fragment))
}

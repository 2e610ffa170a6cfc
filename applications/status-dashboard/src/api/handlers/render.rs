use axum::{
    extract::{Path, State},
    Json,
};

use super::AppState;
use crate::{
    error::{AppError, Result},
    render::{ElementState, RenderState},
};

/// GET /api/render
/// Returns every element's current text and stale flag
pub async fn get_render_state(State(state): State<AppState>) -> Json<RenderState> {
    let render = state.render.read().await;
    Json(render.clone())
}

/// GET /api/render/{element}
pub async fn get_element(
    State(state): State<AppState>,
    Path(element): Path<String>,
) -> Result<Json<ElementState>> {
    let render = state.render.read().await;

    render
        .get(&element)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Element {} not found", element)))
}

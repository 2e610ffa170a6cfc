use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{health, render, rules, switch, AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/render", get(render::get_render_state))
        .route("/api/render/{element}", get(render::get_element))
        .route("/api/switch", post(switch::switch_device))
        .route("/rules/add-single-use", get(rules::single_use_rule_form))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

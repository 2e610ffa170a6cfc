pub mod health;
pub mod render;
pub mod rules;
pub mod switch;

use std::sync::Arc;

use crate::{
    poller::SharedPollStats,
    render::SharedRenderState,
    source::{CommandSink, RuleEditor},
};

#[derive(Clone)]
pub struct AppState {
    pub render: SharedRenderState,
    pub stats: SharedPollStats,
    pub commands: Arc<dyn CommandSink>,
    pub rules: Arc<dyn RuleEditor>,
}

impl AppState {
    pub fn new(
        render: SharedRenderState,
        stats: SharedPollStats,
        commands: Arc<dyn CommandSink>,
        rules: Arc<dyn RuleEditor>,
    ) -> Self {
        Self {
            render,
            stats,
            commands,
            rules,
        }
    }
}

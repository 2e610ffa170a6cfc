//! The dashboard's current render state.
//!
//! Holds what every element should show right now. Each poll pass writes
//! its instructions over the previous values, element by element.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::reconcile::Reconciliation;

pub type SharedRenderState = Arc<RwLock<RenderState>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ElementState {
    pub text: String,
    pub stale: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenderState {
    elements: BTreeMap<String, ElementState>,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedRenderState {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Write every instruction of a pass. Returns the number of elements
    /// whose text or stale flag changed.
    pub fn apply(&mut self, reconciliation: &Reconciliation) -> usize {
        let mut changed = 0;

        for instruction in &reconciliation.instructions {
            if self.write(&instruction.element, &instruction.text, instruction.stale) {
                changed += 1;
            }

            if let Some(mark) = &instruction.trend {
                if self.write(&mark.element, mark.trend.symbol(), None) {
                    changed += 1;
                }
            }
        }

        changed
    }

    pub fn get(&self, element: &str) -> Option<&ElementState> {
        self.elements.get(element)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ElementState)> {
        self.elements.iter()
    }

    fn write(&mut self, element: &str, text: &str, stale: Option<bool>) -> bool {
        let previous = self.elements.get(element);
        let next = ElementState {
            text: text.to_string(),
            // No flag in the instruction leaves the current one alone
            stale: stale.unwrap_or_else(|| previous.map(|e| e.stale).unwrap_or(false)),
        };

        if previous == Some(&next) {
            return false;
        }

        self.elements.insert(element.to_string(), next);
        true
    }
}

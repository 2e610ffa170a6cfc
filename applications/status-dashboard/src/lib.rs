pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod poller;
pub mod reconcile;
pub mod render;
pub mod source;

// Re-export commonly used items
pub use config::Config;
pub use error::{AppError, Result};
pub use models::{DeviceStatus, Snapshot, SwitchCommand};
pub use poller::{PollStats, Poller};
pub use reconcile::{reconcile, Reconciliation, RenderInstruction, Trend};
pub use render::RenderState;

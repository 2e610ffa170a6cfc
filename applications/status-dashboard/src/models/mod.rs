pub mod command;
pub mod snapshot;

pub use command::SwitchCommand;
pub use snapshot::{
    DeviceKind, DeviceStatus, FieldReading, HistoryPoint, LegacyTemperature, Reading, Snapshot,
};

//! Turns a status snapshot into per-element render instructions.
//!
//! `reconcile` is pure: it only looks at the snapshot and the supplied
//! wall-clock time, so every pass can be replayed in tests.

pub mod element;
pub mod format;
pub mod trend;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::{DeviceKind, DeviceStatus, FieldReading, LegacyTemperature, Reading, Snapshot};
use format::{format_age, format_number, round_half_up, round_to};
pub use trend::{Boundary, LookbackWindow, Trend, LEGACY_WINDOW, SENSOR_WINDOW};

/// Shown when there is no usable value
pub const PLACEHOLDER: &str = "--";

/// Readings older than this are flagged stale
pub const STALE_AFTER_MINUTES: f64 = 60.0;

/// Legacy temperature readings older than this are blanked out
pub const LEGACY_EXPIRED_AFTER_MINUTES: f64 = 180.0;

const TEMPERATURE_FIELD: &str = "temperature";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendMark {
    pub element: String,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderInstruction {
    pub element: String,
    pub text: String,
    /// `None` for device kinds that never go stale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendMark>,
}

impl RenderInstruction {
    pub fn text(element: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            text: text.into(),
            stale: None,
            trend: None,
        }
    }

    pub fn with_stale(mut self, stale: bool) -> Self {
        self.stale = Some(stale);
        self
    }

    pub fn with_trend(mut self, element: impl Into<String>, trend: Trend) -> Self {
        self.trend = Some(TrendMark {
            element: element.into(),
            trend,
        });
        self
    }

    pub fn is_stale(&self) -> bool {
        self.stale.unwrap_or(false)
    }

    pub fn trend_indicator(&self) -> Trend {
        self.trend.as_ref().map(|mark| mark.trend).unwrap_or_default()
    }
}

/// A device whose `Type` is not recognised. It is still rendered
/// percentage-style; the error is only reported.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("device {device} has unrecognized type '{device_type}'")]
pub struct UnknownDeviceType {
    pub device: String,
    pub device_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    pub instructions: Vec<RenderInstruction>,
    pub unrecognized: Vec<UnknownDeviceType>,
}

impl Reconciliation {
    pub fn get(&self, element: &str) -> Option<&RenderInstruction> {
        self.instructions.iter().find(|i| i.element == element)
    }

    fn push(&mut self, instruction: RenderInstruction) {
        self.instructions.push(instruction);
    }
}

/// Compute render instructions for every device in `snapshot` as of `now`
pub fn reconcile(snapshot: &Snapshot, now: DateTime<Utc>) -> Reconciliation {
    let mut reconciliation = Reconciliation::default();

    for (name, status) in snapshot {
        match status {
            DeviceStatus::Plug { on } => reconciliation.push(RenderInstruction::text(
                element::value(name),
                switch_label(*on, "on", "off"),
            )),
            DeviceStatus::DoorSensor { open } => reconciliation.push(RenderInstruction::text(
                element::value(name),
                switch_label(*open, "open", "closed"),
            )),
            DeviceStatus::Sensor { values } => {
                for (key, reading) in values {
                    reconciliation.push(render_sensor_field(name, key, reading, now));
                }
            }
            DeviceStatus::LegacyTemperature(legacy) => {
                render_legacy_temperature(name, legacy, now, &mut reconciliation)
            }
            DeviceStatus::Percentage { device_type, value } => {
                if DeviceKind::classify(device_type).is_none() {
                    reconciliation.unrecognized.push(UnknownDeviceType {
                        device: name.clone(),
                        device_type: device_type.clone(),
                    });
                }
                reconciliation.push(RenderInstruction::text(
                    element::value(name),
                    percentage_label(*value),
                ));
            }
        }
    }

    reconciliation
}

fn switch_label(state: Option<bool>, on: &str, off: &str) -> String {
    match state {
        Some(true) => on.to_string(),
        Some(false) => off.to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

fn percentage_label(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}%", format_number(round_half_up(v))),
        None => PLACEHOLDER.to_string(),
    }
}

fn number_label(value: Option<f64>, scale: f64) -> String {
    value
        .map(|v| format_number(round_to(v, scale)))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn age_minutes(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - since).num_milliseconds() as f64 / 60_000.0
}

fn elapsed_seconds(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - since).num_milliseconds() as f64 / 1000.0
}

fn render_sensor_field(
    device: &str,
    key: &str,
    reading: &FieldReading,
    now: DateTime<Utc>,
) -> RenderInstruction {
    let scale = if key == TEMPERATURE_FIELD { 10.0 } else { 1.0 };

    let text = match reading.since {
        Some(since) => format_age(elapsed_seconds(since, now)),
        None => match &reading.value {
            Reading::Null => PLACEHOLDER.to_string(),
            Reading::Number(n) => format_number(round_to(*n, scale)),
            Reading::Text(s) => s.clone(),
            Reading::Flag(b) => b.to_string(),
        },
    };

    // Without a LastChanged the age is unknown, which never counts as stale
    let stale = reading
        .last_changed
        .map(|changed| age_minutes(changed, now) > STALE_AFTER_MINUTES)
        .unwrap_or(false);

    let instruction = RenderInstruction::text(element::field(device, key), text).with_stale(stale);

    if key != TEMPERATURE_FIELD {
        return instruction;
    }

    match &reading.history {
        Some(history) => {
            let trend = match (reading.value.as_number(), reading.last_changed) {
                (Some(current), Some(changed)) => SENSOR_WINDOW.trend(history, changed, current),
                _ => Trend::Flat,
            };
            instruction.with_trend(element::field_trend(device, key), trend)
        }
        None => instruction,
    }
}

fn render_legacy_temperature(
    device: &str,
    legacy: &LegacyTemperature,
    now: DateTime<Utc>,
    reconciliation: &mut Reconciliation,
) {
    // A device that never reported is treated like an expired one
    let age = legacy.last_update.map(|updated| age_minutes(updated, now));
    let (text, stale) = match age {
        Some(age) if age <= STALE_AFTER_MINUTES => (number_label(legacy.value, 10.0), false),
        Some(age) if age <= LEGACY_EXPIRED_AFTER_MINUTES => {
            (number_label(legacy.value, 10.0), true)
        }
        _ => (PLACEHOLDER.to_string(), true),
    };

    let mut instruction = RenderInstruction::text(element::value(device), text).with_stale(stale);

    if let Some(history) = &legacy.history {
        // The reference is the final entry even when its time is unreadable
        let reference = history.last().and_then(|newest| newest.time);
        let trend = match (reference, legacy.value) {
            (Some(reference), Some(current)) => LEGACY_WINDOW.trend(history, reference, current),
            _ => Trend::Flat,
        };
        instruction = instruction.with_trend(element::trend(device), trend);
    }

    reconciliation.push(instruction);

    if let Some(humidity) = legacy.humidity.filter(|h| *h != 0.0) {
        reconciliation.push(RenderInstruction::text(
            element::humidity(device),
            format_number(round_half_up(humidity)),
        ));
    }
}

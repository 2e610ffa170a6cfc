//! Status snapshot as served by the home-automation `/api/status` endpoint.
//!
//! Devices are decoded leniently: a missing or malformed field becomes
//! "absent" instead of failing the whole snapshot.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One poll's worth of device statuses, keyed by device name
pub type Snapshot = BTreeMap<String, DeviceStatus>;

/// Device types rendered as a plain percentage
const PERCENTAGE_TYPES: &[&str] = &[
    "",
    "percentage",
    "light",
    "zlight",
    "dimmable",
    "thermostat",
    "blind",
    "switch",
    "group",
    "time",
    "motion-sensor",
    "IRControl",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Plug,
    Sensor,
    DoorSensor,
    LegacyTemperature,
    Percentage,
}

impl DeviceKind {
    /// Map a `Type` tag to its rendering kind. Returns `None` for tags this
    /// dashboard has never seen.
    pub fn classify(device_type: &str) -> Option<Self> {
        match device_type {
            "plug" => Some(Self::Plug),
            "sensor" => Some(Self::Sensor),
            "door-sensor" => Some(Self::DoorSensor),
            "temperature" => Some(Self::LegacyTemperature),
            t if PERCENTAGE_TYPES.contains(&t) => Some(Self::Percentage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum DeviceStatus {
    Plug { on: Option<bool> },
    DoorSensor { open: Option<bool> },
    Sensor { values: BTreeMap<String, FieldReading> },
    LegacyTemperature(LegacyTemperature),
    Percentage { device_type: String, value: Option<f64> },
}

impl From<Value> for DeviceStatus {
    fn from(raw: Value) -> Self {
        let device_type = raw.get("Type").and_then(Value::as_str).unwrap_or_default();

        match DeviceKind::classify(device_type).unwrap_or(DeviceKind::Percentage) {
            DeviceKind::Plug => DeviceStatus::Plug {
                on: raw.get("value").and_then(Value::as_bool),
            },
            DeviceKind::DoorSensor => DeviceStatus::DoorSensor {
                open: raw.get("value").and_then(Value::as_bool),
            },
            DeviceKind::Sensor => DeviceStatus::Sensor {
                values: parse_values(raw.get("Values")),
            },
            DeviceKind::LegacyTemperature => {
                DeviceStatus::LegacyTemperature(LegacyTemperature::from_json(&raw))
            }
            DeviceKind::Percentage => DeviceStatus::Percentage {
                device_type: device_type.to_string(),
                value: raw.get("value").and_then(Value::as_f64),
            },
        }
    }
}

/// Current value of a single sensor field
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Null,
    Number(f64),
    Text(String),
    Flag(bool),
}

impl Reading {
    fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n.as_f64().map(Reading::Number).unwrap_or(Reading::Null),
            Some(Value::String(s)) => Reading::Text(s.clone()),
            Some(Value::Bool(b)) => Reading::Flag(*b),
            _ => Reading::Null,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Reading::Number(n) => Some(*n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    /// `None` when the entry's `Time` could not be parsed
    pub time: Option<DateTime<Utc>>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldReading {
    pub value: Reading,
    pub last_changed: Option<DateTime<Utc>>,
    pub since: Option<DateTime<Utc>>,
    pub history: Option<Vec<HistoryPoint>>,
}

impl FieldReading {
    fn from_json(raw: &Value) -> Self {
        Self {
            value: Reading::from_json(raw.get("value")),
            last_changed: parse_timestamp(raw.get("LastChanged")),
            since: parse_timestamp(raw.get("Since")),
            history: parse_history(raw.get("History"), "Value"),
        }
    }
}

/// Deprecated single-value temperature device
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyTemperature {
    pub value: Option<f64>,
    pub humidity: Option<f64>,
    pub last_update: Option<DateTime<Utc>>,
    pub history: Option<Vec<HistoryPoint>>,
}

impl LegacyTemperature {
    fn from_json(raw: &Value) -> Self {
        Self {
            value: raw.get("value").and_then(Value::as_f64),
            humidity: raw.get("Humidity").and_then(Value::as_f64),
            last_update: parse_timestamp(raw.get("lastUpdate")),
            history: parse_history(raw.get("history"), "Temperature"),
        }
    }
}

fn parse_values(raw: Option<&Value>) -> BTreeMap<String, FieldReading> {
    match raw {
        Some(Value::Object(fields)) => fields
            .iter()
            .map(|(key, reading)| (key.clone(), FieldReading::from_json(reading)))
            .collect(),
        _ => BTreeMap::new(),
    }
}

fn parse_history(raw: Option<&Value>, value_key: &str) -> Option<Vec<HistoryPoint>> {
    match raw {
        Some(Value::Array(entries)) => Some(
            entries
                .iter()
                .map(|entry| HistoryPoint {
                    time: parse_timestamp(entry.get("Time")),
                    value: entry.get(value_key).and_then(Value::as_f64),
                })
                .collect(),
        ),
        _ => None,
    }
}

fn parse_timestamp(raw: Option<&Value>) -> Option<DateTime<Utc>> {
    raw?.as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

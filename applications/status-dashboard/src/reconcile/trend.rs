use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::HistoryPoint;

/// Minimum absolute change before a trend is shown
pub const TREND_THRESHOLD: f64 = 0.5;

/// Sensor fields: 25 minutes back from `LastChanged`, inclusive.
pub const SENSOR_WINDOW: LookbackWindow = LookbackWindow {
    minutes: 25,
    boundary: Boundary::Inclusive,
};

/// Legacy temperature devices: 30 minutes back from the newest history
/// entry, exclusive. Kept apart from `SENSOR_WINDOW` so older payloads render
/// exactly as they always have.
pub const LEGACY_WINDOW: LookbackWindow = LookbackWindow {
    minutes: 30,
    boundary: Boundary::Exclusive,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    #[default]
    Flat,
    Rising,
    Falling,
}

impl Trend {
    /// Classify `historical - current`.
    ///
    /// A negative delta means the reading went up since the baseline.
    pub fn from_delta(delta: f64) -> Self {
        if delta < -TREND_THRESHOLD {
            Trend::Rising
        } else if delta > TREND_THRESHOLD {
            Trend::Falling
        } else {
            Trend::Flat
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Trend::Flat => "",
            Trend::Rising => "🔺",
            Trend::Falling => "🔻",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Entries at exactly the cutoff qualify
    Inclusive,
    /// Entries must be strictly older than the cutoff
    Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    pub minutes: i64,
    pub boundary: Boundary,
}

impl LookbackWindow {
    pub fn cutoff(&self, reference: DateTime<Utc>) -> DateTime<Utc> {
        reference - Duration::minutes(self.minutes)
    }

    /// Entries without a time never qualify
    fn admits(&self, time: Option<DateTime<Utc>>, cutoff: DateTime<Utc>) -> bool {
        match (time, self.boundary) {
            (Some(time), Boundary::Inclusive) => time <= cutoff,
            (Some(time), Boundary::Exclusive) => time < cutoff,
            (None, _) => false,
        }
    }

    /// Most recent history entry old enough to compare against, scanning
    /// from the end of the series.
    pub fn baseline<'a>(
        &self,
        history: &'a [HistoryPoint],
        reference: DateTime<Utc>,
    ) -> Option<&'a HistoryPoint> {
        let cutoff = self.cutoff(reference);
        history.iter().rev().find(|point| self.admits(point.time, cutoff))
    }

    /// Trend of `current` against the baseline entry. No baseline, or a
    /// baseline without a numeric value, reads as flat.
    pub fn trend(&self, history: &[HistoryPoint], reference: DateTime<Utc>, current: f64) -> Trend {
        self.baseline(history, reference)
            .and_then(|point| point.value)
            .map(|historical| Trend::from_delta(historical - current))
            .unwrap_or_default()
    }
}

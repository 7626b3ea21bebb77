//! Distance readings and their safety classification.

use std::fmt;

use chrono::{DateTime, TimeZone};

/// Timestamp layout used for display and the log store.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Distance below which the driver must stop.
pub const STOP_BELOW_CM: f64 = 50.0;

/// Distance below which the driver should slow down.
pub const CAUTION_BELOW_CM: f64 = 100.0;

/// Safety status derived from a distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Negative distance; the sensor value is meaningless.
    Invalid,
    /// Obstacle is very close.
    Stop,
    /// Obstacle is approaching.
    Caution,
    /// Far enough.
    Safe,
}

impl Status {
    /// Classifies a distance in centimeters. First matching rule wins.
    pub fn classify(distance_cm: f64) -> Self {
        if distance_cm < 0.0 {
            Status::Invalid
        } else if distance_cm < STOP_BELOW_CM {
            Status::Stop
        } else if distance_cm < CAUTION_BELOW_CM {
            Status::Caution
        } else {
            Status::Safe
        }
    }

    /// Returns the upper-case label printed next to a reading.
    pub fn label(self) -> &'static str {
        match self {
            Status::Invalid => "INVALID",
            Status::Stop => "STOP",
            Status::Caution => "CAUTION",
            Status::Safe => "SAFE",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One (timestamp, distance) observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    timestamp: String,
    distance_cm: f64,
}

impl Reading {
    /// Creates a reading stamped with the given time.
    pub fn new<Tz>(at: &DateTime<Tz>, distance_cm: f64) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            distance_cm,
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn distance_cm(&self) -> f64 {
        self.distance_cm
    }

    /// Status is recomputed on every call rather than stored.
    pub fn status(&self) -> Status {
        Status::classify(self.distance_cm)
    }

    /// Formats the console line, e.g. `[2025-01-02 03:04:05] Distance: 30.00 cm -> STOP`.
    pub fn summary_line(&self) -> String {
        format!(
            "[{}] Distance: {:.2} cm -> {}",
            self.timestamp,
            self.distance_cm,
            self.status()
        )
    }

    /// Formats the log store record, e.g. `2025-01-02 03:04:05,30.00`.
    pub fn csv_record(&self) -> String {
        format!("{},{:.2}", self.timestamp, self.distance_cm)
    }
}

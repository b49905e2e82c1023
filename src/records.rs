//! Typed swing records produced by the decoder.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The sensor family a session was recorded with. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum SwingInstrumentType {
    /// Bat-speed / attack-angle / time-to-contact sensor.
    BatTracker,
    /// Exit-velocity / launch-angle / distance tracker.
    BallTracker,
}

impl fmt::Display for SwingInstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwingInstrumentType::BatTracker => f.write_str("bat tracker"),
            SwingInstrumentType::BallTracker => f.write_str("ball tracker"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatSwingRecord {
    pub bat_speed: Option<f64>,
    pub attack_angle: Option<f64>,
    pub time_to_contact: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallSwingRecord {
    pub exit_velocity: Option<f64>,
    pub launch_angle: Option<f64>,
    pub distance: Option<f64>,
    pub strike_zone: Option<u8>,
    pub pitch_speed: Option<f64>,
    pub spray_chart_x: Option<f64>,
    pub spray_chart_z: Option<f64>,
}

/// One decoded line.
#[derive(Debug, Clone, PartialEq)]
pub enum SwingRecord {
    Bat(BatSwingRecord),
    Ball(BallSwingRecord),
}

/// All records of one session. The variant carries the instrument type, so a
/// collection can never mix the two families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "instrument", content = "records", rename_all = "camelCase")]
pub enum SwingRecords {
    BatTracker(Vec<BatSwingRecord>),
    BallTracker(Vec<BallSwingRecord>),
}

impl SwingRecords {
    pub fn empty(instrument: SwingInstrumentType) -> Self {
        match instrument {
            SwingInstrumentType::BatTracker => SwingRecords::BatTracker(Vec::new()),
            SwingInstrumentType::BallTracker => SwingRecords::BallTracker(Vec::new()),
        }
    }

    pub fn instrument(&self) -> SwingInstrumentType {
        match self {
            SwingRecords::BatTracker(_) => SwingInstrumentType::BatTracker,
            SwingRecords::BallTracker(_) => SwingInstrumentType::BallTracker,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SwingRecords::BatTracker(r) => r.len(),
            SwingRecords::BallTracker(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends `other` if both hold the same instrument type. Returns `false`
    /// and leaves `self` untouched otherwise.
    pub fn extend_from(&mut self, other: SwingRecords) -> bool {
        match (self, other) {
            (SwingRecords::BatTracker(a), SwingRecords::BatTracker(b)) => {
                a.extend(b);
                true
            }
            (SwingRecords::BallTracker(a), SwingRecords::BallTracker(b)) => {
                a.extend(b);
                true
            }
            _ => false,
        }
    }
}

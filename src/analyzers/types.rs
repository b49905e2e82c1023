//! Data types used by the report pipeline.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::analyzers::grade::GradeChange;
use crate::analyzers::utility::round_to;
use crate::records::SwingInstrumentType;
use crate::stats::{BatSpeedMetrics, ExitVelocityMetrics};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub session_type: SwingInstrumentType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub id: String,
    pub name: String,
    pub level: String,
}

/// Metrics of the reported session. Only the block matching the session's
/// instrument is populated; both are empty when the session has no data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetrics {
    pub bat_speed: Option<BatSpeedMetrics>,
    pub exit_velocity: Option<ExitVelocityMetrics>,
    pub summary: String,
}

impl ReportMetrics {
    pub fn is_empty(&self) -> bool {
        self.bat_speed.is_none() && self.exit_velocity.is_none()
    }
}

/// Serializes a speed or speed delta at 1 decimal. The field itself keeps full precision.
fn round_tenth<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    value.map(|v| round_to(v, 1)).serialize(serializer)
}

/// Lightweight per-session figures used for history and trends.
///
/// Values are unrounded; trends are computed from them and they are rounded on output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetrics {
    #[serde(serialize_with = "round_tenth")]
    pub avg_bat_speed: Option<f64>,
    #[serde(serialize_with = "round_tenth")]
    pub top_bat_speed: Option<f64>,
    #[serde(serialize_with = "round_tenth")]
    pub avg_exit_velocity: Option<f64>,
    #[serde(serialize_with = "round_tenth")]
    pub top_exit_velocity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub session_id: String,
    pub session_date: NaiveDate,
    pub session_type: SwingInstrumentType,
    pub metrics: SnapshotMetrics,
}

/// Change from the previous history entry. Absent when either side lacks the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendDeltas {
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "round_tenth")]
    pub avg_bat_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "round_tenth")]
    pub top_bat_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "round_tenth")]
    pub avg_exit_velocity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "round_tenth")]
    pub top_exit_velocity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_bat_speed_grade: Option<GradeChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_exit_velocity_grade: Option<GradeChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendEntry {
    pub session_id: String,
    pub session_date: NaiveDate,
    pub trends: TrendDeltas,
}

/// Complete report for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub schema_version: u8,
    pub session: SessionSummary,
    pub player: PlayerSummary,
    pub metrics: ReportMetrics,
    pub history: Vec<HistoryEntry>,
    pub trends: Vec<TrendEntry>,
}

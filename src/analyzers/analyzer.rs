use tracing::{info, warn};

use crate::analyzers::aggregate::{build_history, build_trends};
use crate::analyzers::types::{PlayerSummary, Report, ReportMetrics, SessionSummary};
use crate::benchmarks::BenchmarkTable;
use crate::error::ReportError;
use crate::records::{SwingInstrumentType, SwingRecords};
use crate::stats::{BatSpeedMetrics, ExitVelocityMetrics, SessionMetrics};
use crate::store::SessionStore;

pub const REPORT_SCHEMA_VERSION: u8 = 1;

fn bat_speed_summary(m: &BatSpeedMetrics) -> String {
    format!(
        "Average bat speed {:.1} mph ({}), top 10% {:.1} mph, time to contact {:.3} s across {} swings",
        m.avg_bat_speed,
        m.grades.avg_bat_speed,
        m.top10_percent_bat_speed,
        m.avg_time_to_contact,
        m.data_points
    )
}

fn exit_velocity_summary(m: &ExitVelocityMetrics) -> String {
    format!(
        "Average exit velocity {:.1} mph ({}), top 8% {:.1} mph, barrel rate {:.1}% across {} balls in play",
        m.avg_exit_velocity,
        m.grades.avg_exit_velocity,
        m.top8_percent_exit_velocity,
        m.barrel_percentage,
        m.data_points
    )
}

/// Placeholder text for a session without usable records.
pub fn no_data_summary(instrument: SwingInstrumentType) -> String {
    format!("No {} data available for this session", instrument)
}

/// Builds the report for one session: its graded metrics, the player's
/// session history and the session-over-session trends.
///
/// A session without usable records still yields a report, with empty
/// metrics and a placeholder summary.
///
/// # Errors
///
/// Returns [`ReportError`] if the session or its player is not in the store.
#[tracing::instrument(skip(store, benchmarks))]
pub fn build_report<S: SessionStore + ?Sized>(
    store: &S,
    benchmarks: &BenchmarkTable,
    session_id: &str,
) -> Result<Report, ReportError> {
    let session = store
        .session(session_id)
        .ok_or_else(|| ReportError::SessionNotFound(session_id.to_string()))?;
    let player = store
        .player(&session.player_id)
        .ok_or_else(|| ReportError::PlayerNotFound {
            session_id: session_id.to_string(),
            player_id: session.player_id.clone(),
        })?;
    let level_benchmarks = benchmarks.for_level(&player.level);

    let empty = SwingRecords::empty(session.instrument);
    let records = store
        .records(session_id)
        .filter(|r| r.instrument() == session.instrument)
        .unwrap_or(&empty);

    let metrics = match SessionMetrics::from_records(records, level_benchmarks) {
        Ok(SessionMetrics::BatSpeed(m)) => ReportMetrics {
            summary: bat_speed_summary(&m),
            bat_speed: Some(m),
            exit_velocity: None,
        },
        Ok(SessionMetrics::ExitVelocity(m)) => ReportMetrics {
            summary: exit_velocity_summary(&m),
            bat_speed: None,
            exit_velocity: Some(m),
        },
        Err(e) => {
            warn!(error = %e, "Metrics unavailable, reporting empty metrics");
            ReportMetrics {
                bat_speed: None,
                exit_velocity: None,
                summary: no_data_summary(session.instrument),
            }
        }
    };

    let history = build_history(store, &player.id);
    let trends = build_trends(&history, level_benchmarks);

    info!(
        player_id = %player.id,
        level = %player.level,
        history = history.len(),
        has_metrics = !metrics.is_empty(),
        "Report built"
    );

    Ok(Report {
        schema_version: REPORT_SCHEMA_VERSION,
        session: SessionSummary {
            id: session.id.clone(),
            date: session.date,
            session_type: session.instrument,
        },
        player: PlayerSummary {
            id: player.id.clone(),
            name: player.name.clone(),
            level: player.level.clone(),
        },
        metrics,
        history,
        trends,
    })
}

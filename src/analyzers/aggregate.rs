use crate::analyzers::grade::calculate_grade_change;
use crate::analyzers::types::{HistoryEntry, SnapshotMetrics, TrendDeltas, TrendEntry};
use crate::analyzers::utility::{mean, percentile};
use crate::benchmarks::BenchmarkEntry;
use crate::records::SwingRecords;
use crate::stats::{TOP_BAT_SPEED_PERCENTILE, TOP_EXIT_VELOCITY_PERCENTILE};
use crate::store::SessionStore;

/// Average and top value of a series, or `None` for an empty series.
fn avg_and_top(values: &[f64], top_percentile: f64) -> (Option<f64>, Option<f64>) {
    if values.is_empty() {
        return (None, None);
    }
    (Some(mean(values)), Some(percentile(values, top_percentile)))
}

/// Computes the history figures for one session's records.
pub fn snapshot(records: Option<&SwingRecords>) -> SnapshotMetrics {
    match records {
        Some(SwingRecords::BatTracker(r)) => {
            let speeds: Vec<f64> = r.iter().filter_map(|s| s.bat_speed).collect();
            let (avg_bat_speed, top_bat_speed) = avg_and_top(&speeds, TOP_BAT_SPEED_PERCENTILE);
            SnapshotMetrics {
                avg_bat_speed,
                top_bat_speed,
                ..Default::default()
            }
        }
        Some(SwingRecords::BallTracker(r)) => {
            let evs: Vec<f64> = r
                .iter()
                .filter_map(|s| s.exit_velocity)
                .filter(|ev| *ev > 0.0)
                .collect();
            let (avg_exit_velocity, top_exit_velocity) =
                avg_and_top(&evs, TOP_EXIT_VELOCITY_PERCENTILE);
            SnapshotMetrics {
                avg_exit_velocity,
                top_exit_velocity,
                ..Default::default()
            }
        }
        None => SnapshotMetrics::default(),
    }
}

/// All sessions of a player, oldest first, each with its snapshot.
pub fn build_history<S: SessionStore + ?Sized>(store: &S, player_id: &str) -> Vec<HistoryEntry> {
    let mut sessions = store.player_sessions(player_id);
    sessions.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    sessions
        .into_iter()
        .map(|session| HistoryEntry {
            session_id: session.id.clone(),
            session_date: session.date,
            session_type: session.instrument,
            metrics: snapshot(
                store
                    .records(&session.id)
                    .filter(|r| r.instrument() == session.instrument),
            ),
        })
        .collect()
}

fn delta(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    Some(current? - previous?)
}

/// Session-over-session changes between consecutive history entries.
///
/// Grade changes are measured on the 20-80 scale against `benchmarks`.
pub fn build_trends(history: &[HistoryEntry], benchmarks: &BenchmarkEntry) -> Vec<TrendEntry> {
    history
        .windows(2)
        .map(|pair| {
            let (prev, cur) = (&pair[0].metrics, &pair[1].metrics);

            let avg_bat_speed_grade = prev.avg_bat_speed.zip(cur.avg_bat_speed).map(|(p, c)| {
                calculate_grade_change(
                    p,
                    c,
                    benchmarks.avg_bat_speed.average,
                    benchmarks.avg_bat_speed.upper,
                )
            });
            let avg_exit_velocity_grade = prev
                .avg_exit_velocity
                .zip(cur.avg_exit_velocity)
                .map(|(p, c)| {
                    calculate_grade_change(
                        p,
                        c,
                        benchmarks.avg_exit_velocity.average,
                        benchmarks.avg_exit_velocity.upper,
                    )
                });

            TrendEntry {
                session_id: pair[1].session_id.clone(),
                session_date: pair[1].session_date,
                trends: TrendDeltas {
                    avg_bat_speed: delta(prev.avg_bat_speed, cur.avg_bat_speed),
                    top_bat_speed: delta(prev.top_bat_speed, cur.top_bat_speed),
                    avg_exit_velocity: delta(prev.avg_exit_velocity, cur.avg_exit_velocity),
                    top_exit_velocity: delta(prev.top_exit_velocity, cur.top_exit_velocity),
                    avg_bat_speed_grade,
                    avg_exit_velocity_grade,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::grade::Direction;
    use crate::analyzers::utility::round_to;
    use crate::benchmarks::get_benchmarks_for_level;
    use crate::records::{BatSwingRecord, SwingInstrumentType};
    use crate::stats::BatSpeedMetrics;
    use chrono::NaiveDate;

    fn entry(id: &str, day: u32, metrics: SnapshotMetrics) -> HistoryEntry {
        HistoryEntry {
            session_id: id.to_string(),
            session_date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            session_type: SwingInstrumentType::BatTracker,
            metrics,
        }
    }

    fn bat_records(speeds: &[f64]) -> Vec<BatSwingRecord> {
        speeds
            .iter()
            .map(|&speed| BatSwingRecord {
                bat_speed: Some(speed),
                attack_angle: Some(5.0),
                time_to_contact: Some(0.15),
            })
            .collect()
    }

    fn bat_snapshot(avg: f64, top: f64) -> SnapshotMetrics {
        SnapshotMetrics {
            avg_bat_speed: Some(avg),
            top_bat_speed: Some(top),
            ..Default::default()
        }
    }

    #[test]
    fn test_snapshot_bat_records() {
        let records = SwingRecords::BatTracker(vec![
            BatSwingRecord {
                bat_speed: Some(60.0),
                attack_angle: Some(5.0),
                time_to_contact: Some(0.15),
            },
            BatSwingRecord {
                bat_speed: Some(70.0),
                attack_angle: Some(5.0),
                time_to_contact: Some(0.15),
            },
        ]);
        let s = snapshot(Some(&records));
        assert_eq!(s.avg_bat_speed, Some(65.0));
        assert_eq!(s.top_bat_speed, Some(69.0));
        assert_eq!(s.avg_exit_velocity, None);
    }

    #[test]
    fn test_snapshot_empty() {
        let s = snapshot(Some(&SwingRecords::empty(SwingInstrumentType::BallTracker)));
        assert_eq!(s, SnapshotMetrics::default());
        assert_eq!(snapshot(None), SnapshotMetrics::default());
    }

    #[test]
    fn test_trends_between_consecutive_sessions() {
        let hs = get_benchmarks_for_level("High School");
        let history = vec![
            entry("a", 1, bat_snapshot(64.0, 68.0)),
            entry("b", 8, bat_snapshot(66.0, 69.5)),
            entry("c", 15, bat_snapshot(65.1, 69.5)),
        ];

        let trends = build_trends(&history, hs);
        assert_eq!(trends.len(), 2);

        assert_eq!(trends[0].session_id, "b");
        assert_eq!(trends[0].trends.avg_bat_speed, Some(2.0));
        assert_eq!(trends[0].trends.top_bat_speed, Some(1.5));
        assert_eq!(trends[0].trends.avg_exit_velocity, None);
        let grade = trends[0].trends.avg_bat_speed_grade.unwrap();
        assert_eq!((grade.old_grade, grade.new_grade), (50, 60));
        assert_eq!(grade.direction, Direction::Up);

        assert_eq!(trends[1].trends.avg_bat_speed.map(|d| round_to(d, 1)), Some(-0.9));
        assert_eq!(trends[1].trends.top_bat_speed, Some(0.0));
    }

    #[test]
    fn test_trends_use_unrounded_session_values() {
        let hs = get_benchmarks_for_level("High School");
        let (before, after) = (bat_records(&[64.04]), bat_records(&[64.96]));
        let history = vec![
            entry("a", 1, snapshot(Some(&SwingRecords::BatTracker(before)))),
            entry("b", 2, snapshot(Some(&SwingRecords::BatTracker(after.clone())))),
        ];

        let trends = build_trends(&history, hs);
        let deltas = &trends[0].trends;
        let json = serde_json::to_value(deltas).unwrap();
        assert_eq!(json["avgBatSpeed"], 0.9);

        // 64.96 is below the first step above the High School average of 64
        let session = BatSpeedMetrics::from_records(&after, hs).unwrap();
        let change = deltas.avg_bat_speed_grade.unwrap();
        assert_eq!(change.new_grade, session.scouting.avg_bat_speed.grade);
        assert_eq!((change.old_grade, change.new_grade), (50, 50));
        assert_eq!(change.direction, Direction::Stable);

        let history_json = serde_json::to_value(&history[1]).unwrap();
        assert_eq!(history_json["metrics"]["avgBatSpeed"], 65.0);
    }

    #[test]
    fn test_trends_need_two_sessions() {
        let hs = get_benchmarks_for_level("High School");
        assert!(build_trends(&[], hs).is_empty());
        assert!(build_trends(&[entry("a", 1, bat_snapshot(60.0, 62.0))], hs).is_empty());
    }

    #[test]
    fn test_trends_across_instruments_have_no_deltas() {
        let hs = get_benchmarks_for_level("High School");
        let ball = SnapshotMetrics {
            avg_exit_velocity: Some(80.0),
            top_exit_velocity: Some(90.0),
            ..Default::default()
        };
        let trends = build_trends(
            &[entry("a", 1, bat_snapshot(60.0, 62.0)), entry("b", 2, ball)],
            hs,
        );
        assert_eq!(trends[0].trends, TrendDeltas::default());
    }
}

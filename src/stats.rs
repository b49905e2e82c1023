//! Per-session derived metrics.
//!
//! Aggregates are computed on raw values; rounding happens only when the
//! exposed [`BatSpeedMetrics`] / [`ExitVelocityMetrics`] are assembled.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::analyzers::grade::{GradingCurve, LetterGrade, ScoutingGrade, grade};
use crate::analyzers::utility::{mean, percentile, round_to};
use crate::benchmarks::{BenchmarkEntry, MetricBenchmark};
use crate::error::MetricsError;
use crate::records::{BallSwingRecord, BatSwingRecord, SwingInstrumentType, SwingRecords};

/// "Top 10%" bat speed cutoff.
pub const TOP_BAT_SPEED_PERCENTILE: f64 = 0.90;
/// "Top 8%" exit velocity cutoff.
pub const TOP_EXIT_VELOCITY_PERCENTILE: f64 = 0.92;
/// Barrels must reach this share of the session's hardest-hit ball.
pub const BARREL_EV_FRACTION: f64 = 0.90;
pub const BARREL_LAUNCH_ANGLE_MIN: f64 = 8.0;
pub const BARREL_LAUNCH_ANGLE_MAX: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatSpeedGrades {
    pub avg_bat_speed: LetterGrade,
    pub top_bat_speed: LetterGrade,
    pub attack_angle: LetterGrade,
    pub time_to_contact: LetterGrade,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatSpeedScouting {
    pub avg_bat_speed: ScoutingGrade,
    pub top_bat_speed: ScoutingGrade,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatSpeedBenchmark {
    pub avg_bat_speed: MetricBenchmark,
    pub top_bat_speed: MetricBenchmark,
    pub avg_time_to_contact: MetricBenchmark,
    pub avg_attack_angle: MetricBenchmark,
}

/// Metrics for a bat tracker session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatSpeedMetrics {
    pub avg_bat_speed: f64,
    pub top10_percent_bat_speed: f64,
    pub avg_attack_angle_top10: f64,
    pub avg_time_to_contact: f64,
    pub data_points: usize,
    pub grades: BatSpeedGrades,
    pub scouting: BatSpeedScouting,
    pub benchmark: BatSpeedBenchmark,
}

impl BatSpeedMetrics {
    /// # Errors
    ///
    /// [`MetricsError::NoData`] when no record carries a bat speed.
    pub fn from_records(
        records: &[BatSwingRecord],
        benchmarks: &BenchmarkEntry,
    ) -> Result<Self, MetricsError> {
        let bat_speeds: Vec<f64> = records.iter().filter_map(|r| r.bat_speed).collect();
        if bat_speeds.is_empty() {
            return Err(MetricsError::NoData {
                instrument: SwingInstrumentType::BatTracker,
            });
        }

        let time_to_contacts: Vec<f64> =
            records.iter().filter_map(|r| r.time_to_contact).collect();

        let avg_bat_speed = mean(&bat_speeds);
        let top_bat_speed = percentile(&bat_speeds, TOP_BAT_SPEED_PERCENTILE);

        let top_attack_angles: Vec<f64> = records
            .iter()
            .filter(|r| r.bat_speed.is_some_and(|s| s >= top_bat_speed))
            .filter_map(|r| r.attack_angle)
            .collect();
        let avg_attack_angle_top10 = mean(&top_attack_angles);
        let avg_time_to_contact = mean(&time_to_contacts);

        debug!(
            data_points = bat_speeds.len(),
            avg_bat_speed, top_bat_speed, "Bat speed metrics computed"
        );

        Ok(BatSpeedMetrics {
            avg_bat_speed: round_to(avg_bat_speed, 1),
            top10_percent_bat_speed: round_to(top_bat_speed, 1),
            avg_attack_angle_top10: round_to(avg_attack_angle_top10, 1),
            avg_time_to_contact: round_to(avg_time_to_contact, 3),
            data_points: bat_speeds.len(),
            grades: BatSpeedGrades {
                avg_bat_speed: grade(
                    avg_bat_speed,
                    benchmarks.avg_bat_speed.average,
                    GradingCurve::HigherIsBetter,
                ),
                top_bat_speed: grade(
                    top_bat_speed,
                    benchmarks.top_bat_speed.average,
                    GradingCurve::HigherIsBetter,
                ),
                attack_angle: grade(
                    avg_attack_angle_top10,
                    benchmarks.avg_attack_angle.average,
                    GradingCurve::HigherIsBetter,
                ),
                time_to_contact: grade(
                    avg_time_to_contact,
                    benchmarks.avg_time_to_contact.average,
                    GradingCurve::LowerIsBetter,
                ),
            },
            scouting: BatSpeedScouting {
                avg_bat_speed: scouting(avg_bat_speed, benchmarks.avg_bat_speed),
                top_bat_speed: scouting(top_bat_speed, benchmarks.top_bat_speed),
            },
            benchmark: BatSpeedBenchmark {
                avg_bat_speed: benchmarks.avg_bat_speed,
                top_bat_speed: benchmarks.top_bat_speed,
                avg_time_to_contact: benchmarks.avg_time_to_contact,
                avg_attack_angle: benchmarks.avg_attack_angle,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitVelocityGrades {
    pub avg_exit_velocity: LetterGrade,
    pub top_exit_velocity: LetterGrade,
    pub avg_launch_angle: LetterGrade,
    pub hard_hit_launch_angle: LetterGrade,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitVelocityScouting {
    pub avg_exit_velocity: ScoutingGrade,
    pub top_exit_velocity: ScoutingGrade,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitVelocityBenchmark {
    pub avg_exit_velocity: MetricBenchmark,
    pub top8_exit_velocity: MetricBenchmark,
    pub avg_launch_angle: MetricBenchmark,
    pub hard_hit_launch_angle: MetricBenchmark,
}

/// Metrics for a ball tracker session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitVelocityMetrics {
    pub avg_exit_velocity: f64,
    pub top8_percent_exit_velocity: f64,
    pub max_exit_velocity: f64,
    pub barrel_threshold: f64,
    pub barrel_count: usize,
    pub barrel_percentage: f64,
    pub avg_launch_angle_top8: f64,
    pub avg_distance_top8: f64,
    pub total_avg_launch_angle: f64,
    /// Top-8% records per strike zone; zones without hits are omitted.
    pub strike_zone_distribution: BTreeMap<u8, usize>,
    pub data_points: usize,
    pub grades: ExitVelocityGrades,
    pub scouting: ExitVelocityScouting,
    pub benchmark: ExitVelocityBenchmark,
}

fn is_barrel(record: &BallSwingRecord, threshold: f64) -> bool {
    record.exit_velocity.is_some_and(|ev| ev >= threshold)
        && record.launch_angle.is_some_and(|la| {
            (BARREL_LAUNCH_ANGLE_MIN..=BARREL_LAUNCH_ANGLE_MAX).contains(&la)
        })
}

impl ExitVelocityMetrics {
    /// # Errors
    ///
    /// [`MetricsError::NoData`] when no record has a positive exit velocity.
    pub fn from_records(
        records: &[BallSwingRecord],
        benchmarks: &BenchmarkEntry,
    ) -> Result<Self, MetricsError> {
        let valid: Vec<&BallSwingRecord> = records
            .iter()
            .filter(|r| r.exit_velocity.is_some_and(|ev| ev > 0.0))
            .collect();
        if valid.is_empty() {
            return Err(MetricsError::NoData {
                instrument: SwingInstrumentType::BallTracker,
            });
        }

        let exit_velocities: Vec<f64> = valid.iter().filter_map(|r| r.exit_velocity).collect();

        let avg_exit_velocity = mean(&exit_velocities);
        let top_exit_velocity = percentile(&exit_velocities, TOP_EXIT_VELOCITY_PERCENTILE);
        let max_exit_velocity = exit_velocities.iter().copied().fold(f64::MIN, f64::max);

        let barrel_threshold = BARREL_EV_FRACTION * max_exit_velocity;
        let barrel_count = valid
            .iter()
            .filter(|r| is_barrel(r, barrel_threshold))
            .count();

        let top: Vec<&&BallSwingRecord> = valid
            .iter()
            .filter(|r| r.exit_velocity.is_some_and(|ev| ev >= top_exit_velocity))
            .collect();

        let top_launch_angles: Vec<f64> = top.iter().filter_map(|r| r.launch_angle).collect();
        let top_distances: Vec<f64> = top.iter().filter_map(|r| r.distance).collect();
        let positive_launch_angles: Vec<f64> = valid
            .iter()
            .filter_map(|r| r.launch_angle)
            .filter(|la| *la > 0.0)
            .collect();

        let mut strike_zone_distribution = BTreeMap::new();
        for zone in top.iter().filter_map(|r| r.strike_zone) {
            *strike_zone_distribution.entry(zone).or_insert(0) += 1;
        }

        let avg_launch_angle_top8 = mean(&top_launch_angles);
        let total_avg_launch_angle = mean(&positive_launch_angles);

        debug!(
            data_points = valid.len(),
            avg_exit_velocity,
            top_exit_velocity,
            barrel_count,
            "Exit velocity metrics computed"
        );

        Ok(ExitVelocityMetrics {
            avg_exit_velocity: round_to(avg_exit_velocity, 1),
            top8_percent_exit_velocity: round_to(top_exit_velocity, 1),
            max_exit_velocity: round_to(max_exit_velocity, 1),
            barrel_threshold: round_to(barrel_threshold, 1),
            barrel_count,
            barrel_percentage: round_to(pct(barrel_count, valid.len()), 1),
            avg_launch_angle_top8: round_to(avg_launch_angle_top8, 1),
            avg_distance_top8: round_to(mean(&top_distances), 1),
            total_avg_launch_angle: round_to(total_avg_launch_angle, 1),
            strike_zone_distribution,
            data_points: valid.len(),
            grades: ExitVelocityGrades {
                avg_exit_velocity: grade(
                    avg_exit_velocity,
                    benchmarks.avg_exit_velocity.average,
                    GradingCurve::ExitVelocity,
                ),
                top_exit_velocity: grade(
                    top_exit_velocity,
                    benchmarks.top8_exit_velocity.average,
                    GradingCurve::ExitVelocity,
                ),
                avg_launch_angle: grade(
                    total_avg_launch_angle,
                    benchmarks.avg_launch_angle.average,
                    GradingCurve::HigherIsBetter,
                ),
                hard_hit_launch_angle: grade(
                    avg_launch_angle_top8,
                    benchmarks.hard_hit_launch_angle.average,
                    GradingCurve::HigherIsBetter,
                ),
            },
            scouting: ExitVelocityScouting {
                avg_exit_velocity: scouting(avg_exit_velocity, benchmarks.avg_exit_velocity),
                top_exit_velocity: scouting(top_exit_velocity, benchmarks.top8_exit_velocity),
            },
            benchmark: ExitVelocityBenchmark {
                avg_exit_velocity: benchmarks.avg_exit_velocity,
                top8_exit_velocity: benchmarks.top8_exit_velocity,
                avg_launch_angle: benchmarks.avg_launch_angle,
                hard_hit_launch_angle: benchmarks.hard_hit_launch_angle,
            },
        })
    }
}

/// Metrics for one session, shaped by its instrument type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SessionMetrics {
    BatSpeed(BatSpeedMetrics),
    ExitVelocity(ExitVelocityMetrics),
}

impl SessionMetrics {
    /// Runs the calculator matching the records' instrument type.
    pub fn from_records(
        records: &SwingRecords,
        benchmarks: &BenchmarkEntry,
    ) -> Result<Self, MetricsError> {
        match records {
            SwingRecords::BatTracker(r) => {
                BatSpeedMetrics::from_records(r, benchmarks).map(SessionMetrics::BatSpeed)
            }
            SwingRecords::BallTracker(r) => {
                ExitVelocityMetrics::from_records(r, benchmarks).map(SessionMetrics::ExitVelocity)
            }
        }
    }

    pub fn data_points(&self) -> usize {
        match self {
            SessionMetrics::BatSpeed(m) => m.data_points,
            SessionMetrics::ExitVelocity(m) => m.data_points,
        }
    }
}

fn scouting(value: f64, benchmark: MetricBenchmark) -> ScoutingGrade {
    ScoutingGrade::new(value, benchmark.average, benchmark.upper)
}

pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarks::get_benchmarks_for_level;

    fn bat(speed: f64, angle: f64, ttc: f64) -> BatSwingRecord {
        BatSwingRecord {
            bat_speed: Some(speed),
            attack_angle: Some(angle),
            time_to_contact: Some(ttc),
        }
    }

    fn ball(ev: f64, la: Option<f64>, zone: Option<u8>) -> BallSwingRecord {
        BallSwingRecord {
            exit_velocity: Some(ev),
            launch_angle: la,
            distance: Some(ev * 3.0),
            strike_zone: zone,
            pitch_speed: None,
            spray_chart_x: None,
            spray_chart_z: None,
        }
    }

    fn hs() -> &'static BenchmarkEntry {
        get_benchmarks_for_level("High School")
    }

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(pct(10, 0), 0.0);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(pct(50, 100), 50.0);
        assert_eq!(pct(1, 4), 25.0);
    }

    #[test]
    fn test_bat_speed_metrics_scenario() {
        let records = vec![
            bat(65.2, 12.5, 0.165),
            bat(67.8, 11.2, 0.158),
            bat(64.1, 13.8, 0.172),
        ];
        let m = BatSpeedMetrics::from_records(&records, hs()).unwrap();

        assert_eq!(m.avg_bat_speed, 65.7);
        assert_eq!(m.avg_time_to_contact, 0.165);
        assert_eq!(m.data_points, 3);
        // p90 of [64.1, 65.2, 67.8] = 65.2 + 0.8 * 2.6 = 67.28
        assert_eq!(m.top10_percent_bat_speed, 67.3);
        // only the 67.8 swing is at or above the cutoff
        assert_eq!(m.avg_attack_angle_top10, 11.2);
        assert_eq!(m.benchmark.avg_bat_speed, hs().avg_bat_speed);
    }

    #[test]
    fn test_bat_speed_grades() {
        let records = vec![bat(64.0, 10.0, 0.160), bat(64.0, 10.0, 0.160)];
        let m = BatSpeedMetrics::from_records(&records, hs()).unwrap();

        assert_eq!(m.grades.avg_bat_speed, LetterGrade::AMinus);
        assert_eq!(m.grades.time_to_contact, LetterGrade::AMinus);
        assert_eq!(m.scouting.avg_bat_speed.grade, 50);
        assert_eq!(m.scouting.avg_bat_speed.label, "Average");
    }

    #[test]
    fn test_bat_speed_without_speeds_is_no_data() {
        let records = vec![BatSwingRecord {
            bat_speed: None,
            attack_angle: Some(10.0),
            time_to_contact: Some(0.15),
        }];
        assert!(matches!(
            BatSpeedMetrics::from_records(&records, hs()),
            Err(MetricsError::NoData {
                instrument: SwingInstrumentType::BatTracker
            })
        ));
        assert!(BatSpeedMetrics::from_records(&[], hs()).is_err());
    }

    #[test]
    fn test_barrel_scenario() {
        let records = vec![
            ball(78.0, Some(12.0), Some(5)),
            ball(82.0, Some(30.0), Some(5)),
            ball(76.0, Some(15.0), Some(2)),
            ball(85.0, Some(8.0), Some(5)),
            ball(80.0, Some(25.0), Some(9)),
        ];
        let m = ExitVelocityMetrics::from_records(&records, hs()).unwrap();

        assert_eq!(m.max_exit_velocity, 85.0);
        assert_eq!(m.barrel_threshold, 76.5);
        // 78@12, 85@8, 80@25 qualify; 82@30 out of window; 76 below threshold
        assert_eq!(m.barrel_count, 3);
        assert_eq!(m.barrel_percentage, 60.0);
        assert_eq!(m.avg_exit_velocity, 80.2);
        assert_eq!(m.data_points, 5);
    }

    #[test]
    fn test_top8_subset_and_zones() {
        let mut records: Vec<BallSwingRecord> = (0..23)
            .map(|i| ball(70.0 + i as f64 * 0.5, Some(-5.0), Some(1)))
            .collect();
        records.push(ball(95.0, Some(-2.0), Some(7)));
        records.push(ball(96.0, Some(20.0), Some(7)));
        records.push(ball(97.0, Some(14.0), Some(3)));

        let m = ExitVelocityMetrics::from_records(&records, hs()).unwrap();

        // p92 of 26 values: rank 0.92 * 25 = 23 -> 95.0
        assert_eq!(m.top8_percent_exit_velocity, 95.0);
        // non-positive angles stay in the top-8% subset...
        assert_eq!(m.avg_launch_angle_top8, 10.7);
        // ...but are excluded from the overall average
        assert_eq!(m.total_avg_launch_angle, 17.0);
        assert_eq!(m.avg_distance_top8, 288.0);
        assert_eq!(m.strike_zone_distribution.len(), 2);
        assert_eq!(m.strike_zone_distribution.get(&7), Some(&2));
        assert_eq!(m.strike_zone_distribution.get(&3), Some(&1));
        assert_eq!(m.strike_zone_distribution.get(&1), None);
    }

    #[test]
    fn test_exit_velocity_no_data() {
        let records = vec![BallSwingRecord {
            exit_velocity: Some(0.0),
            launch_angle: Some(10.0),
            distance: None,
            strike_zone: None,
            pitch_speed: None,
            spray_chart_x: None,
            spray_chart_z: None,
        }];
        assert!(matches!(
            ExitVelocityMetrics::from_records(&records, hs()),
            Err(MetricsError::NoData {
                instrument: SwingInstrumentType::BallTracker
            })
        ));
    }

    #[test]
    fn test_barrel_percentage_bounds() {
        let records: Vec<BallSwingRecord> = (0..40)
            .map(|i| ball(60.0 + (i % 13) as f64 * 3.0, Some((i % 30) as f64), None))
            .collect();
        let m = ExitVelocityMetrics::from_records(&records, hs()).unwrap();
        assert!((0.0..=100.0).contains(&m.barrel_percentage));
        assert!(m.barrel_count <= m.data_points);
    }

    #[test]
    fn test_session_metrics_is_idempotent() {
        let records = SwingRecords::BallTracker(vec![
            ball(78.0, Some(12.0), Some(5)),
            ball(88.0, Some(18.0), Some(6)),
        ]);
        let first = SessionMetrics::from_records(&records, hs()).unwrap();
        let second = SessionMetrics::from_records(&records, hs()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.data_points(), 2);
    }

    #[test]
    fn test_session_metrics_serialized_shape() {
        let records = SwingRecords::BatTracker(vec![bat(65.0, 10.0, 0.15)]);
        let metrics = SessionMetrics::from_records(&records, hs()).unwrap();
        let json = serde_json::to_value(&metrics).unwrap();

        assert_eq!(json["avgBatSpeed"], 65.0);
        assert_eq!(json["dataPoints"], 1);
        assert_eq!(json["grades"]["timeToContact"], "A");
        assert_eq!(json["benchmark"]["avgBatSpeed"]["average"], 64.0);
    }
}

//! Level-specific reference values used for grading.
//!
//! The built-in table is compiled in. A JSON file with the same shape can
//! replace it at startup:
//! ```json
//! {
//!   "High School": {
//!     "avgExitVelocity": { "average": 75.0, "upper": 85.0 },
//!     ...
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::BenchmarkError;

/// Level used when a requested level is not in the table.
pub const DEFAULT_LEVEL: &str = "High School";

/// Average and upper-percentile reference for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricBenchmark {
    pub average: f64,
    pub upper: f64,
}

const fn mb(average: f64, upper: f64) -> MetricBenchmark {
    MetricBenchmark { average, upper }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkEntry {
    pub avg_exit_velocity: MetricBenchmark,
    pub top8_exit_velocity: MetricBenchmark,
    pub avg_launch_angle: MetricBenchmark,
    pub hard_hit_launch_angle: MetricBenchmark,
    pub avg_bat_speed: MetricBenchmark,
    pub top_bat_speed: MetricBenchmark,
    pub avg_time_to_contact: MetricBenchmark,
    pub avg_attack_angle: MetricBenchmark,
}

/// Built-in reference values, ordered from youngest to highest level.
///
/// Time to contact is lower-is-better, so its `upper` sits below `average`.
static BUILTIN: &[(&str, BenchmarkEntry)] = &[
    (
        "10u",
        BenchmarkEntry {
            avg_exit_velocity: mb(50.0, 60.0),
            top8_exit_velocity: mb(60.0, 68.0),
            avg_launch_angle: mb(8.0, 14.0),
            hard_hit_launch_angle: mb(10.0, 16.0),
            avg_bat_speed: mb(45.0, 52.0),
            top_bat_speed: mb(50.0, 56.0),
            avg_time_to_contact: mb(0.180, 0.160),
            avg_attack_angle: mb(8.0, 12.0),
        },
    ),
    (
        "12u",
        BenchmarkEntry {
            avg_exit_velocity: mb(58.0, 68.0),
            top8_exit_velocity: mb(68.0, 76.0),
            avg_launch_angle: mb(9.0, 15.0),
            hard_hit_launch_angle: mb(11.0, 17.0),
            avg_bat_speed: mb(52.0, 58.0),
            top_bat_speed: mb(57.0, 63.0),
            avg_time_to_contact: mb(0.170, 0.155),
            avg_attack_angle: mb(8.0, 12.0),
        },
    ),
    (
        "14u",
        BenchmarkEntry {
            avg_exit_velocity: mb(66.0, 76.0),
            top8_exit_velocity: mb(77.0, 85.0),
            avg_launch_angle: mb(10.0, 15.0),
            hard_hit_launch_angle: mb(12.0, 18.0),
            avg_bat_speed: mb(58.0, 64.0),
            top_bat_speed: mb(63.0, 69.0),
            avg_time_to_contact: mb(0.165, 0.150),
            avg_attack_angle: mb(9.0, 13.0),
        },
    ),
    (
        "High School",
        BenchmarkEntry {
            avg_exit_velocity: mb(75.0, 85.0),
            top8_exit_velocity: mb(88.0, 95.0),
            avg_launch_angle: mb(11.0, 16.0),
            hard_hit_launch_angle: mb(12.0, 18.0),
            avg_bat_speed: mb(64.0, 70.0),
            top_bat_speed: mb(69.0, 74.0),
            avg_time_to_contact: mb(0.160, 0.145),
            avg_attack_angle: mb(10.0, 14.0),
        },
    ),
    (
        "College",
        BenchmarkEntry {
            avg_exit_velocity: mb(85.0, 95.0),
            top8_exit_velocity: mb(98.0, 105.0),
            avg_launch_angle: mb(12.0, 17.0),
            hard_hit_launch_angle: mb(13.0, 19.0),
            avg_bat_speed: mb(70.0, 75.0),
            top_bat_speed: mb(74.0, 79.0),
            avg_time_to_contact: mb(0.150, 0.140),
            avg_attack_angle: mb(10.0, 14.0),
        },
    ),
    (
        "Indy",
        BenchmarkEntry {
            avg_exit_velocity: mb(88.0, 98.0),
            top8_exit_velocity: mb(101.0, 107.0),
            avg_launch_angle: mb(12.0, 17.0),
            hard_hit_launch_angle: mb(13.0, 19.0),
            avg_bat_speed: mb(71.0, 76.0),
            top_bat_speed: mb(75.0, 80.0),
            avg_time_to_contact: mb(0.148, 0.138),
            avg_attack_angle: mb(10.0, 15.0),
        },
    ),
    (
        "Affiliate",
        BenchmarkEntry {
            avg_exit_velocity: mb(90.0, 100.0),
            top8_exit_velocity: mb(103.0, 109.0),
            avg_launch_angle: mb(12.0, 18.0),
            hard_hit_launch_angle: mb(14.0, 20.0),
            avg_bat_speed: mb(72.0, 77.0),
            top_bat_speed: mb(76.0, 81.0),
            avg_time_to_contact: mb(0.145, 0.135),
            avg_attack_angle: mb(10.0, 15.0),
        },
    ),
];

fn builtin_default() -> &'static BenchmarkEntry {
    BUILTIN
        .iter()
        .find(|(name, _)| *name == DEFAULT_LEVEL)
        .map(|(_, entry)| entry)
        .unwrap_or(&BUILTIN[0].1)
}

/// Looks up the built-in benchmarks for `level`, falling back to
/// [`DEFAULT_LEVEL`] for unknown levels. Never fails.
pub fn get_benchmarks_for_level(level: &str) -> &'static BenchmarkEntry {
    BUILTIN
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(level.trim()))
        .map(|(_, entry)| entry)
        .unwrap_or_else(builtin_default)
}

/// Read-only benchmark lookup, either built-in or loaded from a config file.
#[derive(Debug, Clone)]
pub struct BenchmarkTable {
    entries: HashMap<String, BenchmarkEntry>,
}

impl Default for BenchmarkTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BenchmarkTable {
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(name, entry)| (name.to_string(), entry.clone()))
            .collect();
        Self { entries }
    }

    /// Loads a table from a JSON file mapping level names to entries.
    pub fn load(path: &str) -> Result<Self, BenchmarkError> {
        let content = std::fs::read_to_string(path).map_err(|source| BenchmarkError::Io {
            path: path.to_string(),
            source,
        })?;
        let entries: HashMap<String, BenchmarkEntry> =
            serde_json::from_str(&content).map_err(|source| BenchmarkError::Json {
                path: path.to_string(),
                source,
            })?;

        if !entries.contains_key(DEFAULT_LEVEL) {
            warn!(
                path,
                "Benchmark file has no \"{}\" entry, using built-in fallback", DEFAULT_LEVEL
            );
        }
        debug!(path, levels = entries.len(), "Benchmark table loaded");

        Ok(Self { entries })
    }

    /// Returns the entry for `level`, falling back to [`DEFAULT_LEVEL`].
    pub fn for_level(&self, level: &str) -> &BenchmarkEntry {
        let level = level.trim();
        self.entries
            .get(level)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(level))
                    .map(|(_, entry)| entry)
            })
            .or_else(|| self.entries.get(DEFAULT_LEVEL))
            .unwrap_or_else(|| builtin_default())
    }

    /// Level names, sorted.
    pub fn levels(&self) -> Vec<&str> {
        let mut levels: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        levels.sort_unstable();
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_unknown_level_falls_back_to_high_school() {
        let unknown = get_benchmarks_for_level("Unknown Level");
        let hs = get_benchmarks_for_level("High School");
        assert!(std::ptr::eq(unknown, hs));
    }

    #[test]
    fn test_level_lookup_is_case_insensitive() {
        assert_eq!(
            get_benchmarks_for_level("college").avg_bat_speed,
            mb(70.0, 75.0)
        );
    }

    #[test]
    fn test_builtin_upper_above_average() {
        for (name, entry) in BUILTIN {
            for m in [
                entry.avg_exit_velocity,
                entry.top8_exit_velocity,
                entry.avg_launch_angle,
                entry.hard_hit_launch_angle,
                entry.avg_bat_speed,
                entry.top_bat_speed,
                entry.avg_attack_angle,
            ] {
                assert!(m.upper > m.average, "{}", name);
            }
            assert!(entry.avg_time_to_contact.upper < entry.avg_time_to_contact.average);
        }
    }

    #[test]
    fn test_table_fallback() {
        let table = BenchmarkTable::builtin();
        assert_eq!(table.for_level("Indy"), get_benchmarks_for_level("Indy"));
        assert_eq!(table.for_level("Beer League"), get_benchmarks_for_level("High School"));
        assert_eq!(table.levels().len(), 7);
    }

    #[test]
    fn test_load_from_file() {
        let path = format!("{}/swing_grader_test_benchmarks.json", env::temp_dir().display());
        let mut custom = HashMap::new();
        let mut entry = get_benchmarks_for_level("10u").clone();
        entry.avg_bat_speed = mb(40.0, 46.0);
        custom.insert("8u".to_string(), entry);
        fs::write(&path, serde_json::to_string(&custom).unwrap()).unwrap();

        let table = BenchmarkTable::load(&path).unwrap();
        assert_eq!(table.for_level("8u").avg_bat_speed, mb(40.0, 46.0));
        // no "High School" in the file -> built-in fallback
        assert_eq!(table.for_level("Pro"), get_benchmarks_for_level("High School"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_invalid_file() {
        let path = format!("{}/swing_grader_test_bad_benchmarks.json", env::temp_dir().display());
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            BenchmarkTable::load(&path),
            Err(BenchmarkError::Json { .. })
        ));
        fs::remove_file(&path).unwrap();

        assert!(matches!(
            BenchmarkTable::load("/nonexistent/benchmarks.json"),
            Err(BenchmarkError::Io { .. })
        ));
    }
}

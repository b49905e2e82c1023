//! Runtime configuration from the environment (after `.env` is loaded).

use anyhow::Result;

use crate::benchmarks::BenchmarkTable;

pub const DEFAULT_STORE_PATH: &str = "swing_store.json";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/swing_grader.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `SWING_STORE_PATH`
    pub store_path: String,
    /// `SWING_BENCHMARKS_PATH`; the built-in table is used when unset.
    pub benchmarks_path: Option<String>,
    /// `LOG_FILE_PATH`
    pub log_file_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Config {
            store_path: non_empty("SWING_STORE_PATH")
                .unwrap_or_else(|| DEFAULT_STORE_PATH.to_string()),
            benchmarks_path: non_empty("SWING_BENCHMARKS_PATH"),
            log_file_path: non_empty("LOG_FILE_PATH")
                .unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string()),
        }
    }

    /// Loads the configured benchmark table.
    pub fn benchmarks(&self) -> Result<BenchmarkTable> {
        Ok(match &self.benchmarks_path {
            Some(path) => BenchmarkTable::load(path)?,
            None => BenchmarkTable::builtin(),
        })
    }
}

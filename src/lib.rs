pub mod analyzers;
pub mod benchmarks;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod records;
pub mod source;
pub mod stats;
pub mod store;

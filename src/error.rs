//! Error taxonomy for decoding, metrics, storage and reporting.
//!
//! Skipped rows are not errors; they are counted in
//! [`DecodeSummary`](crate::parser::DecodeSummary) instead.

use crate::records::SwingInstrumentType;

/// Fatal failure to decode a single export file.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("no data rows found in the first {lookahead} lines")]
    NoDataRows { lookahead: usize },
}

/// Metrics were requested for a session without usable records.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("no valid {instrument} records for this session")]
    NoData { instrument: SwingInstrumentType },
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unknown session {0}")]
    UnknownSession(String),

    #[error("unknown player {0}")]
    UnknownPlayer(String),

    #[error("session {id} already exists as {existing}")]
    InstrumentLocked {
        id: String,
        existing: SwingInstrumentType,
    },

    #[error("session {id} expects {expected} records, got {got}")]
    InstrumentMismatch {
        id: String,
        expected: SwingInstrumentType,
        got: SwingInstrumentType,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("session {0} not found")]
    SessionNotFound(String),

    #[error("player {player_id} for session {session_id} not found")]
    PlayerNotFound {
        session_id: String,
        player_id: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum BenchmarkError {
    #[error("failed to read benchmark file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid benchmark file {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

//! Positional CSV decoder for the two vendor export formats.
//!
//! Header rows in these exports are unreliable, so each instrument is a fixed
//! schema of column offsets. Lines that do not fit the schema are skipped and
//! counted, never raised.

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::DecodeError;
use crate::records::{
    BallSwingRecord, BatSwingRecord, SwingInstrumentType, SwingRecord, SwingRecords,
};

/// How many leading lines of a bat tracker export are searched for the first data row.
pub const BAT_LOOKAHEAD: usize = 20;

mod bat_columns {
    pub const BAT_SPEED: usize = 7;
    pub const ATTACK_ANGLE: usize = 10;
    pub const TIME_TO_CONTACT: usize = 15;
    pub const MIN_COLUMNS: usize = 16;
}

mod ball_columns {
    pub const PITCH_SPEED: usize = 4;
    pub const STRIKE_ZONE: usize = 5;
    pub const EXIT_VELOCITY: usize = 7;
    pub const LAUNCH_ANGLE: usize = 8;
    pub const DISTANCE: usize = 9;
    pub const SPRAY_CHART_X: usize = 21;
    pub const SPRAY_CHART_Z: usize = 22;
    pub const MIN_COLUMNS: usize = 10;
}

/// Row accounting for one decoded file.
///
/// `total_rows == parsed_rows + skipped_rows + error_count` always holds.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeSummary {
    /// Lines in the data region (after any header/metadata lines).
    pub total_rows: usize,
    pub parsed_rows: usize,
    /// Lines dropped for too few columns or unparseable required fields.
    pub skipped_rows: usize,
    /// Lines the CSV reader could not read (e.g. invalid UTF-8).
    pub error_count: usize,
}

#[derive(Debug, Clone)]
pub struct DecodeOutput {
    pub records: SwingRecords,
    pub summary: DecodeSummary,
}

/// Parses a single field as a finite number. Blank, placeholder and non-finite
/// values yield `None`.
pub fn parse_number(field: &str) -> Option<f64> {
    let field = field.trim().trim_matches('"').trim();
    if field.is_empty() {
        return None;
    }
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn number_at(fields: &[&str], idx: usize) -> Option<f64> {
    fields.get(idx).and_then(|f| parse_number(f))
}

fn strike_zone_at(fields: &[&str], idx: usize) -> Option<u8> {
    number_at(fields, idx)
        .filter(|z| z.fract() == 0.0 && (1.0..=13.0).contains(z))
        .map(|z| z as u8)
}

/// Decodes one already-split line. Returns `None` when the line is dropped.
pub fn decode_line(fields: &[&str], instrument: SwingInstrumentType) -> Option<SwingRecord> {
    match instrument {
        SwingInstrumentType::BatTracker => decode_bat_line(fields).map(SwingRecord::Bat),
        SwingInstrumentType::BallTracker => decode_ball_line(fields).map(SwingRecord::Ball),
    }
}

fn decode_bat_line(fields: &[&str]) -> Option<BatSwingRecord> {
    use bat_columns::*;

    if fields.len() < MIN_COLUMNS {
        return None;
    }

    Some(BatSwingRecord {
        bat_speed: Some(number_at(fields, BAT_SPEED)?),
        attack_angle: Some(number_at(fields, ATTACK_ANGLE)?),
        time_to_contact: Some(number_at(fields, TIME_TO_CONTACT)?),
    })
}

fn decode_ball_line(fields: &[&str]) -> Option<BallSwingRecord> {
    use ball_columns::*;

    if fields.len() < MIN_COLUMNS {
        return None;
    }

    let exit_velocity = number_at(fields, EXIT_VELOCITY).filter(|ev| *ev > 0.0)?;

    Some(BallSwingRecord {
        exit_velocity: Some(exit_velocity),
        launch_angle: number_at(fields, LAUNCH_ANGLE),
        distance: number_at(fields, DISTANCE),
        strike_zone: strike_zone_at(fields, STRIKE_ZONE),
        pitch_speed: number_at(fields, PITCH_SPEED),
        spray_chart_x: number_at(fields, SPRAY_CHART_X),
        spray_chart_z: number_at(fields, SPRAY_CHART_Z),
    })
}

/// A bat tracker line counts as data once two of the three metric columns are numeric.
fn looks_like_bat_data(fields: &[&str]) -> bool {
    use bat_columns::*;

    [BAT_SPEED, ATTACK_ANGLE, TIME_TO_CONTACT]
        .iter()
        .filter(|idx| number_at(fields, **idx).is_some())
        .count()
        >= 2
}

/// A CSV line, or why it could not be read (I/O or invalid UTF-8).
type Row = anyhow::Result<StringRecord>;

/// Index of the first data line of a bat tracker export.
fn find_bat_data_start(rows: &[Row]) -> Option<usize> {
    rows.iter().take(BAT_LOOKAHEAD).position(|row| {
        row.as_ref()
            .is_ok_and(|record| looks_like_bat_data(&record.iter().collect::<Vec<_>>()))
    })
}

/// Decodes a whole vendor export.
///
/// # Errors
///
/// Returns [`DecodeError::NoDataRows`] when a bat tracker export has no data
/// line within its first [`BAT_LOOKAHEAD`] lines. A ball tracker export
/// without data rows decodes to zero records.
#[tracing::instrument(skip(bytes), fields(bytes = bytes.len(), %instrument))]
pub fn decode_export(
    bytes: &[u8],
    instrument: SwingInstrumentType,
) -> Result<DecodeOutput, DecodeError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    // blank lines are dropped by the reader and never count as lines
    let rows: Vec<Row> = reader
        .byte_records()
        .map(|row| -> Row { Ok(StringRecord::from_byte_record(row?)?) })
        .collect();

    let data_start = match instrument {
        SwingInstrumentType::BatTracker => find_bat_data_start(&rows).ok_or(
            DecodeError::NoDataRows {
                lookahead: BAT_LOOKAHEAD,
            },
        )?,
        SwingInstrumentType::BallTracker => 1,
    };
    debug!(data_start, lines = rows.len(), "Data region located");

    let mut records = SwingRecords::empty(instrument);
    let mut summary = DecodeSummary::default();

    for (offset, row) in rows.iter().enumerate().skip(data_start) {
        summary.total_rows += 1;

        let record = match row {
            Ok(record) => record,
            Err(e) => {
                debug!(line = offset + 1, error = %e, "Unreadable line");
                summary.error_count += 1;
                continue;
            }
        };

        let fields: Vec<&str> = record.iter().collect();
        match (decode_line(&fields, instrument), &mut records) {
            (Some(SwingRecord::Bat(r)), SwingRecords::BatTracker(out)) => out.push(r),
            (Some(SwingRecord::Ball(r)), SwingRecords::BallTracker(out)) => out.push(r),
            _ => {
                debug!(line = offset + 1, columns = fields.len(), "Skipping row");
                summary.skipped_rows += 1;
                continue;
            }
        }
        summary.parsed_rows += 1;
    }

    info!(
        total_rows = summary.total_rows,
        parsed_rows = summary.parsed_rows,
        skipped_rows = summary.skipped_rows,
        error_count = summary.error_count,
        "Export decoded"
    );

    Ok(DecodeOutput { records, summary })
}

//! Two independent grading schemes over already-computed metrics:
//! a ratio-to-benchmark letter grade and the 20-80 scouting scale.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    C,
    #[serde(rename = "C-")]
    CMinus,
    D,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl LetterGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::AMinus => "A-",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::BMinus => "B-",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::CMinus => "C-",
            LetterGrade::D => "D",
            LetterGrade::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which threshold curve a ratio is graded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradingCurve {
    HigherIsBetter,
    LowerIsBetter,
    /// Exit velocity metrics. Currently the same thresholds as
    /// [`GradingCurve::HigherIsBetter`], kept separate so they can diverge.
    ExitVelocity,
}

const BANDS: [LetterGrade; 9] = [
    LetterGrade::APlus,
    LetterGrade::A,
    LetterGrade::AMinus,
    LetterGrade::BPlus,
    LetterGrade::B,
    LetterGrade::BMinus,
    LetterGrade::CPlus,
    LetterGrade::C,
    LetterGrade::CMinus,
];

/// Minimum ratio for each band in [`BANDS`].
static HIGHER_IS_BETTER: [f64; 9] = [1.10, 1.05, 1.00, 0.95, 0.90, 0.85, 0.80, 0.75, 0.70];

/// Minimum ratio for each band in [`BANDS`] on exit velocity metrics.
static EXIT_VELOCITY: [f64; 9] = [1.10, 1.05, 1.00, 0.95, 0.90, 0.85, 0.80, 0.75, 0.70];

/// Maximum ratio for each band in [`BANDS`].
static LOWER_IS_BETTER: [f64; 9] = [0.90, 0.95, 1.00, 1.05, 1.10, 1.15, 1.20, 1.25, 1.30];

/// Grades `value` by its ratio to `benchmark`.
///
/// Anything below the last band is `D`; a zero value or benchmark is `N/A`.
pub fn grade(value: f64, benchmark: f64, curve: GradingCurve) -> LetterGrade {
    if value == 0.0 || benchmark == 0.0 || !value.is_finite() || !benchmark.is_finite() {
        return LetterGrade::NotApplicable;
    }

    let ratio = value / benchmark;
    let band = match curve {
        GradingCurve::HigherIsBetter => HIGHER_IS_BETTER.iter().position(|min| ratio >= *min),
        GradingCurve::ExitVelocity => EXIT_VELOCITY.iter().position(|min| ratio >= *min),
        GradingCurve::LowerIsBetter => LOWER_IS_BETTER.iter().position(|max| ratio <= *max),
    };

    band.map(|i| BANDS[i]).unwrap_or(LetterGrade::D)
}

/// Neutral grade on the 20-80 scale.
pub const AVERAGE_GRADE: u8 = 50;

/// Maps `value` onto the 20-80 scouting scale.
///
/// `average` maps to 50 and `upper` to 80, in steps of a third of the gap.
/// Returns 50 when `upper` is not above `average`.
pub fn calculate_grade(value: f64, average: f64, upper: f64) -> u8 {
    if !(upper > average) || !value.is_finite() {
        return AVERAGE_GRADE;
    }

    let increment = (upper - average) / 3.0;
    let step = ((value - average) / increment).round();

    (50.0 + 10.0 * step).clamp(20.0, 80.0) as u8
}

/// Presentation label for a 20-80 grade.
pub fn grade_label(grade: u8) -> &'static str {
    match grade {
        g if g <= 30 => "Well Below Average",
        g if g <= 40 => "Below Average",
        g if g <= 50 => "Average",
        g if g <= 60 => "Above Average",
        g if g <= 70 => "Plus",
        _ => "Elite",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoutingGrade {
    pub grade: u8,
    pub label: &'static str,
}

impl ScoutingGrade {
    pub fn new(value: f64, average: f64, upper: f64) -> Self {
        let grade = calculate_grade(value, average, upper);
        Self {
            grade,
            label: grade_label(grade),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeChange {
    pub old_grade: u8,
    pub new_grade: u8,
    pub change: i16,
    pub direction: Direction,
}

/// Grades both values independently and reports the signed difference.
pub fn calculate_grade_change(
    old_value: f64,
    new_value: f64,
    average: f64,
    upper: f64,
) -> GradeChange {
    let old_grade = calculate_grade(old_value, average, upper);
    let new_grade = calculate_grade(new_value, average, upper);
    let change = new_grade as i16 - old_grade as i16;

    let direction = match change {
        c if c > 0 => Direction::Up,
        c if c < 0 => Direction::Down,
        _ => Direction::Stable,
    };

    GradeChange {
        old_grade,
        new_grade,
        change,
        direction,
    }
}

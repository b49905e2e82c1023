//! Session grading and report assembly.
//!
//! This module grades computed session metrics against level benchmarks,
//! builds the player's session history with session-over-session trends,
//! and assembles the report payload.

pub mod aggregate;
pub mod analyzer;
pub mod grade;
pub mod types;
pub mod utility;

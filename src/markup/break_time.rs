//! Pause duration literals
//!
//! `<break time="..."/>` accepts whole milliseconds (`"500ms"`) or whole
//! seconds (`"2s"`). Anything else is a format error.

use crate::{Result, VoxlineError};
use once_cell::sync::Lazy;
use regex::Regex;

static BREAK_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)(ms|s)$").expect("valid break time pattern"));

/// Convert a pause literal into milliseconds
pub fn parse_break_time(literal: &str) -> Result<u64> {
    let caps = BREAK_TIME.captures(literal.trim()).ok_or_else(|| {
        VoxlineError::Format(format!(
            "Unsupported break time {:?} (expected e.g. \"500ms\" or \"2s\")",
            literal
        ))
    })?;

    let value: u64 = caps[1]
        .parse()
        .map_err(|_| VoxlineError::Format(format!("Break time out of range: {:?}", literal)))?;

    match &caps[2] {
        "ms" => Ok(value),
        _ => value
            .checked_mul(1000)
            .ok_or_else(|| VoxlineError::Format(format!("Break time out of range: {:?}", literal))),
    }
}

//! Phoneme timeline reconstruction
//!
//! The engine reports one relative duration code per output token. Each
//! text segment's codes are scaled so that they add up to the segment's real
//! audio length, then every segment is shifted by the audio and pauses that
//! precede it. Finally the absolute times are paired with the phonemes of
//! the whole document and converted to output ticks.

use super::phonemes::normalize_phoneme;
use crate::speech::SegmentOutput;
use crate::{Result, VoxlineError};
use log::debug;

/// Milliseconds per output tick
const TICK_MS: f64 = 10.0;
/// Ticks added to every start and end time
const LEAD_IN_TICKS: u64 = 10;

/// One phoneme's place in the final audio, in output ticks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub phoneme: String,
    pub start: u64,
    pub end: u64,
}

/// Start/end times in milliseconds for one segment's tokens, relative to
/// the start of that segment
///
/// `durations` must already exclude the leading start-of-sequence code.
pub fn segment_bounds(durations: &[u64], sample_count: usize, sample_rate: u32) -> Result<Vec<(f64, f64)>> {
    if sample_rate == 0 {
        return Err(VoxlineError::Consistency("segment has a sample rate of 0".to_string()));
    }
    let total = durations
        .iter()
        .try_fold(0u64, |acc, &d| acc.checked_add(d))
        .ok_or_else(|| VoxlineError::Consistency("token durations overflow".to_string()))?;
    if total == 0 {
        return Err(VoxlineError::Consistency(format!(
            "token durations of a {} token segment sum to zero",
            durations.len()
        )));
    }

    let audio_ms = (sample_count as f64 / sample_rate as f64) * 1000.0;
    let unit_ms = audio_ms / total as f64;

    let mut bounds = Vec::with_capacity(durations.len());
    // Partial sums never exceed the checked total
    let mut cumulative: u64 = 0;
    let mut start = 0.0;
    for &d in durations {
        cumulative += d;
        let end = cumulative as f64 * unit_ms;
        bounds.push((start, end));
        start = end;
    }

    Ok(bounds)
}

/// Absolute start/end times in milliseconds across the whole document
pub fn document_bounds(outputs: &[SegmentOutput]) -> Result<Vec<(f64, f64)>> {
    let mut bounds = Vec::new();
    let mut offset = 0.0;

    for output in outputs {
        match output {
            SegmentOutput::Speech(result) => {
                let segment = segment_bounds(
                    result.spoken_durations(),
                    result.samples.len(),
                    result.sample_rate,
                )?;
                let segment_end = segment.last().map_or(0.0, |&(_, end)| end);
                bounds.extend(segment.into_iter().map(|(s, e)| (s + offset, e + offset)));
                offset += segment_end;
            }
            SegmentOutput::Silence { duration_ms } => offset += *duration_ms as f64,
        }
    }

    Ok(bounds)
}

/// Pair document phonemes with their absolute times
///
/// The phoneme count must equal the number of spoken duration codes over
/// all segments; anything else means the engine and the tokenizer disagree.
pub fn build_timeline(phonemes: &[String], outputs: &[SegmentOutput]) -> Result<Vec<TimelineEntry>> {
    let bounds = document_bounds(outputs)?;
    if bounds.len() != phonemes.len() {
        return Err(VoxlineError::Consistency(format!(
            "{} phonemes but {} token durations",
            phonemes.len(),
            bounds.len()
        )));
    }

    let timeline: Vec<TimelineEntry> = phonemes
        .iter()
        .zip(bounds)
        .map(|(phoneme, (start, end))| TimelineEntry {
            phoneme: normalize_phoneme(phoneme),
            start: ms_to_ticks(start),
            end: ms_to_ticks(end),
        })
        .collect();

    debug!("Built timeline with {} entries", timeline.len());
    Ok(timeline)
}

/// Convert milliseconds to output ticks: floor(ms / 10) + 10
pub fn ms_to_ticks(ms: f64) -> u64 {
    (ms / TICK_MS).floor().max(0.0) as u64 + LEAD_IN_TICKS
}

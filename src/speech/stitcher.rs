//! Waveform stitching
//!
//! Concatenates segment audio in document order, inserting zero samples
//! for every pause.

use super::orchestrator::SegmentOutput;
use crate::{Result, VoxlineError};
use log::debug;

/// A mono waveform
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Waveform {
    pub fn duration_ms(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 * 1000.0 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Number of silent samples for a pause: floor(ms * rate / 1000)
pub fn pause_samples(duration_ms: u64, sample_rate: u32) -> Result<usize> {
    duration_ms
        .checked_mul(sample_rate as u64)
        .and_then(|n| usize::try_from(n / 1000).ok())
        .ok_or_else(|| {
            VoxlineError::Format(format!(
                "pause too long: {}ms at {}Hz",
                duration_ms, sample_rate
            ))
        })
}

/// Join segment outputs into one waveform
///
/// All speech segments must share one sample rate, which becomes the
/// output rate. `default_rate` is used when there is no speech at all.
pub fn stitch(outputs: &[SegmentOutput], default_rate: u32) -> Result<Waveform> {
    let sample_rate = document_sample_rate(outputs)?.unwrap_or(default_rate);

    let mut capacity: usize = 0;
    for output in outputs {
        let len = match output {
            SegmentOutput::Speech(r) => r.samples.len(),
            SegmentOutput::Silence { duration_ms } => pause_samples(*duration_ms, sample_rate)?,
        };
        capacity = capacity
            .checked_add(len)
            .ok_or_else(|| VoxlineError::Format("stitched audio too long".to_string()))?;
    }

    let mut samples = Vec::with_capacity(capacity);
    for output in outputs {
        match output {
            SegmentOutput::Speech(result) => samples.extend_from_slice(&result.samples),
            SegmentOutput::Silence { duration_ms } => {
                samples.resize(samples.len() + pause_samples(*duration_ms, sample_rate)?, 0.0)
            }
        }
    }

    debug!("Stitched {} samples at {}Hz", samples.len(), sample_rate);
    Ok(Waveform {
        samples,
        sample_rate,
    })
}

/// The shared sample rate of all speech segments, if any
fn document_sample_rate(outputs: &[SegmentOutput]) -> Result<Option<u32>> {
    let mut rate: Option<u32> = None;
    for output in outputs {
        if let SegmentOutput::Speech(result) = output {
            match rate {
                None => rate = Some(result.sample_rate),
                Some(r) if r != result.sample_rate => {
                    return Err(VoxlineError::Consistency(format!(
                        "mixed sample rates across segments: {}Hz and {}Hz",
                        r, result.sample_rate
                    )))
                }
                Some(_) => {}
            }
        }
    }
    Ok(rate)
}

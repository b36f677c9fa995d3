//! Per-segment synthesis
//!
//! Text segments are sent to the engine one at a time in document order;
//! each call finishes before the next one starts. Pauses never reach the
//! engine.

use super::engine::{SegmentSynthesisResult, SynthesisEngine};
use crate::lexicon::AcronymRegistry;
use crate::markup::{MarkupDocument, Segment};
use crate::Result;
use log::debug;
use std::time::{Duration, Instant};

/// What one segment contributes to the output
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentOutput {
    Speech(SegmentSynthesisResult),
    Silence { duration_ms: u64 },
}

/// Outputs for every segment, in document order
#[derive(Debug, Clone)]
pub struct SynthesisRun {
    pub outputs: Vec<SegmentOutput>,
    /// Wall time spent inside engine synthesis calls
    pub synthesis_time: Duration,
}

impl SynthesisRun {
    pub fn speech_segments(&self) -> usize {
        self.outputs
            .iter()
            .filter(|o| matches!(o, SegmentOutput::Speech(_)))
            .count()
    }
}

/// Synthesize every text segment of `document`
///
/// The first engine failure aborts the run; no partial output is returned.
pub fn synthesize_segments<E: SynthesisEngine + ?Sized>(
    engine: &mut E,
    document: &MarkupDocument,
    lexicon: &AcronymRegistry,
) -> Result<SynthesisRun> {
    let mut outputs = Vec::with_capacity(document.segments().len());
    let mut synthesis_time = Duration::ZERO;

    for (idx, segment) in document.segments().iter().enumerate() {
        match segment {
            Segment::Text { content } => {
                debug!("Synthesizing segment {}: {:?}", idx, content);
                let started = Instant::now();
                let result = engine.synthesize(content, lexicon)?;
                synthesis_time += started.elapsed();
                debug!(
                    "Segment {} -> {} samples, {} duration codes",
                    idx,
                    result.samples.len(),
                    result.token_durations.len()
                );
                outputs.push(SegmentOutput::Speech(result));
            }
            Segment::Pause { duration_ms } => {
                debug!("Segment {} is a {}ms pause", idx, duration_ms);
                outputs.push(SegmentOutput::Silence {
                    duration_ms: *duration_ms,
                });
            }
        }
    }

    Ok(SynthesisRun {
        outputs,
        synthesis_time,
    })
}

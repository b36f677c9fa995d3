//! Speech synthesis: engine boundary, per-segment orchestration and
//! waveform stitching

pub mod backends;
pub mod engine;
pub mod orchestrator;
pub mod stitcher;

pub use engine::{SegmentSynthesisResult, SynthesisEngine};
pub use orchestrator::{synthesize_segments, SegmentOutput, SynthesisRun};
pub use stitcher::{pause_samples, stitch, Waveform};

//! voxline - markup-driven speech synthesis with phoneme timelines
//!
//! Parses lightweight SSML-style markup (prose, `<break>` pauses and
//! `<say-as interpret-as="acronym">` spellings), drives an external speech
//! synthesis engine segment by segment, stitches the audio and rebuilds a
//! per-phoneme timeline aligned to it.

pub mod config;
pub mod error;
pub mod lexicon;
pub mod markup;
pub mod speech;
pub mod synthesizer;
pub mod timeline;
pub mod wav;

pub use error::{Result, VoxlineError};
pub use synthesizer::{SynthesisOutput, VoiceSynthesizer};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

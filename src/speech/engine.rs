//! Synthesis engine abstraction
//!
//! The neural engine itself lives outside this crate. Everything here
//! talks to it through [`SynthesisEngine`], which takes the acronym
//! registry explicitly on every call instead of sharing a global
//! pronunciation dictionary.

use crate::lexicon::AcronymRegistry;
use crate::Result;
use serde::Deserialize;

/// Engine output for one text segment
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SegmentSynthesisResult {
    /// Mono waveform samples
    pub samples: Vec<f32>,
    /// One relative duration code per output token; the first code is a
    /// start-of-sequence artifact
    pub token_durations: Vec<u64>,
    pub sample_rate: u32,
}

impl SegmentSynthesisResult {
    /// Duration codes of the spoken tokens (leading code dropped)
    pub fn spoken_durations(&self) -> &[u64] {
        self.token_durations.get(1..).unwrap_or(&[])
    }

    /// Length of the waveform in milliseconds
    pub fn duration_ms(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        (self.samples.len() as f64 / self.sample_rate as f64) * 1000.0
    }
}

/// A text-to-speech engine
///
/// Calls take `&mut self`: an engine is one exclusively owned, stateful
/// device and is never called concurrently.
pub trait SynthesisEngine {
    /// Synthesize one run of text
    fn synthesize(&mut self, text: &str, lexicon: &AcronymRegistry) -> Result<SegmentSynthesisResult>;

    /// Phoneme tokens the engine produces for `text`, in order
    fn tokenize(&mut self, text: &str, lexicon: &AcronymRegistry) -> Result<Vec<String>>;
}

impl<E: SynthesisEngine + ?Sized> SynthesisEngine for Box<E> {
    fn synthesize(&mut self, text: &str, lexicon: &AcronymRegistry) -> Result<SegmentSynthesisResult> {
        (**self).synthesize(text, lexicon)
    }

    fn tokenize(&mut self, text: &str, lexicon: &AcronymRegistry) -> Result<Vec<String>> {
        (**self).tokenize(text, lexicon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spoken_durations_drop_first() {
        let result = SegmentSynthesisResult {
            samples: vec![0.0; 22050],
            token_durations: vec![7, 2, 3],
            sample_rate: 22050,
        };
        assert_eq!(result.spoken_durations(), &[2, 3]);
        assert_eq!(result.duration_ms(), 1000.0);
    }

    #[test]
    fn test_spoken_durations_empty() {
        let result = SegmentSynthesisResult {
            samples: vec![],
            token_durations: vec![],
            sample_rate: 16000,
        };
        assert!(result.spoken_durations().is_empty());
        assert_eq!(result.duration_ms(), 0.0);
    }
}

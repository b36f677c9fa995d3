//! Markup-to-audio pipeline
//!
//! [`VoiceSynthesizer`] owns one engine and one acronym registry and turns a
//! markup document into a stitched waveform plus a phoneme timing blob:
//!
//! 1. parse the markup and register its acronyms
//! 2. synthesize each text segment in order
//! 3. tokenize the whole document once to get its phonemes
//! 4. rebuild the phoneme timeline and stitch the audio

use crate::config::Config;
use crate::lexicon::AcronymRegistry;
use crate::markup::MarkupDocument;
use crate::speech::{stitch, synthesize_segments, SynthesisEngine, Waveform};
use crate::timeline::{build_timeline, format_timeline, TimelineEntry};
use crate::wav::write_wav;
use crate::Result;
use log::{debug, info, warn};
use std::path::PathBuf;

/// Everything produced for one request
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    pub waveform: Waveform,
    pub timeline: Vec<TimelineEntry>,
    /// Fixed-width timing text, see [`format_timeline`]
    pub phonemes: String,
    /// Where the waveform was written, if file output is enabled
    pub wav_path: Option<PathBuf>,
}

/// Drives one engine from markup to audio and timing
pub struct VoiceSynthesizer<E: SynthesisEngine> {
    engine: E,
    registry: AcronymRegistry,
    /// Rate expected from the engine, used for pause-only documents
    sample_rate: u32,
    wav_path: Option<PathBuf>,
}

impl<E: SynthesisEngine> VoiceSynthesizer<E> {
    /// Create a synthesizer with an explicit registry and no file output
    pub fn new(engine: E, registry: AcronymRegistry, sample_rate: u32) -> Self {
        Self {
            engine,
            registry,
            sample_rate,
            wav_path: None,
        }
    }

    /// Create a synthesizer from configuration
    ///
    /// Seeds the registry from the acronym override file, if one is set,
    /// and writes every request's audio to the configured WAV path.
    pub fn from_config(config: &Config, engine: E) -> Result<Self> {
        let registry = match config.acronym_file() {
            Some(path) => AcronymRegistry::from_override_file(&path)?,
            None => AcronymRegistry::new(),
        };
        info!("Acronym registry seeded with {} words", registry.len());

        Ok(Self::new(engine, registry, config.sample_rate()?).with_wav_output(config.wav_path()))
    }

    /// Write each request's waveform to `path`
    pub fn with_wav_output(mut self, path: PathBuf) -> Self {
        self.wav_path = Some(path);
        self
    }

    pub fn registry(&self) -> &AcronymRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut AcronymRegistry {
        &mut self.registry
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Synthesize a markup document
    ///
    /// Any failure aborts the whole request; nothing partial is returned
    /// and no file is written.
    pub fn tts(&mut self, input: &str) -> Result<SynthesisOutput> {
        let document = MarkupDocument::parse_and_register(input, &mut self.registry)?;
        debug!(
            "Request has {} segments ({} acronyms registered)",
            document.segments().len(),
            document.registrations().len()
        );

        let run = synthesize_segments(&mut self.engine, &document, &self.registry)?;

        let phonemes = if run.speech_segments() > 0 {
            self.engine.tokenize(&document.plain_text(), &self.registry)?
        } else {
            Vec::new()
        };

        let timeline = build_timeline(&phonemes, &run.outputs)?;
        let waveform = stitch(&run.outputs, self.sample_rate)?;

        if waveform.sample_rate != self.sample_rate {
            warn!(
                "Engine produced {}Hz audio, configured for {}Hz",
                waveform.sample_rate, self.sample_rate
            );
        }

        let audio_seconds = waveform.duration_ms() / 1000.0;
        if audio_seconds > 0.0 {
            let rtf = run.synthesis_time.as_secs_f64() / audio_seconds;
            info!("RTF = {:.5}", rtf);
        }

        if let Some(path) = &self.wav_path {
            write_wav(path, &waveform)?;
        }

        Ok(SynthesisOutput {
            phonemes: format_timeline(&timeline),
            waveform,
            timeline,
            wav_path: self.wav_path.clone(),
        })
    }
}

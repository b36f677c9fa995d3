//! Configuration loading tests
//!
//! Tests that synthesizer configuration loads from disk and seeds the
//! acronym registry from the override file

use std::fs;
use voxline::config::{Config, ModelRef};
use voxline::lexicon::AcronymRegistry;
use voxline::speech::{SegmentSynthesisResult, SynthesisEngine};
use voxline::{Result, VoiceSynthesizer, VoxlineError};

/// Engine that is never expected to be called
struct IdleEngine;

impl SynthesisEngine for IdleEngine {
    fn synthesize(&mut self, _text: &str, _lexicon: &AcronymRegistry) -> Result<SegmentSynthesisResult> {
        Err(VoxlineError::Engine("not available".to_string()))
    }

    fn tokenize(&mut self, _text: &str, _lexicon: &AcronymRegistry) -> Result<Vec<String>> {
        Err(VoxlineError::Engine("not available".to_string()))
    }
}

#[test]
fn test_config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("voxline.cfg");
    fs::write(
        &path,
        "[model]\nmodel_tag=kan-bayashi/ljspeech_fastspeech2\nvocoder_tag=parallel_wavegan\ndevice=cpu\n\
         [synthesis]\nfs=22050\n[output]\nvoice_dir=out\n",
    )
    .unwrap();

    let config = Config::load_from(&path).expect("Failed to load config");

    assert_eq!(config.path(), path.as_path());
    let source = config.model_source().unwrap();
    assert_eq!(source.model, ModelRef::Tag("kan-bayashi/ljspeech_fastspeech2".to_string()));
    assert_eq!(source.vocoder, Some(ModelRef::Tag("parallel_wavegan".to_string())));
    assert_eq!(source.device, "cpu");
    assert_eq!(config.sample_rate().unwrap(), 22050);
    assert!(config.wav_path().ends_with("out/x.wav"));
}

#[test]
fn test_missing_explicit_config_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load_from(&dir.path().join("absent.cfg"));
    assert!(matches!(result, Err(VoxlineError::Config(_))));
}

#[test]
fn test_config_save_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("voxline.cfg");
    fs::write(&path, "[synthesis]\nfs=16000\n").unwrap();

    let mut config = Config::load_from(&path).unwrap();
    config.set("output", "wav_filename", "speech.wav");
    config.save().unwrap();

    let reloaded = Config::load_from(&path).unwrap();
    assert_eq!(reloaded.sample_rate().unwrap(), 16000);
    assert!(reloaded.wav_path().ends_with("speech.wav"));
}

#[test]
fn test_synthesizer_seeds_registry_from_override_file() {
    let dir = tempfile::tempdir().unwrap();
    let overrides = dir.path().join("acronyms.json");
    fs::write(&overrides, r#"{"nasa": [["N", "AE1", "S", "AH0"]], "Gpu": "JH IY2 P IY2 Y UW2"}"#).unwrap();

    let config_text = format!(
        "[lexicon]\nacronym_file={}\n[output]\nvoice_dir={}\n",
        overrides.display(),
        dir.path().display()
    );
    let config = Config::from_ini_str(&config_text, &dir.path().join("voxline.cfg")).unwrap();

    let synth = VoiceSynthesizer::from_config(&config, IdleEngine).unwrap();

    assert_eq!(synth.registry().len(), 2);
    assert_eq!(synth.registry().lookup("NASA").unwrap(), &["N", "AE1", "S", "AH0"]);
    assert!(synth.registry().contains("gpu"));
}

#[test]
fn test_malformed_override_file_fails_construction() {
    let dir = tempfile::tempdir().unwrap();
    let overrides = dir.path().join("acronyms.json");
    fs::write(&overrides, r#"{"nasa": [["N", ""]]}"#).unwrap();

    let config_text = format!("[lexicon]\nacronym_file={}\n", overrides.display());
    let config = Config::from_ini_str(&config_text, &dir.path().join("voxline.cfg")).unwrap();

    let result = VoiceSynthesizer::from_config(&config, IdleEngine);
    assert!(matches!(result, Err(VoxlineError::Format(_))));
}

//! WAV output

use crate::speech::Waveform;
use crate::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use log::debug;
use std::path::Path;

/// Write a waveform as 32-bit float mono WAV, creating parent directories
pub fn write_wav(path: &Path, waveform: &Waveform) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in &waveform.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    debug!("Wrote {} samples to {:?}", waveform.samples.len(), path);
    Ok(())
}

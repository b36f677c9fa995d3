//! Configuration management

use crate::{Result, VoxlineError};
use ini::Ini;
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Default engine sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 22050;
/// Default name of the per-request waveform file
pub const DEFAULT_WAV_FILENAME: &str = "x.wav";

/// A model or vocoder, given either as a local file or a downloadable tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelRef {
    File(PathBuf),
    Tag(String),
}

/// Which acoustic model and vocoder the engine should load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSource {
    pub model: ModelRef,
    pub vocoder: Option<ModelRef>,
    pub device: String,
}

/// Synthesizer configuration
///
/// Backed by an INI file (`~/.voxline.cfg` unless given explicitly).
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path
    path: PathBuf,
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| VoxlineError::Config(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(&path)
                .map_err(|e| VoxlineError::Config(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Load configuration from an explicit path, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);
        if !path.exists() {
            return Err(VoxlineError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let ini = Ini::load_from_file(path)
            .map_err(|e| VoxlineError::Config(format!("Failed to load config: {}", e)))?;
        Ok(Self {
            ini,
            path: path.to_path_buf(),
        })
    }

    /// Parse configuration from INI text (path is only used for display)
    pub fn from_ini_str(content: &str, path: &Path) -> Result<Self> {
        let ini = Ini::load_from_str(content)
            .map_err(|e| VoxlineError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(Self {
            ini,
            path: path.to_path_buf(),
        })
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| VoxlineError::Config(format!("Failed to save config: {}", e)))
    }

    /// Default config file path (~/.voxline.cfg)
    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".voxline.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("model"))
            .set("model_tag", "")
            .set("model_file", "")
            .set("vocoder_tag", "")
            .set("vocoder_file", "")
            .set("device", "cuda");

        ini.with_section(Some("synthesis"))
            .set("fs", DEFAULT_SAMPLE_RATE.to_string());

        ini.with_section(Some("output"))
            .set("voice_dir", ".")
            .set("wav_filename", DEFAULT_WAV_FILENAME);

        ini.with_section(Some("lexicon")).set("acronym_file", "");

        ini.with_section(Some("engine"))
            .set("command", "")
            .set("args", "");

        ini
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get an integer value from config
    pub fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get a non-empty string value, if set
    fn get_opt(&self, section: &str, key: &str) -> Option<String> {
        self.ini
            .get_from(Some(section), key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    /// Resolve the configured model and vocoder
    ///
    /// Accepted combinations, in priority order: model file + vocoder file,
    /// model file + vocoder tag, model tag + vocoder tag, model file alone,
    /// model tag alone.
    pub fn model_source(&self) -> Result<ModelSource> {
        let model_file = self.get_opt("model", "model_file").map(PathBuf::from);
        let model_tag = self.get_opt("model", "model_tag");
        let vocoder_file = self.get_opt("model", "vocoder_file").map(PathBuf::from);
        let vocoder_tag = self.get_opt("model", "vocoder_tag");
        let device = self.device();

        let (model, vocoder) = match (model_file, model_tag, vocoder_file, vocoder_tag) {
            (Some(m), _, Some(v), _) => (ModelRef::File(m), Some(ModelRef::File(v))),
            (Some(m), _, None, Some(v)) => (ModelRef::File(m), Some(ModelRef::Tag(v))),
            (None, Some(m), _, Some(v)) => (ModelRef::Tag(m), Some(ModelRef::Tag(v))),
            (Some(m), _, None, None) => (ModelRef::File(m), None),
            (None, Some(m), vocoder_file, None) => {
                if vocoder_file.is_some() {
                    warn!("vocoder_file is ignored when only model_tag is set");
                }
                (ModelRef::Tag(m), None)
            }
            (None, None, _, _) => {
                return Err(VoxlineError::Config(
                    "The model_file or model_tag is not provided".to_string(),
                ))
            }
        };

        Ok(ModelSource {
            model,
            vocoder,
            device,
        })
    }

    /// Device the engine should run on
    pub fn device(&self) -> String {
        self.get_string("model", "device", "cuda")
    }

    /// Expected engine sample rate; also the rate of pause-only output
    pub fn sample_rate(&self) -> Result<u32> {
        let fs = self.get_int("synthesis", "fs", DEFAULT_SAMPLE_RATE as i64);
        u32::try_from(fs)
            .ok()
            .filter(|&r| r > 0)
            .ok_or_else(|| VoxlineError::Config(format!("Invalid sample rate fs = {}", fs)))
    }

    /// Directory receiving the waveform file
    pub fn voice_dir(&self) -> PathBuf {
        PathBuf::from(self.get_string("output", "voice_dir", "."))
    }

    /// Full path of the per-request waveform file
    pub fn wav_path(&self) -> PathBuf {
        let name = self
            .get_opt("output", "wav_filename")
            .unwrap_or_else(|| DEFAULT_WAV_FILENAME.to_string());
        self.voice_dir().join(name)
    }

    /// Acronym override file used to seed the registry
    pub fn acronym_file(&self) -> Option<PathBuf> {
        self.get_opt("lexicon", "acronym_file").map(PathBuf::from)
    }

    /// External engine program and its arguments
    pub fn engine_command(&self) -> Option<(String, Vec<String>)> {
        let command = self.get_opt("engine", "command")?;
        let args = self
            .get_string("engine", "args", "")
            .split_whitespace()
            .map(str::to_string)
            .collect();
        Some((command, args))
    }
}

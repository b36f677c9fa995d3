//! Subprocess engine backend
//!
//! Drives an external synthesis program (typically a Python script
//! wrapping the neural model) over JSON. Every call spawns the program,
//! writes one request object to its stdin and reads one response object
//! from its stdout.
//!
//! Request:
//! `{"op": "synthesize" | "tokenize", "text": ..., "lexicon": {...}, "model": {...}}`
//!
//! Responses:
//! - synthesize: `{"samples": [...], "token_durations": [...], "sample_rate": 22050}`
//! - tokenize: `{"tokens": ["HH", "AH0", ...]}`

use crate::config::ModelSource;
use crate::lexicon::AcronymRegistry;
use crate::speech::{SegmentSynthesisResult, SynthesisEngine};
use crate::{Result, VoxlineError};
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::{Command, Stdio};

/// Input sent to the engine program (JSON format)
#[derive(Debug, Serialize)]
struct EngineRequest<'a> {
    op: &'static str,
    text: &'a str,
    lexicon: &'a AcronymRegistry,
    model: &'a ModelSource,
}

/// Output of a tokenize call (JSON format)
#[derive(Debug, Deserialize)]
struct TokenizeResponse {
    tokens: Vec<String>,
}

/// Engine backed by an external program
pub struct ProcessEngine {
    /// Program to run
    command: String,
    /// Arguments passed before the request is written
    args: Vec<String>,
    /// Model selection forwarded with every request
    model: ModelSource,
}

impl ProcessEngine {
    /// Create a subprocess engine
    pub fn new(command: impl Into<String>, args: Vec<String>, model: ModelSource) -> Self {
        let command = command.into();
        debug!("Process engine: {} {:?} ({:?})", command, args, model.model);
        Self {
            command,
            args,
            model,
        }
    }

    /// Run the engine program once and decode its JSON reply
    fn call<T: DeserializeOwned>(&self, op: &'static str, text: &str, lexicon: &AcronymRegistry) -> Result<T> {
        let request = EngineRequest {
            op,
            text,
            lexicon,
            model: &self.model,
        };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| VoxlineError::Engine(format!("Failed to encode request: {}", e)))?;

        debug!("Running engine op {} on {} chars", op, text.len());

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| VoxlineError::Engine(format!("Failed to start {}: {}", self.command, e)))?;

        // Send request JSON to the engine
        if let Some(mut stdin) = child.stdin.take() {
            let sent = stdin
                .write_all(request_json.as_bytes())
                .and_then(|_| stdin.write_all(b"\n"));
            if let Err(e) = sent {
                drop(stdin);
                let _ = child.kill();
                let _ = child.wait();
                return Err(VoxlineError::Engine(format!("Failed to send request: {}", e)));
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| VoxlineError::Engine(format!("Engine did not finish: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("Engine error: {}", stderr);
            return Err(VoxlineError::Engine(format!(
                "{} failed ({}): {}",
                op,
                output.status,
                stderr.trim()
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| VoxlineError::Engine(format!("Failed to parse {} output: {}", op, e)))
    }
}

impl SynthesisEngine for ProcessEngine {
    fn synthesize(&mut self, text: &str, lexicon: &AcronymRegistry) -> Result<SegmentSynthesisResult> {
        let result: SegmentSynthesisResult = self.call("synthesize", text, lexicon)?;
        debug!(
            "Engine returned {} samples at {}Hz",
            result.samples.len(),
            result.sample_rate
        );
        Ok(result)
    }

    fn tokenize(&mut self, text: &str, lexicon: &AcronymRegistry) -> Result<Vec<String>> {
        let response: TokenizeResponse = self.call("tokenize", text, lexicon)?;
        Ok(response.tokens)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::ModelRef;

    fn model() -> ModelSource {
        ModelSource {
            model: ModelRef::Tag("test/model".to_string()),
            vocoder: None,
            device: "cpu".to_string(),
        }
    }

    fn shell(script: &str) -> ProcessEngine {
        ProcessEngine::new("sh", vec!["-c".to_string(), script.to_string()], model())
    }

    #[test]
    fn test_synthesize_reads_json_reply() {
        let mut engine = shell(
            r#"cat > /dev/null; echo '{"samples":[0.0,0.5],"token_durations":[1,2],"sample_rate":16000}'"#,
        );
        let result = engine.synthesize("hi", &AcronymRegistry::new()).unwrap();
        assert_eq!(result.samples, vec![0.0, 0.5]);
        assert_eq!(result.token_durations, vec![1, 2]);
        assert_eq!(result.sample_rate, 16000);
    }

    #[test]
    fn test_tokenize_reads_tokens() {
        let mut engine = shell(r#"cat > /dev/null; echo '{"tokens":["HH","AY1"]}'"#);
        let tokens = engine.tokenize("hi", &AcronymRegistry::new()).unwrap();
        assert_eq!(tokens, vec!["HH", "AY1"]);
    }

    #[test]
    fn test_request_carries_lexicon() {
        let mut registry = AcronymRegistry::new();
        registry.register("tv", vec!["T".to_string(), "IY2".to_string()]);
        // Echo back how many request lines mention the registered word
        let mut engine = shell(r#"n=$(grep -c '"tv":'); echo "{\"tokens\":[\"$n\"]}""#);
        let tokens = engine.tokenize("tv", &registry).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].trim(), "1");
    }

    #[test]
    fn test_failures_are_engine_errors() {
        let mut failing = shell("cat > /dev/null; echo boom >&2; exit 3");
        assert!(matches!(
            failing.synthesize("x", &AcronymRegistry::new()),
            Err(VoxlineError::Engine(_))
        ));

        let mut garbage = shell("cat > /dev/null; echo not-json");
        assert!(matches!(
            garbage.tokenize("x", &AcronymRegistry::new()),
            Err(VoxlineError::Engine(_))
        ));

        // Exits without reading a large request, so the write hits a closed pipe
        let big = "x".repeat(1 << 20);
        let mut closed = shell("exit 0");
        assert!(matches!(
            closed.synthesize(&big, &AcronymRegistry::new()),
            Err(VoxlineError::Engine(_))
        ));

        let mut missing = ProcessEngine::new("/nonexistent/voxline-engine", vec![], model());
        assert!(matches!(
            missing.tokenize("x", &AcronymRegistry::new()),
            Err(VoxlineError::Engine(_))
        ));
    }
}

//! Acronym pronunciation registry
//!
//! The registry is the pronunciation-override table the synthesis engine
//! consults during grapheme-to-phoneme lookup. It is seeded once from an
//! override file and then grows as markup registers new acronyms; entries
//! are never removed.
//!
//! Registering a word that already exists puts the new pronunciation in
//! front of the older ones, so the most recent registration always wins.

use crate::{Result, VoxlineError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Pronunciation candidates for one override file entry
///
/// The file accepts a list of candidates, a single phoneme list, or a
/// single space-separated phoneme string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OverrideEntry {
    Candidates(Vec<Vec<String>>),
    Single(Vec<String>),
    Spaced(String),
}

impl OverrideEntry {
    fn into_candidates(self) -> Vec<Vec<String>> {
        match self {
            OverrideEntry::Candidates(c) => c,
            OverrideEntry::Single(p) => vec![p],
            OverrideEntry::Spaced(s) => vec![s.split_whitespace().map(str::to_string).collect()],
        }
    }
}

/// Word -> ordered pronunciation candidates, most preferred first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AcronymRegistry {
    entries: BTreeMap<String, Vec<Vec<String>>>,
}

impl AcronymRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded from a JSON override file
    pub fn from_override_file(path: &Path) -> Result<Self> {
        debug!("Loading acronym overrides from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut registry = Self::new();
        registry.seed_from_str(&content)?;
        Ok(registry)
    }

    /// Merge override entries from JSON text
    ///
    /// Format: `{"word": [["PH1", "PH2"], ...]}` with candidates in
    /// preference order. A malformed entry rejects the whole document and
    /// leaves the registry untouched.
    pub fn seed_from_str(&mut self, json: &str) -> Result<()> {
        let raw: BTreeMap<String, OverrideEntry> = serde_json::from_str(json)?;

        let mut parsed = Vec::with_capacity(raw.len());
        for (word, entry) in raw {
            let key = normalize_key(&word).ok_or_else(|| {
                VoxlineError::Format(format!("Invalid acronym override key {:?}", word))
            })?;
            let candidates = entry.into_candidates();
            if candidates.is_empty() {
                return Err(VoxlineError::Format(format!(
                    "Acronym override {:?} has no pronunciations",
                    word
                )));
            }
            for candidate in &candidates {
                validate_phonemes(&word, candidate)?;
            }
            parsed.push((key, candidates));
        }

        for (key, candidates) in parsed {
            // Prepend in reverse so the file's first candidate stays first
            for candidate in candidates.into_iter().rev() {
                self.register(&key, candidate);
            }
        }

        debug!("Acronym registry holds {} words", self.entries.len());
        Ok(())
    }

    /// Register a pronunciation, making it the preferred one for `word`
    pub fn register(&mut self, word: &str, phonemes: Vec<String>) {
        let key = word.to_lowercase();
        debug!("Registering {:?} -> {}", key, phonemes.join(" "));
        self.entries.entry(key).or_default().insert(0, phonemes);
    }

    /// Preferred pronunciation for `word`, if registered
    pub fn lookup(&self, word: &str) -> Option<&[String]> {
        self.entries
            .get(&word.to_lowercase())
            .and_then(|c| c.first())
            .map(|p| p.as_slice())
    }

    /// All pronunciation candidates for `word`, most preferred first
    pub fn candidates(&self, word: &str) -> Option<&[Vec<String>]> {
        self.entries.get(&word.to_lowercase()).map(|c| c.as_slice())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over words and their candidates in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Vec<String>])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Lowercase a key, rejecting empty keys and keys containing whitespace
fn normalize_key(word: &str) -> Option<String> {
    if word.is_empty() || word.chars().any(char::is_whitespace) {
        return None;
    }
    Some(word.to_lowercase())
}

fn validate_phonemes(word: &str, phonemes: &[String]) -> Result<()> {
    if phonemes.is_empty() {
        return Err(VoxlineError::Format(format!(
            "Acronym override {:?} has an empty pronunciation",
            word
        )));
    }
    if let Some(bad) = phonemes
        .iter()
        .find(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_alphanumeric()))
    {
        return Err(VoxlineError::Format(format!(
            "Acronym override {:?} has invalid phoneme {:?}",
            word, bad
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phones(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_register_prepends() {
        let mut registry = AcronymRegistry::new();
        registry.register("xwd", phones("X1"));
        registry.register("xwd", phones("X2"));

        assert_eq!(
            registry.candidates("xwd").unwrap(),
            &[phones("X2"), phones("X1")][..]
        );
        assert_eq!(registry.lookup("XWD").unwrap(), &phones("X2")[..]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_seed_accepts_all_entry_shapes() {
        let mut registry = AcronymRegistry::new();
        registry
            .seed_from_str(
                r#"{
                    "nasa": [["N", "AE1", "S", "AH0"], ["EH2", "N", "EY2"]],
                    "gif": ["JH", "IH1", "F"],
                    "sql": "S IY1 K W AH0 L"
                }"#,
            )
            .unwrap();

        assert_eq!(registry.lookup("nasa").unwrap(), &phones("N AE1 S AH0")[..]);
        assert_eq!(registry.candidates("nasa").unwrap().len(), 2);
        assert_eq!(registry.lookup("gif").unwrap(), &phones("JH IH1 F")[..]);
        assert_eq!(registry.lookup("SQL").unwrap(), &phones("S IY1 K W AH0 L")[..]);
    }

    #[test]
    fn test_seed_rejects_malformed_entries() {
        let mut registry = AcronymRegistry::new();
        assert!(matches!(
            registry.seed_from_str(r#"{"nasa": 42}"#),
            Err(VoxlineError::Format(_))
        ));
        assert!(matches!(
            registry.seed_from_str(r#"{"nasa": []}"#),
            Err(VoxlineError::Format(_))
        ));
        assert!(matches!(
            registry.seed_from_str(r#"{"two words": ["T"]}"#),
            Err(VoxlineError::Format(_))
        ));
        assert!(matches!(
            registry.seed_from_str(r#"{"ok": ["T"], "bad": ["A-B"]}"#),
            Err(VoxlineError::Format(_))
        ));
        assert!(matches!(
            registry.seed_from_str("not json"),
            Err(VoxlineError::Format(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut registry = AcronymRegistry::new();
        registry.register("tv", phones("T IY2 V IY2"));
        let json = serde_json::to_string(&registry).unwrap();
        assert_eq!(json, r#"{"tv":[["T","IY2","V","IY2"]]}"#);
    }
}

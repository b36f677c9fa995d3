//! Acronym phonemization
//!
//! Converts the letters of an acronym into one flat phoneme sequence by
//! concatenating the spelled-out pronunciation of each letter.

use super::spelling::spell_letter;
use crate::{Result, VoxlineError};

/// Spell out `text` letter by letter
///
/// Whitespace is ignored. Any other character that is not an ASCII letter
/// fails the whole acronym with a format error; nothing is guessed.
pub fn phonemize_acronym(text: &str) -> Result<Vec<String>> {
    let mut phonemes = Vec::new();

    for ch in text.chars().filter(|c| !c.is_whitespace()) {
        let spelled = spell_letter(ch).ok_or_else(|| {
            VoxlineError::Format(format!(
                "Cannot spell character {:?} in acronym {:?}",
                ch, text
            ))
        })?;
        phonemes.extend(spelled.iter().map(|p| p.to_string()));
    }

    Ok(phonemes)
}

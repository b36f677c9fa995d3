//! Recognised phoneme labels
//!
//! Timing output only carries labels from a closed ARPAbet-derived set.
//! Stress digits are dropped first; anything still unknown is reported as
//! silence.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Label used for silence and for any unrecognised phoneme
pub const SILENCE: &str = "SIL";

/// Closed set of labels allowed in the timing output
pub static PHONEME_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "F", "M", "N", "L", "D", "B", "HH", "P", "T", "S", "R", "AE", "W", "Z", "V", "G", "NG",
        "DH", "AX", "AA", "AH", "AO", "AW", "AXR", "AY", "CH", "EH", "ER", "EY", "IH", "IX", "IY",
        "JH", "OW", "OY", "SH", "TH", "UH", "UW", "Y", "TS", SILENCE,
    ]
    .into_iter()
    .collect()
});

/// Remove stress markers ("AH1" -> "AH")
pub fn strip_stress(phoneme: &str) -> String {
    phoneme.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// Map an engine token onto the recognised set
pub fn normalize_phoneme(phoneme: &str) -> String {
    let stripped = strip_stress(phoneme);
    if PHONEME_SET.contains(stripped.as_str()) {
        stripped
    } else {
        SILENCE.to_string()
    }
}

//! Letter-by-letter spelling table
//!
//! When a word is marked up to be read as an acronym, each letter is
//! pronounced on its own ("NASA" -> "en ay es ay"). This table holds the
//! ARPAbet phonemes for the name of every letter of the English alphabet.

use std::collections::HashMap;
use once_cell::sync::Lazy;

/// Spelled-out letter pronunciations
///
/// Keys are uppercase ASCII letters; values are ARPAbet phonemes with
/// stress markers, in speaking order.
pub static SPELLING: Lazy<HashMap<char, &'static [&'static str]>> = Lazy::new(|| {
    let mut m: HashMap<char, &'static [&'static str]> = HashMap::new();
    m.insert('A', &["EY2"]);
    m.insert('B', &["B", "IY2"]);
    m.insert('C', &["S", "IY2"]);
    m.insert('D', &["D", "IY2"]);
    m.insert('E', &["IY2"]);
    m.insert('F', &["EH2", "F"]);
    m.insert('G', &["JH", "IY2"]);
    m.insert('H', &["EY2", "CH"]);
    m.insert('I', &["AY2"]);
    m.insert('J', &["JH", "EY2"]);
    m.insert('K', &["K", "EY2"]);
    m.insert('L', &["EH2", "L"]);
    m.insert('M', &["EH2", "M"]);
    m.insert('N', &["EH2", "N"]);
    m.insert('O', &["OW2"]);
    m.insert('P', &["P", "IY2"]);
    m.insert('Q', &["K", "Y", "UW2"]);
    m.insert('R', &["AA2", "R"]);
    m.insert('S', &["EH2", "S"]);
    m.insert('T', &["T", "IY2"]);
    m.insert('U', &["Y", "UW2"]);
    m.insert('V', &["V", "IY2"]);
    m.insert('W', &["D", "AH1", "B", "AH0", "Y", "UW0"]);
    m.insert('X', &["EH2", "K", "S"]);
    m.insert('Y', &["W", "AY2"]);
    m.insert('Z', &["Z", "IY2"]);
    m
});

/// Look up the spelled-out phonemes for a single letter (case-insensitive)
pub fn spell_letter(letter: char) -> Option<&'static [&'static str]> {
    SPELLING.get(&letter.to_ascii_uppercase()).copied()
}

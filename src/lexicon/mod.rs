//! Pronunciation lexicon: letter spelling, acronym phonemization and the
//! acronym override registry

pub mod phonemizer;
pub mod registry;
pub mod spelling;

pub use phonemizer::phonemize_acronym;
pub use registry::AcronymRegistry;
pub use spelling::{spell_letter, SPELLING};

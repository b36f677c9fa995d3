//! Phoneme timing: reconstruction from duration codes and text rendering

pub mod builder;
pub mod format;
pub mod phonemes;

pub use builder::{build_timeline, document_bounds, ms_to_ticks, segment_bounds, TimelineEntry};
pub use format::{format_entry, format_timeline};
pub use phonemes::{normalize_phoneme, strip_stress, PHONEME_SET, SILENCE};

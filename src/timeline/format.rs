//! Fixed-width phoneme timing text
//!
//! Each entry becomes one line:
//! `start 0    0    0    0  end label 0.0000 ` followed by a newline, with
//! the ticks right-aligned to four columns and the label left-aligned to
//! four. Lines are joined with a single space.

use super::builder::TimelineEntry;

/// Render one timeline entry as a newline-terminated line
pub fn format_entry(entry: &TimelineEntry) -> String {
    format!(
        "{:>4} 0    0    0    0  {:>4} {:<4} 0.0000 \n",
        entry.start, entry.end, entry.phoneme
    )
}

/// Render a whole timeline
pub fn format_timeline(timeline: &[TimelineEntry]) -> String {
    timeline
        .iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(phoneme: &str, start: u64, end: u64) -> TimelineEntry {
        TimelineEntry {
            phoneme: phoneme.to_string(),
            start,
            end,
        }
    }

    #[test]
    fn test_format_entry_columns() {
        assert_eq!(
            format_entry(&entry("HH", 10, 23)),
            "  10 0    0    0    0    23 HH   0.0000 \n"
        );
        assert_eq!(
            format_entry(&entry("AXR", 1234, 12345)),
            "1234 0    0    0    0  12345 AXR  0.0000 \n"
        );
    }

    #[test]
    fn test_format_timeline_joins_with_space() {
        let text = format_timeline(&[entry("HH", 10, 12), entry("AY", 12, 20)]);
        assert_eq!(
            text,
            "  10 0    0    0    0    12 HH   0.0000 \n   12 0    0    0    0    20 AY   0.0000 \n"
        );
        assert_eq!(format_timeline(&[]), "");
    }
}

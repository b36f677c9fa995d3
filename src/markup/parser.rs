//! Markup to segment conversion
//!
//! Parsing happens in two passes over an immutable tree. The first pass
//! collects an acronym registration for every `<say-as interpret-as="acronym">`
//! element. The second pass flattens the top-level nodes into an ordered
//! list of text runs and pauses, reading each acronym element as its own
//! letters so downstream stages see ordinary prose.

use super::break_time::parse_break_time;
use super::tree::{parse_tree, Element, Node};
use crate::lexicon::{phonemize_acronym, AcronymRegistry};
use crate::{Result, VoxlineError};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

const ROOT_ELEMENT: &str = "speak";
const BREAK_ELEMENT: &str = "break";
const SAY_AS_ELEMENT: &str = "say-as";

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// One atomic unit of a markup document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A run of prose to synthesize
    Text { content: String },
    /// Silence of the given length
    Pause { duration_ms: u64 },
}

/// An acronym found in the markup, with its spelled-out pronunciation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcronymRegistration {
    /// Lowercase registry key
    pub key: String,
    /// Letters as written, whitespace removed
    pub text: String,
    pub phonemes: Vec<String>,
}

/// Parsed markup: segments in document order plus acronym registrations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupDocument {
    segments: Vec<Segment>,
    registrations: Vec<AcronymRegistration>,
}

impl MarkupDocument {
    /// Parse markup without touching any registry
    pub fn parse(input: &str) -> Result<Self> {
        let tree = parse_tree(input)?;
        let nodes = unwrap_root(&tree);

        let mut registrations = Vec::new();
        collect_registrations(nodes, &mut registrations)?;

        let segments = build_segments(nodes)?;
        debug!(
            "Parsed markup into {} segments, {} acronyms",
            segments.len(),
            registrations.len()
        );

        Ok(Self {
            segments,
            registrations,
        })
    }

    /// Parse markup and register its acronyms, in document order
    pub fn parse_and_register(input: &str, registry: &mut AcronymRegistry) -> Result<Self> {
        let document = Self::parse(input)?;
        document.register_acronyms(registry);
        Ok(document)
    }

    /// Apply this document's acronym registrations to `registry`
    pub fn register_acronyms(&self, registry: &mut AcronymRegistry) {
        for registration in &self.registrations {
            registry.register(&registration.key, registration.phonemes.clone());
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn registrations(&self) -> &[AcronymRegistration] {
        &self.registrations
    }

    /// Text segment contents in document order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Text { content } => Some(content.as_str()),
            Segment::Pause { .. } => None,
        })
    }

    /// The whole document as plain text, pauses dropped
    pub fn plain_text(&self) -> String {
        self.texts().collect::<Vec<_>>().join(" ")
    }

    /// Sum of all pause durations
    pub fn total_pause_ms(&self) -> u64 {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Pause { duration_ms } => *duration_ms,
                Segment::Text { .. } => 0,
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Descend into a lone `<speak>` root if there is one
fn unwrap_root(nodes: &[Node]) -> &[Node] {
    let mut significant = nodes.iter().filter(|n| match n {
        Node::Text(t) => !t.trim().is_empty(),
        Node::Element(_) => true,
    });

    match (significant.next(), significant.next()) {
        (Some(Node::Element(root)), None) if root.name == ROOT_ELEMENT => &root.children,
        _ => nodes,
    }
}

fn is_acronym(element: &Element) -> bool {
    element.name == SAY_AS_ELEMENT && element.attribute("interpret-as") == Some("acronym")
}

/// Acronym text as it should be read: the element's letters, no whitespace
fn acronym_letters(element: &Element) -> String {
    element.text().chars().filter(|c| !c.is_whitespace()).collect()
}

fn collect_registrations(nodes: &[Node], out: &mut Vec<AcronymRegistration>) -> Result<()> {
    for node in nodes {
        let Node::Element(element) = node else {
            continue;
        };

        if is_acronym(element) {
            let text = acronym_letters(element);
            if text.is_empty() {
                continue;
            }
            let phonemes = phonemize_acronym(&text)?;
            out.push(AcronymRegistration {
                key: text.to_lowercase(),
                text,
                phonemes,
            });
        } else {
            collect_registrations(&element.children, out)?;
        }
    }
    Ok(())
}

fn build_segments(nodes: &[Node]) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut pending = String::new();

    for node in nodes {
        match node {
            Node::Element(element) if element.name == BREAK_ELEMENT => {
                flush_text(&mut pending, &mut segments);
                let time = element.attribute("time").ok_or_else(|| {
                    VoxlineError::parse(element.offset, "<break> is missing its time attribute")
                })?;
                segments.push(Segment::Pause {
                    duration_ms: parse_break_time(time)?,
                });
            }
            other => flatten_text(other, &mut pending),
        }
    }
    flush_text(&mut pending, &mut segments);

    Ok(segments)
}

/// Append the readable text of `node`; nested breaks contribute nothing
fn flatten_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => out.push_str(t),
        Node::Element(element) if is_acronym(element) => out.push_str(&acronym_letters(element)),
        Node::Element(element) => {
            for child in &element.children {
                flatten_text(child, out);
            }
        }
    }
}

fn flush_text(pending: &mut String, segments: &mut Vec<Segment>) {
    let collapsed = WHITESPACE_RUN.replace_all(pending.trim(), " ").into_owned();
    pending.clear();
    if !collapsed.is_empty() {
        segments.push(Segment::Text { content: collapsed });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Segment {
        Segment::Text {
            content: s.to_string(),
        }
    }

    fn pause(ms: u64) -> Segment {
        Segment::Pause { duration_ms: ms }
    }

    #[test]
    fn test_plain_prose_is_one_segment() {
        let doc = MarkupDocument::parse("  Hello,\n\n   world.  ").unwrap();
        assert_eq!(doc.segments(), &[text("Hello, world.")]);
        assert!(doc.registrations().is_empty());
    }

    #[test]
    fn test_breaks_split_segments() {
        let doc = MarkupDocument::parse("Hello. <break time='1s'/> World.").unwrap();
        assert_eq!(
            doc.segments(),
            &[text("Hello."), pause(1000), text("World.")]
        );
        assert_eq!(doc.plain_text(), "Hello. World.");
        assert_eq!(doc.total_pause_ms(), 1000);
    }

    #[test]
    fn test_speak_root_is_unwrapped() {
        let doc = MarkupDocument::parse(
            "<?xml version=\"1.0\"?>\n<speak>One<break time=\"250ms\"/>Two</speak>\n",
        )
        .unwrap();
        assert_eq!(doc.segments(), &[text("One"), pause(250), text("Two")]);
    }

    #[test]
    fn test_acronym_is_registered_and_flattened() {
        let doc = MarkupDocument::parse(
            r#"Ask <say-as interpret-as="acronym">N A S A</say-as> today."#,
        )
        .unwrap();

        assert_eq!(doc.segments(), &[text("Ask NASA today.")]);
        let reg = &doc.registrations()[0];
        assert_eq!(reg.key, "nasa");
        assert_eq!(reg.text, "NASA");
        assert_eq!(
            reg.phonemes,
            vec!["EH2", "N", "EY2", "EH2", "S", "EY2"]
        );
    }

    #[test]
    fn test_registration_order_follows_document() {
        let mut registry = AcronymRegistry::new();
        let doc = MarkupDocument::parse_and_register(
            r#"<say-as interpret-as="acronym">ab</say-as> and <p><say-as interpret-as="acronym">AB</say-as></p>"#,
            &mut registry,
        )
        .unwrap();

        assert_eq!(doc.registrations().len(), 2);
        assert_eq!(registry.candidates("ab").unwrap().len(), 2);
        assert_eq!(doc.segments(), &[text("ab and AB")]);
    }

    #[test]
    fn test_other_elements_pass_through() {
        let doc = MarkupDocument::parse(
            r#"<emphasis level="strong">Very</emphasis> <say-as interpret-as="date">2024</say-as> <p>good <break time="9s"/>news</p>"#,
        )
        .unwrap();
        assert_eq!(doc.segments(), &[text("Very 2024 good news")]);
        assert!(doc.registrations().is_empty());
    }

    #[test]
    fn test_consecutive_and_leading_pauses() {
        let doc = MarkupDocument::parse(
            "<break time='100ms'/>A<break time='1s'/> <break time='2s'/>B",
        )
        .unwrap();
        assert_eq!(
            doc.segments(),
            &[pause(100), text("A"), pause(1000), pause(2000), text("B")]
        );
    }

    #[test]
    fn test_pause_only_document() {
        let doc = MarkupDocument::parse("<break time='1s'/>").unwrap();
        assert_eq!(doc.segments(), &[pause(1000)]);
        assert_eq!(doc.plain_text(), "");
    }

    #[test]
    fn test_bad_break_unit_is_format_error() {
        let err = MarkupDocument::parse("A <break time='3m'/> B").unwrap_err();
        assert!(matches!(err, VoxlineError::Format(_)));
    }

    #[test]
    fn test_break_without_time_is_parse_error() {
        let err = MarkupDocument::parse("A <break/> B").unwrap_err();
        assert!(matches!(err, VoxlineError::Parse { .. }));
    }

    #[test]
    fn test_unspellable_acronym_fails() {
        let err =
            MarkupDocument::parse(r#"<say-as interpret-as="acronym">MP3</say-as>"#).unwrap_err();
        assert!(matches!(err, VoxlineError::Format(_)));
    }

    #[test]
    fn test_parse_does_not_register() {
        let registry = AcronymRegistry::new();
        let doc = MarkupDocument::parse(r#"<say-as interpret-as="acronym">TV</say-as>"#).unwrap();
        assert_eq!(doc.registrations().len(), 1);
        assert!(registry.is_empty());
    }
}

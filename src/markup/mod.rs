//! Markup input: pause and acronym annotated prose

pub mod break_time;
pub mod parser;
pub mod tree;

pub use break_time::parse_break_time;
pub use parser::{AcronymRegistration, MarkupDocument, Segment};

//! Concrete synthesis engine backends

// External program speaking a JSON protocol over stdin/stdout
pub mod process;

pub use process::ProcessEngine;

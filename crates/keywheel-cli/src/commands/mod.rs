//! CLI command implementations

pub mod analyze;
pub mod camelot;
pub mod json_output;

#[cfg(feature = "native")]
pub mod probe;

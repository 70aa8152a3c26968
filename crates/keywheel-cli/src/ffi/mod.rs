//! FFI bindings for native analysis libraries.
//!
//! - **key_buffer**: C string buffer helpers (always built)
//! - **mixxx_analyzer**: precompiled BPM/key analyzer (feature `native`)

pub mod key_buffer;

#[cfg(feature = "native")]
pub mod native;

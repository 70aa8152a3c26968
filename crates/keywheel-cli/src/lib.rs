//! Keywheel CLI library.
//!
//! Configuration, logging, analysis backends, native bindings and the command
//! implementations behind the `keywheel` binary.

pub mod backends;
pub mod commands;
pub mod config;
pub mod ffi;
pub mod logging;

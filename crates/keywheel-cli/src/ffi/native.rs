//! Native analyzer binding.
//!
//! Safe wrapper around `libmixxx_analyzer`, a precompiled library exposing a
//! single entry point:
//!
//! ```c
//! int analyze_file(const char *path, double *bpm, char *key_buf, int key_len);
//! ```
//!
//! The caller owns the key buffer. The library writes a NUL-terminated key
//! string into it and never more than `key_len` bytes.
//!
//! # Safety
//! All unsafe calls are confined to [`analyze_file`]; the buffer is allocated
//! here and always NUL-terminated before it is read.

use std::ffi::CString;
use std::os::raw::{c_char, c_double, c_int};
use std::path::Path;
use thiserror::Error;

use super::key_buffer::{decode_key_buffer, new_key_buffer, KEY_BUFFER_LEN};

mod sys {
    use super::*;

    #[link(name = "mixxx_analyzer")]
    extern "C" {
        pub fn analyze_file(
            path: *const c_char,
            bpm: *mut c_double,
            key_buf: *mut c_char,
            key_len: c_int,
        ) -> c_int;
    }
}

/// Errors from the native analyzer.
#[derive(Debug, Error)]
pub enum NativeError {
    /// Path cannot be passed to C (contains a NUL byte or is not UTF-8).
    #[error("invalid path for native analyzer: {0}")]
    InvalidPath(String),

    /// Library reported a failure.
    #[error("native analyzer failed with status {0}")]
    AnalysisFailed(i32),
}

/// What the native analyzer reports for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeProbe {
    /// Tempo in beats per minute
    pub bpm: f64,
    /// Key string as written by the library
    pub key: String,
}

/// Runs the native analyzer on one file.
pub fn analyze_file(path: &Path) -> Result<NativeProbe, NativeError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| NativeError::InvalidPath(path.to_string_lossy().into_owned()))?;
    let c_path =
        CString::new(path_str).map_err(|_| NativeError::InvalidPath(path_str.to_string()))?;

    let mut bpm: c_double = 0.0;
    let mut key_buf = new_key_buffer();

    let status = unsafe {
        sys::analyze_file(
            c_path.as_ptr(),
            &mut bpm,
            key_buf.as_mut_ptr(),
            KEY_BUFFER_LEN as c_int,
        )
    };

    if status != 0 {
        return Err(NativeError::AnalysisFailed(status));
    }

    Ok(NativeProbe {
        bpm,
        key: decode_key_buffer(&mut key_buf),
    })
}

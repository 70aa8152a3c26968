//! Fixed-size C string buffers filled in by native analyzers.

use std::os::raw::c_char;

/// Size of the key buffer handed to the native analyzer (its documented
/// minimum).
pub const KEY_BUFFER_LEN: usize = 16;

/// A zeroed key buffer.
pub fn new_key_buffer() -> [c_char; KEY_BUFFER_LEN] {
    [0; KEY_BUFFER_LEN]
}

/// Reads the string out of a buffer, forcing a terminator in the last byte.
///
/// Bytes after the first NUL are ignored and invalid UTF-8 is replaced.
pub fn decode_key_buffer(buf: &mut [c_char]) -> String {
    if let Some(last) = buf.last_mut() {
        *last = 0;
    }
    let bytes: Vec<u8> = buf
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

//! Shared utility functions.

use std::borrow::Cow;

/// One-line preview of `s` for log output.
///
/// Newlines are flattened to spaces and the result is cut to at most
/// `max_bytes` on a UTF-8 character boundary, with `...` appended when
/// anything was dropped.
pub fn preview(s: &str, max_bytes: usize) -> Cow<'_, str> {
    let flat: Cow<'_, str> = if s.contains('\n') {
        Cow::Owned(s.replace(['\r', '\n'], " "))
    } else {
        Cow::Borrowed(s)
    };
    if flat.len() <= max_bytes {
        return flat;
    }
    let mut end = max_bytes;
    while end > 0 && !flat.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!("{}...", &flat[..end]))
}

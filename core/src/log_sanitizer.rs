//! Helpers for keeping response bodies short in debug logs.

/// Bodies longer than this are cut before logging.
const LOG_BODY_LIMIT: usize = 256;

/// Cut `body` to at most `LOG_BODY_LIMIT` bytes on a char boundary.
pub(crate) fn truncate_for_log(body: &str) -> String {
    if body.len() <= LOG_BODY_LIMIT {
        return body.to_string();
    }
    let mut end = LOG_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [{} bytes total]", &body[..end], body.len())
}

//! RFC 3986 percent-encoding as required by OAuth 1.0a (RFC 5849 section 3.6).

// std
use std::borrow::Cow;
// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Everything except `ALPHA`, `DIGIT`, `-`, `.`, `_`, `~`.
const OAUTH_ENCODE_SET: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encodes `input` using upper-case hex for every reserved byte of its UTF-8 form.
pub fn percent_encode(input: &str) -> String {
	utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Reverses [`percent_encode`]. Returns `None` when the decoded bytes are not UTF-8.
pub fn percent_decode(input: &str) -> Option<Cow<'_, str>> {
	percent_decode_str(input).decode_utf8().ok()
}

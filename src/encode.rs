use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode, NON_ALPHANUMERIC};

/// Everything outside RFC 3986 unreserved (`A-Z a-z 0-9 - . _ ~`) is escaped.
/// Notably stricter than form-urlencoding: space becomes `%20` and `*`
/// becomes `%2A`.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode `input` for use in signature base strings, signing keys and
/// `Authorization` header values.
pub fn percent_encode(input: &str) -> PercentEncode<'_> {
    utf8_percent_encode(input, OAUTH_ENCODE_SET)
}

/// Normalize a string that was already escaped by a generic form-urlencoder.
///
/// Form-urlencoding leaves `*` bare and writes space as `+`; both are illegal
/// in a signature parameter, so they are rewritten to their `%XX` forms here.
/// The remaining `%XX` escapes are kept as-is.
pub fn escape_query_escaped(input: &str) -> String {
    input.replace('+', "%20").replace('*', "%2A")
}

use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything but the RFC 3986 unreserved characters `A-Z a-z 0-9 - . _ ~`.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes `input` as required by RFC 5849 section 3.6.
///
/// Works on octets, so a multi-byte character turns into one `%XX` triplet
/// per byte and bytes that are not UTF-8 pass through as their own triplet.
/// Hex digits are always uppercase.
pub fn encode<T: AsRef<[u8]> + ?Sized>(input: &T) -> String {
    percent_encode(input.as_ref(), OAUTH_ENCODE_SET).to_string()
}

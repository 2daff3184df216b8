//! URL encoding for query string values
//!
//! Encodes text the way `application/x-www-form-urlencoded` decoders expect:
//! ASCII letters and digits pass through, space becomes `+`, and every other
//! byte becomes `%XX` with uppercase hex digits.

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-encodes `input` for use as a query string value.
///
/// The input is processed byte by byte, so multi-byte UTF-8 characters are
/// encoded as one `%XX` escape per byte.
///
/// # Example
/// ```
/// use auto_timezone::utils::urlencode::urlencode;
///
/// assert_eq!(urlencode("Asia/Jerusalem"), "Asia%2FJerusalem");
/// assert_eq!(urlencode("a b"), "a+b");
/// ```
pub fn urlencode(input: &str) -> String {
    urlencode_bytes(input.as_bytes())
}

/// Percent-encodes a raw byte sequence. See [`urlencode`].
pub fn urlencode_bytes(input: &[u8]) -> String {
    let mut encoded = String::with_capacity(encoded_len(input));
    for &byte in input {
        if byte.is_ascii_alphanumeric() {
            encoded.push(char::from(byte));
        } else if byte == b' ' {
            encoded.push('+');
        } else {
            encoded.push('%');
            encoded.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
            encoded.push(char::from(HEX_DIGITS[usize::from(byte & 0x0F)]));
        }
    }
    encoded
}

/// Length of the encoded form of `input`, in bytes.
pub fn encoded_len(input: &[u8]) -> usize {
    input
        .iter()
        .map(|&b| if b.is_ascii_alphanumeric() || b == b' ' { 1 } else { 3 })
        .sum()
}

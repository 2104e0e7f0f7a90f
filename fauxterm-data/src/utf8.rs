//! Lenient UTF-8 decoding, one codepoint at a time.
//!
//! Malformed input never aborts decoding. Each malformed sequence yields
//! exactly one [`REPLACEMENT`] codepoint and decoding resumes after it:
//!
//! | Lead byte  | Problem                                  | Advance |
//! |------------|------------------------------------------|---------|
//! | `80..=BF`  | stray continuation byte                  | 1       |
//! | `C0..=F7`  | truncated, or bad continuation byte      | 1       |
//! | `C0..=DF`  | overlong (below U+0080)                  | 2       |
//! | `E0..=EF`  | overlong (below U+0800) or surrogate     | 3       |
//! | `F0..=F7`  | overlong (below U+10000) or above U+10FFFF | 4     |
//! | `F8..=FF`  | invalid lead byte                        | 1       |

/// U+FFFD, substituted for every malformed sequence.
pub const REPLACEMENT: u32 = 0xFFFD;

/// Decodes the codepoint at the start of `bytes`.
///
/// Returns the codepoint and the number of bytes consumed, or `None` if
/// `bytes` is empty.
#[must_use]
pub fn decode(bytes: &[u8]) -> Option<(u32, usize)> {
    let &lead = bytes.first()?;

    let (len, min, initial) = match lead {
        0x00..=0x7f => return Some((u32::from(lead), 1)),
        0xc0..=0xdf => (2, 0x80, u32::from(lead & 0x1f)),
        0xe0..=0xef => (3, 0x800, u32::from(lead & 0x0f)),
        0xf0..=0xf7 => (4, 0x1_0000, u32::from(lead & 0x07)),
        // stray continuation or invalid lead
        _ => return Some((REPLACEMENT, 1)),
    };

    let Some(tail) = bytes.get(1..len) else {
        return Some((REPLACEMENT, 1));
    };
    if tail.iter().any(|&b| b & 0xc0 != 0x80) {
        return Some((REPLACEMENT, 1));
    }

    let codepoint = tail
        .iter()
        .fold(initial, |acc, &b| (acc << 6) | u32::from(b & 0x3f));

    let valid = codepoint >= min
        && codepoint <= 0x10_ffff
        && !(0xd800..=0xdfff).contains(&codepoint);

    Some((if valid { codepoint } else { REPLACEMENT }, len))
}

/// Iterator over the codepoints of a byte string, decoded leniently.
#[derive(Debug, Clone)]
pub struct Codepoints<'a> {
    bytes: &'a [u8],
}

impl<'a> Codepoints<'a> {
    /// Creates an iterator over `bytes`.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
}

impl Iterator for Codepoints<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let (codepoint, advance) = decode(self.bytes)?;
        self.bytes = &self.bytes[advance..];
        Some(codepoint)
    }
}

/// Decodes every codepoint of `bytes`.
#[must_use]
pub fn codepoints(bytes: &[u8]) -> Codepoints<'_> {
    Codepoints::new(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_text_round_trips() {
        let text = "a\u{e9}\u{263a}\u{1f600}~";
        let decoded: Vec<u32> = codepoints(text.as_bytes()).collect();
        let expected: Vec<u32> = text.chars().map(u32::from).collect();
        assert_eq!(decoded, expected);

        let reencoded: String = decoded.iter().filter_map(|&cp| char::from_u32(cp)).collect();
        assert_eq!(reencoded, text);
    }

    #[test]
    fn test_sequence_lengths() {
        assert_eq!(decode(b"A"), Some((0x41, 1)));
        assert_eq!(decode("\u{e9}".as_bytes()), Some((0xe9, 2)));
        assert_eq!(decode("\u{263a}".as_bytes()), Some((0x263a, 3)));
        assert_eq!(decode("\u{1f600}".as_bytes()), Some((0x1f600, 4)));
        assert_eq!(decode(b""), None);
    }

    #[test]
    fn test_stray_continuation_advances_one() {
        assert_eq!(decode(&[0x80, b'a']), Some((REPLACEMENT, 1)));
        assert_eq!(decode(&[0xbf]), Some((REPLACEMENT, 1)));
    }

    #[test]
    fn test_invalid_lead_advances_one() {
        for lead in 0xf8..=0xff_u8 {
            assert_eq!(decode(&[lead, 0x80, 0x80, 0x80]), Some((REPLACEMENT, 1)));
        }
    }

    #[test]
    fn test_truncated_sequence_advances_one() {
        assert_eq!(decode(&[0xc3]), Some((REPLACEMENT, 1)));
        assert_eq!(decode(&[0xe2, 0x98]), Some((REPLACEMENT, 1)));
        assert_eq!(decode(&[0xf0, 0x9f, 0x98]), Some((REPLACEMENT, 1)));
    }

    #[test]
    fn test_bad_continuation_advances_one() {
        assert_eq!(decode(&[0xc3, b'a']), Some((REPLACEMENT, 1)));
        assert_eq!(decode(&[0xe2, 0x98, b'a']), Some((REPLACEMENT, 1)));
    }

    #[test]
    fn test_overlong_and_out_of_range_advance_full_length() {
        // overlong '/' in two bytes
        assert_eq!(decode(&[0xc0, 0xaf]), Some((REPLACEMENT, 2)));
        // overlong in three bytes
        assert_eq!(decode(&[0xe0, 0x80, 0xaf]), Some((REPLACEMENT, 3)));
        // UTF-16 surrogate U+D800
        assert_eq!(decode(&[0xed, 0xa0, 0x80]), Some((REPLACEMENT, 3)));
        // overlong in four bytes
        assert_eq!(decode(&[0xf0, 0x80, 0x80, 0xaf]), Some((REPLACEMENT, 4)));
        // U+110000
        assert_eq!(decode(&[0xf4, 0x90, 0x80, 0x80]), Some((REPLACEMENT, 4)));
    }

    #[test]
    fn test_one_replacement_per_malformed_lead() {
        let bytes = [b'a', 0xc3, b'b', 0x80, 0xff, b'c'];
        let decoded: Vec<u32> = codepoints(&bytes).collect();
        assert_eq!(
            decoded,
            vec![0x61, REPLACEMENT, 0x62, REPLACEMENT, REPLACEMENT, 0x63]
        );
    }
}

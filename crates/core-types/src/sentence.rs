use serde::{Deserialize, Serialize};

/// Start-of-message delimiter.
pub const SOM: u8 = b'$';

const CHECKSUM_MARKER: u8 = b'*';

/// A candidate sentence cut out of the byte stream.
///
/// Bytes run from the `$` through the terminator, exactly as they arrived.
/// Nothing has been validated beyond the framing itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sentence {
    /// The raw bytes, SOM and terminator included.
    pub bytes: Vec<u8>,
    /// Timestamp in microseconds of the chunk in which the SOM arrived.
    pub timestamp_us: u64,
}

/// Outcome of comparing a sentence's `*HH` suffix with its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecksumStatus {
    /// No `*` marker present.
    Absent,
    Valid,
    Mismatch { expected: u8, computed: u8 },
    /// A `*` marker followed by something other than two hex digits.
    Malformed,
}

impl Sentence {
    pub fn new(bytes: Vec<u8>, timestamp_us: u64) -> Self {
        Self { bytes, timestamp_us }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The sentence as text, if it is valid UTF-8 (NMEA is ASCII).
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    /// The sentence without its trailing CRLF / LF.
    pub fn body(&self) -> &[u8] {
        let bytes = self.bytes.as_slice();
        let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
        bytes.strip_suffix(b"\r").unwrap_or(bytes)
    }

    /// XOR of every byte between the `$` and the `*` (or the end of the body).
    pub fn computed_checksum(&self) -> u8 {
        let body = self.body();
        let body = body.strip_prefix(&[SOM]).unwrap_or(body);
        let end = body
            .iter()
            .rposition(|&b| b == CHECKSUM_MARKER)
            .unwrap_or(body.len());
        body[..end].iter().fold(0u8, |acc, &b| acc ^ b)
    }

    pub fn checksum_status(&self) -> ChecksumStatus {
        let body = self.body();
        let Some(marker) = body.iter().rposition(|&b| b == CHECKSUM_MARKER) else {
            return ChecksumStatus::Absent;
        };
        let suffix = &body[marker + 1..];
        let [hi, lo] = suffix else {
            return ChecksumStatus::Malformed;
        };
        let (Some(hi), Some(lo)) = (hex_digit(*hi), hex_digit(*lo)) else {
            return ChecksumStatus::Malformed;
        };
        let expected = (hi << 4) | lo;
        let computed = self.computed_checksum();
        if expected == computed {
            ChecksumStatus::Valid
        } else {
            ChecksumStatus::Mismatch { expected, computed }
        }
    }
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

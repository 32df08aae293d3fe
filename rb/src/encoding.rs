//! Text encodings accepted by file reads

use std::str::FromStr;
use thiserror::Error;

/// A text decoding scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
    /// ISO-8859-1: every byte maps to the code point of the same value
    Latin1,
    /// UTF-16 with byte order taken from a BOM, little-endian without one
    Utf16,
    Utf16Le,
    Utf16Be,
}

/// Returned when an encoding label is not recognised
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported encoding '{0}'. Supported: utf-8, ascii, latin-1, utf-16, utf-16le, utf-16be")]
pub struct UnsupportedEncoding(pub String);

impl Encoding {
    /// Canonical label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Ascii => "ascii",
            Self::Latin1 => "latin-1",
            Self::Utf16 => "utf-16",
            Self::Utf16Le => "utf-16le",
            Self::Utf16Be => "utf-16be",
        }
    }

    /// Strictly decode `bytes`; `None` when they are not valid in this encoding
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
            Self::Ascii => bytes.is_ascii().then(|| bytes.iter().map(|&b| b as char).collect()),
            Self::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
            Self::Utf16 => match bytes {
                [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
                [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
                _ => decode_utf16(bytes, u16::from_le_bytes),
            },
            Self::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            Self::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]])).collect();
    String::from_utf16(&units).ok()
}

impl FromStr for Encoding {
    type Err = UnsupportedEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "ascii" | "us-ascii" => Ok(Self::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" | "l1" => Ok(Self::Latin1),
            "utf-16" | "utf16" => Ok(Self::Utf16),
            "utf-16le" | "utf-16-le" | "utf16le" => Ok(Self::Utf16Le),
            "utf-16be" | "utf-16-be" | "utf16be" => Ok(Self::Utf16Be),
            _ => Err(UnsupportedEncoding(s.to_string())),
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!("utf-8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("UTF8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("ISO-8859-1".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert_eq!("latin_1".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert_eq!("utf-16be".parse::<Encoding>().unwrap(), Encoding::Utf16Be);
    }

    #[test]
    fn test_parse_unknown_label() {
        let err = "shift-jis".parse::<Encoding>().unwrap_err();
        assert!(err.to_string().contains("shift-jis"));
    }

    #[test]
    fn test_utf8_rejects_latin1_bytes() {
        // "café" in latin-1
        let bytes = [0x63, 0x61, 0x66, 0xE9];
        assert!(Encoding::Utf8.decode(&bytes).is_none());
        assert_eq!(Encoding::Latin1.decode(&bytes).as_deref(), Some("café"));
    }

    #[test]
    fn test_ascii_is_strict() {
        assert_eq!(Encoding::Ascii.decode(b"plain").as_deref(), Some("plain"));
        assert!(Encoding::Ascii.decode(&[0x80]).is_none());
    }

    #[test]
    fn test_utf16_bom_sniffing() {
        let le = [0xFF, 0xFE, b'h', 0x00, b'i', 0x00];
        let be = [0xFE, 0xFF, 0x00, b'h', 0x00, b'i'];
        assert_eq!(Encoding::Utf16.decode(&le).as_deref(), Some("hi"));
        assert_eq!(Encoding::Utf16.decode(&be).as_deref(), Some("hi"));
        assert!(Encoding::Utf16Le.decode(&[0x00]).is_none());
    }

    #[test]
    fn test_display_round_trips_label() {
        for encoding in [Encoding::Utf8, Encoding::Latin1, Encoding::Utf16Be] {
            assert_eq!(encoding.to_string().parse::<Encoding>().unwrap(), encoding);
        }
    }
}

//! Human-readable data sizes.
//!
//! Used for the `--max-size` limit on stdin and relay responses. Units are
//! binary multiples: `1kb` is 1024 bytes.

use std::fmt;
use std::str::FromStr;

use crate::PasteError;

/// A number of bytes, parsed from strings like `500mb`, `1 KB` or `12megabytes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteSize(u64);

impl ByteSize {
    /// One byte.
    pub const B: ByteSize = ByteSize(1);
    /// One kibibyte.
    pub const KB: ByteSize = ByteSize(1 << 10);
    /// One mebibyte.
    pub const MB: ByteSize = ByteSize(1 << 20);
    /// One gibibyte.
    pub const GB: ByteSize = ByteSize(1 << 30);
    /// One tebibyte.
    pub const TB: ByteSize = ByteSize(1 << 40);
    /// One pebibyte.
    pub const PB: ByteSize = ByteSize(1 << 50);
    /// One exbibyte.
    pub const EB: ByteSize = ByteSize(1 << 60);

    /// Create a size from a raw byte count.
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Number of bytes.
    pub const fn bytes(self) -> u64 {
        self.0
    }

    fn unit_multiplier(unit: &str) -> Option<u64> {
        let multiplier = match unit.to_ascii_lowercase().as_str() {
            "" | "b" | "byte" | "bytes" => Self::B,
            "k" | "kb" | "kilo" | "kilobyte" | "kilobytes" => Self::KB,
            "m" | "mb" | "mega" | "megabyte" | "megabytes" => Self::MB,
            "g" | "gb" | "giga" | "gigabyte" | "gigabytes" => Self::GB,
            "t" | "tb" | "tera" | "terabyte" | "terabytes" => Self::TB,
            "p" | "pb" | "peta" | "petabyte" | "petabytes" => Self::PB,
            "e" | "eb" | "exa" | "exabyte" | "exabytes" => Self::EB,
            _ => return None,
        };
        Some(multiplier.0)
    }
}

/// `Mb`, `Kb`: an uppercase prefix followed by a lowercase `b` means bits.
fn is_bit_unit(unit: &str) -> bool {
    let bytes = unit.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_uppercase() && bytes[1] == b'b'
}

impl FromStr for ByteSize {
    type Err = PasteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| PasteError::InvalidByteSize {
            input: s.to_string(),
            reason,
        };

        let trimmed = s.trim();
        let digits_end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if digits_end == 0 {
            return Err(invalid("invalid syntax"));
        }

        let value: u64 = trimmed[..digits_end]
            .parse()
            .map_err(|_| invalid("value too large"))?;

        let unit = trimmed[digits_end..].trim_start();
        if is_bit_unit(unit) {
            return Err(invalid("bits are not supported, use bytes"));
        }
        let multiplier = Self::unit_multiplier(unit).ok_or_else(|| invalid("invalid syntax"))?;

        value
            .checked_mul(multiplier)
            .map(ByteSize)
            .ok_or_else(|| invalid("value too large"))
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: [(ByteSize, &str); 6] = [
            (ByteSize::EB, "EB"),
            (ByteSize::PB, "PB"),
            (ByteSize::TB, "TB"),
            (ByteSize::GB, "GB"),
            (ByteSize::MB, "MB"),
            (ByteSize::KB, "KB"),
        ];

        if self.0 != 0 {
            for (unit, suffix) in UNITS {
                if self.0 % unit.0 == 0 {
                    return write!(f, "{}{}", self.0 / unit.0, suffix);
                }
            }
        }
        write!(f, "{}B", self.0)
    }
}

//! Bit-string rendering of reports
//!
//! Most significant bit first: the `width`-bit value `0b0110` renders as
//! `"0110"` and character `j` is bit `width - 1 - j`.

use crate::error::BitStringError;

/// Widest value that can be rendered
pub const MAX_WIDTH: usize = 32;

/// Render `value` as exactly `width` binary digits, most significant first
pub fn format_bits(value: u32, width: usize) -> Result<String, BitStringError> {
    if width > MAX_WIDTH {
        return Err(BitStringError::WidthTooLarge {
            width,
            max: MAX_WIDTH,
        });
    }
    if width < MAX_WIDTH && value >> width != 0 {
        return Err(BitStringError::ValueOutOfRange { value, width });
    }

    Ok((0..width)
        .rev()
        .map(|bit| if value & (1u32 << bit) != 0 { '1' } else { '0' })
        .collect())
}

/// Parse a string produced by `format_bits` with the same `width`
pub fn parse_bits(bits: &str, width: usize) -> Result<u32, BitStringError> {
    if width > MAX_WIDTH {
        return Err(BitStringError::WidthTooLarge {
            width,
            max: MAX_WIDTH,
        });
    }
    let actual = bits.chars().count();
    if actual != width {
        return Err(BitStringError::LengthMismatch {
            expected: width,
            actual,
        });
    }

    bits.chars()
        .enumerate()
        .try_fold(0u32, |acc, (position, digit)| match digit {
            '0' => Ok(acc << 1),
            '1' => Ok((acc << 1) | 1),
            _ => Err(BitStringError::InvalidDigit { digit, position }),
        })
}

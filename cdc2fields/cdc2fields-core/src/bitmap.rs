//! Hexadecimal bitmap expansion and wire byte-order normalization.

use crate::error::ResolveError;

/// Marker carried by every bitmap string on the wire.
pub(crate) const HEX_PREFIX: &str = "0x";

/// 4-bit expansion of one hexadecimal digit, most significant bit first.
fn hex_digit_bits(digit: char) -> Option<&'static str> {
    let bits = match digit.to_ascii_uppercase() {
        '0' => "0000",
        '1' => "0001",
        '2' => "0010",
        '3' => "0011",
        '4' => "0100",
        '5' => "0101",
        '6' => "0110",
        '7' => "0111",
        '8' => "1000",
        '9' => "1001",
        'A' => "1010",
        'B' => "1011",
        'C' => "1100",
        'D' => "1101",
        'E' => "1110",
        'F' => "1111",
        _ => return None,
    };
    Some(bits)
}

/// Reverse a bit string at 8-bit chunk granularity, leaving the bits
/// inside each chunk untouched.
///
/// Bitmap bytes arrive in reverse order relative to field-index order,
/// while bit order within each byte already matches. The reversal is its
/// own inverse.
fn reverse_bytes(bits: &str) -> String {
    bits.as_bytes()
        .chunks(8)
        .rev()
        .flatten()
        .map(|&b| char::from(b))
        .collect()
}

/// Decode a `0x`-prefixed hexadecimal bitmap into its set bit positions,
/// in ascending order.
///
/// Position *i* names index *i* of whatever field list the bitmap
/// targets; the caller supplies that list.
pub fn decode_bitmap(hex: &str) -> Result<Vec<usize>, ResolveError> {
    let digits = hex
        .strip_prefix(HEX_PREFIX)
        .ok_or_else(|| malformed(hex, "missing 0x prefix"))?;

    let mut bits = String::with_capacity(digits.len() * 4);
    for digit in digits.chars() {
        let chunk = hex_digit_bits(digit)
            .ok_or_else(|| malformed(hex, format!("invalid hex digit '{digit}'")))?;
        bits.push_str(chunk);
    }
    if bits.len() % 8 != 0 {
        return Err(malformed(hex, "bitmap is not a whole number of bytes"));
    }

    let bits = reverse_bytes(&bits);
    Ok(bits
        .bytes()
        .enumerate()
        .filter(|&(_, b)| b == b'1')
        .map(|(i, _)| i)
        .collect())
}

fn malformed(token: &str, detail: impl Into<String>) -> ResolveError {
    ResolveError::MalformedToken {
        token: token.to_string(),
        detail: detail.into(),
    }
}

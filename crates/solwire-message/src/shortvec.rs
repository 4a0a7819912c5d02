//! The compact length encoding used for every list prefix in the wire
//! format ("compact-u16" / ShortVec).
//!
//! Base-128, little-endian: each byte carries 7 data bits, the high bit
//! flags a continuation. List lengths and account counts never exceed
//! `u16::MAX` in practice, but the codec itself places no value ceiling.

use crate::error::MessageError;

/// Encode a value in compact form.
///
/// - `0..=0x7f`       -> 1 byte
/// - `0x80..=0x3fff`  -> 2 bytes
/// - `0x4000..=0xffff` -> 3 bytes, and so on
pub fn encode(value: u64) -> Vec<u8> {
    let mut val = value;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Number of bytes `encode` produces for `value`.
pub fn encoded_len(value: u64) -> usize {
    let mut val = value;
    let mut len = 1;
    while val >= 0x80 {
        val >>= 7;
        len += 1;
    }
    len
}

/// Decode a compact value from the front of `data`.
///
/// Returns `(value, bytes_consumed)`. A buffer that ends mid-varint is a
/// decode error, as is any encoding whose value does not fit a `u64`.
pub fn decode(data: &[u8]) -> Result<(u64, usize), MessageError> {
    let mut value: u64 = 0;
    let mut consumed = 0usize;

    loop {
        let byte = *data.get(consumed).ok_or_else(|| {
            MessageError::Decode("unexpected end of data while decoding compact length".into())
        })?;
        let bits = u64::from(byte & 0x7f);
        // Nine full bytes carry 63 bits; the tenth may only contribute
        // bit 63. Anything more would shift data past the top of a u64.
        if consumed >= 10 || (consumed == 9 && bits > 1) {
            return Err(MessageError::Decode(
                "compact length overflows u64".into(),
            ));
        }

        value |= bits << (7 * consumed as u32);
        consumed += 1;

        if byte & 0x80 == 0 {
            return Ok((value, consumed));
        }
    }
}

//! Big-endian byte plumbing shared by the AIFF/ADPCM/sound-bank crates:
//! offset-based cursor reads over a `&[u8]`, length-prefixed Pascal
//! strings, and 80-bit IEEE extended float conversion for AIFF sample
//! rates.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Cursor, Read};

/// Rounds `size` up to the next multiple of `alignment`.
pub fn align(size: usize, alignment: usize) -> usize {
    (size + alignment - 1) & !(alignment - 1)
}

/// A forward-only cursor over a byte slice that never errors on a short
/// read: bytes past the end of `data` read back as zero. ROM chunk sizes
/// are sometimes padded past the real payload, and the original tool
/// relies on reading into a destination that was already zeroed.
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek_to(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Copies `count` bytes starting at the cursor into `out`, zero-filling
    /// any portion that runs past the end of the underlying buffer.
    pub fn read_bytes(&mut self, out: &mut [u8]) {
        let available = self.remaining().min(out.len());
        out[..available].copy_from_slice(&self.data[self.pos..self.pos + available]);
        for b in &mut out[available..] {
            *b = 0;
        }
        self.pos += available;
    }

    pub fn read_u8(&mut self) -> u8 {
        let mut buf = [0u8; 1];
        self.read_bytes(&mut buf);
        buf[0]
    }

    pub fn read_u16(&mut self) -> u16 {
        let mut buf = [0u8; 2];
        self.read_bytes(&mut buf);
        u16::from_be_bytes(buf)
    }

    pub fn read_i16(&mut self) -> i16 {
        self.read_u16() as i16
    }

    pub fn read_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.read_bytes(&mut buf);
        u32::from_be_bytes(buf)
    }

    pub fn read_i32(&mut self) -> i32 {
        self.read_u32() as i32
    }

    pub fn read_vec(&mut self, count: usize) -> Vec<u8> {
        let mut out = vec![0u8; count];
        self.read_bytes(&mut out);
        out
    }
}

/// Reads a big-endian `u32` out of a `Read` stream (ordinary I/O errors
/// propagate, unlike [`ByteCursor`]'s zero-fill behavior over ROM slices).
pub fn read_u32_be<R: Read>(reader: &mut R) -> io::Result<u32> {
    reader.read_u32::<BigEndian>()
}

/// Reads a big-endian `u16` out of a `Read` stream.
pub fn read_u16_be<R: Read>(reader: &mut R) -> io::Result<u16> {
    reader.read_u16::<BigEndian>()
}

/// Builds a length-prefixed Pascal string: one length byte, the ASCII
/// bytes, and (only when the string length is even) a trailing NUL pad
/// byte so the section that follows starts on an even boundary.
pub fn pstring(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.push(bytes.len() as u8);
    out.extend_from_slice(bytes);
    if bytes.len() % 2 == 0 {
        out.push(0);
    }
    out
}

/// Reads a Pascal string written by [`pstring`] back out of `cursor`.
pub fn read_pstring(cursor: &mut ByteCursor<'_>) -> String {
    let len = cursor.read_u8() as usize;
    let bytes = cursor.read_vec(len);
    if len % 2 == 0 {
        cursor.read_u8();
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Serializes `num` as a 10-byte 80-bit IEEE extended float, the format
/// AIFF's `COMM.sampleRate` field uses. Zero (either sign) serializes to
/// an all-zero mantissa/exponent with only the sign bit set.
pub fn serialize_f80(num: f64) -> [u8; 10] {
    let mut result = [0u8; 10];
    let bits = num.to_bits();
    let sign_bit = bits & (1u64 << 63);

    if num == 0.0 {
        if sign_bit != 0 {
            result[0] = 0x80;
        }
        return result;
    }

    let exponent = ((bits & 0x7FF0_0000_0000_0000) >> 52) as i64 - 1023;
    let mantissa = bits & 0x000F_FFFF_FFFF_FFFF;

    let sign_exponent = ((sign_bit >> 48) as u16) | ((exponent + 0x3FFF) as u16);
    let f80_mantissa = (1u64 << 63) | (mantissa << (63 - 52));

    result[0] = (sign_exponent >> 8) as u8;
    result[1] = (sign_exponent & 0xFF) as u8;
    for i in 0..8 {
        result[2 + i] = ((f80_mantissa >> (56 - 8 * i)) & 0xFF) as u8;
    }
    result
}

/// Recovers the `f64` a [`serialize_f80`] byte sequence encodes.
pub fn parse_f80(bytes: &[u8; 10]) -> f64 {
    let sign_exponent = u16::from_be_bytes([bytes[0], bytes[1]]);
    let sign_bit = (sign_exponent & 0x8000) as u64;
    let mut mantissa = 0u64;
    for i in 0..8 {
        mantissa = (mantissa << 8) | bytes[2 + i] as u64;
    }

    if sign_exponent & 0x7FFF == 0 && mantissa == 0 {
        return if sign_bit != 0 { -0.0 } else { 0.0 };
    }

    let exponent = (sign_exponent & 0x7FFF) as i64 - 0x3FFF;
    let frac = (mantissa & 0x7FFF_FFFF_FFFF_FFFF) >> (63 - 52);
    let f64_bits = (sign_bit << 48) | (((exponent + 1023) as u64) << 52) | frac;
    f64::from_bits(f64_bits)
}

/// Writes a big-endian `u32` to any `Write`r.
pub fn write_u32_be<W: io::Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_u32::<BigEndian>(value)
}

/// Writes a big-endian `u16` to any `Write`r.
pub fn write_u16_be<W: io::Write>(writer: &mut W, value: u16) -> io::Result<()> {
    writer.write_u16::<BigEndian>(value)
}

/// Wraps an in-memory byte slice in a standard `Read + Seek` cursor, for
/// callers that want `byteorder`'s stream-based API instead of
/// [`ByteCursor`]'s offset-based one.
pub fn reader_of(data: &[u8]) -> Cursor<&[u8]> {
    Cursor::new(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_rounds_up_to_multiple() {
        assert_eq!(align(0, 16), 0);
        assert_eq!(align(1, 16), 16);
        assert_eq!(align(16, 16), 16);
        assert_eq!(align(17, 16), 32);
        assert_eq!(align(5, 4), 8);
    }

    #[test]
    fn pstring_pads_even_length_names() {
        assert_eq!(pstring("end"), vec![3, b'e', b'n', b'd']);
        assert_eq!(pstring("start"), vec![5, b's', b't', b'a', b'r', b't']);
        assert_eq!(pstring("hi"), vec![2, b'h', b'i', 0]);
    }

    #[test]
    fn cursor_zero_fills_past_end() {
        let data = [1u8, 2, 3];
        let mut cursor = ByteCursor::new(&data);
        let mut out = [0u8; 5];
        cursor.read_bytes(&mut out);
        assert_eq!(out, [1, 2, 3, 0, 0]);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn f80_roundtrips_common_sample_rates() {
        for rate in [32000.0_f64, 48000.0, 80000.0, 16000.0, 22050.5] {
            let bytes = serialize_f80(rate);
            assert_eq!(parse_f80(&bytes), rate);
        }
    }

    #[test]
    fn f80_zero_is_all_zero_bytes() {
        assert_eq!(serialize_f80(0.0), [0u8; 10]);
    }
}

//! The `vlq` module implements the variable-length quantity that MIDI files use for delta-times
//! and for meta and sysex payload lengths: big-endian groups of seven bits, where every byte
//! except the last has its high bit set. The encoding grammar could carry 35 bits over five
//! bytes, but the format's semantic ceiling is 32 bits, so values are `u32` here and anything
//! larger is rejected.

use std::convert::TryFrom;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A value that can be written in the variable-length form. The `u32` representation guarantees
/// the value is encodable in at most five bytes; use [`TryFrom<u64>`] when starting from a wider
/// integer.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct Vlq {
    value: u32,
}

impl Vlq {
    pub fn new(value: u32) -> Self {
        Self { value }
    }

    pub fn get(&self) -> u32 {
        self.value
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        encode_u32(self.value)
    }
}

impl TryFrom<u64> for Vlq {
    type Error = VlqError;

    fn try_from(value: u64) -> std::result::Result<Self, Self::Error> {
        Ok(u32::try_from(value).map_err(|_| VlqError::Overflow)?.into())
    }
}

impl From<u32> for Vlq {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Vlq> for u32 {
    fn from(vlq: Vlq) -> u32 {
        vlq.value
    }
}

impl From<Vlq> for u64 {
    fn from(vlq: Vlq) -> u64 {
        vlq.value.into()
    }
}

/// The ways a variable-length value can be malformed.
#[derive(Debug, Eq, PartialEq)]
pub enum VlqError {
    /// More than five bytes were given.
    TooLong,
    /// A byte before the last one has its continuation bit clear.
    EarlyTerminator,
    /// The last byte still has its continuation bit set.
    IncompleteNumber,
    /// The decoded value does not fit in 32 bits.
    Overflow,
}

impl Display for VlqError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            VlqError::TooLong => "more than five bytes",
            VlqError::EarlyTerminator => "a non-final byte is missing its continuation bit",
            VlqError::IncompleteNumber => "the final byte still has its continuation bit set",
            VlqError::Overflow => "the value does not fit in 32 bits",
        };
        write!(f, "{}", msg)
    }
}

impl Error for VlqError {}

/// 0x7f, 127: The largest 7 bit number.
const MAX_7BIT: u8 = 0b0111_1111;

/// 0x80, 128: The continuation bit. Set on every byte of a sequence except the last.
pub(crate) const CONTINUE: u8 = 0b1000_0000;

/// Encode a value using the minimum number of bytes, between one (values through 127) and five
/// (values of 2^28 and above).
pub fn encode_u32(mut value: u32) -> Vec<u8> {
    if value == 0 {
        return vec![0];
    }
    let mut result = Vec::new();
    while value > 0 {
        let mut v = (value & u32::from(MAX_7BIT)) as u8;
        // the low-order group is pushed first and gets no continuation bit; the
        // reverse below puts the groups in big-endian order
        if !result.is_empty() {
            v |= CONTINUE;
        }
        result.push(v);
        value >>= 7;
    }
    result.reverse();
    result
}

/// Decode a complete variable-length value. The slice must hold exactly one well-formed value:
/// at most five bytes, continuation bits on every byte but the last, and a decoded value that
/// fits in 32 bits.
pub fn decode_slice(bytes: &[u8]) -> std::result::Result<u32, VlqError> {
    if bytes.is_empty() {
        return Err(VlqError::IncompleteNumber);
    }
    if bytes.len() > 5 {
        return Err(VlqError::TooLong);
    }
    let last = bytes.len() - 1;
    let mut result: u32 = 0;
    for (i, b) in bytes.iter().enumerate() {
        if i < last && b & CONTINUE == 0 {
            return Err(VlqError::EarlyTerminator);
        }
        if i == last && b & CONTINUE != 0 {
            return Err(VlqError::IncompleteNumber);
        }
        if i > 0 {
            // bits that would shift past bit 32 mean the value cannot fit
            if (result.rotate_left(7)) & 0x7F > 0 {
                return Err(VlqError::Overflow);
            }
            result <<= 7;
        }
        result |= u32::from(b & MAX_7BIT);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test(vlq_bytes: &[u8], value: u32) {
        let encoded = encode_u32(value);
        assert_eq!(vlq_bytes, &encoded);
        let decoded = decode_slice(&encoded).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn one_byte() {
        test(&[0x00], 0x00);
        test(&[0x40], 0x40);
        test(&[0x7f], 0x7f);
    }

    #[test]
    fn two_bytes() {
        test(&[0x81, 0x00], 0x80);
        test(&[0xc0, 0x00], 0x2000);
        test(&[0xff, 0x7f], 0x3fff);
    }

    #[test]
    fn three_bytes() {
        test(&[0x81, 0x80, 0x00], 0x4000);
        test(&[0xc0, 0x80, 0x00], 0x10_0000);
        test(&[0xff, 0xff, 0x7f], 0x1f_ffff);
    }

    #[test]
    fn four_bytes() {
        test(&[0x81, 0x80, 0x80, 0x00], 0x20_0000);
        test(&[0xc0, 0x80, 0x80, 0x00], 0x0800_0000);
        test(&[0xff, 0xff, 0xff, 0x7f], 0x0fff_ffff);
    }

    #[test]
    fn five_bytes() {
        test(&[0x81, 0x80, 0x80, 0x80, 0x00], 0x1000_0000);
        test(&[0x8f, 0xf8, 0x80, 0x80, 0x00], 0xff00_0000);
        test(&[0x8f, 0xff, 0xff, 0xff, 0x7f], 0xffff_ffff);
    }

    #[test]
    fn byte_count_bands() {
        assert_eq!(1, encode_u32(0).len());
        assert_eq!(1, encode_u32(127).len());
        assert_eq!(2, encode_u32(128).len());
        assert_eq!(2, encode_u32(16383).len());
        assert_eq!(3, encode_u32(16384).len());
        assert_eq!(3, encode_u32(2_097_151).len());
        assert_eq!(4, encode_u32(2_097_152).len());
        assert_eq!(4, encode_u32(268_435_455).len());
        assert_eq!(5, encode_u32(268_435_456).len());
        assert_eq!(5, encode_u32(u32::MAX).len());
    }

    #[test]
    fn round_trip_boundaries() {
        let boundaries = [
            0,
            127,
            128,
            16_383,
            16_384,
            2_097_151,
            2_097_152,
            268_435_455,
            268_435_456,
            u32::MAX,
        ];
        for value in boundaries {
            assert_eq!(value, decode_slice(&encode_u32(value)).unwrap());
        }
    }

    fn error_test(vlq_bytes: &[u8], x: VlqError) {
        let result = decode_slice(vlq_bytes);
        let e = result.err().unwrap();
        assert_eq!(x, e);
    }

    #[test]
    fn incomplete_0xff() {
        error_test(&[0xff], VlqError::IncompleteNumber);
    }

    #[test]
    fn incomplete_0x80() {
        error_test(&[0x80], VlqError::IncompleteNumber);
    }

    #[test]
    fn empty_input() {
        error_test(&[], VlqError::IncompleteNumber);
    }

    #[test]
    fn six_bytes() {
        error_test(&[0x81, 0x80, 0x80, 0x80, 0x80, 0x00], VlqError::TooLong);
    }

    #[test]
    fn early_terminator() {
        error_test(&[0x00, 0x7f], VlqError::EarlyTerminator);
    }

    #[test]
    fn overflow_u32() {
        error_test(&[0xff, 0xff, 0xff, 0xff, 0x7f], VlqError::Overflow);
    }

    #[test]
    fn vlq_from_u64() {
        let vlq = Vlq::try_from(0xffff_ffffu64).unwrap();
        assert_eq!(u32::MAX, vlq.get());
        let err = Vlq::try_from(0x1_0000_0000u64).err().unwrap();
        assert_eq!(VlqError::Overflow, err);
    }
}

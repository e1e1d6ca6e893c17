//! The `byte_iter` module provides the streaming cursor that all parsing reads from. It works
//! over any [`Read`] impl, tracks the byte position for error messages, offers one byte of
//! lookahead for status-byte dispatch, and can impose a size limit so that a track chunk cannot
//! read past its declared length.

use crate::core::vlq::{decode_slice, VlqError, CONTINUE};
use crate::error::{FileOpenSnafu, IoSnafu, LibResult, MalformedVlvSnafu, TruncatedInputSnafu};
use log::trace;
use snafu::{OptionExt, ResultExt};
use std::fs::File;
use std::io::{BufReader, Bytes, ErrorKind, Read};
use std::path::Path;
use std::str::from_utf8;

const BYTE_SIZE: usize = 8;
const KB: usize = BYTE_SIZE * 1024;
const MB: usize = KB * 1024;

pub(crate) struct ByteIter<R: Read> {
    iter: Bytes<R>,
    /// The number of bytes consumed so far, which is also the offset of the next byte.
    position: u64,
    /// One byte of lookahead. `None` means the input is exhausted.
    peek: Option<u8>,
    /// When set, reads behave as if the input ended at this position.
    position_limit: Option<u64>,
}

impl ByteIter<BufReader<File>> {
    pub(crate) fn new_file<P: AsRef<Path>>(path: P) -> LibResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).context(FileOpenSnafu {
            site: site!(),
            path,
        })?;
        let buf = BufReader::with_capacity(MB, f);
        Self::new(buf.bytes())
    }
}

impl<R: Read> ByteIter<R> {
    pub(crate) fn new(mut iter: Bytes<R>) -> LibResult<Self> {
        let peek = Self::next_impl(&mut iter, 0)?;
        Ok(Self {
            iter,
            position: 0,
            peek,
            position_limit: None,
        })
    }

    fn next_impl(iter: &mut Bytes<R>, position: u64) -> LibResult<Option<u8>> {
        match iter.next() {
            None => Ok(None),
            Some(result) => match result {
                Ok(val) => Ok(Some(val)),
                Err(ref e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
                Err(e) => Err(e).context(IoSnafu { position }),
            },
        }
    }

    /// Read a single byte and advance the iter. `None` at the end of the input or when the size
    /// limit has been reached.
    pub(crate) fn read(&mut self) -> LibResult<Option<u8>> {
        if let Some(limit) = self.position_limit {
            if self.position >= limit {
                return Ok(None);
            }
        }
        let return_val = match self.peek {
            None => return Ok(None),
            Some(val) => val,
        };
        self.position += 1;
        self.peek = Self::next_impl(&mut self.iter, self.position)?;
        trace!("read {:#x} at position {}", return_val, self.position - 1);
        Ok(Some(return_val))
    }

    pub(crate) fn read_or_die(&mut self) -> LibResult<u8> {
        self.read()?.context(TruncatedInputSnafu {
            position: self.position,
        })
    }

    pub(crate) fn read2(&mut self) -> LibResult<[u8; 2]> {
        let mut retval = [0u8; 2];
        retval[0] = self.read_or_die()?;
        retval[1] = self.read_or_die()?;
        Ok(retval)
    }

    pub(crate) fn read4(&mut self) -> LibResult<[u8; 4]> {
        let mut retval = [0u8; 4];
        for slot in retval.iter_mut() {
            *slot = self.read_or_die()?;
        }
        Ok(retval)
    }

    pub(crate) fn read_u16(&mut self) -> LibResult<u16> {
        let bytes = self.read2()?;
        Ok(u16::from_be_bytes(bytes))
    }

    pub(crate) fn read_u32(&mut self) -> LibResult<u32> {
        let bytes = self.read4()?;
        Ok(u32::from_be_bytes(bytes))
    }

    pub(crate) fn read_n(&mut self, num_bytes: usize) -> LibResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(num_bytes);
        for _ in 0..num_bytes {
            bytes.push(self.read_or_die()?)
        }
        debug_assert_eq!(num_bytes, bytes.len());
        Ok(bytes)
    }

    pub(crate) fn read_vlq_bytes(&mut self) -> LibResult<Vec<u8>> {
        let mut retval = Vec::new();
        // initialize with the continue bit set
        let mut current_byte = CONTINUE;
        while current_byte & CONTINUE == CONTINUE {
            if retval.len() >= 5 {
                return Err(VlqError::TooLong).context(MalformedVlvSnafu { site: site!() });
            }
            current_byte = self.read_or_die()?;
            retval.push(current_byte);
        }
        Ok(retval)
    }

    pub(crate) fn read_vlq_u32(&mut self) -> LibResult<u32> {
        let bytes = self.read_vlq_bytes()?;
        let decoded = decode_slice(&bytes).context(MalformedVlvSnafu { site: site!() })?;
        trace!("decoded vlq value {} from {} bytes", decoded, bytes.len());
        Ok(decoded)
    }

    /// The number of bytes consumed so far.
    pub(crate) fn position(&self) -> u64 {
        self.position
    }

    /// Get the next value without advancing the iterator.
    pub(crate) fn peek_or_die(&self) -> LibResult<u8> {
        self.peek.context(TruncatedInputSnafu {
            position: self.position,
        })
    }

    pub(crate) fn is_end(&self) -> bool {
        if let Some(limit) = self.position_limit {
            debug_assert!(self.position <= limit);
            if self.position >= limit {
                return true;
            }
        }
        self.peek.is_none()
    }

    /// Read a 4-byte chunk tag and check it against the expected value.
    pub(crate) fn expect_tag(&mut self, expected_tag: &str) -> LibResult<()> {
        let position = self.position;
        let tag_bytes = self.read4()?;
        let found = from_utf8(&tag_bytes).unwrap_or("????");
        if expected_tag != found {
            malformed_header!(
                "expected tag '{}' but found '{}' ({:02X?}) at position {}",
                expected_tag,
                found,
                tag_bytes,
                position
            );
        }
        Ok(())
    }

    /// When this is set, the ByteIter will report that it is at the end when `size` bytes have
    /// been read.
    pub(crate) fn set_size_limit(&mut self, size: u64) {
        self.position_limit = Some(self.position + size)
    }

    pub(crate) fn clear_size_limit(&mut self) {
        self.position_limit = None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Cursor;

    #[test]
    fn byte_iter_test() {
        let bytes = [0x00u8, 0x01, 0x02, 0x03, 0x04, 0x10, 0x20, 0x30, 0x40];
        let cursor = Cursor::new(bytes);
        let mut iter = ByteIter::new(cursor.bytes()).unwrap();
        assert_eq!(0, iter.position);
        assert_eq!(0x00, iter.read().unwrap().unwrap());
        assert_eq!(0x01, iter.peek_or_die().unwrap());
        assert_eq!([0x01, 0x02], iter.read2().unwrap());
        assert_eq!(3, iter.position);
        iter.set_size_limit(2);
        assert!(!iter.is_end());
        assert_eq!(0x03, iter.read().unwrap().unwrap());
        assert_eq!(0x04, iter.read().unwrap().unwrap());
        assert!(iter.is_end());
        assert!(iter.read().unwrap().is_none());
        iter.clear_size_limit();
        assert_eq!(0x10, iter.read().unwrap().unwrap());
    }

    #[test]
    fn vlq_stream_test() {
        let bytes = [0x81u8, 0x48, 0x7F];
        let cursor = Cursor::new(bytes);
        let mut iter = ByteIter::new(cursor.bytes()).unwrap();
        assert_eq!(200, iter.read_vlq_u32().unwrap());
        assert_eq!(127, iter.read_vlq_u32().unwrap());
        assert!(iter.is_end());
    }

    #[test]
    fn vlq_stream_truncated_test() {
        // continuation bit set on the last available byte
        let bytes = [0x81u8, 0x80];
        let cursor = Cursor::new(bytes);
        let mut iter = ByteIter::new(cursor.bytes()).unwrap();
        let err = iter.read_vlq_u32().err().unwrap();
        assert!(matches!(err, Error::TruncatedInput { .. }));
    }

    #[test]
    fn vlq_stream_too_long_test() {
        let bytes = [0xFFu8, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F];
        let cursor = Cursor::new(bytes);
        let mut iter = ByteIter::new(cursor.bytes()).unwrap();
        let err = iter.read_vlq_u32().err().unwrap();
        assert!(matches!(err, Error::MalformedVlv { .. }));
    }

    #[test]
    fn expect_tag_test() {
        let cursor = Cursor::new(b"MThd\x00".to_vec());
        let mut iter = ByteIter::new(cursor.bytes()).unwrap();
        iter.expect_tag("MThd").unwrap();
        let cursor = Cursor::new(b"XYZW\x00".to_vec());
        let mut iter = ByteIter::new(cursor.bytes()).unwrap();
        let err = iter.expect_tag("MThd").err().unwrap();
        assert!(matches!(err, Error::MalformedHeader { .. }));
    }
}

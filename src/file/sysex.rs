use crate::byte_iter::ByteIter;
use crate::error::LibResult;
use crate::file::meta_event::write_data;
use snafu::ResultExt;
use std::fmt::{Display, Formatter};
use std::io::{Read, Write};

/// A system-exclusive message, or one chunk of one. On disk a sysex message starts with an `F0`
/// event whose payload customarily ends with the terminal byte `0xF7`. A payload that does *not*
/// end in `0xF7` announces that the message continues in one or more `F7` events, possibly with
/// unrelated events and delta times in between. Each chunk is stored as its own `SysexEvent`;
/// [`first_chunk`][Self::first_chunk] tells an `F0` chunk from an `F7` continuation.
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct SysexEvent {
    data: Vec<u8>,
    first_chunk: bool,
}

impl SysexEvent {
    /// Creates a standalone sysex message, that is, an `F0` chunk. The terminal `0xF7` byte is
    /// part of `data` and is not added for you.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            first_chunk: true,
        }
    }

    /// Creates an `F7` continuation chunk.
    pub fn continuation(data: Vec<u8>) -> Self {
        Self {
            data,
            first_chunk: false,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }

    /// `true` for an `F0` chunk, `false` for an `F7` continuation.
    pub fn first_chunk(&self) -> bool {
        self.first_chunk
    }

    pub(crate) fn parse<R: Read>(
        iter: &mut ByteIter<R>,
        sysex_ongoing: &mut bool,
    ) -> LibResult<Self> {
        let status = iter.read_or_die()?;
        debug_assert!(status == 0xf0 || status == 0xf7);
        let length = iter.read_vlq_u32()?;
        let data = iter.read_n(length as usize)?;
        // a chunk that does not end with the terminal byte continues in a later F7 event
        *sysex_ongoing = data.last() != Some(&0xf7);
        Ok(Self {
            data,
            first_chunk: status == 0xf0,
        })
    }

    pub(crate) fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        write_u8!(w, if self.first_chunk { 0xf0u8 } else { 0xf7u8 })?;
        write_data(w, &self.data)
    }
}

impl Display for SysexEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sysex {} bytes ({})",
            self.data.len(),
            if self.first_chunk { "start" } else { "continuation" }
        )
    }
}

/// An "escape" event: an `F7` event outside of any sysex continuation chain. Its payload is sent
/// to the output verbatim, allowing a file to carry bytes the format has no other encoding for,
/// such as real-time messages.
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct EscapeEvent {
    data: Vec<u8>,
}

impl EscapeEvent {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }

    pub(crate) fn parse<R: Read>(iter: &mut ByteIter<R>) -> LibResult<Self> {
        let status = iter.read_or_die()?;
        debug_assert_eq!(0xf7, status);
        let length = iter.read_vlq_u32()?;
        let data = iter.read_n(length as usize)?;
        Ok(Self { data })
    }

    pub(crate) fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        write_u8!(w, 0xf7)?;
        write_data(w, &self.data)
    }
}

impl Display for EscapeEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Escape {} bytes", self.data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn sysex_single_chunk_test() {
        let bytes: Vec<u8> = vec![0xf0, 0x04, 0x41, 0x01, 0x02, 0xf7];
        let mut iter = ByteIter::new(Cursor::new(bytes).bytes()).unwrap();
        let mut ongoing = false;
        let event = SysexEvent::parse(&mut iter, &mut ongoing).unwrap();
        assert!(event.first_chunk());
        assert_eq!(&[0x41, 0x01, 0x02, 0xf7], event.data());
        assert!(!ongoing);
    }

    #[test]
    fn sysex_split_chunk_test() {
        let bytes: Vec<u8> = vec![0xf0, 0x03, 0x43, 0x12, 0x00];
        let mut iter = ByteIter::new(Cursor::new(bytes).bytes()).unwrap();
        let mut ongoing = false;
        let event = SysexEvent::parse(&mut iter, &mut ongoing).unwrap();
        assert!(event.first_chunk());
        assert!(ongoing);
        let bytes: Vec<u8> = vec![0xf7, 0x02, 0x43, 0xf7];
        let mut iter = ByteIter::new(Cursor::new(bytes).bytes()).unwrap();
        let event = SysexEvent::parse(&mut iter, &mut ongoing).unwrap();
        assert!(!event.first_chunk());
        assert!(!ongoing);
    }

    #[test]
    fn sysex_write_test() {
        let mut bytes = Vec::new();
        SysexEvent::new(vec![0x41, 0xf7]).write(&mut bytes).unwrap();
        assert_eq!(vec![0xf0, 0x02, 0x41, 0xf7], bytes);
        let mut bytes = Vec::new();
        SysexEvent::continuation(vec![0x01, 0xf7])
            .write(&mut bytes)
            .unwrap();
        assert_eq!(vec![0xf7, 0x02, 0x01, 0xf7], bytes);
    }

    #[test]
    fn escape_test() {
        let bytes: Vec<u8> = vec![0xf7, 0x02, 0xf8, 0xf8];
        let mut iter = ByteIter::new(Cursor::new(bytes).bytes()).unwrap();
        let event = EscapeEvent::parse(&mut iter).unwrap();
        assert_eq!(&[0xf8, 0xf8], event.data());
        let mut written = Vec::new();
        event.write(&mut written).unwrap();
        assert_eq!(vec![0xf7, 0x02, 0xf8, 0xf8], written);
    }
}

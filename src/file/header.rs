use crate::byte_iter::ByteIter;
use crate::error::LibResult;
use crate::file::Division;
use snafu::ResultExt;
use std::io::{Read, Write};

/// The header chunk's format word. Type 2 (sequentially independent patterns) is rejected when
/// loading, and files are always written as [`Format::Multi`], so this type never reaches the
/// public API.
#[repr(u16)]
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub(crate) enum Format {
    /// `0`: the file contains a single multi-channel track.
    Single = 0,
    /// `1`: the file contains one or more simultaneous tracks of a sequence.
    #[default]
    Multi = 1,
}

impl Format {
    fn from_u16(value: u16) -> LibResult<Self> {
        match value {
            0 => Ok(Format::Single),
            1 => Ok(Format::Multi),
            2 => malformed_header!("type 2 (sequential pattern) files are not supported"),
            _ => malformed_header!("unknown file format {}", value),
        }
    }
}

/// Reads and validates the `MThd` chunk. Returns the format, the declared number of track chunks
/// and the time division.
pub(crate) fn parse<R: Read>(iter: &mut ByteIter<R>) -> LibResult<(Format, u16, Division)> {
    iter.expect_tag("MThd")?;
    let chunk_length = iter.read_u32()?;
    if chunk_length != 6 {
        malformed_header!("expected header chunk length 6, got {}", chunk_length);
    }
    let format = Format::from_u16(iter.read_u16()?)?;
    let num_tracks = iter.read_u16()?;
    let division = Division::from_u16(iter.read_u16()?)?;
    Ok((format, num_tracks, division))
}

/// Writes the `MThd` chunk. The format word is always `1`; a file loaded from a type 0 file is
/// saved as type 1.
pub(crate) fn write<W: Write>(w: &mut W, num_tracks: u16, division: Division) -> LibResult<()> {
    w.write_all(b"MThd").context(wr!())?;
    w.write_all(&6u32.to_be_bytes()).context(wr!())?;
    w.write_all(&(Format::Multi as u16).to_be_bytes())
        .context(wr!())?;
    w.write_all(&num_tracks.to_be_bytes()).context(wr!())?;
    division.write(w)?;
    Ok(())
}

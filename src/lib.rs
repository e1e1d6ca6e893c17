//! This crate reads, edits and writes Standard MIDI Files, format 0 and format 1. Format 2
//! files are rejected, and so are SMPTE time divisions.
//!
//! Events are stored with absolute tick positions instead of the file's relative delta times,
//! so they can be moved, removed and sorted freely; delta times are recomputed when the file is
//! written. A format 0 file is demultiplexed into one track per MIDI channel when it is loaded,
//! and every file is written as format 1.
//!
//! ```
//! use midi_smf::core::{Channel, NoteNumber, Velocity};
//! use midi_smf::file::{Division, Track};
//! use midi_smf::MidiFile;
//!
//! let mut track = Track::default();
//! track.push_note_on(0, Channel::new(0), NoteNumber::new(60), Velocity::new(100));
//! track.push_note_off(1024, Channel::new(0), NoteNumber::new(60), Velocity::new(72));
//!
//! let mut file = MidiFile::new(Division::new(1024));
//! file.push_track(track);
//!
//! let mut bytes = Vec::new();
//! file.write(&mut bytes).unwrap();
//! let reloaded = MidiFile::read(bytes.as_slice()).unwrap();
//! assert_eq!(file, reloaded);
//! ```

#[macro_use]
mod error;
#[macro_use]
mod macros;

mod byte_iter;
pub mod core;
pub mod file;
mod text;
mod visit;

pub use crate::error::{Error, Result};
pub use crate::text::Text;
pub use crate::visit::Visitor;

use crate::byte_iter::ByteIter;
use crate::error::{FileCreateSnafu, LibResult, TickOverflowSnafu, TooManyTracksSnafu};
use crate::file::header::{self, Format};
use crate::file::{parse_format0, Division, Track};
use log::trace;
use snafu::{ensure, ResultExt};
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// An in-memory Standard MIDI File: a time division and some tracks.
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct MidiFile {
    division: Division,
    tracks: Vec<Track>,
}

impl MidiFile {
    /// Creates an empty file with the given time division.
    pub fn new(division: Division) -> Self {
        Self {
            division,
            tracks: Vec::new(),
        }
    }

    /// Reads a MIDI file from anything that implements [`Read`], such as a byte slice.
    pub fn read<R: Read>(r: R) -> Result<Self> {
        let iter = ByteIter::new(r.bytes())?;
        Self::read_inner(iter)
    }

    /// Reads a MIDI file from a path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read_inner(ByteIter::new_file(path)?)
    }

    /// Writes the file to anything that implements [`Write`]. The format word is always written
    /// as `1` and running status is never used, so the output is a canonical re-encoding rather
    /// than a byte-for-byte copy of whatever was loaded.
    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        let num_tracks =
            u16::try_from(self.tracks.len()).context(TooManyTracksSnafu { site: site!() })?;
        header::write(w, num_tracks, self.division)?;
        for (index, track) in self.tracks.iter().enumerate() {
            trace!("writing track {} of {}", index, num_tracks);
            track.write(w, index)?;
        }
        Ok(())
    }

    /// Writes the file to a path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).context(FileCreateSnafu {
            site: site!(),
            path,
        })?;
        let mut w = BufWriter::new(file);
        self.write(&mut w)?;
        w.flush().context(wr!())?;
        Ok(())
    }

    /// The number of ticks per quarter note.
    pub fn division(&self) -> Division {
        self.division
    }

    pub fn tracks_len(&self) -> usize {
        self.tracks.len()
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn tracks_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.tracks.iter_mut()
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn track_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    pub fn push_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Remove and return the track at `index`, or `None` if the index is out of range.
    pub fn remove_track(&mut self, index: usize) -> Option<Track> {
        if index < self.tracks.len() {
            Some(self.tracks.remove(index))
        } else {
            None
        }
    }

    /// Sorts the events of every track by tick. See [`Track::sort_events`].
    pub fn sort_events(&mut self) {
        for track in self.tracks.iter_mut() {
            track.sort_events();
        }
    }

    /// Changes the ticks-per-quarter value and rescales every event's tick position so that its
    /// musical time is preserved, rounding down. A division with the SMPTE bit set or a zero
    /// value is rejected just as it would be when loading. Fails with [`Error::TickOverflow`]
    /// if any rescaled tick would not fit in 32 bits, in which case nothing is modified.
    pub fn convert_time_division(&mut self, division: u16) -> Result<()> {
        let new = Division::from_u16(division)?;
        let old = self.division;
        if new == old {
            return Ok(());
        }
        // rescaling is monotonic, so if the largest tick survives they all do. checking it up
        // front means a failure leaves the file untouched.
        let max_tick = self
            .tracks
            .iter()
            .flat_map(|track| track.events())
            .map(|event| event.tick())
            .max()
            .unwrap_or(0);
        let rescaled = u64::from(max_tick) * u64::from(new.get()) / u64::from(old.get());
        ensure!(
            rescaled <= u64::from(u32::MAX),
            TickOverflowSnafu {
                site: site!(),
                tick: rescaled,
            }
        );
        for track in self.tracks.iter_mut() {
            for event in track.events_mut() {
                let tick = u64::from(event.tick()) * u64::from(new.get()) / u64::from(old.get());
                event.set_tick(tick as u32);
            }
        }
        self.division = new;
        Ok(())
    }

    fn read_inner<R: Read>(mut iter: ByteIter<R>) -> LibResult<Self> {
        trace!("parsing header chunk");
        let (format, num_tracks, division) = header::parse(&mut iter)?;
        let tracks = match format {
            Format::Single => {
                if num_tracks != 1 {
                    malformed_header!(
                        "a type 0 file must declare exactly 1 track, found {}",
                        num_tracks
                    );
                }
                parse_format0(&mut iter)?
            }
            Format::Multi => {
                let mut tracks = Vec::with_capacity(usize::from(num_tracks));
                for track in 0..num_tracks {
                    trace!("parsing track chunk {} of {}", track, num_tracks);
                    tracks.push(Track::parse(&mut iter, usize::from(track))?);
                }
                tracks
            }
        };
        Ok(Self { division, tracks })
    }
}

impl Display for MidiFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "division {} ticks per quarter, {} tracks",
            self.division,
            self.tracks.len()
        )?;
        for (index, track) in self.tracks.iter().enumerate() {
            writeln!(f, "track {}:", index)?;
            Display::fmt(track, f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_file_test() {
        let bytes: Vec<u8> = vec![
            0x4d, 0x54, 0x68, 0x64, // MThd
            0x00, 0x00, 0x00, 0x06, // chunk length 6
            0x00, 0x01, // format 1
            0x00, 0x01, // one track
            0x00, 0x60, // division 96
            0x4d, 0x54, 0x72, 0x6b, // MTrk
            0x00, 0x00, 0x00, 0x04, // chunk length 4
            0x00, 0xff, 0x2f, 0x00, // end of track
        ];
        let file = MidiFile::read(bytes.as_slice()).unwrap();
        assert_eq!(96, file.division().get());
        assert_eq!(1, file.tracks_len());
        assert!(file.track(0).unwrap().is_empty());
    }

    #[test]
    fn too_many_tracks_test() {
        let mut file = MidiFile::default();
        for _ in 0..=u32::from(u16::MAX) {
            file.push_track(Track::default());
        }
        let mut bytes = Vec::new();
        let err = file.write(&mut bytes).err().unwrap();
        assert!(matches!(err, Error::TooManyTracks { .. }));
    }

    #[test]
    fn display_test() {
        let mut file = MidiFile::default();
        let mut track = Track::default();
        track.push_lyric(7, "la");
        file.push_track(track);
        let text = format!("{}", file);
        assert!(text.contains("track 0:"));
        assert!(text.contains("Lyric \"la\""));
    }
}

use crate::byte_iter::ByteIter;
use crate::core::{Channel, Message, NoteNumber, Velocity};
use crate::error::{
    Error, LibResult, TrackLengthMismatchSnafu, TrackTooLongSnafu, UnsortedEventsSnafu,
};
use crate::file::event::ParseState;
use crate::file::{Event, MetaEvent, MicrosecondsPerQuarter, TrackEvent};
use crate::Text;
use log::{debug, trace};
use snafu::{OptionExt, ResultExt};
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::io::{Read, Write};

/// A format 0 file multiplexes this many channels into its single chunk.
const CHANNEL_TRACKS: usize = 16;

/// A zero delta time followed by the end-of-track meta event. Every track on disk ends with
/// these four bytes; the writer appends them itself.
const TRACK_TERMINATOR: [u8; 4] = [0x00, 0xff, 0x2f, 0x00];

/// An ordered sequence of events. The order is the playback order and events are expected to be
/// sorted by tick; pushing out of order is allowed, but the track must be sorted (see
/// [`Track::sort_events`]) before it can be written.
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct Track {
    events: Vec<TrackEvent>,
}

impl Track {
    /// Returns `true` if the track has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The number of events in the track.
    pub fn events_len(&self) -> usize {
        self.events.len()
    }

    /// Iterator over the events in the track.
    pub fn events(&self) -> impl Iterator<Item = &TrackEvent> {
        self.events.iter()
    }

    /// Iterator over the events in the track, allowing each event to be changed in place.
    pub fn events_mut(&mut self) -> impl Iterator<Item = &mut TrackEvent> {
        self.events.iter_mut()
    }

    /// Add an event at the end, at an absolute tick position.
    pub fn push_event(&mut self, tick: u32, event: Event) {
        self.events.push(TrackEvent::new(tick, event));
    }

    /// Add a note on message. A velocity of zero becomes a note off.
    pub fn push_note_on(
        &mut self,
        tick: u32,
        channel: Channel,
        note_number: NoteNumber,
        velocity: Velocity,
    ) {
        let message = Message::note_on(channel, note_number, velocity);
        self.push_event(tick, Event::Midi(message));
    }

    /// Add a note off message.
    pub fn push_note_off(
        &mut self,
        tick: u32,
        channel: Channel,
        note_number: NoteNumber,
        velocity: Velocity,
    ) {
        let message = Message::note_off(channel, note_number, velocity);
        self.push_event(tick, Event::Midi(message));
    }

    /// Add a lyric.
    pub fn push_lyric<S: Into<String>>(&mut self, tick: u32, lyric: S) {
        self.push_event(tick, Event::Meta(MetaEvent::Lyric(Text::new(lyric))));
    }

    /// Add a tempo change.
    pub fn push_tempo(&mut self, tick: u32, tempo: MicrosecondsPerQuarter) {
        self.push_event(tick, Event::Meta(MetaEvent::SetTempo(tempo)));
    }

    /// Keep only the events for which `predicate` returns `true`.
    pub fn retain<F: FnMut(&TrackEvent) -> bool>(&mut self, predicate: F) {
        self.events.retain(predicate);
    }

    /// Remove and return the event at `index`, or `None` if the index is out of range.
    pub fn remove_event(&mut self, index: usize) -> Option<TrackEvent> {
        if index < self.events.len() {
            Some(self.events.remove(index))
        } else {
            None
        }
    }

    /// Sort the events by tick. The sort is stable, so events at the same tick keep their
    /// relative order.
    pub fn sort_events(&mut self) {
        self.events.sort_by_key(|event| event.tick());
    }

    pub(crate) fn parse<R: Read>(iter: &mut ByteIter<R>, track: usize) -> LibResult<Self> {
        Ok(Self {
            events: parse_chunk(iter, track)?,
        })
    }

    pub(crate) fn write<W: Write>(&self, w: &mut W, track: usize) -> LibResult<()> {
        // build the event bytes in memory so the chunk length is known up front. stored
        // end-of-track events are skipped, the canonical marker is appended below.
        let mut data: Vec<u8> = Vec::new();
        let mut previous = 0u32;
        for event in self.events.iter().filter(|event| !event.is_end()) {
            let delta = event
                .tick()
                .checked_sub(previous)
                .context(UnsortedEventsSnafu {
                    site: site!(),
                    track,
                    tick: event.tick(),
                    previous,
                })?;
            event.write(&mut data, delta)?;
            previous = event.tick();
        }
        data.extend_from_slice(&TRACK_TERMINATOR);
        let length = u32::try_from(data.len()).context(TrackTooLongSnafu { site: site!() })?;
        w.write_all(b"MTrk").context(wr!())?;
        w.write_all(&length.to_be_bytes()).context(wr!())?;
        w.write_all(&data).context(wr!())?;
        Ok(())
    }
}

impl Display for Track {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "{}", event)?;
        }
        Ok(())
    }
}

/// Reads one MTrk chunk. The declared chunk length is imposed as a read limit, and the bytes
/// consumed when the end-of-track marker arrives must equal it exactly.
fn parse_chunk<R: Read>(iter: &mut ByteIter<R>, track: usize) -> LibResult<Vec<TrackEvent>> {
    iter.expect_tag("MTrk")?;
    let declared = iter.read_u32()?;
    let start = iter.position();
    let boundary = start + u64::from(declared);
    iter.set_size_limit(u64::from(declared));
    let mut events = Vec::new();
    let mut state = ParseState::default();
    loop {
        if iter.is_end() {
            return TrackLengthMismatchSnafu {
                site: site!(),
                track,
                description: format!(
                    "the declared length {} was consumed with no end-of-track marker",
                    declared
                ),
            }
            .fail();
        }
        match TrackEvent::parse(iter, &mut state) {
            Ok(Some(event)) => {
                trace!("parsed {:?}", event);
                events.push(event);
            }
            Ok(None) => break,
            Err(Error::TruncatedInput { position }) if position == boundary => {
                return TrackLengthMismatchSnafu {
                    site: site!(),
                    track,
                    description: format!("an event runs past the declared length {}", declared),
                }
                .fail()
            }
            Err(e) => return Err(e),
        }
    }
    iter.clear_size_limit();
    let consumed = iter.position() - start;
    if consumed != u64::from(declared) {
        return TrackLengthMismatchSnafu {
            site: site!(),
            track,
            description: format!(
                "the end-of-track marker came after {} of {} declared bytes",
                consumed, declared
            ),
        }
        .fail();
    }
    debug!("parsed track {} with {} events", track, events.len());
    Ok(events)
}

/// Reads the single chunk of a format 0 file and splits it into sixteen tracks, one per MIDI
/// channel. Channel messages go to the track matching their channel. Meta events go to the
/// track named by the most recent channel prefix, initially track 0, except that tempo changes,
/// sysex and escape events always land in track 0.
pub(crate) fn parse_format0<R: Read>(iter: &mut ByteIter<R>) -> LibResult<Vec<Track>> {
    let events = parse_chunk(iter, 0)?;
    let mut tracks: Vec<Track> = (0..CHANNEL_TRACKS).map(|_| Track::default()).collect();
    let mut router = ChannelRouter::default();
    for event in events {
        let destination = router.route(event.event());
        tracks[destination].events.push(event);
    }
    Ok(tracks)
}

/// The routing state for demultiplexing a format 0 chunk: the index of the track currently
/// receiving meta events.
#[derive(Debug, Default)]
struct ChannelRouter {
    meta_track: usize,
}

impl ChannelRouter {
    fn route(&mut self, event: &Event) -> usize {
        match event {
            Event::Midi(message) => usize::from(message.channel().get()),
            Event::Meta(MetaEvent::ChannelPrefix(channel)) => {
                self.meta_track = usize::from(channel.get());
                self.meta_track
            }
            Event::Meta(MetaEvent::SetTempo(_)) | Event::Sysex(_) | Event::Escape(_) => 0,
            Event::Meta(_) => self.meta_track,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn track_iter(bytes: Vec<u8>) -> ByteIter<Cursor<Vec<u8>>> {
        ByteIter::new(Cursor::new(bytes).bytes()).unwrap()
    }

    fn chunk(declared: u8) -> Vec<u8> {
        let mut bytes = b"MTrk".to_vec();
        bytes.extend_from_slice(&u32::from(declared).to_be_bytes());
        bytes.extend_from_slice(&[
            0x00, 0x92, 0x45, 0x64, // note on, channel 2
            0x83, 0x00, // delta 384
            0x82, 0x45, 0x40, // note off
            0x00, 0xff, 0x2f, 0x00, // end of track
        ]);
        bytes
    }

    #[test]
    fn parse_track_test() {
        let mut iter = track_iter(chunk(13));
        let track = Track::parse(&mut iter, 0).unwrap();
        assert_eq!(2, track.events_len());
        let mut events = track.events();
        let first = events.next().unwrap();
        assert_eq!(0, first.tick());
        assert!(matches!(first.event(), Event::Midi(Message::NoteOn(_))));
        let second = events.next().unwrap();
        assert_eq!(384, second.tick());
        assert!(matches!(second.event(), Event::Midi(Message::NoteOff(_))));
    }

    #[test]
    fn declared_length_too_long_test() {
        let mut iter = track_iter(chunk(14));
        let err = Track::parse(&mut iter, 3).err().unwrap();
        assert!(matches!(err, Error::TrackLengthMismatch { track: 3, .. }));
    }

    #[test]
    fn declared_length_too_short_test() {
        // the boundary falls between events
        let mut iter = track_iter(chunk(4));
        let err = Track::parse(&mut iter, 0).err().unwrap();
        assert!(matches!(err, Error::TrackLengthMismatch { .. }));
        // the boundary falls in the middle of an event
        let mut iter = track_iter(chunk(3));
        let err = Track::parse(&mut iter, 0).err().unwrap();
        assert!(matches!(err, Error::TrackLengthMismatch { .. }));
    }

    #[test]
    fn write_track_test() {
        let mut track = Track::default();
        track.push_note_on(0, Channel::new(2), NoteNumber::new(0x45), Velocity::new(0x64));
        track.push_note_off(384, Channel::new(2), NoteNumber::new(0x45), Velocity::new(0x40));
        let mut bytes = Vec::new();
        track.write(&mut bytes, 0).unwrap();
        assert_eq!(chunk(13), bytes);
    }

    #[test]
    fn stored_end_of_track_skipped_test() {
        let mut track = Track::default();
        track.push_event(0, Event::Meta(MetaEvent::EndOfTrack));
        track.push_note_on(0, Channel::new(2), NoteNumber::new(0x45), Velocity::new(0x64));
        let mut bytes = Vec::new();
        track.write(&mut bytes, 0).unwrap();
        let expected: Vec<u8> = vec![
            b'M', b'T', b'r', b'k', 0x00, 0x00, 0x00, 0x08, // chunk header
            0x00, 0x92, 0x45, 0x64, // the note
            0x00, 0xff, 0x2f, 0x00, // the canonical marker
        ];
        assert_eq!(expected, bytes);
    }

    #[test]
    fn unsorted_events_test() {
        let mut track = Track::default();
        track.push_lyric(100, "la");
        track.push_lyric(50, "lo");
        let mut bytes = Vec::new();
        let err = track.write(&mut bytes, 7).err().unwrap();
        assert!(matches!(
            err,
            Error::UnsortedEvents {
                track: 7,
                tick: 50,
                previous: 100,
                ..
            }
        ));
        track.sort_events();
        let mut bytes = Vec::new();
        track.write(&mut bytes, 7).unwrap();
    }

    #[test]
    fn format0_routing_test() {
        let data: Vec<u8> = vec![
            0x00, 0xff, 0x20, 0x01, 0x03, // channel prefix 3
            0x00, 0xff, 0x01, 0x02, b'h', b'i', // text, follows the prefix
            0x00, 0xff, 0x51, 0x03, 0x07, 0xa1, 0x20, // tempo, always track 0
            0x00, 0x95, 0x3c, 0x64, // note on, channel 5
            0x00, 0xff, 0x2f, 0x00,
        ];
        let mut bytes = b"MTrk".to_vec();
        bytes.extend_from_slice(&(data.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&data);
        let mut iter = track_iter(bytes);
        let tracks = parse_format0(&mut iter).unwrap();
        assert_eq!(16, tracks.len());
        assert_eq!(1, tracks[0].events_len());
        assert!(matches!(
            tracks[0].events().next().unwrap().event(),
            Event::Meta(MetaEvent::SetTempo(_))
        ));
        assert_eq!(2, tracks[3].events_len());
        assert!(matches!(
            tracks[3].events().nth(1).unwrap().event(),
            Event::Meta(MetaEvent::Text(_))
        ));
        assert_eq!(1, tracks[5].events_len());
        assert!(matches!(
            tracks[5].events().next().unwrap().event(),
            Event::Midi(Message::NoteOn(_))
        ));
    }

    #[test]
    fn remove_and_retain_test() {
        let mut track = Track::default();
        track.push_lyric(0, "a");
        track.push_lyric(10, "b");
        track.push_lyric(20, "c");
        let removed = track.remove_event(1).unwrap();
        assert_eq!(10, removed.tick());
        assert!(track.remove_event(5).is_none());
        track.retain(|event| event.tick() == 0);
        assert_eq!(1, track.events_len());
    }
}

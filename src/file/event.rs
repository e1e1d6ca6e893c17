use crate::byte_iter::ByteIter;
use crate::core::vlq::Vlq;
use crate::core::Message;
use crate::error::{LibResult, TickOverflowSnafu, UnsupportedStatusSnafu};
use crate::file::{EscapeEvent, MetaEvent, SysexEvent};
use log::trace;
use snafu::{OptionExt, ResultExt};
use std::fmt::{Display, Formatter};
use std::io::{Read, Write};

/// `0xFF`: meta events begin with FF, then a type byte which is always less than 128.
const STATUS_META: u8 = 0xff;

/// `0xF0`: the first chunk of a sysex message, `F0 <length> <bytes>`.
const STATUS_SYSEX_START: u8 = 0xf0;

/// `0xF7`: a sysex continuation chunk, or an escape event when no sysex chain is open.
const STATUS_SYSEX_CONTINUE: u8 = 0xf7;

/// Everything that can happen in a track: a channel message, a meta event, or a sysex/escape
/// blob. The end-of-track marker is the one thing that never appears here; the parser consumes
/// it as a stop signal and the writer appends its own.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum Event {
    /// A MIDI channel message such as a note or a control change.
    Midi(Message),
    /// A meta event such as a tempo, a lyric or a key signature.
    Meta(MetaEvent),
    /// A system-exclusive message or one chunk of one.
    Sysex(SysexEvent),
    /// An escape event, `F7` outside of any sysex chain.
    Escape(EscapeEvent),
}

impl Default for Event {
    fn default() -> Self {
        Event::Midi(Message::default())
    }
}

impl Event {
    /// Parses the event found at the iterator's current position. `None` means the end-of-track
    /// marker was consumed and the track is finished.
    fn parse<R: Read>(iter: &mut ByteIter<R>, state: &mut ParseState) -> LibResult<Option<Self>> {
        let status_byte = iter.peek_or_die()?;
        match status_byte {
            STATUS_META => {
                trace!("peeked {:#04x}, a meta event", status_byte);
                match MetaEvent::parse(iter)? {
                    MetaEvent::EndOfTrack => Ok(None),
                    meta => Ok(Some(Event::Meta(meta))),
                }
            }
            STATUS_SYSEX_START => Ok(Some(Event::Sysex(SysexEvent::parse(
                iter,
                &mut state.sysex_ongoing,
            )?))),
            STATUS_SYSEX_CONTINUE => {
                if state.sysex_ongoing {
                    Ok(Some(Event::Sysex(SysexEvent::parse(
                        iter,
                        &mut state.sysex_ongoing,
                    )?)))
                } else {
                    Ok(Some(Event::Escape(EscapeEvent::parse(iter)?)))
                }
            }
            0xf1..=0xf6 | 0xf8..=0xfe => UnsupportedStatusSnafu {
                site: site!(),
                status: status_byte,
            }
            .fail(),
            _ => Ok(Some(Event::Midi(Message::parse(
                iter,
                &mut state.running_status,
            )?))),
        }
    }

    pub(crate) fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        match self {
            Event::Midi(message) => message.write(w),
            Event::Meta(meta) => meta.write(w),
            Event::Sysex(sysex) => sysex.write(w),
            Event::Escape(escape) => escape.write(w),
        }
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Midi(message) => Display::fmt(message, f),
            Event::Meta(meta) => Display::fmt(meta, f),
            Event::Sysex(sysex) => Display::fmt(sysex, f),
            Event::Escape(escape) => Display::fmt(escape, f),
        }
    }
}

/// The mutable state a track's event loop threads through the parser: the running status byte
/// (`None` until the first channel message), whether an unterminated sysex chain is open, and
/// the tick position accumulated from delta times.
#[derive(Debug, Default)]
pub(crate) struct ParseState {
    running_status: Option<u8>,
    sysex_ongoing: bool,
    tick: u32,
}

/// An event and its position in the track, measured in absolute ticks from the start of the
/// track. On disk events carry relative delta times; the parser accumulates them and the writer
/// recomputes them, so in memory every event sits at an absolute position and can be moved,
/// removed or sorted without touching its neighbors.
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct TrackEvent {
    tick: u32,
    event: Event,
}

impl TrackEvent {
    pub fn new(tick: u32, event: Event) -> Self {
        Self { tick, event }
    }

    /// The absolute tick position, in the file's time division.
    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn set_tick(&mut self, tick: u32) {
        self.tick = tick;
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn event_mut(&mut self) -> &mut Event {
        &mut self.event
    }

    /// Returns `true` for a stored [`MetaEvent::EndOfTrack`]. The writer skips these and appends
    /// its own canonical marker.
    pub(crate) fn is_end(&self) -> bool {
        matches!(&self.event, Event::Meta(MetaEvent::EndOfTrack))
    }

    /// Parses a delta time and an event. `None` means the end-of-track marker was found.
    pub(crate) fn parse<R: Read>(
        iter: &mut ByteIter<R>,
        state: &mut ParseState,
    ) -> LibResult<Option<Self>> {
        let delta = iter.read_vlq_u32()?;
        trace!("delta {}", delta);
        let tick = state.tick.checked_add(delta).context(TickOverflowSnafu {
            site: site!(),
            tick: u64::from(state.tick) + u64::from(delta),
        })?;
        let event = match Event::parse(iter, state)? {
            Some(event) => event,
            None => return Ok(None),
        };
        state.tick = tick;
        Ok(Some(Self { tick, event }))
    }

    /// Writes the delta time (which the caller computed from the previous event's tick) and the
    /// event itself.
    pub(crate) fn write<W: Write>(&self, w: &mut W, delta: u32) -> LibResult<()> {
        w.write_all(&Vlq::new(delta).to_bytes()).context(wr!())?;
        self.event.write(w)
    }
}

impl Display for TrackEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>10} {}", self.tick, self.event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::io::Cursor;

    fn parse_one(bytes: &[u8], state: &mut ParseState) -> LibResult<Option<TrackEvent>> {
        let mut iter = ByteIter::new(Cursor::new(bytes.to_vec()).bytes()).unwrap();
        TrackEvent::parse(&mut iter, state)
    }

    #[test]
    fn delta_accumulation_test() {
        let bytes: Vec<u8> = vec![0x00, 0x92, 0x45, 0x64, 0x81, 0x48, 0x45, 0x00];
        let mut iter = ByteIter::new(Cursor::new(bytes).bytes()).unwrap();
        let mut state = ParseState::default();
        let first = TrackEvent::parse(&mut iter, &mut state).unwrap().unwrap();
        assert_eq!(0, first.tick());
        match first.event() {
            Event::Midi(Message::NoteOn(msg)) => assert_eq!(2, msg.channel().get()),
            other => panic!("expected NoteOn, got {:?}", other),
        }
        // delta 200, running status, and a zero velocity that reads back as a note off
        let second = TrackEvent::parse(&mut iter, &mut state).unwrap().unwrap();
        assert_eq!(200, second.tick());
        match second.event() {
            Event::Midi(Message::NoteOff(msg)) => {
                assert_eq!(2, msg.channel().get());
                assert_eq!(0x45, msg.note_number().get());
            }
            other => panic!("expected NoteOff, got {:?}", other),
        }
    }

    #[test]
    fn end_of_track_test() {
        let mut state = ParseState::default();
        let parsed = parse_one(&[0x00, 0xff, 0x2f, 0x00], &mut state).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn unsupported_status_test() {
        let mut state = ParseState::default();
        let err = parse_one(&[0x00, 0xf8], &mut state).err().unwrap();
        assert!(matches!(err, Error::UnsupportedStatus { status: 0xf8, .. }));
    }

    #[test]
    fn tick_overflow_test() {
        let mut state = ParseState {
            tick: u32::MAX,
            ..ParseState::default()
        };
        let err = parse_one(&[0x01, 0x92, 0x45, 0x64], &mut state).err().unwrap();
        assert!(matches!(err, Error::TickOverflow { .. }));
    }

    #[test]
    fn escape_vs_continuation_test() {
        let bytes = [0x00u8, 0xf7, 0x02, 0x01, 0xf7];
        let mut state = ParseState::default();
        let parsed = parse_one(&bytes, &mut state).unwrap().unwrap();
        assert!(matches!(parsed.event(), Event::Escape(_)));
        let mut state = ParseState {
            sysex_ongoing: true,
            ..ParseState::default()
        };
        let parsed = parse_one(&bytes, &mut state).unwrap().unwrap();
        match parsed.event() {
            Event::Sysex(sysex) => assert!(!sysex.first_chunk()),
            other => panic!("expected Sysex, got {:?}", other),
        }
        assert!(!state.sysex_ongoing);
    }

    #[test]
    fn write_test() {
        let event = TrackEvent::new(
            200,
            Event::Midi(Message::note_on(1.into(), 60.into(), 100.into())),
        );
        let mut bytes = Vec::new();
        event.write(&mut bytes, 200).unwrap();
        assert_eq!(vec![0x81, 0x48, 0x91, 0x3c, 0x64], bytes);
    }

    #[test]
    fn display_test() {
        let event = TrackEvent::new(
            42,
            Event::Midi(Message::note_on(2.into(), 0x45.into(), 0x64.into())),
        );
        let line = format!("{}", event);
        assert!(line.contains("42"));
        assert!(line.contains("NoteOn"));
    }
}

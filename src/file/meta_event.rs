use crate::byte_iter::ByteIter;
use crate::core::vlq::Vlq;
use crate::core::{Channel, PortValue};
use crate::error::{InvalidMetaPayloadSnafu, LibResult, StringTooLongSnafu, UnknownMetaTypeSnafu};
use crate::{Result, Text};
use snafu::{ensure, ResultExt};
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::io::{Read, Write};

/// A meta event. These exist only in MIDI *files*, never on a wire. On disk they look like
/// `FF <type> <len> <payload>`, where `len` is a variable-length quantity giving the number of
/// payload bytes. Events with a fixed payload size must declare exactly that size or parsing
/// fails; an unrecognized type byte also fails, since the payload size of an unknown event
/// cannot be trusted.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum MetaEvent {
    /// `FF 00 02 ssss` or `FF 00 00`: The number of a sequence. `None` means the event was
    /// written with an empty payload, in which case the track's position in the file is its
    /// sequence number.
    SequenceNumber(Option<u16>),

    /// `FF 01 len text`: Any amount of text describing anything.
    Text(Text),

    /// `FF 02 len text`: A copyright notice, which should appear at tick zero of the first track.
    Copyright(Text),

    /// `FF 03 len text`: The name of the sequence or track.
    TrackName(Text),

    /// `FF 04 len text`: A description of the instrumentation used in the track.
    InstrumentName(Text),

    /// `FF 05 len text`: A lyric to be sung, generally one syllable per event.
    Lyric(Text),

    /// `FF 06 len text`: The name of a point in the sequence, such as a rehearsal letter.
    Marker(Text),

    /// `FF 07 len text`: A description of something happening on film, video or stage at this
    /// point in the score.
    CuePoint(Text),

    /// `FF 08 len text`: The name of the program (patch) in use at this point.
    ProgramName(Text),

    /// `FF 09 len text`: The name of the device this track is intended to address.
    DeviceName(Text),

    /// `FF 20 01 cc`: Associates the following meta and sysex events with a MIDI channel, until
    /// the next channel voice message or the next channel prefix.
    ChannelPrefix(Channel),

    /// `FF 21 01 pp`: The (obsolete) MIDI port this track addresses.
    MidiPort(PortValue),

    /// `FF 2F 00`: Marks the exact end of a track. One of these terminates every track chunk on
    /// disk; the serializer appends it itself, so storing one is never necessary.
    EndOfTrack,

    /// `FF 51 03 tttttt`: A tempo change, given as microseconds per MIDI quarter-note.
    SetTempo(MicrosecondsPerQuarter),

    /// `FF 54 05 hr mn se fr ff`: The SMPTE time at which the track is supposed to start. The
    /// frame rate is packed into the top bits of the hour byte.
    SmpteOffset(SmpteOffsetValue),

    /// `FF 58 04 nn dd cc bb`: The time signature as notated, plus the metronome click rate and
    /// the number of notated 32nd-notes per MIDI quarter-note.
    TimeSignature(TimeSignatureValue),

    /// `FF 59 02 sf mi`: The key signature, as a count of sharps (positive) or flats (negative)
    /// and a major/minor mode flag.
    KeySignature(KeySignatureValue),

    /// `FF 7F len data`: Sequencer-specific data, kept as an opaque byte blob. The first byte or
    /// bytes of the payload are a manufacturer ID, but this library does not interpret them.
    SequencerSpecific(Vec<u8>),
}

impl Default for MetaEvent {
    fn default() -> Self {
        MetaEvent::EndOfTrack
    }
}

pub(crate) const META_SEQUENCE_NUMBER: u8 = 0x00;
pub(crate) const META_TEXT: u8 = 0x01;
pub(crate) const META_COPYRIGHT: u8 = 0x02;
pub(crate) const META_TRACK_NAME: u8 = 0x03;
pub(crate) const META_INSTRUMENT_NAME: u8 = 0x04;
pub(crate) const META_LYRIC: u8 = 0x05;
pub(crate) const META_MARKER: u8 = 0x06;
pub(crate) const META_CUE_POINT: u8 = 0x07;
pub(crate) const META_PROGRAM_NAME: u8 = 0x08;
pub(crate) const META_DEVICE_NAME: u8 = 0x09;
pub(crate) const META_CHANNEL_PREFIX: u8 = 0x20;
pub(crate) const META_MIDI_PORT: u8 = 0x21;
pub(crate) const META_END_OF_TRACK: u8 = 0x2f;
pub(crate) const META_SET_TEMPO: u8 = 0x51;
pub(crate) const META_SMPTE_OFFSET: u8 = 0x54;
pub(crate) const META_TIME_SIGNATURE: u8 = 0x58;
pub(crate) const META_KEY_SIGNATURE: u8 = 0x59;
pub(crate) const META_SEQUENCER_SPECIFIC: u8 = 0x7f;

pub(crate) const LEN_META_CHANNEL_PREFIX: u8 = 1;
pub(crate) const LEN_META_MIDI_PORT: u8 = 1;
pub(crate) const LEN_META_END_OF_TRACK: u8 = 0;
pub(crate) const LEN_META_SET_TEMPO: u8 = 3;
pub(crate) const LEN_META_SMPTE_OFFSET: u8 = 5;
pub(crate) const LEN_META_TIME_SIGNATURE: u8 = 4;
pub(crate) const LEN_META_KEY_SIGNATURE: u8 = 2;
pub(crate) const LEN_META_SEQUENCE_NUMBER: u8 = 2;

impl MetaEvent {
    pub(crate) fn parse<R: Read>(iter: &mut ByteIter<R>) -> LibResult<Self> {
        let status = iter.read_or_die()?;
        debug_assert_eq!(0xff, status);
        let tag = iter.read_or_die()?;
        match tag {
            META_SEQUENCE_NUMBER => Self::parse_sequence_number(iter),
            META_TEXT..=META_DEVICE_NAME => Self::parse_text(iter, tag),
            META_CHANNEL_PREFIX => {
                expect_len(iter, tag, LEN_META_CHANNEL_PREFIX)?;
                Ok(MetaEvent::ChannelPrefix(Channel::new(iter.read_or_die()?)))
            }
            META_MIDI_PORT => {
                expect_len(iter, tag, LEN_META_MIDI_PORT)?;
                Ok(MetaEvent::MidiPort(PortValue::new(iter.read_or_die()?)))
            }
            META_END_OF_TRACK => {
                expect_len(iter, tag, LEN_META_END_OF_TRACK)?;
                Ok(MetaEvent::EndOfTrack)
            }
            META_SET_TEMPO => Ok(MetaEvent::SetTempo(MicrosecondsPerQuarter::parse(iter)?)),
            META_SMPTE_OFFSET => Ok(MetaEvent::SmpteOffset(SmpteOffsetValue::parse(iter)?)),
            META_TIME_SIGNATURE => Ok(MetaEvent::TimeSignature(TimeSignatureValue::parse(iter)?)),
            META_KEY_SIGNATURE => Ok(MetaEvent::KeySignature(KeySignatureValue::parse(iter)?)),
            META_SEQUENCER_SPECIFIC => {
                let length = iter.read_vlq_u32()?;
                Ok(MetaEvent::SequencerSpecific(iter.read_n(length as usize)?))
            }
            _ => UnknownMetaTypeSnafu { site: site!(), tag }.fail(),
        }
    }

    fn parse_sequence_number<R: Read>(iter: &mut ByteIter<R>) -> LibResult<Self> {
        let length = iter.read_vlq_u32()?;
        match length {
            0 => Ok(MetaEvent::SequenceNumber(None)),
            x if x == u32::from(LEN_META_SEQUENCE_NUMBER) => {
                Ok(MetaEvent::SequenceNumber(Some(iter.read_u16()?)))
            }
            _ => InvalidMetaPayloadSnafu {
                site: site!(),
                tag: META_SEQUENCE_NUMBER,
                description: format!("expected payload length 0 or 2, got {}", length),
            }
            .fail(),
        }
    }

    fn parse_text<R: Read>(iter: &mut ByteIter<R>, tag: u8) -> LibResult<Self> {
        let length = iter.read_vlq_u32()?;
        let bytes = iter.read_n(length as usize)?;
        // the encoding is unspecified, Text keeps the raw bytes when they are not UTF-8
        let text: Text = bytes.into();
        match tag {
            META_TEXT => Ok(MetaEvent::Text(text)),
            META_COPYRIGHT => Ok(MetaEvent::Copyright(text)),
            META_TRACK_NAME => Ok(MetaEvent::TrackName(text)),
            META_INSTRUMENT_NAME => Ok(MetaEvent::InstrumentName(text)),
            META_LYRIC => Ok(MetaEvent::Lyric(text)),
            META_MARKER => Ok(MetaEvent::Marker(text)),
            META_CUE_POINT => Ok(MetaEvent::CuePoint(text)),
            META_PROGRAM_NAME => Ok(MetaEvent::ProgramName(text)),
            META_DEVICE_NAME => Ok(MetaEvent::DeviceName(text)),
            _ => UnknownMetaTypeSnafu { site: site!(), tag }.fail(),
        }
    }

    pub(crate) fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        write_u8!(w, 0xff)?;
        match self {
            MetaEvent::SequenceNumber(value) => {
                write_u8!(w, META_SEQUENCE_NUMBER)?;
                match value {
                    Some(number) => {
                        write_u8!(w, LEN_META_SEQUENCE_NUMBER)?;
                        w.write_all(&number.to_be_bytes()).context(wr!())?;
                        Ok(())
                    }
                    None => {
                        write_u8!(w, 0)?;
                        Ok(())
                    }
                }
            }
            MetaEvent::Text(s) => write_text(w, META_TEXT, s),
            MetaEvent::Copyright(s) => write_text(w, META_COPYRIGHT, s),
            MetaEvent::TrackName(s) => write_text(w, META_TRACK_NAME, s),
            MetaEvent::InstrumentName(s) => write_text(w, META_INSTRUMENT_NAME, s),
            MetaEvent::Lyric(s) => write_text(w, META_LYRIC, s),
            MetaEvent::Marker(s) => write_text(w, META_MARKER, s),
            MetaEvent::CuePoint(s) => write_text(w, META_CUE_POINT, s),
            MetaEvent::ProgramName(s) => write_text(w, META_PROGRAM_NAME, s),
            MetaEvent::DeviceName(s) => write_text(w, META_DEVICE_NAME, s),
            MetaEvent::ChannelPrefix(channel) => {
                write_u8!(w, META_CHANNEL_PREFIX)?;
                write_u8!(w, LEN_META_CHANNEL_PREFIX)?;
                write_u8!(w, channel.get())?;
                Ok(())
            }
            MetaEvent::MidiPort(port) => {
                write_u8!(w, META_MIDI_PORT)?;
                write_u8!(w, LEN_META_MIDI_PORT)?;
                write_u8!(w, port.get())?;
                Ok(())
            }
            MetaEvent::EndOfTrack => {
                write_u8!(w, META_END_OF_TRACK)?;
                write_u8!(w, LEN_META_END_OF_TRACK)?;
                Ok(())
            }
            MetaEvent::SetTempo(value) => {
                write_u8!(w, META_SET_TEMPO)?;
                write_u8!(w, LEN_META_SET_TEMPO)?;
                // the value is a big-endian u24, skip the first byte of the u32
                let bytes = value.get().to_be_bytes();
                w.write_all(&bytes[1..]).context(wr!())?;
                Ok(())
            }
            MetaEvent::SmpteOffset(value) => value.write(w),
            MetaEvent::TimeSignature(value) => value.write(w),
            MetaEvent::KeySignature(value) => value.write(w),
            MetaEvent::SequencerSpecific(data) => {
                write_u8!(w, META_SEQUENCER_SPECIFIC)?;
                write_data(w, data)
            }
        }
    }
}

impl Display for MetaEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MetaEvent::SequenceNumber(Some(number)) => write!(f, "SequenceNumber {}", number),
            MetaEvent::SequenceNumber(None) => write!(f, "SequenceNumber (track order)"),
            MetaEvent::Text(s) => write!(f, "Text \"{}\"", s),
            MetaEvent::Copyright(s) => write!(f, "Copyright \"{}\"", s),
            MetaEvent::TrackName(s) => write!(f, "TrackName \"{}\"", s),
            MetaEvent::InstrumentName(s) => write!(f, "InstrumentName \"{}\"", s),
            MetaEvent::Lyric(s) => write!(f, "Lyric \"{}\"", s),
            MetaEvent::Marker(s) => write!(f, "Marker \"{}\"", s),
            MetaEvent::CuePoint(s) => write!(f, "CuePoint \"{}\"", s),
            MetaEvent::ProgramName(s) => write!(f, "ProgramName \"{}\"", s),
            MetaEvent::DeviceName(s) => write!(f, "DeviceName \"{}\"", s),
            MetaEvent::ChannelPrefix(channel) => write!(f, "ChannelPrefix ch={}", channel),
            MetaEvent::MidiPort(port) => write!(f, "MidiPort port={}", port),
            MetaEvent::EndOfTrack => write!(f, "EndOfTrack"),
            MetaEvent::SetTempo(value) => {
                write!(f, "SetTempo {}us/quarter ({:.2} bpm)", value, value.bpm())
            }
            MetaEvent::SmpteOffset(v) => write!(
                f,
                "SmpteOffset {:02}:{:02}:{:02} frame={}.{:02} rate={:?}",
                v.hour, v.minute, v.second, v.frames, v.frame_fractions, v.frame_rate
            ),
            MetaEvent::TimeSignature(v) => write!(
                f,
                "TimeSignature num={} den=2^{} clocks={} 32nds={}",
                v.numerator, v.denominator, v.clocks_per_click, v.notated_32nds
            ),
            MetaEvent::KeySignature(v) => write!(
                f,
                "KeySignature sf={} {}",
                v.accidentals,
                match v.mode {
                    KeyMode::Major => "major",
                    KeyMode::Minor => "minor",
                }
            ),
            MetaEvent::SequencerSpecific(data) => {
                write!(f, "SequencerSpecific {} bytes", data.len())
            }
        }
    }
}

/// Reads the VLQ payload length of a fixed-size meta event and checks it.
fn expect_len<R: Read>(iter: &mut ByteIter<R>, tag: u8, expected: u8) -> LibResult<()> {
    let length = iter.read_vlq_u32()?;
    ensure!(
        length == u32::from(expected),
        InvalidMetaPayloadSnafu {
            site: site!(),
            tag,
            description: format!("expected payload length {}, got {}", expected, length),
        }
    );
    Ok(())
}

fn write_text<W: Write>(w: &mut W, tag: u8, text: &Text) -> LibResult<()> {
    write_u8!(w, tag)?;
    write_data(w, text.as_bytes())
}

pub(crate) fn write_data<W: Write>(w: &mut W, data: &[u8]) -> LibResult<()> {
    let length = u32::try_from(data.len()).context(StringTooLongSnafu { site: site!() })?;
    w.write_all(&Vlq::new(length).to_bytes()).context(wr!())?;
    w.write_all(data).context(wr!())?;
    Ok(())
}

/// The frame rate field of a [`MetaEvent::SmpteOffset`], carried in bits 5 and 6 of the hour
/// byte. `N29` is 30 drop frame, that is, 29.97 frames per second.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum FrameRate {
    /// 24 frames per second.
    #[default]
    N24 = 0,
    /// 25 frames per second.
    N25 = 1,
    /// 30 drop frame.
    N29 = 2,
    /// 30 frames per second.
    N30 = 3,
}

impl FrameRate {
    fn from_hour_byte(hour_byte: u8) -> Self {
        match (hour_byte >> 5) & 0x03 {
            0 => FrameRate::N24,
            1 => FrameRate::N25,
            2 => FrameRate::N29,
            _ => FrameRate::N30,
        }
    }

    /// The highest legal frame number at this rate.
    fn max_frames(&self) -> u8 {
        match self {
            FrameRate::N24 => 23,
            FrameRate::N25 => 24,
            FrameRate::N29 => 28,
            FrameRate::N30 => 29,
        }
    }
}

/// The value of a [`MetaEvent::SmpteOffset`]. All fields are range-checked on construction and
/// when parsing; the frame count's bound depends on the frame rate.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct SmpteOffsetValue {
    frame_rate: FrameRate,
    hour: u8,
    minute: u8,
    second: u8,
    frames: u8,
    frame_fractions: u8,
}

impl SmpteOffsetValue {
    pub fn new(
        frame_rate: FrameRate,
        hour: u8,
        minute: u8,
        second: u8,
        frames: u8,
        frame_fractions: u8,
    ) -> Result<Self> {
        smpte_field(hour <= 23, "hour", hour, 23)?;
        smpte_field(minute <= 59, "minute", minute, 59)?;
        smpte_field(second <= 59, "second", second, 59)?;
        smpte_field(
            frames <= frame_rate.max_frames(),
            "frames",
            frames,
            frame_rate.max_frames(),
        )?;
        smpte_field(frame_fractions <= 99, "frame fractions", frame_fractions, 99)?;
        Ok(Self {
            frame_rate,
            hour,
            minute,
            second,
            frames,
            frame_fractions,
        })
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn frames(&self) -> u8 {
        self.frames
    }

    pub fn frame_fractions(&self) -> u8 {
        self.frame_fractions
    }

    pub(crate) fn parse<R: Read>(iter: &mut ByteIter<R>) -> LibResult<Self> {
        expect_len(iter, META_SMPTE_OFFSET, LEN_META_SMPTE_OFFSET)?;
        let hour_byte = iter.read_or_die()?;
        let frame_rate = FrameRate::from_hour_byte(hour_byte);
        let hour = hour_byte & 0x1f;
        let minute = iter.read_or_die()?;
        let second = iter.read_or_die()?;
        let frames = iter.read_or_die()?;
        let frame_fractions = iter.read_or_die()?;
        Self::new(frame_rate, hour, minute, second, frames, frame_fractions)
    }

    pub(crate) fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        write_u8!(w, META_SMPTE_OFFSET)?;
        write_u8!(w, LEN_META_SMPTE_OFFSET)?;
        write_u8!(w, ((self.frame_rate as u8) << 5) | self.hour)?;
        write_u8!(w, self.minute)?;
        write_u8!(w, self.second)?;
        write_u8!(w, self.frames)?;
        write_u8!(w, self.frame_fractions)?;
        Ok(())
    }
}

fn smpte_field(ok: bool, name: &str, value: u8, max: u8) -> LibResult<()> {
    ensure!(
        ok,
        InvalidMetaPayloadSnafu {
            site: site!(),
            tag: META_SMPTE_OFFSET,
            description: format!("the {} value {} exceeds {}", name, value, max),
        }
    );
    Ok(())
}

/// The value of a [`MetaEvent::TimeSignature`]. None of the fields are validated; the format
/// gives them full 8-bit ranges.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct TimeSignatureValue {
    /// The upper part of the time signature as notated. In 6/8, this is 6.
    numerator: u8,
    /// The lower part as a negative power of two: 2 means a quarter note, 3 an eighth note. In
    /// 6/8, this is 3.
    denominator: u8,
    /// The number of MIDI clocks (24ths of a quarter note) in a metronome click.
    clocks_per_click: u8,
    /// The number of notated 32nd notes in a MIDI quarter note, normally 8.
    notated_32nds: u8,
}

impl Default for TimeSignatureValue {
    fn default() -> Self {
        // 4/4 with a click on every quarter
        Self {
            numerator: 4,
            denominator: 2,
            clocks_per_click: 24,
            notated_32nds: 8,
        }
    }
}

impl TimeSignatureValue {
    pub fn new(numerator: u8, denominator: u8, clocks_per_click: u8, notated_32nds: u8) -> Self {
        Self {
            numerator,
            denominator,
            clocks_per_click,
            notated_32nds,
        }
    }

    pub fn numerator(&self) -> u8 {
        self.numerator
    }

    pub fn denominator(&self) -> u8 {
        self.denominator
    }

    pub fn clocks_per_click(&self) -> u8 {
        self.clocks_per_click
    }

    pub fn notated_32nds(&self) -> u8 {
        self.notated_32nds
    }

    pub(crate) fn parse<R: Read>(iter: &mut ByteIter<R>) -> LibResult<Self> {
        expect_len(iter, META_TIME_SIGNATURE, LEN_META_TIME_SIGNATURE)?;
        Ok(Self {
            numerator: iter.read_or_die()?,
            denominator: iter.read_or_die()?,
            clocks_per_click: iter.read_or_die()?,
            notated_32nds: iter.read_or_die()?,
        })
    }

    pub(crate) fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        write_u8!(w, META_TIME_SIGNATURE)?;
        write_u8!(w, LEN_META_TIME_SIGNATURE)?;
        write_u8!(w, self.numerator)?;
        write_u8!(w, self.denominator)?;
        write_u8!(w, self.clocks_per_click)?;
        write_u8!(w, self.notated_32nds)?;
        Ok(())
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum KeyMode {
    #[default]
    Major = 0,
    Minor = 1,
}

/// The value of a [`MetaEvent::KeySignature`]. Negative accidental counts mean flats, positive
/// mean sharps. For example, `-2` is two flats (B flat major or G minor).
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct KeySignatureValue {
    accidentals: i8,
    mode: KeyMode,
}

impl KeySignatureValue {
    /// Creates a key signature. The accidental count must be in the range `-7..=7`.
    pub fn new(accidentals: i8, mode: KeyMode) -> Result<Self> {
        ensure!(
            (-7..=7).contains(&accidentals),
            InvalidMetaPayloadSnafu {
                site: site!(),
                tag: META_KEY_SIGNATURE,
                description: format!("the accidental count {} is outside -7..=7", accidentals),
            }
        );
        Ok(Self { accidentals, mode })
    }

    pub fn accidentals(&self) -> i8 {
        self.accidentals
    }

    pub fn mode(&self) -> KeyMode {
        self.mode
    }

    pub(crate) fn parse<R: Read>(iter: &mut ByteIter<R>) -> LibResult<Self> {
        expect_len(iter, META_KEY_SIGNATURE, LEN_META_KEY_SIGNATURE)?;
        let accidentals = iter.read_or_die()? as i8;
        // any nonzero mode byte is treated as minor, some writers emit values other than 1
        let mode = match iter.read_or_die()? {
            0 => KeyMode::Major,
            _ => KeyMode::Minor,
        };
        Self::new(accidentals, mode)
    }

    pub(crate) fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        write_u8!(w, META_KEY_SIGNATURE)?;
        write_u8!(w, LEN_META_KEY_SIGNATURE)?;
        write_u8!(w, self.accidentals as u8)?;
        write_u8!(w, self.mode as u8)?;
        Ok(())
    }
}

pub(crate) const DEFAULT_MICROSECONDS_PER_QUARTER: u32 = 500_000;
pub(crate) const MAX_24BIT_UINT_VALUE: u32 = 16_777_215;
const MICROSECONDS_PER_MINUTE: f64 = 60_000_000.0;

clamp!(
    /// In MIDI, tempos are given as microseconds per quarter note. The value is stored as a
    /// 3-byte integer, hence the upper bound of 16,777,215. The minimum value is `1` since `0`
    /// microseconds per beat would be an infinitely fast tempo. The default is 120 beats per
    /// minute, which is `500_000` microseconds per beat.
    MicrosecondsPerQuarter,
    u32,
    1,
    MAX_24BIT_UINT_VALUE,
    DEFAULT_MICROSECONDS_PER_QUARTER,
    pub
);

impl MicrosecondsPerQuarter {
    /// Converts a tempo in beats (quarter notes) per minute. Fails if `bpm` is zero, negative,
    /// not finite, or so slow that the microsecond value does not fit in three bytes.
    pub fn from_bpm(bpm: f64) -> Result<Self> {
        ensure!(
            bpm.is_finite() && bpm > 0.0,
            InvalidMetaPayloadSnafu {
                site: site!(),
                tag: META_SET_TEMPO,
                description: format!("beats per minute must be positive, got {}", bpm),
            }
        );
        let micros = (MICROSECONDS_PER_MINUTE / bpm).round();
        ensure!(
            micros >= 1.0 && micros <= f64::from(MAX_24BIT_UINT_VALUE),
            InvalidMetaPayloadSnafu {
                site: site!(),
                tag: META_SET_TEMPO,
                description: format!("{} beats per minute is outside the 24-bit tempo range", bpm),
            }
        );
        Ok(MicrosecondsPerQuarter::new(micros as u32))
    }

    /// The tempo as beats (quarter notes) per minute.
    pub fn bpm(&self) -> f64 {
        MICROSECONDS_PER_MINUTE / f64::from(self.get())
    }

    pub(crate) fn parse<R: Read>(iter: &mut ByteIter<R>) -> LibResult<Self> {
        expect_len(iter, META_SET_TEMPO, LEN_META_SET_TEMPO)?;
        let bytes = iter.read_n(LEN_META_SET_TEMPO as usize)?;
        // a big-endian u24, widen it to a u32 before converting
        let beu32 = [0u8, bytes[0], bytes[1], bytes[2]];
        Ok(MicrosecondsPerQuarter::new(u32::from_be_bytes(beu32)))
    }
}

use crate::byte_iter::ByteIter;
use crate::core::{
    Channel, ControlNumber, ControlValue, NoteNumber, PitchBendValue, PressureValue, Program,
    StatusType, Velocity,
};
use crate::error::{LibResult, RunningStatusSnafu};
use log::trace;
use snafu::{OptionExt, ResultExt};
use std::fmt::{Display, Formatter};
use std::io::{Read, Write};

/// Represents the data that is common, and required for both [`Message::NoteOn`] and
/// [`Message::NoteOff`] messages.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NoteMessage {
    pub(crate) channel: Channel,
    pub(crate) note_number: NoteNumber,
    pub(crate) velocity: Velocity,
}

impl NoteMessage {
    pub fn new(channel: Channel, note_number: NoteNumber, velocity: Velocity) -> Self {
        Self {
            channel,
            note_number,
            velocity,
        }
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn note_number(&self) -> &NoteNumber {
        &self.note_number
    }

    pub fn velocity(&self) -> &Velocity {
        &self.velocity
    }

    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    pub fn set_note_number(&mut self, note_number: NoteNumber) {
        self.note_number = note_number;
    }

    pub fn set_velocity(&mut self, velocity: Velocity) {
        self.velocity = velocity;
    }

    fn parse<R: Read>(iter: &mut ByteIter<R>, channel: Channel) -> LibResult<Self> {
        Ok(NoteMessage {
            channel,
            note_number: iter.read_or_die()?.into(),
            velocity: iter.read_or_die()?.into(),
        })
    }

    fn write<W: Write>(&self, w: &mut W, status: StatusType) -> LibResult<()> {
        write_status_byte(w, status, self.channel)?;
        write_u8!(w, self.note_number.get())?;
        write_u8!(w, self.velocity.get())?;
        Ok(())
    }
}

/// The data of a [`Message::NoteAftertouch`] (polyphonic key pressure) message.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NoteAftertouchMessage {
    pub(crate) channel: Channel,
    pub(crate) note_number: NoteNumber,
    pub(crate) pressure: PressureValue,
}

impl NoteAftertouchMessage {
    pub fn new(channel: Channel, note_number: NoteNumber, pressure: PressureValue) -> Self {
        Self {
            channel,
            note_number,
            pressure,
        }
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn note_number(&self) -> &NoteNumber {
        &self.note_number
    }

    pub fn pressure(&self) -> &PressureValue {
        &self.pressure
    }

    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    pub fn set_note_number(&mut self, note_number: NoteNumber) {
        self.note_number = note_number;
    }

    pub fn set_pressure(&mut self, pressure: PressureValue) {
        self.pressure = pressure;
    }

    fn parse<R: Read>(iter: &mut ByteIter<R>, channel: Channel) -> LibResult<Self> {
        Ok(NoteAftertouchMessage {
            channel,
            note_number: iter.read_or_die()?.into(),
            pressure: iter.read_or_die()?.into(),
        })
    }

    fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        write_status_byte(w, StatusType::NoteAftertouch, self.channel)?;
        write_u8!(w, self.note_number.get())?;
        write_u8!(w, self.pressure.get())?;
        Ok(())
    }
}

/// The data of a [`Message::Controller`] (control change) message.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ControllerMessage {
    pub(crate) channel: Channel,
    pub(crate) control_number: ControlNumber,
    pub(crate) value: ControlValue,
}

impl ControllerMessage {
    pub fn new(channel: Channel, control_number: ControlNumber, value: ControlValue) -> Self {
        Self {
            channel,
            control_number,
            value,
        }
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn control_number(&self) -> &ControlNumber {
        &self.control_number
    }

    pub fn value(&self) -> &ControlValue {
        &self.value
    }

    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    pub fn set_control_number(&mut self, control_number: ControlNumber) {
        self.control_number = control_number;
    }

    pub fn set_value(&mut self, value: ControlValue) {
        self.value = value;
    }

    fn parse<R: Read>(iter: &mut ByteIter<R>, channel: Channel) -> LibResult<Self> {
        Ok(ControllerMessage {
            channel,
            control_number: iter.read_or_die()?.into(),
            value: iter.read_or_die()?.into(),
        })
    }

    fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        write_status_byte(w, StatusType::Controller, self.channel)?;
        write_u8!(w, self.control_number.get())?;
        write_u8!(w, self.value.get())?;
        Ok(())
    }
}

/// Provides the ability to change an instrument (sound, patch, etc.) by specifying the affected
/// channel number and the new program value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ProgramChangeMessage {
    pub(crate) channel: Channel,
    pub(crate) program: Program,
}

impl ProgramChangeMessage {
    pub fn new(channel: Channel, program: Program) -> Self {
        Self { channel, program }
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    pub fn set_program(&mut self, program: Program) {
        self.program = program;
    }

    fn parse<R: Read>(iter: &mut ByteIter<R>, channel: Channel) -> LibResult<Self> {
        Ok(ProgramChangeMessage {
            channel,
            program: iter.read_or_die()?.into(),
        })
    }

    fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        write_status_byte(w, StatusType::Program, self.channel)?;
        write_u8!(w, self.program.get())?;
        Ok(())
    }
}

/// The data of a [`Message::ChannelAftertouch`] (channel pressure) message.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ChannelAftertouchMessage {
    pub(crate) channel: Channel,
    pub(crate) pressure: PressureValue,
}

impl ChannelAftertouchMessage {
    pub fn new(channel: Channel, pressure: PressureValue) -> Self {
        Self { channel, pressure }
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn pressure(&self) -> &PressureValue {
        &self.pressure
    }

    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    pub fn set_pressure(&mut self, pressure: PressureValue) {
        self.pressure = pressure;
    }

    fn parse<R: Read>(iter: &mut ByteIter<R>, channel: Channel) -> LibResult<Self> {
        Ok(ChannelAftertouchMessage {
            channel,
            pressure: iter.read_or_die()?.into(),
        })
    }

    fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        write_status_byte(w, StatusType::ChannelAftertouch, self.channel)?;
        write_u8!(w, self.pressure.get())?;
        Ok(())
    }
}

/// The data of a [`Message::PitchBend`] message. The wire format is a 14-bit number with `0x2000`
/// at center; [`PitchBendValue`] holds it as a signed offset so that `0` means no bend.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PitchBendMessage {
    pub(crate) channel: Channel,
    pub(crate) value: PitchBendValue,
}

impl PitchBendMessage {
    pub fn new(channel: Channel, value: PitchBendValue) -> Self {
        Self { channel, value }
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn value(&self) -> &PitchBendValue {
        &self.value
    }

    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    pub fn set_value(&mut self, value: PitchBendValue) {
        self.value = value;
    }

    fn parse<R: Read>(iter: &mut ByteIter<R>, channel: Channel) -> LibResult<Self> {
        let lsb = iter.read_or_die()?;
        let msb = iter.read_or_die()?;
        Ok(PitchBendMessage {
            channel,
            value: PitchBendValue::from_wire(lsb, msb),
        })
    }

    fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        write_status_byte(w, StatusType::PitchBend, self.channel)?;
        let (lsb, msb) = self.value.to_wire();
        write_u8!(w, lsb)?;
        write_u8!(w, msb)?;
        Ok(())
    }
}

/// A MIDI channel voice message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Message {
    NoteOff(NoteMessage),
    /// A note on. A velocity of zero is normalized to [`Message::NoteOff`] when parsing and when
    /// constructing through [`Message::note_on`].
    NoteOn(NoteMessage),
    NoteAftertouch(NoteAftertouchMessage),
    Controller(ControllerMessage),
    ProgramChange(ProgramChangeMessage),
    ChannelAftertouch(ChannelAftertouchMessage),
    PitchBend(PitchBendMessage),
}

impl Default for Message {
    fn default() -> Self {
        Message::NoteOff(NoteMessage::default())
    }
}

impl Message {
    /// Creates a note on message. A velocity of zero produces a [`Message::NoteOff`] instead.
    pub fn note_on(channel: Channel, note_number: NoteNumber, velocity: Velocity) -> Self {
        let message = NoteMessage {
            channel,
            note_number,
            velocity,
        };
        if velocity.get() == 0 {
            Message::NoteOff(message)
        } else {
            Message::NoteOn(message)
        }
    }

    pub fn note_off(channel: Channel, note_number: NoteNumber, velocity: Velocity) -> Self {
        Message::NoteOff(NoteMessage {
            channel,
            note_number,
            velocity,
        })
    }

    /// The channel the message addresses.
    pub fn channel(&self) -> Channel {
        match self {
            Message::NoteOff(value) => value.channel,
            Message::NoteOn(value) => value.channel,
            Message::NoteAftertouch(value) => value.channel,
            Message::Controller(value) => value.channel,
            Message::ProgramChange(value) => value.channel,
            Message::ChannelAftertouch(value) => value.channel,
            Message::PitchBend(value) => value.channel,
        }
    }

    pub(crate) fn parse<R: Read>(
        iter: &mut ByteIter<R>,
        running_status: &mut Option<u8>,
    ) -> LibResult<Self> {
        // a data byte in status position reuses the most recent channel status byte
        let status_byte = if matches!(iter.peek_or_die()?, 0x00..=0x7F) {
            let byte = (*running_status).context(RunningStatusSnafu { site: site!() })?;
            trace!("running status byte {:#04x}", byte);
            byte
        } else {
            iter.read_or_die()?
        };
        let (status_type, channel) = split_byte(status_byte)?;
        *running_status = Some(status_byte);
        match status_type {
            StatusType::NoteOff => Ok(Message::NoteOff(NoteMessage::parse(iter, channel)?)),
            StatusType::NoteOn => {
                let message = NoteMessage::parse(iter, channel)?;
                // a velocity of zero means note off
                if message.velocity.get() == 0 {
                    Ok(Message::NoteOff(message))
                } else {
                    Ok(Message::NoteOn(message))
                }
            }
            StatusType::NoteAftertouch => Ok(Message::NoteAftertouch(
                NoteAftertouchMessage::parse(iter, channel)?,
            )),
            StatusType::Controller => {
                Ok(Message::Controller(ControllerMessage::parse(iter, channel)?))
            }
            StatusType::Program => Ok(Message::ProgramChange(ProgramChangeMessage::parse(
                iter, channel,
            )?)),
            StatusType::ChannelAftertouch => Ok(Message::ChannelAftertouch(
                ChannelAftertouchMessage::parse(iter, channel)?,
            )),
            StatusType::PitchBend => {
                Ok(Message::PitchBend(PitchBendMessage::parse(iter, channel)?))
            }
        }
    }

    /// Writes the message with its status byte always present. Running status is accepted when
    /// parsing but never produced when writing.
    pub(crate) fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        match self {
            Message::NoteOff(value) => value.write(w, StatusType::NoteOff),
            Message::NoteOn(value) => value.write(w, StatusType::NoteOn),
            Message::NoteAftertouch(value) => value.write(w),
            Message::Controller(value) => value.write(w),
            Message::ProgramChange(value) => value.write(w),
            Message::ChannelAftertouch(value) => value.write(w),
            Message::PitchBend(value) => value.write(w),
        }
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::NoteOff(m) => write!(
                f,
                "NoteOff ch={} note={} vel={}",
                m.channel, m.note_number, m.velocity
            ),
            Message::NoteOn(m) => write!(
                f,
                "NoteOn ch={} note={} vel={}",
                m.channel, m.note_number, m.velocity
            ),
            Message::NoteAftertouch(m) => write!(
                f,
                "NoteAftertouch ch={} note={} pressure={}",
                m.channel, m.note_number, m.pressure
            ),
            Message::Controller(m) => write!(
                f,
                "Controller ch={} number={} value={}",
                m.channel, m.control_number, m.value
            ),
            Message::ProgramChange(m) => {
                write!(f, "ProgramChange ch={} program={}", m.channel, m.program)
            }
            Message::ChannelAftertouch(m) => {
                write!(f, "ChannelAftertouch ch={} pressure={}", m.channel, m.pressure)
            }
            Message::PitchBend(m) => write!(f, "PitchBend ch={} value={}", m.channel, m.value),
        }
    }
}

/// Splits a channel voice status byte into its status nibble and channel bits.
fn split_byte(status_byte: u8) -> LibResult<(StatusType, Channel)> {
    let status_type = StatusType::from_status_byte(status_byte)?;
    // Channel masks to the low four bits
    let channel: Channel = status_byte.into();
    Ok((status_type, channel))
}

/// Combines the status part and channel part of a channel voice message.
fn merge_byte(status: StatusType, channel: Channel) -> u8 {
    let status_bits = (status as u8) << 4;
    let channel_bits = channel.get();
    status_bits | channel_bits
}

fn write_status_byte<W: Write>(w: &mut W, status: StatusType, channel: Channel) -> LibResult<()> {
    write_u8!(w, merge_byte(status, channel))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn parse_one(bytes: &[u8], running_status: &mut Option<u8>) -> LibResult<Message> {
        let mut iter = ByteIter::new(bytes.bytes()).unwrap();
        Message::parse(&mut iter, running_status)
    }

    #[test]
    fn fresh_status_test() {
        let mut running_status = None;
        let message = parse_one(&[0x92, 0x45, 0x64], &mut running_status).unwrap();
        match message {
            Message::NoteOn(m) => {
                assert_eq!(2, m.channel().get());
                assert_eq!(0x45, m.note_number().get());
                assert_eq!(0x64, m.velocity().get());
            }
            _ => panic!("expected NoteOn, got {:?}", message),
        }
        assert_eq!(Some(0x92), running_status);
    }

    #[test]
    fn running_status_test() {
        let mut running_status = Some(0x92);
        let message = parse_one(&[0x45, 0x64], &mut running_status).unwrap();
        match message {
            Message::NoteOn(m) => {
                assert_eq!(2, m.channel().get());
                assert_eq!(0x45, m.note_number().get());
            }
            _ => panic!("expected NoteOn, got {:?}", message),
        }
    }

    #[test]
    fn running_status_undefined_test() {
        let mut running_status = None;
        let err = parse_one(&[0x45, 0x64], &mut running_status).err().unwrap();
        assert!(matches!(err, Error::RunningStatusError { .. }));
    }

    #[test]
    fn note_on_zero_velocity_test() {
        let mut running_status = None;
        let message = parse_one(&[0x95, 0x3c, 0x00], &mut running_status).unwrap();
        match message {
            Message::NoteOff(m) => {
                assert_eq!(5, m.channel().get());
                assert_eq!(0x3c, m.note_number().get());
                assert_eq!(0, m.velocity().get());
            }
            _ => panic!("expected NoteOff, got {:?}", message),
        }
    }

    #[test]
    fn single_data_byte_test() {
        let mut running_status = None;
        let message = parse_one(&[0xc1, 0x07], &mut running_status).unwrap();
        match message {
            Message::ProgramChange(m) => {
                assert_eq!(1, m.channel().get());
                assert_eq!(7, m.program().get());
            }
            _ => panic!("expected ProgramChange, got {:?}", message),
        }
        let message = parse_one(&[0xd3, 0x22], &mut running_status).unwrap();
        match message {
            Message::ChannelAftertouch(m) => {
                assert_eq!(3, m.channel().get());
                assert_eq!(0x22, m.pressure().get());
            }
            _ => panic!("expected ChannelAftertouch, got {:?}", message),
        }
    }

    #[test]
    fn pitch_bend_test() {
        let mut running_status = None;
        let message = parse_one(&[0xe0, 0x00, 0x40], &mut running_status).unwrap();
        match message {
            Message::PitchBend(m) => assert_eq!(0, m.value().get()),
            _ => panic!("expected PitchBend, got {:?}", message),
        }
        let message = parse_one(&[0xe0, 0x00, 0x00], &mut running_status).unwrap();
        match message {
            Message::PitchBend(m) => assert_eq!(-8192, m.value().get()),
            _ => panic!("expected PitchBend, got {:?}", message),
        }
    }

    #[test]
    fn write_test() {
        let message = Message::note_on(
            Channel::new(2),
            NoteNumber::new(0x45),
            Velocity::new(0x64),
        );
        let mut bytes = Vec::new();
        message.write(&mut bytes).unwrap();
        assert_eq!(vec![0x92, 0x45, 0x64], bytes);
        let message = Message::PitchBend(PitchBendMessage::new(
            Channel::new(0),
            PitchBendValue::new(0),
        ));
        let mut bytes = Vec::new();
        message.write(&mut bytes).unwrap();
        assert_eq!(vec![0xe0, 0x00, 0x40], bytes);
    }
}

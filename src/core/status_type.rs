use crate::error::{LibResult, UnsupportedStatusSnafu};

/// The high nibble of a channel voice status byte, from Table I "Summary of Status Bytes" in the
/// MIDI specification. System statuses (`0xF`) are not channel messages and are handled by the
/// event parser, so they have no representation here.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum StatusType {
    /// `0x8`: a `Note Off` message.
    NoteOff = 0x8,

    /// `0x9`: a `Note On` message. A velocity of 0 means `Note Off`.
    NoteOn = 0x9,

    /// `0xA`: a `Polyphonic key pressure/Aftertouch` message.
    NoteAftertouch = 0xA,

    /// `0xB`: a `Control change` message.
    Controller = 0xB,

    /// `0xC`: a `Program change` message.
    Program = 0xC,

    /// `0xD`: a `Channel pressure/After touch` message.
    ChannelAftertouch = 0xD,

    /// `0xE`: a `Pitch bend change` message.
    PitchBend = 0xE,
}

impl StatusType {
    pub(crate) fn from_status_byte(status: u8) -> LibResult<Self> {
        let nibble = status >> 4;
        match nibble {
            x if StatusType::NoteOff as u8 == x => Ok(StatusType::NoteOff),
            x if StatusType::NoteOn as u8 == x => Ok(StatusType::NoteOn),
            x if StatusType::NoteAftertouch as u8 == x => Ok(StatusType::NoteAftertouch),
            x if StatusType::Controller as u8 == x => Ok(StatusType::Controller),
            x if StatusType::Program as u8 == x => Ok(StatusType::Program),
            x if StatusType::ChannelAftertouch as u8 == x => Ok(StatusType::ChannelAftertouch),
            x if StatusType::PitchBend as u8 == x => Ok(StatusType::PitchBend),
            _ => UnsupportedStatusSnafu {
                site: site!(),
                status,
            }
            .fail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn channel_statuses() {
        assert_eq!(
            StatusType::NoteOff,
            StatusType::from_status_byte(0x80).unwrap()
        );
        assert_eq!(
            StatusType::NoteOn,
            StatusType::from_status_byte(0x9f).unwrap()
        );
        assert_eq!(
            StatusType::NoteAftertouch,
            StatusType::from_status_byte(0xa3).unwrap()
        );
        assert_eq!(
            StatusType::Controller,
            StatusType::from_status_byte(0xb0).unwrap()
        );
        assert_eq!(
            StatusType::Program,
            StatusType::from_status_byte(0xc7).unwrap()
        );
        assert_eq!(
            StatusType::ChannelAftertouch,
            StatusType::from_status_byte(0xd1).unwrap()
        );
        assert_eq!(
            StatusType::PitchBend,
            StatusType::from_status_byte(0xe0).unwrap()
        );
    }

    #[test]
    fn non_channel_status() {
        let e = StatusType::from_status_byte(0xf0).err().unwrap();
        assert!(matches!(e, Error::UnsupportedStatus { status: 0xf0, .. }));
        let e = StatusType::from_status_byte(0x45).err().unwrap();
        assert!(matches!(e, Error::UnsupportedStatus { status: 0x45, .. }));
    }
}

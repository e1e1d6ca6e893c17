masked!(
    /// Represents the MIDI channel. Only the low four bits are meaningful; this type masks any
    /// value to the `0..=15` range.
    Channel,
    0x0F,
    0,
    pub
);

masked!(
    /// Represents the MIDI note number (`C4` is `60`, for example). Data bytes carry seven bits;
    /// this type masks any value to the `0..=127` range.
    NoteNumber,
    0x7F,
    60,
    pub
);

masked!(
    /// Represents the MIDI velocity, masked to the `0..=127` range.
    Velocity,
    0x7F,
    72,
    pub
);

masked!(
    /// Represents a polyphonic or channel pressure (aftertouch) amount, masked to the `0..=127`
    /// range.
    PressureValue,
    0x7F,
    0,
    pub
);

masked!(
    /// Represents a MIDI controller number, masked to the `0..=127` range. Named constants for
    /// the common controllers are in [`crate::core::controllers`].
    ControlNumber,
    0x7F,
    0,
    pub
);

masked!(
    /// Represents a MIDI control value, masked to the `0..=127` range.
    ControlValue,
    0x7F,
    0,
    pub
);

masked!(
    /// Represents the MIDI program number, masked to the `0..=127` range.
    Program,
    0x7F,
    0,
    pub
);

masked!(
    /// The [port](http://midi.teragonaudio.com/tech/midifile/obsolete.htm) number carried by the
    /// obsolete MIDI port meta event, masked to the `0..=127` range.
    PortValue,
    0x7F,
    0,
    pub
);

clamp!(
    /// Represents the MIDI pitch bend amount as a signed offset from center. The minimum value is
    /// `-8192`, the maximum value is `8191`, and `0` means no bend. This type will clamp values
    /// to the valid range.
    PitchBendValue,
    i16,
    -8192,
    8191,
    0,
    pub
);

impl PitchBendValue {
    /// Decodes the 14-bit wire form, least significant byte first, where `0x2000` is center.
    pub(crate) fn from_wire(lsb: u8, msb: u8) -> Self {
        let raw = (u16::from(msb & 0x7F) << 7) | u16::from(lsb & 0x7F);
        Self::new(raw as i16 - 0x2000)
    }

    /// Encodes as the 14-bit wire form, least significant byte first.
    pub(crate) fn to_wire(self) -> (u8, u8) {
        let raw = (self.get() + 0x2000) as u16;
        ((raw & 0x7F) as u8, ((raw >> 7) & 0x7F) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_masks() {
        assert_eq!(0x05, Channel::new(0xf5).get());
        assert_eq!(0x0f, Channel::new(0xff).get());
    }

    #[test]
    fn pitch_bend_wire() {
        assert_eq!(-8192, PitchBendValue::from_wire(0x00, 0x00).get());
        assert_eq!(0, PitchBendValue::from_wire(0x00, 0x40).get());
        assert_eq!(8191, PitchBendValue::from_wire(0x7f, 0x7f).get());
        assert_eq!((0x00, 0x40), PitchBendValue::new(0).to_wire());
        assert_eq!((0x7f, 0x7f), PitchBendValue::new(8191).to_wire());
        assert_eq!((0x00, 0x00), PitchBendValue::new(-9000).to_wire());
    }
}

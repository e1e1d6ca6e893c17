use crate::error::LibResult;
use snafu::ResultExt;
use std::io::Write;

clamp!(
    /// The number of ticks per quarter note, that is, the meaning of the delta-times in the file.
    /// It is a positive `u15` and thus has the range 1 to 32,767. The default value is 1024.
    /// Constructing out-of-range values clamps them; values read from a file are validated and
    /// rejected instead.
    Division,
    u16,
    1,
    32767,
    1024,
    pub
);

/// Bit 15 of the division word selects SMPTE time-code-based time.
const DIVISION_SMPTE_BIT: u16 = 0b1000_0000_0000_0000;

impl Division {
    pub(crate) fn from_u16(value: u16) -> LibResult<Self> {
        if value & DIVISION_SMPTE_BIT == DIVISION_SMPTE_BIT {
            malformed_header!("SMPTE time division 0x{:04X} is not supported", value);
        }
        if value == 0 {
            malformed_header!("the time division must be nonzero");
        }
        Ok(Division::new(value))
    }

    pub(crate) fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        w.write_all(&self.get().to_be_bytes()).context(wr!())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn from_u16_test() {
        assert_eq!(96, Division::from_u16(96).unwrap().get());
        assert_eq!(32767, Division::from_u16(0x7FFF).unwrap().get());
        let err = Division::from_u16(0xE250).err().unwrap();
        assert!(matches!(err, Error::MalformedHeader { .. }));
        let err = Division::from_u16(0).err().unwrap();
        assert!(matches!(err, Error::MalformedHeader { .. }));
    }
}

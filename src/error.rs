use crate::core::vlq::VlqError;
use snafu::Snafu;
use std::num::TryFromIntError;
use std::path::PathBuf;

/// The public Error type for this library. Parsing errors describe the first
/// structural violation encountered; there is no partial-file recovery.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// A file could not be opened for reading.
    #[snafu(display("{} Error opening file '{}': {}", site, path.display(), source))]
    FileOpen {
        site: String,
        path: PathBuf,
        source: std::io::Error,
    },

    /// A file could not be created for writing.
    #[snafu(display("{} Error creating file '{}': {}", site, path.display(), source))]
    FileCreate {
        site: String,
        path: PathBuf,
        source: std::io::Error,
    },

    /// The underlying reader failed mid-stream.
    #[snafu(display("Error while reading data around byte {}: {}", position, source))]
    Io {
        position: u64,
        source: std::io::Error,
    },

    /// The header or a chunk header is structurally wrong: bad magic, bad
    /// chunk length, an unsupported format, or an unsupported division.
    #[snafu(display("{} The MIDI file header is invalid: {}", site, description))]
    MalformedHeader { site: String, description: String },

    /// A variable-length value is oversized or malformed.
    #[snafu(display("{} Malformed variable-length value: {}", site, source))]
    MalformedVlv { site: String, source: VlqError },

    /// The input ended in the middle of a structure.
    #[snafu(display("The input ended unexpectedly around byte {}", position))]
    TruncatedInput { position: u64 },

    /// A status byte in the 0xF1-0xFE range, which cannot occur in a MIDI
    /// file, was found where an event was expected.
    #[snafu(display("{} Unsupported status byte 0x{:02X}", site, status))]
    UnsupportedStatus { site: String, status: u8 },

    /// A meta event carries a type tag this library does not know.
    #[snafu(display("{} Unknown meta event type 0x{:02X}", site, tag))]
    UnknownMetaType { site: String, tag: u8 },

    /// A meta event payload has the wrong length or an out-of-range field.
    #[snafu(display("{} Invalid payload for meta event 0x{:02X}: {}", site, tag, description))]
    InvalidMetaPayload {
        site: String,
        tag: u8,
        description: String,
    },

    /// A data byte was found in status position before any status byte was
    /// seen on the track.
    #[snafu(display("{} A data byte was found in status position but no status byte has been seen", site))]
    RunningStatusError { site: String },

    /// The bytes consumed by a track did not match its declared chunk length.
    #[snafu(display("{} Track {} length mismatch: {}", site, track, description))]
    TrackLengthMismatch {
        site: String,
        track: usize,
        description: String,
    },

    /// A tick position overflowed the 32-bit tick range.
    #[snafu(display("{} The tick value {} overflows the 32-bit tick range", site, tick))]
    TickOverflow { site: String, tick: u64 },

    /// A track's events are not sorted by tick, so a delta-time would be
    /// negative. Sort the track before writing.
    #[snafu(display(
        "{} Track {} is not sorted: tick {} follows tick {}",
        site, track, tick, previous
    ))]
    UnsortedEvents {
        site: String,
        track: usize,
        tick: u32,
        previous: u32,
    },

    /// There are more tracks than a 16-bit track count can describe.
    #[snafu(display("{} There are too many tracks for a 16-bit uint: {}", site, source))]
    TooManyTracks {
        site: String,
        source: TryFromIntError,
    },

    /// A track's byte length overflows a u32.
    #[snafu(display("{} The track is too long and overflows a u32: {}", site, source))]
    TrackTooLong {
        site: String,
        source: TryFromIntError,
    },

    /// A text payload's byte length overflows a u32.
    #[snafu(display("{} The string is too long and overflows a u32: {}", site, source))]
    StringTooLong {
        site: String,
        source: TryFromIntError,
    },

    /// The underlying writer failed.
    #[snafu(display("{} Error while writing data: {}", site, source))]
    Write {
        site: String,
        source: std::io::Error,
    },
}

/// The public Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// The internal Result type for this library.
pub(crate) type LibResult<T> = std::result::Result<T, Error>;

macro_rules! site {
    () => {
        format!("{}:{}", file!(), line!())
    };
}

macro_rules! wr {
    () => {
        crate::error::WriteSnafu { site: site!() }
    };
}

macro_rules! malformed_header_s {
    ($msg:expr) => {
        crate::error::MalformedHeaderSnafu {
            site: site!(),
            description: $msg,
        }
    };
    ($fmt:expr, $($arg:expr),+) => {
        crate::error::MalformedHeaderSnafu {
            site: site!(),
            description: format!($fmt, $($arg),+),
        }
    };
}

macro_rules! malformed_header {
    ($msg:expr) => {
        return malformed_header_s!($msg).fail()
    };
    ($fmt:expr, $($arg:expr),+) => {
        return malformed_header_s!($fmt, $($arg),+).fail()
    };
}

#[test]
fn site_test() {
    let line = line!() + 1;
    let site = site!();
    assert!(site.contains("error.rs"));
    assert!(site.contains(format!("{}", line).as_str()));
}

#[test]
fn malformed_header_macro_test() {
    fn foo() -> LibResult<u64> {
        malformed_header!("expected {} tracks, found {}", 1, 9);
    }
    let result = foo();
    assert!(result.is_err());
    let err = result.err().unwrap();
    assert!(matches!(err, Error::MalformedHeader { .. }));
    let message = format!("{}", err);
    assert!(message.contains("expected 1 tracks, found 9"));
}

#[test]
fn display_taxonomy_test() {
    let err = Error::TickOverflow {
        site: site!(),
        tick: 4294967296,
    };
    let message = format!("{}", err);
    assert!(message.contains("4294967296"));
    assert!(message.contains("32-bit tick range"));
}

//! The `file` module is for types and concepts strictly related to MIDI *files*.
//! These are separated from types and concepts that are also used in realtime MIDI (`core`).

mod division;
mod event;
pub(crate) mod header;
mod meta_event;
mod sysex;
mod track;

pub use division::Division;
pub use event::{Event, TrackEvent};
pub use meta_event::{
    FrameRate, KeyMode, KeySignatureValue, MetaEvent, MicrosecondsPerQuarter, SmpteOffsetValue,
    TimeSignatureValue,
};
pub use sysex::{EscapeEvent, SysexEvent};
pub use track::Track;

pub(crate) use track::parse_format0;

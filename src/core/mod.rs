/*!
The `core` module is for types and concepts that are *not* strictly related to MIDI *files*.
These types and concepts could be used for realtime MIDI as well.
!*/

pub mod controllers;
mod message;
mod numbers;
mod status_type;
pub mod vlq;

pub use message::{
    ChannelAftertouchMessage, ControllerMessage, Message, NoteAftertouchMessage, NoteMessage,
    PitchBendMessage, ProgramChangeMessage,
};
pub use numbers::{
    Channel, ControlNumber, ControlValue, NoteNumber, PitchBendValue, PortValue, PressureValue,
    Program, Velocity,
};
pub use status_type::StatusType;

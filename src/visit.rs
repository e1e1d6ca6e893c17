//! The `visit` module provides a double-dispatch alternative to matching on [`Event`] yourself.
//! Implement [`Visitor`] with only the callbacks you care about and apply it with
//! [`MidiFile::visit`], [`Track::visit`] or [`TrackEvent::visit`].

use crate::core::{
    Channel, ChannelAftertouchMessage, ControllerMessage, Message, NoteAftertouchMessage,
    NoteMessage, PitchBendMessage, PortValue, ProgramChangeMessage,
};
use crate::file::{
    EscapeEvent, Event, KeySignatureValue, MetaEvent, MicrosecondsPerQuarter, SmpteOffsetValue,
    SysexEvent, TimeSignatureValue, Track, TrackEvent,
};
use crate::{MidiFile, Text};

/// One callback per event variant, each receiving the event's absolute tick and a mutable
/// reference to the variant's payload. Every callback is a no-op by default, so an
/// implementation only has to name the events it wants to observe or rewrite. Visitors cannot
/// add or remove events; use [`Track::retain`] and the push methods for that.
pub trait Visitor {
    fn note_off(&mut self, _tick: u32, _message: &mut NoteMessage) {}

    fn note_on(&mut self, _tick: u32, _message: &mut NoteMessage) {}

    fn note_aftertouch(&mut self, _tick: u32, _message: &mut NoteAftertouchMessage) {}

    fn controller(&mut self, _tick: u32, _message: &mut ControllerMessage) {}

    fn program_change(&mut self, _tick: u32, _message: &mut ProgramChangeMessage) {}

    fn channel_aftertouch(&mut self, _tick: u32, _message: &mut ChannelAftertouchMessage) {}

    fn pitch_bend(&mut self, _tick: u32, _message: &mut PitchBendMessage) {}

    fn sequence_number(&mut self, _tick: u32, _value: &mut Option<u16>) {}

    fn text(&mut self, _tick: u32, _text: &mut Text) {}

    fn copyright(&mut self, _tick: u32, _text: &mut Text) {}

    fn track_name(&mut self, _tick: u32, _text: &mut Text) {}

    fn instrument_name(&mut self, _tick: u32, _text: &mut Text) {}

    fn lyric(&mut self, _tick: u32, _text: &mut Text) {}

    fn marker(&mut self, _tick: u32, _text: &mut Text) {}

    fn cue_point(&mut self, _tick: u32, _text: &mut Text) {}

    fn program_name(&mut self, _tick: u32, _text: &mut Text) {}

    fn device_name(&mut self, _tick: u32, _text: &mut Text) {}

    fn channel_prefix(&mut self, _tick: u32, _channel: &mut Channel) {}

    fn midi_port(&mut self, _tick: u32, _port: &mut PortValue) {}

    /// Stored end-of-track events are rare, the parser never produces one. There is no payload.
    fn end_of_track(&mut self, _tick: u32) {}

    fn set_tempo(&mut self, _tick: u32, _tempo: &mut MicrosecondsPerQuarter) {}

    fn smpte_offset(&mut self, _tick: u32, _value: &mut SmpteOffsetValue) {}

    fn time_signature(&mut self, _tick: u32, _value: &mut TimeSignatureValue) {}

    fn key_signature(&mut self, _tick: u32, _value: &mut KeySignatureValue) {}

    fn sequencer_specific(&mut self, _tick: u32, _data: &mut Vec<u8>) {}

    fn sysex(&mut self, _tick: u32, _event: &mut SysexEvent) {}

    fn escape(&mut self, _tick: u32, _event: &mut EscapeEvent) {}
}

impl TrackEvent {
    /// Dispatches this event to the matching [`Visitor`] callback.
    pub fn visit<V: Visitor>(&mut self, visitor: &mut V) {
        let tick = self.tick();
        match self.event_mut() {
            Event::Midi(message) => match message {
                Message::NoteOff(payload) => visitor.note_off(tick, payload),
                Message::NoteOn(payload) => visitor.note_on(tick, payload),
                Message::NoteAftertouch(payload) => visitor.note_aftertouch(tick, payload),
                Message::Controller(payload) => visitor.controller(tick, payload),
                Message::ProgramChange(payload) => visitor.program_change(tick, payload),
                Message::ChannelAftertouch(payload) => visitor.channel_aftertouch(tick, payload),
                Message::PitchBend(payload) => visitor.pitch_bend(tick, payload),
            },
            Event::Meta(meta) => match meta {
                MetaEvent::SequenceNumber(value) => visitor.sequence_number(tick, value),
                MetaEvent::Text(text) => visitor.text(tick, text),
                MetaEvent::Copyright(text) => visitor.copyright(tick, text),
                MetaEvent::TrackName(text) => visitor.track_name(tick, text),
                MetaEvent::InstrumentName(text) => visitor.instrument_name(tick, text),
                MetaEvent::Lyric(text) => visitor.lyric(tick, text),
                MetaEvent::Marker(text) => visitor.marker(tick, text),
                MetaEvent::CuePoint(text) => visitor.cue_point(tick, text),
                MetaEvent::ProgramName(text) => visitor.program_name(tick, text),
                MetaEvent::DeviceName(text) => visitor.device_name(tick, text),
                MetaEvent::ChannelPrefix(channel) => visitor.channel_prefix(tick, channel),
                MetaEvent::MidiPort(port) => visitor.midi_port(tick, port),
                MetaEvent::EndOfTrack => visitor.end_of_track(tick),
                MetaEvent::SetTempo(tempo) => visitor.set_tempo(tick, tempo),
                MetaEvent::SmpteOffset(value) => visitor.smpte_offset(tick, value),
                MetaEvent::TimeSignature(value) => visitor.time_signature(tick, value),
                MetaEvent::KeySignature(value) => visitor.key_signature(tick, value),
                MetaEvent::SequencerSpecific(data) => visitor.sequencer_specific(tick, data),
            },
            Event::Sysex(sysex) => visitor.sysex(tick, sysex),
            Event::Escape(escape) => visitor.escape(tick, escape),
        }
    }
}

impl Track {
    /// Applies `visitor` to every event in the track, in stored order.
    pub fn visit<V: Visitor>(&mut self, visitor: &mut V) {
        for event in self.events_mut() {
            event.visit(visitor);
        }
    }
}

impl MidiFile {
    /// Applies `visitor` to every event in every track, track by track, in stored order.
    pub fn visit<V: Visitor>(&mut self, visitor: &mut V) {
        for track in self.tracks_mut() {
            track.visit(visitor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NoteNumber, Velocity};

    #[derive(Default)]
    struct HalveVelocities {
        visited: usize,
    }

    impl Visitor for HalveVelocities {
        fn note_on(&mut self, _tick: u32, message: &mut NoteMessage) {
            self.visited += 1;
            let halved = message.velocity().get() / 2;
            message.set_velocity(Velocity::new(halved));
        }
    }

    #[test]
    fn mutate_notes_test() {
        let mut file = MidiFile::default();
        let mut track = Track::default();
        track.push_note_on(0, Channel::new(0), NoteNumber::new(60), Velocity::new(100));
        track.push_note_off(96, Channel::new(0), NoteNumber::new(60), Velocity::new(100));
        track.push_note_on(96, Channel::new(1), NoteNumber::new(62), Velocity::new(50));
        file.push_track(track);
        let mut visitor = HalveVelocities::default();
        file.visit(&mut visitor);
        assert_eq!(2, visitor.visited);
        let track = file.track(0).unwrap();
        let velocities: Vec<u8> = track
            .events()
            .filter_map(|event| match event.event() {
                Event::Midi(Message::NoteOn(m)) => Some(m.velocity().get()),
                _ => None,
            })
            .collect();
        assert_eq!(vec![50, 25], velocities);
    }

    struct RetuneTempo;

    impl Visitor for RetuneTempo {
        fn set_tempo(&mut self, _tick: u32, tempo: &mut MicrosecondsPerQuarter) {
            *tempo = MicrosecondsPerQuarter::new(250_000);
        }
    }

    #[test]
    fn mutate_tempo_test() {
        let mut track = Track::default();
        track.push_tempo(0, MicrosecondsPerQuarter::new(500_000));
        track.visit(&mut RetuneTempo);
        match track.events().next().unwrap().event() {
            Event::Meta(MetaEvent::SetTempo(tempo)) => assert_eq!(250_000, tempo.get()),
            other => panic!("expected SetTempo, got {:?}", other),
        };
    }

    #[test]
    fn ticks_are_read_only_test() {
        struct RecordTicks(Vec<u32>);
        impl Visitor for RecordTicks {
            fn lyric(&mut self, tick: u32, _text: &mut Text) {
                self.0.push(tick);
            }
        }
        let mut track = Track::default();
        track.push_lyric(5, "do");
        track.push_lyric(10, "re");
        let mut visitor = RecordTicks(Vec::new());
        track.visit(&mut visitor);
        assert_eq!(vec![5, 10], visitor.0);
    }
}

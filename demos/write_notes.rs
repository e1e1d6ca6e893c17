use midi_smf::core::{Channel, NoteNumber, Velocity};
use midi_smf::file::{
    Division, Event, MetaEvent, MicrosecondsPerQuarter, TimeSignatureValue, Track,
};
use midi_smf::{MidiFile, Text};

// durations
const QUARTER: u32 = 1024;
const EIGHTH: u32 = QUARTER / 2;
const DOTTED_QUARTER: u32 = QUARTER + EIGHTH;

// pitches
const C4: NoteNumber = NoteNumber::new(72);
const D4: NoteNumber = NoteNumber::new(74);
const E4: NoteNumber = NoteNumber::new(76);

// some arbitrary velocity
const V: Velocity = Velocity::new(64);

// channel zero (displayed as channel 1 in any sequencer UI)
const CH: Channel = Channel::new(0);

fn main() {
    let mut mfile = MidiFile::new(Division::new(QUARTER as u16));

    // set up track metadata
    let mut track = Track::default();
    track.push_event(0, Event::Meta(MetaEvent::TrackName(Text::new("Singer"))));

    // set time signature (6/8 with a click on every dotted quarter) and tempo
    track.push_event(
        0,
        Event::Meta(MetaEvent::TimeSignature(TimeSignatureValue::new(
            6, 3, 36, 8,
        ))),
    );
    track.push_tempo(0, MicrosecondsPerQuarter::from_bpm(116.0).unwrap());

    // events carry absolute tick positions, so we advance a cursor as the song
    // unfolds and place each note-off at cursor + duration
    let mut at: u32 = 0;

    // measure 1 ///////////////////////////////////////////////////////////////////////////////////

    track.push_lyric(at, "Row");
    track.push_note_on(at, CH, C4, V);
    at += DOTTED_QUARTER;
    // the note-off position determines the duration of the note
    track.push_note_off(at, CH, C4, V);

    track.push_lyric(at, "row");
    track.push_note_on(at, CH, C4, V);
    at += DOTTED_QUARTER;
    track.push_note_off(at, CH, C4, V);

    // measure 2 ///////////////////////////////////////////////////////////////////////////////////

    track.push_lyric(at, "row");
    track.push_note_on(at, CH, C4, V);
    at += QUARTER;
    track.push_note_off(at, CH, C4, V);

    track.push_lyric(at, "your");
    track.push_note_on(at, CH, D4, V);
    at += EIGHTH;
    track.push_note_off(at, CH, D4, V);

    track.push_lyric(at, "boat");
    track.push_note_on(at, CH, E4, V);
    at += DOTTED_QUARTER;
    track.push_note_off(at, CH, E4, V);

    // measure 3, etc.

    // finish and write the file ///////////////////////////////////////////////////////////////////

    // add the track to the file
    mfile.push_track(track);

    // write the file (can also be written to a file with mfile.save(path))
    let mut bytes = Vec::new();
    mfile.write(&mut bytes).unwrap();

    // assert the library is not broken! ///////////////////////////////////////////////////////////

    let expected: [u8; 133] = [
        // header: MThd, len 6 bytes, format 1, ntracks 1, division 1024
        0x4D, 0x54, 0x68, 0x64, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00, 0x01, 0x04, 0x00,
        // track: MTrk, len 111 bytes
        0x4D, 0x54, 0x72, 0x6B, 0x00, 0x00, 0x00, 0x6F, //
        // DeltaTime: 0, TrackName, len 6 bytes, "Singer"
        0x00, 0xFF, 0x03, 0x06, 0x53, 0x69, 0x6E, 0x67, 0x65, 0x72, //
        // DeltaTime: 0, TimeSignature
        0x00, 0xFF, 0x58, 0x04, 0x06, 0x03, 0x24, 0x08, //
        // DeltaTime: 0, SetTempo
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xE4, 0x79, //
        // DeltaTime: 0, Lyric: "Row"
        0x00, 0xFF, 0x05, 0x03, 0x52, 0x6F, 0x77, //
        // NoteOn
        0x00, 0x90, 0x48, 0x40, //
        // NoteOff
        0x8C, 0x00, 0x80, 0x48, 0x40, //
        // Lyric: "row"
        0x00, 0xFF, 0x05, 0x03, 0x72, 0x6F, 0x77, //
        // NoteOn
        0x00, 0x90, 0x48, 0x40, //
        // NoteOff
        0x8C, 0x00, 0x80, 0x48, 0x40, //
        // Lyric: "row"
        0x00, 0xFF, 0x05, 0x03, 0x72, 0x6F, 0x77, //
        // NoteOn
        0x00, 0x90, 0x48, 0x40, //
        // NoteOff
        0x88, 0x00, 0x80, 0x48, 0x40, //
        // Lyric: "your"
        0x00, 0xFF, 0x05, 0x04, 0x79, 0x6F, 0x75, 0x72, //
        // NoteOn
        0x00, 0x90, 0x4A, 0x40, //
        // NoteOff
        0x84, 0x00, 0x80, 0x4A, 0x40, //
        // Lyric: "boat"
        0x00, 0xFF, 0x05, 0x04, 0x62, 0x6F, 0x61, 0x74, //
        // NoteOn
        0x00, 0x90, 0x4C, 0x40, //
        // NoteOff
        0x8C, 0x00, 0x80, 0x4C, 0x40, //
        // EndOfTrack marker
        0x00, 0xFF, 0x2F, 0x00,
    ];

    assert_eq!(bytes.len(), expected.len());
    for (ix, &byte) in bytes.iter().enumerate() {
        let ex = expected[ix];
        assert_eq!(
            ex, byte,
            "mismatch at byte index {}, expected {:#04X}, got {:#04X}",
            ix, ex, byte
        );
    }

    // a parsed copy of those bytes compares equal to what we built
    let reloaded = MidiFile::read(bytes.as_slice()).unwrap();
    assert_eq!(mfile, reloaded);
}

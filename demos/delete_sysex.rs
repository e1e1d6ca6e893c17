use midi_smf::file::Event;
use midi_smf::MidiFile;
use std::env;
use std::process::exit;

// Removes all system exclusive data from a MIDI file. Escape events go too,
// since they usually carry the continuation of a split sysex stream.

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: delete_sysex <input.mid> <output.mid>");
        exit(1);
    }

    let mut mfile = match MidiFile::load(&args[1]) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("unable to read '{}': {}", args[1], e);
            exit(1);
        }
    };

    let before: usize = mfile.tracks().map(|t| t.events_len()).sum();
    for track in mfile.tracks_mut() {
        track.retain(|e| !matches!(e.event(), Event::Sysex(_) | Event::Escape(_)));
    }
    let after: usize = mfile.tracks().map(|t| t.events_len()).sum();
    println!("removed {} sysex event(s)", before - after);

    if let Err(e) = mfile.save(&args[2]) {
        eprintln!("unable to write '{}': {}", args[2], e);
        exit(1);
    }
}

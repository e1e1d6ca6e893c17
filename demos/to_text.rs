use midi_smf::MidiFile;
use std::env;
use std::process::exit;

// Prints a human-readable dump of a MIDI file, one event per line with its
// absolute tick position.

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: to_text <input.mid>");
        exit(1);
    }

    match MidiFile::load(&args[1]) {
        Ok(mfile) => print!("{}", mfile),
        Err(e) => {
            eprintln!("unable to read '{}': {}", args[1], e);
            exit(1);
        }
    }
}

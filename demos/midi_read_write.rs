use midi_smf::MidiFile;
use std::env;
use std::process::exit;

// Loads a MIDI file from disk and stores it back to disk. The output is not
// guaranteed to be a byte-exact copy (the format has redundant encodings, and
// this library always writes type 1 without running status), but it is
// functionally identical.

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: midi_read_write <input.mid> <output.mid>");
        exit(1);
    }

    let mfile = match MidiFile::load(&args[1]) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("unable to read '{}': {}", args[1], e);
            exit(1);
        }
    };

    println!(
        "loaded '{}': division {} ticks per quarter, {} tracks",
        args[1],
        mfile.division(),
        mfile.tracks_len()
    );

    // the in-memory file could be edited here, we just write it back out
    if let Err(e) = mfile.save(&args[2]) {
        eprintln!("unable to write '{}': {}", args[2], e);
        exit(1);
    }
}

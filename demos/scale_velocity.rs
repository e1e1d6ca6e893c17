use midi_smf::core::{NoteMessage, Velocity};
use midi_smf::{MidiFile, Visitor};
use std::env;
use std::process::exit;

// Scales every note-on velocity by a factor given on the command line. A
// visitor walks all events and we only override the callback for note-ons.

struct VelocityScaler {
    scale: f64,
}

impl Visitor for VelocityScaler {
    fn note_on(&mut self, _tick: u32, message: &mut NoteMessage) {
        let scaled = (f64::from(message.velocity().get()) * self.scale).round();
        message.set_velocity(Velocity::new(scaled.clamp(0.0, 127.0) as u8));
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage: scale_velocity <velocity-scale> <input.mid> <output.mid>");
        exit(1);
    }

    let scale: f64 = match args[1].parse() {
        Ok(s) => s,
        Err(_) => {
            eprintln!("'{}' is not a number", args[1]);
            exit(1);
        }
    };

    let mut mfile = match MidiFile::load(&args[2]) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("unable to read '{}': {}", args[2], e);
            exit(1);
        }
    };

    mfile.visit(&mut VelocityScaler { scale });

    if let Err(e) = mfile.save(&args[3]) {
        eprintln!("unable to write '{}': {}", args[3], e);
        exit(1);
    }
}

use midi_smf::core::{Program, ProgramChangeMessage};
use midi_smf::{MidiFile, Visitor};
use std::env;
use std::process::exit;

// Rewrites program-change events according to a mapping given on the command
// line, e.g. `map_instruments in.mid out.mid 0:24 5:24` sends every acoustic
// grand and electric piano 2 to the nylon guitar.

struct InstrumentMapper {
    map: [Option<Program>; 128],
}

impl Visitor for InstrumentMapper {
    fn program_change(&mut self, _tick: u32, message: &mut ProgramChangeMessage) {
        if let Some(to) = self.map[message.program().get() as usize] {
            message.set_program(to);
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: map_instruments <input.mid> <output.mid> [from_instr:to_instr]...");
        exit(1);
    }

    let mut map: [Option<Program>; 128] = [None; 128];
    for arg in &args[3..] {
        let parsed = arg
            .split_once(':')
            .and_then(|(from, to)| Some((from.parse::<u8>().ok()?, to.parse::<u8>().ok()?)))
            .filter(|&(from, to)| from < 128 && to < 128);
        match parsed {
            Some((from, to)) => map[from as usize] = Some(Program::new(to)),
            None => eprintln!("Warning! Ignored malformed argument: {}", arg),
        }
    }

    let mut mfile = match MidiFile::load(&args[1]) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("unable to read '{}': {}", args[1], e);
            exit(1);
        }
    };

    mfile.visit(&mut InstrumentMapper { map });

    if let Err(e) = mfile.save(&args[2]) {
        eprintln!("unable to write '{}': {}", args[2], e);
        exit(1);
    }
}

mod utils;

use midi_smf::core::{Channel, NoteNumber, Velocity};
use midi_smf::file::{Division, Track};
use midi_smf::{Error, MidiFile};
use utils::enable_logging;

fn file_with_ticks(division: u16, ticks: &[u32]) -> MidiFile {
    let mut file = MidiFile::new(Division::new(division));
    let mut track = Track::default();
    for &tick in ticks {
        track.push_note_on(tick, Channel::new(0), NoteNumber::new(60), Velocity::new(64));
    }
    file.push_track(track);
    file
}

fn ticks(file: &MidiFile) -> Vec<u32> {
    file.track(0)
        .unwrap()
        .events()
        .map(|event| event.tick())
        .collect()
}

#[test]
fn double_division_test() {
    enable_logging();
    let mut file = file_with_ticks(96, &[0, 5, 96]);
    file.convert_time_division(192).unwrap();
    assert_eq!(file.division().get(), 192);
    assert_eq!(ticks(&file), vec![0, 10, 192]);
}

#[test]
fn halving_rounds_down_test() {
    enable_logging();
    let mut file = file_with_ticks(96, &[3, 97]);
    file.convert_time_division(48).unwrap();
    assert_eq!(file.division().get(), 48);
    // 1.5 and 48.5 round down
    assert_eq!(ticks(&file), vec![1, 48]);
}

#[test]
fn non_integer_ratio_test() {
    enable_logging();
    let mut file = file_with_ticks(96, &[7, 48]);
    file.convert_time_division(100).unwrap();
    assert_eq!(ticks(&file), vec![7, 50]);
}

#[test]
fn same_division_test() {
    enable_logging();
    let mut file = file_with_ticks(96, &[3]);
    file.convert_time_division(96).unwrap();
    assert_eq!(file.division().get(), 96);
    assert_eq!(ticks(&file), vec![3]);
}

#[test]
fn overflow_leaves_file_untouched_test() {
    enable_logging();
    let mut file = file_with_ticks(96, &[10, u32::MAX]);
    let result = file.convert_time_division(192);
    assert!(matches!(result, Err(Error::TickOverflow { .. })));
    assert_eq!(file.division().get(), 96);
    assert_eq!(ticks(&file), vec![10, u32::MAX]);
}

#[test]
fn invalid_target_test() {
    enable_logging();
    let mut file = file_with_ticks(96, &[10]);
    assert!(matches!(
        file.convert_time_division(0),
        Err(Error::MalformedHeader { .. })
    ));
    assert!(matches!(
        file.convert_time_division(0x8000),
        Err(Error::MalformedHeader { .. })
    ));
    assert_eq!(file.division().get(), 96);
}

// MIDI writing tests
//
// These tests write the waltz arrangement to disk and read every file back
// with midly, checking the container layout rather than the exact bytes.
//
// The tests cover:
// - Exactly three files, one track each
// - Tempo and time signature meta events
// - Note counts per part
// - Error handling for invalid output locations

use compressor_advisor::midi::{self, Arrangement, MidiConfig, MidiError, TimeSignature};
use midly::{Format, MetaMessage, Smf, TrackEventKind};
use std::fs;

/// Test writing the full arrangement.
///
/// This test verifies:
/// - melody.mid, harmony.mid and bass.mid are written and nothing else
/// - Each file is a single-track file
/// - Each track carries the 88 BPM tempo and 3/4 time signature
#[test]
fn test_waltz_writes_three_single_track_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = MidiConfig {
        output_dir: dir.path().to_path_buf(),
        ..MidiConfig::default()
    };

    let written = midi::write_arrangement(&Arrangement::waltz(), &config)
        .expect("Failed to write arrangement");

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["melody.mid", "harmony.mid", "bass.mid"]);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);

    for path in &written {
        let bytes = fs::read(path).unwrap();
        let smf = Smf::parse(&bytes).expect("Written file should parse");
        assert_eq!(smf.header.format, Format::SingleTrack);
        assert_eq!(smf.tracks.len(), 1);

        let metas: Vec<MetaMessage> = smf.tracks[0]
            .iter()
            .filter_map(|e| match e.kind {
                TrackEventKind::Meta(meta) => Some(meta),
                _ => None,
            })
            .collect();
        assert!(metas
            .iter()
            .any(|m| matches!(m, MetaMessage::Tempo(t) if t.as_int() == 681_818)));
        assert!(metas
            .iter()
            .any(|m| matches!(m, MetaMessage::TimeSignature(3, 2, _, _))));
    }
}

/// Test the note content of each part through the summary reader.
///
/// This test verifies:
/// - The melody holds one note per entry, including zero-length ties
/// - Chords are written as three notes each
/// - Tempo and time signature read back as written
#[test]
fn test_part_summaries() {
    let dir = tempfile::tempdir().unwrap();
    let config = MidiConfig {
        output_dir: dir.path().to_path_buf(),
        ..MidiConfig::default()
    };
    let written = midi::write_arrangement(&Arrangement::waltz(), &config).unwrap();

    let counts: Vec<usize> = written
        .iter()
        .map(|p| midi::read_summary(p).unwrap().note_count)
        .collect();
    assert_eq!(counts, vec![28, 12, 4]);

    let bass = midi::read_summary(&written[2]).unwrap();
    assert_eq!(bass.ticks_per_quarter, 960);
    assert!((bass.tempo_bpm.unwrap() - 88.0).abs() < 0.01);
    assert_eq!(
        bass.time_signature,
        Some(TimeSignature {
            numerator: 3,
            denominator: 4
        })
    );
    // Four one-beat notes at 88 BPM
    assert_eq!(bass.duration_ms, 2727);
}

/// Test custom tempo and meter.
///
/// This test verifies:
/// - Configured tempo and time signature are written
#[test]
fn test_configured_tempo_and_meter() {
    let config = MidiConfig {
        tempo_bpm: 120,
        time_signature: TimeSignature {
            numerator: 6,
            denominator: 8,
        },
        ..MidiConfig::default()
    };
    let bytes = midi::encode_part(&Arrangement::waltz().bass_events(), &config).unwrap();
    let summary = midi::parse_summary(&bytes).unwrap();
    assert!((summary.tempo_bpm.unwrap() - 120.0).abs() < 1e-9);
    assert_eq!(summary.time_signature.unwrap().denominator, 8);
}

/// Test MIDI error cases.
///
/// This test verifies:
/// - Writing into a path blocked by a regular file fails with an IO error
/// - Garbage bytes fail to parse
#[test]
fn test_midi_error_cases() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, b"file").unwrap();

    let config = MidiConfig {
        output_dir: blocker.join("out"),
        ..MidiConfig::default()
    };
    assert!(matches!(
        midi::write_arrangement(&Arrangement::waltz(), &config),
        Err(MidiError::Io(_))
    ));

    assert!(matches!(
        midi::parse_summary(b"not midi"),
        Err(MidiError::Parse(_))
    ));
}

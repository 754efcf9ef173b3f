use super::timing::{micros_to_bpm, ticks_to_ms};
use super::types::{MidiError, TimeSignature};
use midly::{Format, MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use std::fs;
use std::path::Path;

/// What a written MIDI file contains
#[derive(Debug, Clone, PartialEq)]
pub struct MidiSummary {
    pub format: Format,
    pub track_count: usize,
    pub ticks_per_quarter: u16,
    pub tempo_bpm: Option<f64>,
    pub time_signature: Option<TimeSignature>,
    /// Note-on events with a non-zero velocity
    pub note_count: usize,
    pub duration_ms: u64,
}

pub fn read_summary(path: &Path) -> Result<MidiSummary, MidiError> {
    let midi_data = fs::read(path)?;
    parse_summary(&midi_data)
}

pub fn parse_summary(midi_data: &[u8]) -> Result<MidiSummary, MidiError> {
    let smf = Smf::parse(midi_data).map_err(|e| MidiError::Parse(e.to_string()))?;

    let ticks_per_quarter = match smf.header.timing {
        Timing::Metrical(ticks) => ticks.as_int(),
        _ => return Err(MidiError::Parse("Unsupported timing format".to_string())),
    };

    let mut tempo: Option<u32> = None;
    let mut time_signature = None;
    let mut note_count = 0usize;
    let mut last_tick: u64 = 0;

    for track in smf.tracks.iter() {
        let mut track_time: u64 = 0;
        for event in track {
            track_time += u64::from(event.delta.as_int());
            match event.kind {
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { vel, .. },
                    ..
                } if vel.as_int() > 0 => {
                    note_count += 1;
                }
                TrackEventKind::Meta(MetaMessage::Tempo(tempo_val)) => {
                    tempo.get_or_insert(tempo_val.as_int());
                }
                TrackEventKind::Meta(MetaMessage::TimeSignature(numerator, power, _, _)) => {
                    time_signature.get_or_insert(TimeSignature {
                        numerator,
                        denominator: 1u8.checked_shl(power as u32).unwrap_or(0),
                    });
                }
                _ => {}
            }
        }
        last_tick = last_tick.max(track_time);
    }

    // Default tempo (120 BPM) when the file has none
    let duration_ms = ticks_to_ms(last_tick, tempo.unwrap_or(500_000), ticks_per_quarter as u32);

    Ok(MidiSummary {
        format: smf.header.format,
        track_count: smf.tracks.len(),
        ticks_per_quarter,
        tempo_bpm: tempo.map(micros_to_bpm),
        time_signature,
        note_count,
        duration_ms,
    })
}

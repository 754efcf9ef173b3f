use super::arrangement::Arrangement;
use super::timing::{beats_to_ticks, bpm_to_micros};
use super::types::{MidiConfig, MidiError, NoteEvent, MAX_TICK};
use midly::num::{u15, u24, u28, u4, u7};
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// Ordering of simultaneous events: a note ending releases before another starts,
// a zero-length note releases after its own start.
const RELEASE: u8 = 0;
const PRESS: u8 = 1;
const ZERO_LENGTH_RELEASE: u8 = 2;

/// Builds one track: tempo and time signature at tick 0, the notes, end of track.
pub fn build_track(events: &[NoteEvent], config: &MidiConfig) -> Result<Track<'static>, MidiError> {
    config.validate()?;

    let channel = u4::new(config.channel);
    let velocity = u7::new(config.velocity);

    let mut timed: Vec<(u32, u8, MidiMessage)> = Vec::with_capacity(events.len() * 2);
    for event in events {
        let start = beats_to_ticks(event.start, config.ticks_per_quarter);
        let end = start.saturating_add(beats_to_ticks(event.duration, config.ticks_per_quarter));
        if end > MAX_TICK {
            return Err(MidiError::InvalidParams(format!(
                "Note at beat {} with duration {} ends past the last representable tick",
                event.start, event.duration
            )));
        }
        let key = u7::new(event.pitch);

        timed.push((start, PRESS, MidiMessage::NoteOn { key, vel: velocity }));
        let release = if end == start { ZERO_LENGTH_RELEASE } else { RELEASE };
        timed.push((
            end,
            release,
            MidiMessage::NoteOff {
                key,
                vel: u7::new(0),
            },
        ));
    }
    // Stable sort keeps the input order within the same tick and priority
    timed.sort_by_key(|(tick, priority, _)| (*tick, *priority));

    let signature = config.time_signature;
    let mut track: Track<'static> = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(bpm_to_micros(
                config.tempo_bpm,
            )))),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TimeSignature(
                signature.numerator,
                signature.denominator.trailing_zeros() as u8,
                24,
                8,
            )),
        },
    ];

    let mut last_tick = 0u32;
    for (tick, _, message) in timed {
        track.push(TrackEvent {
            delta: u28::new(tick - last_tick),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = tick;
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    Ok(track)
}

/// Encodes a part as a single-track standard MIDI file.
pub fn encode_part(events: &[NoteEvent], config: &MidiConfig) -> Result<Vec<u8>, MidiError> {
    let smf = part_to_smf(events, config)?;
    let mut bytes = Vec::new();
    smf.write_std(&mut bytes)?;
    Ok(bytes)
}

/// Writes a part to `path` as a single-track standard MIDI file.
pub fn write_part(path: &Path, events: &[NoteEvent], config: &MidiConfig) -> Result<(), MidiError> {
    let smf = part_to_smf(events, config)?;
    smf.save(path)?;
    debug!("Wrote {} notes to {}", events.len(), path.display());
    Ok(())
}

/// Writes melody.mid, harmony.mid and bass.mid into the configured directory.
///
/// # Returns
/// * The written paths in that order
pub fn write_arrangement(
    arrangement: &Arrangement,
    config: &MidiConfig,
) -> Result<Vec<PathBuf>, MidiError> {
    config.validate()?;
    fs::create_dir_all(&config.output_dir)?;

    let parts = [
        ("melody.mid", arrangement.melody_events()),
        ("harmony.mid", arrangement.harmony_events()),
        ("bass.mid", arrangement.bass_events()),
    ];

    let mut written = Vec::with_capacity(parts.len());
    for (file_name, events) in parts.iter() {
        let path = config.output_dir.join(file_name);
        write_part(&path, events, config)?;
        written.push(path);
    }

    info!(
        "Wrote {} MIDI files to {}",
        written.len(),
        config.output_dir.display()
    );
    Ok(written)
}

fn part_to_smf(events: &[NoteEvent], config: &MidiConfig) -> Result<Smf<'static>, MidiError> {
    let track = build_track(events, config)?;
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(config.ticks_per_quarter)),
    ));
    smf.tracks.push(track);
    Ok(smf)
}

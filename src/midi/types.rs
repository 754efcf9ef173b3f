use serde::Deserialize;
use std::path::PathBuf;

pub type MidiNote = u8;

/// Largest microseconds-per-quarter value a tempo event can hold
pub const MAX_TEMPO_MICROS: u32 = 0x00FF_FFFF;

/// Largest tick position a track event delta can reach
pub const MAX_TICK: u32 = 0x0FFF_FFFF;

/// A note in a part, duration in quarter notes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub pitch: MidiNote,
    pub duration: f32,
}

impl Note {
    pub const fn new(pitch: MidiNote, duration: f32) -> Self {
        Note { pitch, duration }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordQuality {
    Dominant7,
    Major,
}

impl ChordQuality {
    /// Semitone offsets written for this quality.
    ///
    /// Both qualities are voiced as the plain triad.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordQuality::Dominant7 => &[0, 4, 7],
            ChordQuality::Major => &[0, 4, 7],
        }
    }
}

/// A chord given by its root note and quality
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chord {
    pub root: MidiNote,
    pub quality: ChordQuality,
}

impl Chord {
    pub const fn new(root: MidiNote, quality: ChordQuality) -> Self {
        Chord { root, quality }
    }

    pub fn pitches(&self) -> Vec<MidiNote> {
        self.quality
            .intervals()
            .iter()
            .map(|&offset| self.root.wrapping_add(offset))
            .collect()
    }
}

/// A note placed in time, in beats (quarter notes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    pub pitch: MidiNote,
    pub start: f32,
    pub duration: f32,
}

/// Time signature as written on the staff, e.g. 3/4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TimeSignature {
    pub numerator: u8,
    pub denominator: u8,
}

/// Settings shared by every written MIDI file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MidiConfig {
    pub tempo_bpm: u32,
    pub time_signature: TimeSignature,
    pub ticks_per_quarter: u16,
    pub velocity: u8,
    pub channel: u8,
    /// Directory the part files are written to
    pub output_dir: PathBuf,
}

impl Default for MidiConfig {
    fn default() -> Self {
        MidiConfig {
            tempo_bpm: 88,
            time_signature: TimeSignature {
                numerator: 3,
                denominator: 4,
            },
            ticks_per_quarter: 960,
            velocity: 100,
            channel: 0,
            output_dir: PathBuf::from("."),
        }
    }
}

/// Errors that can occur while writing MIDI files
#[derive(Debug, thiserror::Error)]
pub enum MidiError {
    /// IO errors when reading/writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be parsed
    #[error("MIDI parsing error: {0}")]
    Parse(String),

    /// Invalid configuration values
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

impl MidiConfig {
    /// Checks the values that the file format cannot represent.
    pub fn validate(&self) -> Result<(), MidiError> {
        if self.tempo_bpm == 0 {
            return Err(MidiError::InvalidParams(
                "Tempo must be greater than zero".to_string(),
            ));
        }
        // The tempo meta event stores microseconds per quarter in 24 bits
        if 60_000_000 / self.tempo_bpm > MAX_TEMPO_MICROS {
            return Err(MidiError::InvalidParams(format!(
                "Tempo of {} BPM is too slow to encode",
                self.tempo_bpm
            )));
        }
        let denominator = self.time_signature.denominator;
        if denominator == 0 || !denominator.is_power_of_two() {
            return Err(MidiError::InvalidParams(format!(
                "Time signature denominator must be a power of two, got {}",
                denominator
            )));
        }
        if self.ticks_per_quarter == 0 || self.ticks_per_quarter > 0x7FFF {
            return Err(MidiError::InvalidParams(format!(
                "Ticks per quarter must be between 1 and 32767, got {}",
                self.ticks_per_quarter
            )));
        }
        if self.velocity > 127 {
            return Err(MidiError::InvalidParams(format!(
                "Velocity must be at most 127, got {}",
                self.velocity
            )));
        }
        if self.channel > 15 {
            return Err(MidiError::InvalidParams(format!(
                "Channel must be between 0 and 15, got {}",
                self.channel
            )));
        }
        Ok(())
    }
}

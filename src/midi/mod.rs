/// Fixed-arrangement MIDI writing.
///
/// Each part of an [`Arrangement`] is written to its own single-track file with a
/// tempo and time-signature header, and can be read back as a [`MidiSummary`].
mod arrangement;
mod parser;
mod timing;
mod types;
mod writer;

pub use arrangement::Arrangement;
pub use parser::{parse_summary, read_summary, MidiSummary};
pub use timing::{beats_to_ticks, bpm_to_micros};
pub use types::{Chord, ChordQuality, MidiConfig, MidiError, MidiNote, Note, NoteEvent, TimeSignature};
pub use writer::{build_track, encode_part, write_arrangement, write_part};

use super::types::{Chord, ChordQuality, Note, NoteEvent};

/// The three independent parts written to separate files
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    pub melody: Vec<Note>,
    pub harmony: Vec<Chord>,
    pub bass: Vec<Note>,
}

impl Arrangement {
    /// The waltz in 3/4: melody from bar 5 on, four bars of harmony and bass.
    pub fn waltz() -> Self {
        let melody = vec![
            // Bar 5
            Note::new(60, 1.0),
            Note::new(62, 1.0),
            Note::new(64, 1.0),
            // Bar 6
            Note::new(66, 2.0),
            Note::new(64, 1.0),
            // Bar 7
            Note::new(62, 2.0),
            Note::new(60, 1.0),
            // Bars 8-9, B tied over the barline
            Note::new(59, 4.0),
            Note::new(59, 0.0),
            // Bars 10-11
            Note::new(60, 1.0),
            Note::new(62, 1.0),
            Note::new(64, 1.0),
            Note::new(66, 2.0),
            Note::new(64, 1.0),
            // Bars 12-13
            Note::new(62, 2.0),
            Note::new(60, 1.0),
            Note::new(59, 4.0),
            Note::new(59, 0.0),
            // Bars 14-15
            Note::new(60, 1.0),
            Note::new(62, 1.0),
            Note::new(64, 1.0),
            Note::new(60, 1.0),
            Note::new(62, 1.0),
            Note::new(64, 1.0),
            // Bars 16-19
            Note::new(59, 1.0),
            Note::new(60, 1.0),
            Note::new(62, 1.0),
            Note::new(64, 1.0),
        ];

        let harmony = vec![
            Chord::new(54, ChordQuality::Dominant7), // F#7
            Chord::new(52, ChordQuality::Dominant7), // E7
            Chord::new(59, ChordQuality::Major),     // B
            Chord::new(59, ChordQuality::Major),     // B
        ];

        let bass = vec![
            Note::new(36, 1.0),
            Note::new(34, 1.0),
            Note::new(41, 1.0),
            Note::new(41, 1.0),
        ];

        Arrangement {
            melody,
            harmony,
            bass,
        }
    }

    pub fn melody_events(&self) -> Vec<NoteEvent> {
        notes_to_events(&self.melody)
    }

    /// Every chord tone starts on the chord's beat and lasts one beat.
    pub fn harmony_events(&self) -> Vec<NoteEvent> {
        self.harmony
            .iter()
            .enumerate()
            .flat_map(|(i, chord)| {
                chord.pitches().into_iter().map(move |pitch| NoteEvent {
                    pitch,
                    start: i as f32,
                    duration: 1.0,
                })
            })
            .collect()
    }

    pub fn bass_events(&self) -> Vec<NoteEvent> {
        notes_to_events(&self.bass)
    }
}

/// Note `i` starts on beat `i`, whatever the previous note's length.
fn notes_to_events(notes: &[Note]) -> Vec<NoteEvent> {
    notes
        .iter()
        .enumerate()
        .map(|(i, note)| NoteEvent {
            pitch: note.pitch,
            start: i as f32,
            duration: note.duration,
        })
        .collect()
}

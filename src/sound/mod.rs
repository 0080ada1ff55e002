//! Sound patterns: the compact note/tone/volume/effect text encoding, the
//! immutable [`Sound`] it parses into, and the [`PatternStore`] that owns
//! every defined sound.

pub mod envelope;
pub mod error;
pub mod note;
pub mod parser;
pub mod store;
pub mod tone;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use envelope::{Effect, Volume};
pub use error::{LookupError, ParseError, ParseErrorKind};
pub use note::{Accidental, Note, Pitch, PitchClass};
pub use parser::{parse_sound, MAX_SPEED};
pub use store::{PatternStore, Playlist};
pub use tone::Tone;

/// Identifies a sound in the [`PatternStore`]. Ids are chosen by the caller.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SoundId(pub u32);

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One expanded step of a sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub note: Note,
    pub volume: Volume,
    pub effect: Effect,
}

/// A validated, immutable sound pattern.
///
/// Always has at least one step, and every step carries its own note,
/// volume and effect, so the three sequences have equal length by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    tone: Tone,
    speed: u32,
    steps: Vec<Step>,
}

impl Sound {
    /// Parse a sound from its text encoding. See [`parse_sound`].
    pub fn parse(
        notes: &str,
        tone: &str,
        volume: &str,
        effect: &str,
        speed: i64,
    ) -> Result<Self, ParseError> {
        parse_sound(notes, tone, volume, effect, speed)
    }

    pub(crate) fn from_parts(tone: Tone, speed: u32, steps: Vec<Step>) -> Self {
        debug_assert!(speed > 0);
        debug_assert!(!steps.is_empty());
        Self { tone, speed, steps }
    }

    /// Waveform every step of this sound is voiced with.
    pub fn tone(&self) -> Tone {
        self.tone
    }

    /// Ticks per step. Smaller is faster.
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// All steps in play order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Note of each step, rests included.
    pub fn notes(&self) -> impl Iterator<Item = Note> + '_ {
        self.steps.iter().map(|s| s.note)
    }

    pub fn volumes(&self) -> impl Iterator<Item = Volume> + '_ {
        self.steps.iter().map(|s| s.volume)
    }

    pub fn effects(&self) -> impl Iterator<Item = Effect> + '_ {
        self.steps.iter().map(|s| s.effect)
    }

    /// Total playing time in ticks.
    pub fn total_ticks(&self) -> u64 {
        self.steps.len() as u64 * self.speed as u64
    }
}

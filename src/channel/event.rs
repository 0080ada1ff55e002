//! Step events: what a channel hands to the audio device when a step starts.

use crate::sound::{Effect, Pitch, Sound, Step, Tone, Volume};

/// The `(tone, pitch-or-rest, volume, effect)` tuple for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEvent {
    pub tone: Tone,
    /// `None` for a rest: the device stays silent for the step.
    pub pitch: Option<Pitch>,
    pub volume: Volume,
    pub effect: Effect,
    /// How many ticks the step lasts.
    pub ticks: u32,
}

impl StepEvent {
    pub fn new(sound: &Sound, step: &Step) -> Self {
        Self {
            tone: sound.tone(),
            pitch: step.note.pitch(),
            volume: step.volume,
            effect: step.effect,
            ticks: sound.speed(),
        }
    }

    pub fn is_rest(&self) -> bool {
        self.pitch.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_sound_tone_and_speed() {
        let sound = Sound::parse("c1 r", "s", "52", "vn", 9).unwrap();
        let first = StepEvent::new(&sound, &sound.steps()[0]);
        assert_eq!(first.tone, Tone::Square);
        assert_eq!(first.ticks, 9);
        assert_eq!(first.volume.level(), 5);
        assert_eq!(first.effect, Effect::Vibrato);
        assert!(!first.is_rest());

        let rest = StepEvent::new(&sound, &sound.steps()[1]);
        assert!(rest.is_rest());
        assert_eq!(rest.volume.level(), 2);
    }
}

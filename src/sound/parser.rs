//! Sound parser: the four text encodings plus a speed, validated and
//! expanded into one [`Sound`] whose per-step arrays all have equal length.

use super::envelope::{cycle_to, parse_effects, parse_volumes};
use super::error::ParseError;
use super::note::parse_notes;
use super::tone::parse_tone;
use super::{Sound, Step};

/// Parse and validate a sound definition.
///
/// Fields are checked in order: notes, tone, volume, effect, speed. The first
/// failing field is reported. Volume and effect strings shorter than the note
/// count repeat from the start; longer ones are rejected. Speed is a tick
/// count in `1..=MAX_SPEED`.
pub fn parse_sound(
    notes: &str,
    tone: &str,
    volume: &str,
    effect: &str,
    speed: i64,
) -> Result<Sound, ParseError> {
    let notes = parse_notes(notes)?;
    let tone = parse_tone(tone)?;
    let step_count = notes.len();

    let volumes = parse_volumes(volume)?;
    let volumes = cycle_to(&volumes, step_count).ok_or_else(|| {
        ParseError::InvalidVolume(format!(
            "{} levels for {step_count} notes",
            volumes.len()
        ))
    })?;

    let effects = parse_effects(effect)?;
    let effects = cycle_to(&effects, step_count).ok_or_else(|| {
        ParseError::InvalidEffect(format!(
            "{} effects for {step_count} notes",
            effects.len()
        ))
    })?;

    let speed = parse_speed(speed)?;

    let steps = notes
        .into_iter()
        .zip(volumes)
        .zip(effects)
        .map(|((note, volume), effect)| Step {
            note,
            volume,
            effect,
        })
        .collect();

    Ok(Sound::from_parts(tone, speed, steps))
}

/// Largest accepted speed, in ticks per step.
pub const MAX_SPEED: u32 = u32::MAX;

fn parse_speed(speed: i64) -> Result<u32, ParseError> {
    match u32::try_from(speed) {
        Ok(s) if s > 0 => Ok(s),
        _ => Err(ParseError::InvalidSpeed(speed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::{Accidental, Effect, Note, ParseErrorKind, PitchClass, Tone};

    #[test]
    fn single_step_sound() {
        let sound = parse_sound("c1", "t", "7", "n", 30).unwrap();
        assert_eq!(sound.len(), 1);
        assert_eq!(sound.tone(), Tone::Triangle);
        assert_eq!(sound.speed(), 30);

        let step = sound.steps()[0];
        let pitch = step.note.pitch().unwrap();
        assert_eq!(pitch.class, PitchClass::C);
        assert_eq!(pitch.octave, 1);
        assert_eq!(pitch.accidental, Accidental::Natural);
        assert_eq!(step.volume.level(), 7);
        assert_eq!(step.effect, Effect::None);
    }

    #[test]
    fn volume_cycles_over_notes() {
        let sound = parse_sound("c1c1c1c1", "s", "07", "n", 10).unwrap();
        let levels: Vec<u8> = sound.volumes().map(|v| v.level()).collect();
        assert_eq!(levels, vec![0, 7, 0, 7]);
    }

    #[test]
    fn effect_cycles_over_notes() {
        let sound = parse_sound("c1 d1 e1 f1 g1", "p", "6", "vf", 10).unwrap();
        let effects: Vec<Effect> = sound.effects().collect();
        assert_eq!(
            effects,
            vec![
                Effect::Vibrato,
                Effect::FadeOut,
                Effect::Vibrato,
                Effect::FadeOut,
                Effect::Vibrato,
            ]
        );
    }

    #[test]
    fn rest_only_sound() {
        let sound = parse_sound("r", "n", "5", "f", 8).unwrap();
        assert_eq!(sound.notes().collect::<Vec<_>>(), vec![Note::Rest]);
    }

    #[test]
    fn longer_volume_than_notes_rejected() {
        let err = parse_sound("c1", "t", "77", "n", 30).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::InvalidVolume);
    }

    #[test]
    fn longer_effect_than_notes_rejected() {
        let err = parse_sound("c1", "t", "7", "nn", 30).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::InvalidEffect);
    }

    #[test]
    fn speed_must_be_positive() {
        assert_eq!(
            parse_sound("c1", "t", "7", "n", 0).unwrap_err(),
            ParseError::InvalidSpeed(0)
        );
        assert_eq!(
            parse_sound("c1", "t", "7", "n", -4).unwrap_err(),
            ParseError::InvalidSpeed(-4)
        );
        assert!(parse_sound("c1", "t", "7", "n", 1).is_ok());
    }

    #[test]
    fn speed_upper_bound() {
        let max = MAX_SPEED as i64;
        assert_eq!(parse_sound("c1", "t", "7", "n", max).unwrap().speed(), MAX_SPEED);
        assert_eq!(
            parse_sound("c1", "t", "7", "n", max + 1).unwrap_err(),
            ParseError::InvalidSpeed(max + 1)
        );
    }

    #[test]
    fn first_failing_field_is_reported() {
        let err = parse_sound("h1", "x", "9", "q", 0).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::InvalidNoteToken);

        let err = parse_sound("c1", "x", "9", "q", 0).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::InvalidTone);

        let err = parse_sound("c1", "t", "9", "q", 0).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::InvalidVolume);

        let err = parse_sound("c1", "t", "7", "q", 0).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::InvalidEffect);
    }

    #[test]
    fn expanded_sequences_have_equal_length() {
        let cases = [
            ("e2e2c2g1 g1g1c2e2", "p", "6", "vffn fnff"),
            ("f0ra4r f0ra4r f0ra4r f0f0a4r", "n", "6622 6622 6622 6422", "f"),
            ("c1 d#2 e-3 r", "s", "1234", "nsvf"),
            ("a0", "t", "0", "s"),
        ];
        for (notes, tone, volume, effect) in cases {
            let sound = parse_sound(notes, tone, volume, effect, 7).unwrap();
            assert_eq!(sound.notes().count(), sound.len());
            assert_eq!(sound.volumes().count(), sound.len());
            assert_eq!(sound.effects().count(), sound.len());
        }
    }
}

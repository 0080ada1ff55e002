//! Per-step volume and effect strings, and the cycling rule that stretches
//! them over the note sequence.

use std::fmt;

use super::error::ParseError;

/// A step volume level in `0..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Volume(u8);

impl Volume {
    pub const MAX: Volume = Volume(7);
    pub const SILENT: Volume = Volume(0);

    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::MAX.0).then_some(Volume(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Linear gain in `0.0..=1.0`.
    pub fn gain(self) -> f32 {
        self.0 as f32 / Self::MAX.0 as f32
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-step modulation tag. Shaping is left to the audio device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Effect {
    #[default]
    None,
    Slide,
    Vibrato,
    FadeOut,
}

impl Effect {
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_lowercase() {
            'n' => Some(Effect::None),
            's' => Some(Effect::Slide),
            'v' => Some(Effect::Vibrato),
            'f' => Some(Effect::FadeOut),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Effect::None => 'n',
            Effect::Slide => 's',
            Effect::Vibrato => 'v',
            Effect::FadeOut => 'f',
        }
    }
}

/// Parse a volume string (`"6622 6622"`) into its levels, unexpanded.
pub fn parse_volumes(text: &str) -> Result<Vec<Volume>, ParseError> {
    let mut levels = Vec::new();
    for (position, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let level = ch
            .to_digit(10)
            .and_then(|d| Volume::new(d as u8))
            .ok_or_else(|| {
                ParseError::InvalidVolume(format!("'{ch}' at position {position} is not 0-7"))
            })?;
        levels.push(level);
    }

    if levels.is_empty() {
        return Err(ParseError::InvalidVolume("volume string is empty".into()));
    }
    Ok(levels)
}

/// Parse an effect string (`"vffn fnff"`) into its tags, unexpanded.
pub fn parse_effects(text: &str) -> Result<Vec<Effect>, ParseError> {
    let mut effects = Vec::new();
    for (position, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let effect = Effect::from_code(ch).ok_or_else(|| {
            ParseError::InvalidEffect(format!(
                "'{ch}' at position {position} is not one of n, s, v, f"
            ))
        })?;
        effects.push(effect);
    }

    if effects.is_empty() {
        return Err(ParseError::InvalidEffect("effect string is empty".into()));
    }
    Ok(effects)
}

/// Repeat `pattern` until it covers exactly `len` steps.
///
/// Returns `None` if the pattern is empty or longer than `len`.
pub fn cycle_to<T: Copy>(pattern: &[T], len: usize) -> Option<Vec<T>> {
    if pattern.is_empty() || pattern.len() > len {
        return None;
    }
    Some(pattern.iter().copied().cycle().take(len).collect())
}

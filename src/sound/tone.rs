//! Tone codes: the oscillator waveform a sound is rendered with.

use std::fmt;

use super::error::ParseError;

/// Oscillator waveform category, fixed for a whole sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Triangle,
    Square,
    Pulse,
    Noise,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Triangle, Tone::Square, Tone::Pulse, Tone::Noise];

    /// Map a single tone letter (case-insensitive) to its tone.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_lowercase() {
            't' => Some(Tone::Triangle),
            's' => Some(Tone::Square),
            'p' => Some(Tone::Pulse),
            'n' => Some(Tone::Noise),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Tone::Triangle => 't',
            Tone::Square => 's',
            Tone::Pulse => 'p',
            Tone::Noise => 'n',
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tone::Triangle => "triangle",
            Tone::Square => "square",
            Tone::Pulse => "pulse",
            Tone::Noise => "noise",
        };
        f.write_str(name)
    }
}

/// Parse a tone string. Surrounding whitespace is ignored; anything other
/// than exactly one tone letter fails.
pub fn parse_tone(text: &str) -> Result<Tone, ParseError> {
    let mut chars = text.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Tone::from_code(c).ok_or_else(|| ParseError::InvalidTone(text.into())),
        _ => Err(ParseError::InvalidTone(text.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_codes() {
        assert_eq!(parse_tone("t"), Ok(Tone::Triangle));
        assert_eq!(parse_tone("s"), Ok(Tone::Square));
        assert_eq!(parse_tone("p"), Ok(Tone::Pulse));
        assert_eq!(parse_tone("n"), Ok(Tone::Noise));
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(parse_tone("P"), Ok(Tone::Pulse));
        assert_eq!(parse_tone(" T "), Ok(Tone::Triangle));
    }

    #[test]
    fn unknown_code() {
        assert_eq!(parse_tone("x"), Err(ParseError::InvalidTone("x".into())));
    }

    #[test]
    fn empty_and_multi_letter_rejected() {
        assert!(parse_tone("").is_err());
        assert!(parse_tone("tt").is_err());
        assert!(parse_tone("tri").is_err());
    }

    #[test]
    fn code_round_trip() {
        for tone in Tone::ALL {
            assert_eq!(Tone::from_code(tone.code()), Some(tone));
        }
    }
}

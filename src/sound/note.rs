//! Note strings: converts "e2e2c2g1 r a1" into a sequence of [`Note`]s.
//!
//! Grammar per token: `<letter><optional accidental><octave>` or `r`.
//! - Letter: A to G, case-insensitive
//! - Accidental: `#` (sharp) or `-` (flat)
//! - Octave: 0 to 4
//!
//! Whitespace between tokens is ignored; tokens may also be written back to
//! back (`c1c1c1`).

use std::fmt;

use super::error::ParseError;

/// Highest chip note number (B4).
pub const MAX_NOTE: u8 = 59;

/// Highest octave digit accepted in a note token.
pub const MAX_OCTAVE: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl PitchClass {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'C' => Some(PitchClass::C),
            'D' => Some(PitchClass::D),
            'E' => Some(PitchClass::E),
            'F' => Some(PitchClass::F),
            'G' => Some(PitchClass::G),
            'A' => Some(PitchClass::A),
            'B' => Some(PitchClass::B),
            _ => None,
        }
    }

    /// Semitones above C within the octave.
    pub fn semitone(self) -> i32 {
        match self {
            PitchClass::C => 0,
            PitchClass::D => 2,
            PitchClass::E => 4,
            PitchClass::F => 5,
            PitchClass::G => 7,
            PitchClass::A => 9,
            PitchClass::B => 11,
        }
    }

    pub fn letter(self) -> char {
        match self {
            PitchClass::C => 'C',
            PitchClass::D => 'D',
            PitchClass::E => 'E',
            PitchClass::F => 'F',
            PitchClass::G => 'G',
            PitchClass::A => 'A',
            PitchClass::B => 'B',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    pub fn offset(self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }
}

/// A sounding pitch: exactly one pitch class and one octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub class: PitchClass,
    pub accidental: Accidental,
    pub octave: u8,
}

impl Pitch {
    pub fn new(class: PitchClass, accidental: Accidental, octave: u8) -> Self {
        Self {
            class,
            accidental,
            octave,
        }
    }

    /// Chip note number, C0 = 0 through B4 = 59.
    ///
    /// Returns `None` when the accidental pushes the pitch off either end of
    /// the range (`c-0`, `b#4`).
    pub fn number(&self) -> Option<u8> {
        let n = self.octave as i32 * 12 + self.class.semitone() + self.accidental.offset();
        if (0..=MAX_NOTE as i32).contains(&n) {
            Some(n as u8)
        } else {
            None
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let accidental = match self.accidental {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "-",
        };
        write!(f, "{}{}{}", self.class.letter(), accidental, self.octave)
    }
}

/// One step of a note sequence: a pitch or a rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Note {
    Rest,
    Pitch(Pitch),
}

impl Note {
    pub fn pitch(&self) -> Option<Pitch> {
        match self {
            Note::Rest => None,
            Note::Pitch(p) => Some(*p),
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Note::Rest)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::Rest => write!(f, "R"),
            Note::Pitch(p) => write!(f, "{p}"),
        }
    }
}

/// Parse a note string into its notes, left to right.
pub fn parse_notes(text: &str) -> Result<Vec<Note>, ParseError> {
    NoteLexer::new(text).tokenize()
}

struct NoteLexer {
    chars: Vec<char>,
    pos: usize,
}

impl NoteLexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn tokenize(&mut self) -> Result<Vec<Note>, ParseError> {
        let mut notes = Vec::new();

        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            notes.push(self.lex_note()?);
        }

        if notes.is_empty() {
            return Err(ParseError::InvalidNoteToken {
                token: String::new(),
                position: 0,
            });
        }

        Ok(notes)
    }

    fn lex_note(&mut self) -> Result<Note, ParseError> {
        let start = self.pos;
        let ch = self.advance();

        if ch == 'r' || ch == 'R' {
            return Ok(Note::Rest);
        }

        let Some(class) = PitchClass::from_char(ch) else {
            return Err(self.invalid_token(start));
        };

        let accidental = match self.peek() {
            Some('#') => {
                self.advance();
                Accidental::Sharp
            }
            Some('-') => {
                self.advance();
                Accidental::Flat
            }
            _ => Accidental::Natural,
        };

        let octave = match self.peek().and_then(|c| c.to_digit(10)) {
            Some(d) if d <= MAX_OCTAVE as u32 => {
                self.advance();
                d as u8
            }
            _ => return Err(self.invalid_token(start)),
        };

        let pitch = Pitch::new(class, accidental, octave);
        if pitch.number().is_none() {
            return Err(self.invalid_token(start));
        }

        Ok(Note::Pitch(pitch))
    }

    /// Build the error for the token starting at `start`, covering as much
    /// of `<letter>[#-]<digit>` as is present.
    fn invalid_token(&self, start: usize) -> ParseError {
        let mut end = start + 1;
        if matches!(self.chars.get(end), Some('#') | Some('-')) {
            end += 1;
        }
        if self.chars.get(end).is_some_and(|c| c.is_ascii_digit()) {
            end += 1;
        }
        let end = end.min(self.chars.len());
        ParseError::InvalidNoteToken {
            token: self.chars[start..end].iter().collect(),
            position: start,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        ch
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }
}

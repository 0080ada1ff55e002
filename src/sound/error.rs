//! Error types for sound parsing and sound lookup.

use super::SoundId;

/// Which part of a sound definition failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    InvalidNoteToken,
    InvalidTone,
    InvalidVolume,
    InvalidEffect,
    InvalidSpeed,
}

/// An error raised while building a [`Sound`](super::Sound) from its text encoding.
///
/// Only sound construction produces these; playback never does.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A note token did not match `[A-G][#-]?[0-4]` or `r`.
    #[error("invalid note token '{token}' at position {position}")]
    InvalidNoteToken { token: String, position: usize },

    /// The tone string was not exactly one of `t`, `s`, `p`, `n`.
    #[error("invalid tone '{0}' (expected one of t, s, p, n)")]
    InvalidTone(String),

    #[error("invalid volume: {0}")]
    InvalidVolume(String),

    #[error("invalid effect: {0}")]
    InvalidEffect(String),

    /// Speed must be a positive number of ticks per step.
    #[error("invalid speed {0} (must be a positive integer)")]
    InvalidSpeed(i64),
}

impl ParseError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ParseError::InvalidNoteToken { .. } => ParseErrorKind::InvalidNoteToken,
            ParseError::InvalidTone(_) => ParseErrorKind::InvalidTone,
            ParseError::InvalidVolume(_) => ParseErrorKind::InvalidVolume,
            ParseError::InvalidEffect(_) => ParseErrorKind::InvalidEffect,
            ParseError::InvalidSpeed(_) => ParseErrorKind::InvalidSpeed,
        }
    }
}

/// Raised when a playlist names a sound that was never defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("unknown sound id {0}")]
    UnknownSoundId(SoundId),
}

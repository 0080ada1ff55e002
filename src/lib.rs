//! chipseq: a multi-channel chiptune sequencer with a compact pattern
//! language for notes, tones, volumes and effects.

pub mod app;
pub mod audio;
pub mod channel;
pub mod config;
pub mod controller;
pub mod session;
pub mod sound;
pub mod transport;

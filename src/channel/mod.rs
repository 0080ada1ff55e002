//! Channel player: one per output channel. Holds a playlist and a cursor,
//! and advances one tick at a time.
//!
//! Tick model: when a step begins the player emits its [`StepEvent`] and
//! loads the sound's speed as the step's remaining ticks. Every tick
//! consumes one; the cursor moves on when the count reaches zero. A step at
//! speed 30 is therefore held for exactly 30 ticks.

pub mod event;

pub use event::StepEvent;

use crate::sound::{Playlist, Sound, Step};

/// Playback state of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Stopped,
    /// Plays the playlist once, then stops.
    Playing,
    /// Restarts from the first sound when the playlist runs out.
    Looping,
}

/// Where a channel is within its playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Index of the current sound in the playlist.
    pub sound: usize,
    /// Index of the current step within that sound.
    pub step: usize,
    /// Ticks left in the current step. Zero means the step has not started.
    pub remaining: u32,
}

/// Plays one playlist on one channel.
#[derive(Debug, Clone, Default)]
pub struct ChannelPlayer {
    playlist: Playlist,
    state: PlayState,
    cursor: Cursor,
}

impl ChannelPlayer {
    /// Create a stopped player.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any current playback with `playlist`, starting at its first
    /// step. An empty playlist stops the channel.
    pub fn play(&mut self, playlist: Playlist, looping: bool) {
        if playlist.is_empty() {
            self.stop();
            return;
        }
        self.playlist = playlist;
        self.cursor = Cursor::default();
        self.state = if looping {
            PlayState::Looping
        } else {
            PlayState::Playing
        };
    }

    /// Stop and discard the playlist and cursor. Idempotent.
    pub fn stop(&mut self) {
        self.state = PlayState::Stopped;
        self.playlist = Playlist::default();
        self.cursor = Cursor::default();
    }

    /// Advance by one tick.
    ///
    /// Returns the step event when a new step starts on this tick (rests
    /// included), `None` while a step is held or the channel is stopped.
    pub fn tick(&mut self) -> Option<StepEvent> {
        if self.state == PlayState::Stopped {
            return None;
        }

        let mut started = None;
        if self.cursor.remaining == 0 {
            let Some((sound, step)) = self.current() else {
                self.stop();
                return None;
            };
            started = Some(StepEvent::new(sound, step));
            self.cursor.remaining = sound.speed();
        }

        self.cursor.remaining -= 1;
        if self.cursor.remaining == 0 {
            self.advance_cursor();
        }

        started
    }

    /// Whether the player is stopped, playing once or looping.
    pub fn state(&self) -> PlayState {
        self.state
    }

    /// Shorthand for `state() == PlayState::Stopped`.
    pub fn is_stopped(&self) -> bool {
        self.state == PlayState::Stopped
    }

    /// Current position, or `None` when stopped.
    pub fn cursor(&self) -> Option<Cursor> {
        (!self.is_stopped()).then_some(self.cursor)
    }

    /// Sounds being played. Empty once the player stops.
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// The sound under the cursor.
    pub fn current_sound(&self) -> Option<&Sound> {
        self.current().map(|(sound, _)| sound)
    }

    fn current(&self) -> Option<(&Sound, &Step)> {
        let sound = self.playlist.get(self.cursor.sound)?;
        let step = sound.step(self.cursor.step)?;
        Some((sound, step))
    }

    fn advance_cursor(&mut self) {
        self.cursor.step += 1;
        let sound_len = self.playlist.get(self.cursor.sound).map_or(0, Sound::len);
        if self.cursor.step < sound_len {
            return;
        }

        self.cursor.step = 0;
        self.cursor.sound += 1;
        if self.cursor.sound < self.playlist.len() {
            return;
        }

        match self.state {
            PlayState::Looping => self.cursor.sound = 0,
            _ => self.stop(),
        }
    }
}

//! Transport clock: drives every channel forward in lock-step, one tick per
//! host frame.
//!
//! Each advance ticks the players in ascending channel order, then hands the
//! started steps to the audio device in the same order. Players only ever
//! read their own cursor, so a channel never sees another channel's
//! post-tick state.

use std::time::Duration;

use crate::audio::AudioDevice;
use crate::channel::StepEvent;
use crate::controller::PlaybackController;

/// Frame rate used when none is configured.
pub const DEFAULT_FPS: u32 = 60;

/// Whether the clock is ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Running,
    Paused,
}

/// Fixed-rate tick source for all channel players.
#[derive(Debug)]
pub struct TransportClock {
    fps: u32,
    state: ClockState,
    frame: u64,
    /// Channels the device was last told to sound.
    voiced: Vec<bool>,
    started: Vec<(usize, StepEvent)>,
}

impl TransportClock {
    /// Create a running clock at `fps` frames per second (at least 1).
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.max(1),
            state: ClockState::Running,
            frame: 0,
            voiced: Vec::new(),
            started: Vec::new(),
        }
    }

    /// Advance one frame: release channels that fell silent since the last
    /// frame, tick every player, then emit the steps that started.
    ///
    /// Returns the number of step events emitted. A paused clock does
    /// nothing.
    pub fn advance(
        &mut self,
        controller: &mut PlaybackController,
        device: &mut dyn AudioDevice,
    ) -> usize {
        if self.state == ClockState::Paused {
            return 0;
        }

        let players = controller.players_mut();
        self.voiced.resize(players.len(), false);

        for (channel, player) in players.iter().enumerate() {
            if player.is_stopped() && self.voiced[channel] {
                device.release(channel);
                self.voiced[channel] = false;
            }
        }

        self.started.clear();
        for (channel, player) in players.iter_mut().enumerate() {
            if let Some(event) = player.tick() {
                self.started.push((channel, event));
            }
        }

        for (channel, event) in &self.started {
            tracing::trace!(frame = self.frame, channel, ?event, "step");
            device.emit(*channel, event);
            self.voiced[*channel] = true;
        }

        self.frame += 1;
        self.started.len()
    }

    pub fn pause(&mut self) {
        self.state = ClockState::Paused;
    }

    pub fn resume(&mut self) {
        self.state = ClockState::Running;
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            ClockState::Running => ClockState::Paused,
            ClockState::Paused => ClockState::Running,
        };
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == ClockState::Paused
    }

    /// Frames advanced so far (paused frames not counted).
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Ticks per second.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Wall-clock length of one frame.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }

    /// Playback time covered by the frames advanced so far.
    pub fn elapsed_secs(&self) -> f64 {
        self.frame as f64 / self.fps as f64
    }

    /// Reset the frame counter without changing the running state.
    pub fn reset(&mut self) {
        self.frame = 0;
        self.voiced.clear();
    }
}

impl Default for TransportClock {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

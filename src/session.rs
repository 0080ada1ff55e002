//! A built song ready to play: the pattern store, the channel controller and
//! the presets that drive it.

use std::time::Duration;

use crate::audio::ChipSynth;
use crate::controller::{find_preset, ControllerError, PlaybackController, Preset};
use crate::sound::PatternStore;
use crate::transport::TransportClock;

/// Longest offline render accepted, in seconds.
pub const MAX_RENDER_SECS: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum DurationError {
    #[error("duration must be a finite, non-negative number of seconds, got {0}")]
    Invalid(f64),
    #[error("duration {secs}s is longer than the {max}s limit")]
    TooLong { secs: f64, max: f64 },
}

/// Convert a user-supplied number of seconds into a [`Duration`].
///
/// Rejects NaN, infinities, negative values and anything too large to
/// represent.
pub fn checked_duration(secs: f64) -> Result<Duration, DurationError> {
    Duration::try_from_secs_f64(secs).map_err(|_| DurationError::Invalid(secs))
}

#[derive(Debug)]
pub struct Session {
    pub store: PatternStore,
    pub controller: PlaybackController,
    pub presets: Vec<Preset>,
    pub channel_names: Vec<String>,
    pub fps: u32,
    pub sample_rate: u32,
}

impl Session {
    pub fn channel_count(&self) -> usize {
        self.controller.channel_count()
    }

    /// Display name from the song config.
    pub fn channel_name(&self, channel: usize) -> Option<&str> {
        self.channel_names.get(channel).map(String::as_str)
    }

    /// Preset bound to `key`, if any.
    pub fn preset(&self, key: char) -> Option<&Preset> {
        find_preset(&self.presets, key)
    }

    /// Apply the preset bound to `key`.
    ///
    /// Returns `Ok(false)` when no preset uses that key.
    pub fn apply_preset(&mut self, key: char) -> Result<bool, ControllerError> {
        let Some(preset) = find_preset(&self.presets, key) else {
            return Ok(false);
        };
        tracing::info!(key = %key, label = %preset.label, "preset");
        let selection = preset.selection();
        self.controller.set_active(&self.store, &selection)?;
        Ok(true)
    }

    /// Run the sequencer offline for `seconds` and return the interleaved
    /// samples it produced.
    ///
    /// Starts from the controller's current state and leaves it wherever
    /// playback got to. `seconds` must be finite, non-negative and at most
    /// [`MAX_RENDER_SECS`].
    pub fn render_offline(
        &mut self,
        seconds: f64,
        channels: u16,
        seed: u64,
    ) -> Result<Vec<f32>, DurationError> {
        let duration = checked_duration(seconds)?;
        if duration.as_secs_f64() > MAX_RENDER_SECS {
            return Err(DurationError::TooLong {
                secs: seconds,
                max: MAX_RENDER_SECS,
            });
        }

        let mut clock = TransportClock::new(self.fps);
        let mut synth = ChipSynth::new(self.channel_count(), self.sample_rate, channels, seed);
        let ticks = (duration.as_secs_f64() * self.fps as f64).round() as u64;

        let mut samples = Vec::new();
        for _ in 0..ticks {
            clock.advance(&mut self.controller, &mut synth);
            samples.extend(synth.render_tick(self.fps));
        }
        tracing::debug!(ticks, samples = samples.len(), "offline render");
        Ok(samples)
    }
}

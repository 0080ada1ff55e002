//! Chip synthesizer: an [`AudioDevice`] that turns step events into
//! interleaved `f32` samples, one voice per sequencer channel.
//!
//! Effect tags are accepted but not shaped.

use crate::channel::StepEvent;
use crate::sound::Tone;

use super::device::AudioDevice;
use super::oscillator::{note_to_freq, rectangle, triangle, NoiseSource, PULSE_DUTY};

/// Per-voice headroom so four full-volume voices stay below clipping.
const VOICE_GAIN: f32 = 0.25;

/// Noise is clocked this many times faster than the note frequency.
const NOISE_CLOCK_RATIO: f64 = 8.0;

#[derive(Debug, Clone)]
struct Voice {
    tone: Tone,
    freq: f64,
    amplitude: f32,
    phase: f64,
    noise: NoiseSource,
    sounding: bool,
}

impl Voice {
    fn new(seed: u64) -> Self {
        Self {
            tone: Tone::Triangle,
            freq: 0.0,
            amplitude: 0.0,
            phase: 0.0,
            noise: NoiseSource::new(seed),
            sounding: false,
        }
    }

    fn trigger(&mut self, event: &StepEvent) {
        let Some(note) = event.pitch.and_then(|p| p.number()) else {
            self.silence();
            return;
        };
        // Keep the phase when the tone carries over so steps join without clicks.
        if !self.sounding || self.tone != event.tone {
            self.phase = 0.0;
        }
        self.tone = event.tone;
        self.freq = note_to_freq(note);
        self.amplitude = event.volume.gain() * VOICE_GAIN;
        self.sounding = true;
    }

    fn silence(&mut self) {
        self.sounding = false;
        self.amplitude = 0.0;
    }

    fn next_sample(&mut self, sample_rate: f64) -> f32 {
        if !self.sounding {
            return 0.0;
        }

        let (value, rate) = match self.tone {
            Tone::Triangle => (triangle(self.phase), self.freq),
            Tone::Square => (rectangle(self.phase, 0.5), self.freq),
            Tone::Pulse => (rectangle(self.phase, PULSE_DUTY), self.freq),
            Tone::Noise => (self.noise.level(), self.freq * NOISE_CLOCK_RATIO),
        };

        self.phase += rate / sample_rate;
        if self.phase >= 1.0 {
            self.phase = self.phase.fract();
            if self.tone == Tone::Noise {
                self.noise.clock();
            }
        }

        value as f32 * self.amplitude
    }
}

/// Multi-voice chip synthesizer.
#[derive(Debug, Clone)]
pub struct ChipSynth {
    sample_rate: u32,
    channels: u16,
    seed: u64,
    voices: Vec<Voice>,
    /// Fractional frame carry so per-tick blocks do not drift.
    frame_remainder: f64,
}

impl ChipSynth {
    /// Create a synth with `voices` voices, rendering interleaved samples
    /// for `channels` output channels. `seed` drives the noise tone.
    pub fn new(voices: usize, sample_rate: u32, channels: u16, seed: u64) -> Self {
        Self {
            sample_rate,
            channels: channels.max(1),
            seed,
            voices: (0..voices).map(|i| Voice::new(seed + i as u64)).collect(),
            frame_remainder: 0.0,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Whether every voice is silent.
    pub fn is_silent(&self) -> bool {
        self.voices.iter().all(|v| !v.sounding)
    }

    /// Render `frames` frames of interleaved output.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        let rate = self.sample_rate as f64;
        let mut output = Vec::with_capacity(frames * self.channels as usize);
        for _ in 0..frames {
            let mixed: f32 = self.voices.iter_mut().map(|v| v.next_sample(rate)).sum();
            for _ in 0..self.channels {
                output.push(mixed);
            }
        }
        output
    }

    /// Render the audio for one sequencer tick at `fps` ticks per second.
    ///
    /// Block lengths alternate as needed so that, over many ticks, exactly
    /// `sample_rate` frames are produced per second.
    pub fn render_tick(&mut self, fps: u32) -> Vec<f32> {
        let exact = self.sample_rate as f64 / fps.max(1) as f64 + self.frame_remainder;
        let frames = exact.floor();
        self.frame_remainder = exact - frames;
        self.render(frames as usize)
    }

    fn voice_mut(&mut self, channel: usize) -> &mut Voice {
        if channel >= self.voices.len() {
            let seed = self.seed;
            let start = self.voices.len();
            self.voices
                .extend((start..=channel).map(|i| Voice::new(seed + i as u64)));
        }
        &mut self.voices[channel]
    }
}

impl AudioDevice for ChipSynth {
    fn emit(&mut self, channel: usize, event: &StepEvent) {
        self.voice_mut(channel).trigger(event);
    }

    fn release(&mut self, channel: usize) {
        if let Some(voice) = self.voices.get_mut(channel) {
            voice.silence();
        }
    }
}

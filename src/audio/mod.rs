//! Audio: the device seam the transport emits into, the chip synthesizer
//! behind it, and the cpal output stream that plays what it renders.
//!
//! The [`AudioEngine`] owns the cpal stream and talks to the audio thread
//! through a lock-free ring buffer of [`OutputCommand`]s. The player only
//! sees it as an [`OutputSink`].

pub mod device;
pub mod oscillator;
pub mod output;
pub mod synth;
pub mod wav;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::traits::{Producer, Split};
use ringbuf::HeapRb;

pub use device::{AudioDevice, DeviceCall, RecordingDevice};
pub use output::OutputCommand;
pub use synth::ChipSynth;
pub use wav::write_wav;

use output::OutputCallback;

/// Command queue capacity.
const COMMAND_CAPACITY: usize = 256;

/// Audio kept queued on the audio thread, in seconds.
const MAX_LATENCY_SECS: f64 = 0.25;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no audio output device found")]
    NoOutputDevice,
    #[error("device config error: {0}")]
    DeviceConfig(String),
    #[error("stream build error: {0}")]
    StreamBuild(String),
    #[error("stream play error: {0}")]
    StreamPlay(String),
    /// The audio thread is not draining commands fast enough.
    #[error("audio command queue is full")]
    QueueFull,
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),
}

/// Where the player sends rendered audio.
///
/// [`AudioEngine`] is the live implementation. Blocks are interleaved at
/// [`sample_rate`](OutputSink::sample_rate) with
/// [`channels`](OutputSink::channels) samples per frame.
pub trait OutputSink {
    /// Queue interleaved samples for playback.
    fn send_block(&mut self, samples: Vec<f32>) -> Result<(), AudioError>;
    /// Drop all queued audio.
    fn flush(&mut self) -> Result<(), AudioError>;
    /// Suspend the output stream.
    fn pause(&mut self) -> Result<(), AudioError>;
    /// Restart a paused output stream.
    fn resume(&mut self) -> Result<(), AudioError>;
    fn sample_rate(&self) -> u32;
    fn channels(&self) -> u16;
    fn device_name(&self) -> &str;
}

/// Live audio output on the default device.
pub struct AudioEngine {
    stream: cpal::Stream,
    commands: ringbuf::HeapProd<OutputCommand>,
    sample_rate: u32,
    channels: u16,
    device_name: String,
}

impl AudioEngine {
    /// Open the default output device at `sample_rate`, keeping its
    /// preferred channel count.
    pub fn with_sample_rate(sample_rate: u32) -> Result<Self, AudioError> {
        let device = default_device()?;
        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;
        Self::open(&device, sample_rate, config.channels())
    }

    fn open(device: &cpal::Device, sample_rate: u32, channels: u16) -> Result<Self, AudioError> {
        let (commands, consumer) = HeapRb::<OutputCommand>::new(COMMAND_CAPACITY).split();
        let max_queued = (sample_rate as f64 * MAX_LATENCY_SECS) as usize * channels as usize;
        let mut callback = OutputCallback::new(consumer, max_queued);

        let stream_config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| callback.process(data),
                |err| tracing::error!(%err, "audio stream error"),
                None,
            )
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))?;

        let device_name = device.name().unwrap_or_else(|_| "unknown".into());
        tracing::info!(device = %device_name, sample_rate, channels, "audio output opened");

        Ok(Self {
            stream,
            commands,
            sample_rate,
            channels,
            device_name,
        })
    }

    fn push(&mut self, cmd: OutputCommand) -> Result<(), AudioError> {
        self.commands.try_push(cmd).map_err(|_| AudioError::QueueFull)
    }
}

impl OutputSink for AudioEngine {
    fn send_block(&mut self, samples: Vec<f32>) -> Result<(), AudioError> {
        self.push(OutputCommand::Block(samples))
    }

    fn flush(&mut self) -> Result<(), AudioError> {
        self.push(OutputCommand::Flush)
    }

    fn pause(&mut self) -> Result<(), AudioError> {
        self.stream
            .pause()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        self.stream
            .play()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn device_name(&self) -> &str {
        &self.device_name
    }
}

fn default_device() -> Result<cpal::Device, AudioError> {
    cpal::default_host()
        .default_output_device()
        .ok_or(AudioError::NoOutputDevice)
}

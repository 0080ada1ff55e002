//! Output side of the audio thread: the command queue protocol and the
//! callback state that cpal drives.

use std::collections::VecDeque;

use ringbuf::traits::Consumer;
use ringbuf::HeapCons;

/// Ceiling of the hard limiter applied to every output sample.
pub const LIMIT_CEILING: f32 = 0.95;

/// Messages from the sequencer thread to the audio thread.
#[derive(Debug)]
pub enum OutputCommand {
    /// Interleaved samples to append to the playback queue.
    Block(Vec<f32>),
    /// Drop everything queued.
    Flush,
}

/// State owned by the audio thread.
pub struct OutputCallback {
    commands: HeapCons<OutputCommand>,
    queued: VecDeque<f32>,
    /// Oldest samples are dropped beyond this, bounding latency.
    max_queued: usize,
}

impl OutputCallback {
    pub fn new(commands: HeapCons<OutputCommand>, max_queued: usize) -> Self {
        Self {
            commands,
            queued: VecDeque::with_capacity(max_queued),
            max_queued,
        }
    }

    /// Fill `output`; pads with silence on underrun.
    pub fn process(&mut self, output: &mut [f32]) {
        while let Some(cmd) = self.commands.try_pop() {
            match cmd {
                OutputCommand::Block(samples) => self.queued.extend(samples),
                OutputCommand::Flush => self.queued.clear(),
            }
        }

        if self.queued.len() > self.max_queued {
            let excess = self.queued.len() - self.max_queued;
            self.queued.drain(..excess);
        }

        for out in output.iter_mut() {
            let sample = self.queued.pop_front().unwrap_or(0.0);
            *out = sample.clamp(-LIMIT_CEILING, LIMIT_CEILING);
        }
    }

    /// Samples waiting to be played.
    pub fn queued(&self) -> usize {
        self.queued.len()
    }
}

//! The audio device seam: where step events leave the sequencer.

use crate::channel::StepEvent;

/// Receives step events from the transport clock.
///
/// Implementations synthesize (or record) the sound; effect tags are theirs
/// to interpret.
pub trait AudioDevice {
    /// A step started on `channel`. A rest event silences the channel for
    /// the step.
    fn emit(&mut self, channel: usize, event: &StepEvent);

    /// `channel` stopped; silence it until the next `emit`.
    fn release(&mut self, channel: usize);
}

/// One call received by a [`RecordingDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCall {
    Emit {
        frame: u64,
        channel: usize,
        event: StepEvent,
    },
    Release {
        frame: u64,
        channel: usize,
    },
}

impl DeviceCall {
    pub fn channel(&self) -> usize {
        match self {
            DeviceCall::Emit { channel, .. } | DeviceCall::Release { channel, .. } => *channel,
        }
    }

    pub fn frame(&self) -> u64 {
        match self {
            DeviceCall::Emit { frame, .. } | DeviceCall::Release { frame, .. } => *frame,
        }
    }
}

/// A device that keeps every call it receives, stamped with the frame
/// number set by [`RecordingDevice::set_frame`].
#[derive(Debug, Clone, Default)]
pub struct RecordingDevice {
    frame: u64,
    calls: Vec<DeviceCall>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Emitted events for one channel, in order.
    pub fn events_for(&self, channel: usize) -> Vec<StepEvent> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DeviceCall::Emit {
                    channel: ch, event, ..
                } if *ch == channel => Some(*event),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl AudioDevice for RecordingDevice {
    fn emit(&mut self, channel: usize, event: &StepEvent) {
        self.calls.push(DeviceCall::Emit {
            frame: self.frame,
            channel,
            event: *event,
        });
    }

    fn release(&mut self, channel: usize) {
        self.calls.push(DeviceCall::Release {
            frame: self.frame,
            channel,
        });
    }
}

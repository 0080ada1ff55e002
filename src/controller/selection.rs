//! Channel selections and presets: plain data describing which channels
//! should be on, built by the input layer and handed to the controller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Desired on/off state per channel. Iterates in ascending channel order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelSelection(BTreeMap<usize, bool>);

impl ChannelSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, channel: usize, on: bool) -> Self {
        self.0.insert(channel, on);
        self
    }

    pub fn set(&mut self, channel: usize, on: bool) {
        self.0.insert(channel, on);
    }

    /// One entry per flag, channel index = position.
    pub fn from_flags(flags: &[bool]) -> Self {
        flags.iter().copied().enumerate().collect()
    }

    /// Every channel in `0..count` set to `on`.
    pub fn all(count: usize, on: bool) -> Self {
        (0..count).map(|ch| (ch, on)).collect()
    }

    /// Only `channel` on, the rest of `0..count` off.
    pub fn only(count: usize, channel: usize) -> Self {
        (0..count).map(|ch| (ch, ch == channel)).collect()
    }

    pub fn get(&self, channel: usize) -> Option<bool> {
        self.0.get(&channel).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.0.iter().map(|(&ch, &on)| (ch, on))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(usize, bool)> for ChannelSelection {
    fn from_iter<I: IntoIterator<Item = (usize, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A key bound to a fixed channel selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub key: char,
    pub label: String,
    /// On/off per channel, by channel index.
    pub channels: Vec<bool>,
}

impl Preset {
    pub fn new(key: char, label: impl Into<String>, channels: Vec<bool>) -> Self {
        Self {
            key,
            label: label.into(),
            channels,
        }
    }

    pub fn selection(&self) -> ChannelSelection {
        ChannelSelection::from_flags(&self.channels)
    }
}

/// Find the preset bound to `key`.
pub fn find_preset(presets: &[Preset], key: char) -> Option<&Preset> {
    presets.iter().find(|p| p.key == key)
}

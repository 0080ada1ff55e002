//! Pattern store: owns every defined [`Sound`] by caller-chosen id, and
//! resolves id lists into [`Playlist`]s.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::error::LookupError;
use super::{Sound, SoundId};

/// Named sound definitions.
///
/// Sounds are immutable once defined. A playlist holds shared handles to the
/// sounds it was resolved from, so redefining an id only affects playlists
/// resolved afterwards.
#[derive(Debug, Clone, Default)]
pub struct PatternStore {
    sounds: BTreeMap<SoundId, Arc<Sound>>,
}

impl PatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sound at `id`, replacing any previous definition.
    pub fn define(&mut self, id: SoundId, sound: Sound) {
        if self.sounds.insert(id, Arc::new(sound)).is_some() {
            tracing::debug!(%id, "sound redefined");
        } else {
            tracing::debug!(%id, "sound defined");
        }
    }

    pub fn get(&self, id: SoundId) -> Result<&Sound, LookupError> {
        self.sounds
            .get(&id)
            .map(Arc::as_ref)
            .ok_or(LookupError::UnknownSoundId(id))
    }

    pub fn contains(&self, id: SoundId) -> bool {
        self.sounds.contains_key(&id)
    }

    pub fn remove(&mut self, id: SoundId) -> Option<Sound> {
        self.sounds
            .remove(&id)
            .map(|s| Arc::try_unwrap(s).unwrap_or_else(|shared| (*shared).clone()))
    }

    /// Defined ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = SoundId> + '_ {
        self.sounds.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Resolve an ordered list of ids into a playlist.
    ///
    /// Fails on the first id that is not defined.
    pub fn playlist(&self, ids: &[SoundId]) -> Result<Playlist, LookupError> {
        let sounds = ids
            .iter()
            .map(|id| {
                self.sounds
                    .get(id)
                    .cloned()
                    .ok_or(LookupError::UnknownSoundId(*id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Playlist { sounds })
    }
}

/// An ordered sequence of sounds for one channel's playback session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    sounds: Vec<Arc<Sound>>,
}

impl Playlist {
    pub fn new(sounds: impl IntoIterator<Item = Sound>) -> Self {
        Self {
            sounds: sounds.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Sound> {
        self.sounds.get(index).map(Arc::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sound> {
        self.sounds.iter().map(Arc::as_ref)
    }

    /// Number of sounds.
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Total playing time of one pass, in ticks.
    pub fn total_ticks(&self) -> u64 {
        self.iter().map(Sound::total_ticks).sum()
    }
}

impl From<Sound> for Playlist {
    fn from(sound: Sound) -> Self {
        Self::new([sound])
    }
}

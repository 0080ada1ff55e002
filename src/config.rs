//! Song configuration: sound definitions, channel playlists and presets,
//! loaded from YAML (`~/.chipseq/song.yaml` by default) or taken from the
//! built-in demo song.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::controller::{PlaybackController, Preset};
use crate::session::Session;
use crate::sound::{LookupError, ParseError, PatternStore, Sound, SoundId};
use crate::transport::DEFAULT_FPS;

/// Sample rate used for rendering when none is configured.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid song file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("sound {id}: {source}")]
    Sound {
        id: SoundId,
        #[source]
        source: ParseError,
    },
    #[error("channel {channel} ({name}): {source}")]
    Playlist {
        channel: usize,
        name: String,
        #[source]
        source: LookupError,
    },
    #[error("preset '{key}' lists {found} channels, song has {expected}")]
    PresetWidth {
        key: char,
        found: usize,
        expected: usize,
    },
    #[error("preset key '{0}' is bound twice")]
    DuplicatePresetKey(char),
    #[error("song has no channels")]
    NoChannels,
    #[error("sample rate must be above 0 Hz")]
    ZeroSampleRate,
}

/// One sound in its text encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundDef {
    pub id: SoundId,
    pub notes: String,
    pub tone: String,
    pub volume: String,
    pub effect: String,
    pub speed: i64,
}

impl SoundDef {
    pub fn new(id: u32, notes: &str, tone: &str, volume: &str, effect: &str, speed: i64) -> Self {
        Self {
            id: SoundId(id),
            notes: notes.into(),
            tone: tone.into(),
            volume: volume.into(),
            effect: effect.into(),
            speed,
        }
    }

    pub fn parse(&self) -> Result<Sound, ConfigError> {
        Sound::parse(&self.notes, &self.tone, &self.volume, &self.effect, self.speed).map_err(
            |source| ConfigError::Sound {
                id: self.id,
                source,
            },
        )
    }
}

/// A channel and the playlist it loops when switched on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDef {
    pub name: String,
    pub playlist: Vec<SoundId>,
}

/// A whole song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongConfig {
    /// Sequencer ticks per second.
    #[serde(default = "SongConfig::default_fps")]
    pub fps: u32,
    #[serde(default = "SongConfig::default_sample_rate")]
    pub sample_rate: u32,
    pub sounds: Vec<SoundDef>,
    pub channels: Vec<ChannelDef>,
    #[serde(default)]
    pub presets: Vec<Preset>,
    /// Preset applied at startup, if any.
    #[serde(default)]
    pub start_preset: Option<char>,
}

impl SongConfig {
    /// Standard song path (`~/.chipseq/song.yaml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".chipseq").join("song.yaml"))
    }

    /// Load a song from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load the song at the standard path, or the built-in song if there is
    /// no file there.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::info!(path = %path.display(), "loading song");
                Self::load(&path)
            }
            _ => Ok(Self::builtin()),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The demo song: melody, bass and drums on three channels.
    pub fn builtin() -> Self {
        let sounds = vec![
            SoundDef::new(
                0,
                "e2e2c2g1 g1g1c2e2 d2d2d2g2 g2f2e2d2 c2c2a1e1 e1e1a1c2 b1b1b1e2 e2d2c2b1",
                "p",
                "6",
                "vffn fnff vffs fnff",
                30,
            ),
            SoundDef::new(
                1,
                "r a1b1c2 b1b1c2d2 g2g2g2g2 c2c2d2e2 f2f2f2f2 f2e2d2c2 d2d2d2d2 g2g2r r ",
                "p",
                "6",
                "nnff vfff vvvv sfff svff vfff vvvv svnn",
                30,
            ),
            SoundDef::new(
                2,
                "c1g1c1g1 c1g1c1g1 b0g1b0g1 b0g1b0g1 a0e1a0e1 a0e1a0e1 g0d1g0d1 g0d1g0d1",
                "t",
                "7",
                "n",
                30,
            ),
            SoundDef::new(
                3,
                "f0c1f0c1 g0d1g0d1 c1g1c1g1 a0e1a0e1 f0c1f0c1 f0c1f0c1 g0d1g0d1 g0d1g0d1",
                "t",
                "7",
                "n",
                30,
            ),
            SoundDef::new(
                4,
                "f0ra4r f0ra4r f0ra4r f0f0a4r",
                "n",
                "6622 6622 6622 6422",
                "f",
                30,
            ),
        ];

        let channels = vec![
            ChannelDef {
                name: "Melody".into(),
                playlist: vec![SoundId(0), SoundId(1)],
            },
            ChannelDef {
                name: "Bass".into(),
                playlist: vec![SoundId(2), SoundId(3)],
            },
            ChannelDef {
                name: "Drums".into(),
                playlist: vec![SoundId(4)],
            },
        ];

        let presets = vec![
            Preset::new('1', "Play all channels", vec![true, true, true]),
            Preset::new('2', "Play channel #0 (Melody)", vec![true, false, false]),
            Preset::new('3', "Play channel #1 (Bass)", vec![false, true, false]),
            Preset::new('4', "Play channel #2 (Drums)", vec![false, false, true]),
            Preset::new('5', "Stop playing", vec![false, false, false]),
        ];

        Self {
            fps: DEFAULT_FPS,
            sample_rate: DEFAULT_SAMPLE_RATE,
            sounds,
            channels,
            presets,
            start_preset: Some('1'),
        }
    }

    /// Parse every sound and check every playlist and preset.
    ///
    /// Fails on the first problem found, so a bad song is rejected before
    /// anything plays.
    pub fn build(&self) -> Result<Session, ConfigError> {
        if self.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }

        let mut store = PatternStore::new();
        for def in &self.sounds {
            if store.contains(def.id) {
                tracing::warn!(id = %def.id, "sound defined twice, last definition wins");
            }
            store.define(def.id, def.parse()?);
        }

        for (channel, def) in self.channels.iter().enumerate() {
            store
                .playlist(&def.playlist)
                .map_err(|source| ConfigError::Playlist {
                    channel,
                    name: def.name.clone(),
                    source,
                })?;
        }

        let mut keys = HashSet::new();
        for preset in &self.presets {
            if !keys.insert(preset.key) {
                return Err(ConfigError::DuplicatePresetKey(preset.key));
            }
            if preset.channels.len() != self.channels.len() {
                return Err(ConfigError::PresetWidth {
                    key: preset.key,
                    found: preset.channels.len(),
                    expected: self.channels.len(),
                });
            }
        }

        let controller =
            PlaybackController::new(self.channels.iter().map(|c| c.playlist.clone()).collect());

        tracing::info!(
            sounds = store.len(),
            channels = self.channels.len(),
            presets = self.presets.len(),
            "song built"
        );

        Ok(Session {
            store,
            controller,
            presets: self.presets.clone(),
            channel_names: self.channels.iter().map(|c| c.name.clone()).collect(),
            fps: self.fps.max(1),
            sample_rate: self.sample_rate,
        })
    }
}

impl Default for SongConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SongConfig {
    fn default_fps() -> u32 {
        DEFAULT_FPS
    }

    fn default_sample_rate() -> u32 {
        DEFAULT_SAMPLE_RATE
    }
}

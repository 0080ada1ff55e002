//! Playback controller: the only component the input layer talks to.
//!
//! Owns one [`ChannelPlayer`] per channel together with that channel's
//! default playlist, and turns selections ("melody and drums on, bass off")
//! into per-channel `play`/`stop` calls.

pub mod selection;

pub use selection::{find_preset, ChannelSelection, Preset};

use crate::channel::{ChannelPlayer, PlayState};
use crate::sound::{LookupError, PatternStore, Playlist, SoundId};

/// Errors from controller calls. Nothing is mutated when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error("unknown channel {channel} (have {count})")]
    UnknownChannel { channel: usize, count: usize },

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Coordinates all channel players.
#[derive(Debug, Clone)]
pub struct PlaybackController {
    players: Vec<ChannelPlayer>,
    defaults: Vec<Vec<SoundId>>,
    /// Last requested on/off per channel, for display only.
    active: Vec<bool>,
}

impl PlaybackController {
    /// Create one stopped channel per default playlist.
    ///
    /// Playlists are kept as ids and resolved against the store each time
    /// a channel is switched on.
    pub fn new(default_playlists: Vec<Vec<SoundId>>) -> Self {
        let count = default_playlists.len();
        Self {
            players: vec![ChannelPlayer::new(); count],
            defaults: default_playlists,
            active: vec![false; count],
        }
    }

    /// Number of channels, fixed at construction.
    pub fn channel_count(&self) -> usize {
        self.players.len()
    }

    pub fn default_playlist(&self, channel: usize) -> Option<&[SoundId]> {
        self.defaults.get(channel).map(Vec::as_slice)
    }

    pub fn set_default_playlist(
        &mut self,
        channel: usize,
        ids: Vec<SoundId>,
    ) -> Result<(), ControllerError> {
        self.check_channel(channel)?;
        self.defaults[channel] = ids;
        Ok(())
    }

    /// Apply a selection: every channel marked on starts looping its default
    /// playlist from the top, every channel marked off stops. Channels not
    /// named are left alone.
    ///
    /// All channel indices and playlists are validated first; on error no
    /// player or flag changes.
    pub fn set_active(
        &mut self,
        store: &PatternStore,
        selection: &ChannelSelection,
    ) -> Result<(), ControllerError> {
        let mut plan: Vec<(usize, Option<Playlist>)> = Vec::with_capacity(selection.len());
        for (channel, on) in selection.iter() {
            self.check_channel(channel)?;
            let playlist = if on {
                Some(store.playlist(&self.defaults[channel])?)
            } else {
                None
            };
            plan.push((channel, playlist));
        }

        for (channel, playlist) in plan {
            match playlist {
                Some(playlist) => {
                    self.players[channel].play(playlist, true);
                    self.active[channel] = true;
                }
                None => {
                    self.players[channel].stop();
                    self.active[channel] = false;
                }
            }
        }

        tracing::debug!(active = ?self.active, "channel selection applied");
        Ok(())
    }

    /// Play an explicit list of sounds on one channel.
    pub fn play(
        &mut self,
        store: &PatternStore,
        channel: usize,
        ids: &[SoundId],
        looping: bool,
    ) -> Result<(), ControllerError> {
        self.check_channel(channel)?;
        let playlist = store.playlist(ids)?;
        let sounding = !playlist.is_empty();
        self.players[channel].play(playlist, looping);
        self.active[channel] = sounding;
        tracing::debug!(channel, ?ids, looping, "channel play");
        Ok(())
    }

    pub fn stop(&mut self, channel: usize) -> Result<(), ControllerError> {
        self.check_channel(channel)?;
        self.players[channel].stop();
        self.active[channel] = false;
        tracing::debug!(channel, "channel stop");
        Ok(())
    }

    pub fn stop_all(&mut self) {
        for player in &mut self.players {
            player.stop();
        }
        self.active.fill(false);
    }

    /// The last requested on/off state of `channel`.
    ///
    /// This is the intent recorded by the last successful call, not the
    /// player's state: a non-looping playlist that runs out leaves it `true`
    /// until the next call. Unknown channels report `false`.
    pub fn is_active(&self, channel: usize) -> bool {
        self.active.get(channel).copied().unwrap_or(false)
    }

    /// Whether the channel's player is actually running.
    pub fn is_sounding(&self, channel: usize) -> bool {
        self.players.get(channel).is_some_and(|p| !p.is_stopped())
    }

    /// `None` for a channel number out of range.
    pub fn state(&self, channel: usize) -> Option<PlayState> {
        self.players.get(channel).map(ChannelPlayer::state)
    }

    pub fn player(&self, channel: usize) -> Option<&ChannelPlayer> {
        self.players.get(channel)
    }

    /// Every channel's player, indexed by channel number.
    pub fn players(&self) -> &[ChannelPlayer] {
        &self.players
    }

    pub(crate) fn players_mut(&mut self) -> &mut [ChannelPlayer] {
        &mut self.players
    }

    fn check_channel(&self, channel: usize) -> Result<(), ControllerError> {
        if channel < self.players.len() {
            Ok(())
        } else {
            Err(ControllerError::UnknownChannel {
                channel,
                count: self.players.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::Sound;

    fn store() -> PatternStore {
        let mut store = PatternStore::new();
        store.define(SoundId(0), Sound::parse("c2 e2", "p", "6", "n", 4).unwrap());
        store.define(SoundId(1), Sound::parse("c1", "t", "7", "n", 4).unwrap());
        store.define(SoundId(2), Sound::parse("f0 r", "n", "6", "f", 4).unwrap());
        store
    }

    fn controller() -> PlaybackController {
        PlaybackController::new(vec![
            vec![SoundId(0)],
            vec![SoundId(1)],
            vec![SoundId(2)],
        ])
    }

    #[test]
    fn starts_all_stopped() {
        let ctl = controller();
        assert_eq!(ctl.channel_count(), 3);
        for ch in 0..3 {
            assert!(!ctl.is_active(ch));
            assert_eq!(ctl.state(ch), Some(PlayState::Stopped));
        }
    }

    #[test]
    fn set_active_loops_and_stops() {
        let store = store();
        let mut ctl = controller();
        ctl.set_active(&store, &ChannelSelection::from_flags(&[true, false, true]))
            .unwrap();

        assert!(ctl.is_active(0));
        assert!(!ctl.is_active(1));
        assert!(ctl.is_active(2));
        assert_eq!(ctl.state(0), Some(PlayState::Looping));
        assert_eq!(ctl.state(1), Some(PlayState::Stopped));
        assert_eq!(ctl.state(2), Some(PlayState::Looping));
    }

    #[test]
    fn unnamed_channels_untouched() {
        let store = store();
        let mut ctl = controller();
        ctl.set_active(&store, &ChannelSelection::all(3, true)).unwrap();
        ctl.set_active(&store, &ChannelSelection::new().with(1, false))
            .unwrap();
        assert!(ctl.is_active(0));
        assert!(!ctl.is_active(1));
        assert_eq!(ctl.state(2), Some(PlayState::Looping));
    }

    #[test]
    fn unknown_channel_changes_nothing() {
        let store = store();
        let mut ctl = controller();
        ctl.set_active(&store, &ChannelSelection::from_flags(&[true, false, false]))
            .unwrap();

        let err = ctl
            .set_active(
                &store,
                &ChannelSelection::new().with(0, false).with(1, true).with(7, true),
            )
            .unwrap_err();
        assert_eq!(err, ControllerError::UnknownChannel { channel: 7, count: 3 });

        assert!(ctl.is_active(0));
        assert!(!ctl.is_active(1));
        assert_eq!(ctl.state(0), Some(PlayState::Looping));
        assert_eq!(ctl.state(1), Some(PlayState::Stopped));
    }

    #[test]
    fn undefined_sound_changes_nothing() {
        let store = store();
        let mut ctl = PlaybackController::new(vec![vec![SoundId(0)], vec![SoundId(42)]]);
        let err = ctl
            .set_active(&store, &ChannelSelection::all(2, true))
            .unwrap_err();
        assert_eq!(
            err,
            ControllerError::Lookup(LookupError::UnknownSoundId(SoundId(42)))
        );
        assert!(!ctl.is_active(0));
        assert_eq!(ctl.state(0), Some(PlayState::Stopped));
    }

    #[test]
    fn reselecting_restarts_from_top() {
        let store = store();
        let mut ctl = controller();
        ctl.set_active(&store, &ChannelSelection::only(3, 0)).unwrap();
        for _ in 0..5 {
            ctl.players_mut()[0].tick();
        }
        assert_eq!(ctl.player(0).unwrap().cursor().unwrap().step, 1);

        ctl.set_active(&store, &ChannelSelection::only(3, 0)).unwrap();
        assert_eq!(ctl.player(0).unwrap().cursor().unwrap().step, 0);
    }

    #[test]
    fn is_active_stays_set_after_natural_end() {
        let store = store();
        let mut ctl = controller();
        ctl.play(&store, 1, &[SoundId(1)], false).unwrap();
        for _ in 0..4 {
            ctl.players_mut()[1].tick();
        }
        assert!(ctl.is_active(1));
        assert!(!ctl.is_sounding(1));
    }

    #[test]
    fn direct_play_and_stop() {
        let store = store();
        let mut ctl = controller();
        ctl.play(&store, 2, &[SoundId(2), SoundId(1)], true).unwrap();
        assert!(ctl.is_active(2));
        assert_eq!(ctl.player(2).unwrap().playlist().len(), 2);

        ctl.stop(2).unwrap();
        assert!(!ctl.is_active(2));
        assert!(ctl.stop(3).is_err());
        assert!(ctl.play(&store, 0, &[SoundId(9)], true).is_err());
        assert!(!ctl.is_active(0));
    }

    #[test]
    fn direct_play_of_empty_list_stops() {
        let store = store();
        let mut ctl = controller();
        ctl.play(&store, 0, &[SoundId(0)], true).unwrap();
        ctl.play(&store, 0, &[], true).unwrap();
        assert!(!ctl.is_active(0));
        assert!(!ctl.is_sounding(0));
    }

    #[test]
    fn stop_all_clears_everything() {
        let store = store();
        let mut ctl = controller();
        ctl.set_active(&store, &ChannelSelection::all(3, true)).unwrap();
        ctl.stop_all();
        for ch in 0..3 {
            assert!(!ctl.is_active(ch));
            assert!(!ctl.is_sounding(ch));
        }
    }

    #[test]
    fn unknown_channel_queries() {
        let ctl = controller();
        assert!(!ctl.is_active(10));
        assert!(!ctl.is_sounding(10));
        assert!(ctl.state(10).is_none());
        assert!(ctl.default_playlist(10).is_none());
    }

    #[test]
    fn replace_default_playlist() {
        let store = store();
        let mut ctl = controller();
        ctl.set_default_playlist(0, vec![SoundId(1), SoundId(2)]).unwrap();
        ctl.set_active(&store, &ChannelSelection::only(3, 0)).unwrap();
        assert_eq!(ctl.player(0).unwrap().playlist().len(), 2);
        assert!(ctl.set_default_playlist(5, vec![]).is_err());
    }
}

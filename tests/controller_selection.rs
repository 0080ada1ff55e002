//! Controller integration tests: channel selections, presets and the
//! all-or-nothing rule for bad requests.

use chipseq::audio::RecordingDevice;
use chipseq::channel::PlayState;
use chipseq::config::SongConfig;
use chipseq::controller::{ChannelSelection, ControllerError, PlaybackController, Preset};
use chipseq::sound::{LookupError, PatternStore, Sound, SoundId};
use chipseq::transport::TransportClock;

fn store() -> PatternStore {
    let mut store = PatternStore::new();
    for id in 0..3 {
        store.define(SoundId(id), Sound::parse("c1 e1 g1", "t", "7", "n", 5).unwrap());
    }
    store
}

fn controller() -> PlaybackController {
    PlaybackController::new(vec![vec![SoundId(0)], vec![SoundId(1)], vec![SoundId(2)]])
}

fn states(controller: &PlaybackController) -> Vec<PlayState> {
    (0..controller.channel_count())
        .filter_map(|ch| controller.state(ch))
        .collect()
}

#[test]
fn mixed_selection() {
    let store = store();
    let mut controller = controller();
    let selection = ChannelSelection::new()
        .with(0, true)
        .with(1, false)
        .with(2, true);
    controller.set_active(&store, &selection).unwrap();

    assert!(controller.is_active(0));
    assert!(!controller.is_active(1));
    assert!(controller.is_active(2));
    assert_eq!(
        states(&controller),
        vec![PlayState::Looping, PlayState::Stopped, PlayState::Looping]
    );
}

#[test]
fn unknown_channel_changes_nothing() {
    let store = store();
    let mut controller = controller();
    controller
        .set_active(&store, &ChannelSelection::all(3, true))
        .unwrap();
    let before = states(&controller);

    let bad = ChannelSelection::new().with(0, false).with(7, true);
    let err = controller.set_active(&store, &bad).unwrap_err();
    assert_eq!(
        err,
        ControllerError::UnknownChannel {
            channel: 7,
            count: 3
        }
    );
    assert_eq!(states(&controller), before);
    assert!(controller.is_active(0));
}

#[test]
fn missing_sound_changes_nothing() {
    let mut store = store();
    store.remove(SoundId(2));
    let mut controller = controller();

    let err = controller
        .set_active(&store, &ChannelSelection::all(3, true))
        .unwrap_err();
    assert_eq!(
        err,
        ControllerError::Lookup(LookupError::UnknownSoundId(SoundId(2)))
    );
    assert!(states(&controller).iter().all(|s| *s == PlayState::Stopped));
    assert!(!controller.is_active(0));
}

#[test]
fn unnamed_channels_are_left_alone() {
    let store = store();
    let mut controller = controller();
    controller
        .set_active(&store, &ChannelSelection::all(3, true))
        .unwrap();
    controller
        .set_active(&store, &ChannelSelection::new().with(1, false))
        .unwrap();
    assert_eq!(
        states(&controller),
        vec![PlayState::Looping, PlayState::Stopped, PlayState::Looping]
    );
}

#[test]
fn one_shot_leaves_flag_stale() {
    let store = store();
    let mut controller = controller();
    controller.play(&store, 0, &[SoundId(0)], false).unwrap();
    assert!(controller.is_active(0));

    // 3 steps at speed 5.
    let mut clock = TransportClock::new(60);
    let mut device = RecordingDevice::new();
    for _ in 0..15 {
        clock.advance(&mut controller, &mut device);
    }
    assert_eq!(controller.state(0), Some(PlayState::Stopped));
    assert!(controller.is_active(0));
    assert!(!controller.is_sounding(0));
}

#[test]
fn presets_from_config() {
    let config = SongConfig::builtin();
    let mut session = config.build().unwrap();
    let expected: [(char, [bool; 3]); 5] = [
        ('1', [true, true, true]),
        ('2', [true, false, false]),
        ('3', [false, true, false]),
        ('4', [false, false, true]),
        ('5', [false, false, false]),
    ];
    for (key, flags) in expected {
        assert!(session.apply_preset(key).unwrap());
        let active: Vec<bool> = (0..3).map(|ch| session.controller.is_active(ch)).collect();
        assert_eq!(active, flags.to_vec(), "preset {key}");
    }
}

#[test]
fn preset_is_plain_data() {
    let preset = Preset::new('x', "Bass only", vec![false, true]);
    let selection = preset.selection();
    assert_eq!(selection.get(0), Some(false));
    assert_eq!(selection.get(1), Some(true));
    assert_eq!(selection.get(2), None);
}

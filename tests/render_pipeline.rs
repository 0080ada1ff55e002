//! Render pipeline integration tests: song config through the transport and
//! synth to samples and WAV files, without audio hardware.

use chipseq::audio::{write_wav, AudioDevice, ChipSynth};
use chipseq::config::SongConfig;
use chipseq::sound::{Sound, SoundId};
use chipseq::transport::TransportClock;

const SEED: u64 = 42;

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

#[test]
fn builtin_song_renders_audio() {
    let mut session = SongConfig::builtin().build().unwrap();
    session.apply_preset('1').unwrap();
    let samples = session.render_offline(2.0, 2, SEED).unwrap();
    assert_eq!(samples.len(), 2 * 2 * session.sample_rate as usize);
    assert!(rms(&samples) > 0.01);
    assert!(samples.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
}

#[test]
fn stop_preset_renders_silence() {
    let mut session = SongConfig::builtin().build().unwrap();
    session.apply_preset('1').unwrap();
    session.render_offline(0.5, 1, SEED).unwrap();
    session.apply_preset('5').unwrap();

    let samples = session.render_offline(0.5, 1, SEED).unwrap();
    assert!(samples.iter().all(|&s| s == 0.0));
}

#[test]
fn single_channel_is_quieter_than_all() {
    let mut all = SongConfig::builtin().build().unwrap();
    all.apply_preset('1').unwrap();
    let mut bass = SongConfig::builtin().build().unwrap();
    bass.apply_preset('3').unwrap();

    let all_rms = rms(&all.render_offline(1.0, 1, SEED).unwrap());
    let bass_rms = rms(&bass.render_offline(1.0, 1, SEED).unwrap());
    assert!(bass_rms > 0.0);
    assert!(all_rms > bass_rms);
}

#[test]
fn yaml_song_renders() {
    let yaml = r#"
fps: 40
sample_rate: 8000
sounds:
  - { id: 7, notes: "a2 r", tone: "s", volume: "7", effect: "n", speed: 20 }
channels:
  - { name: beep, playlist: [7] }
presets:
  - { key: "b", label: "Beep", channels: [true] }
"#;
    let mut session = SongConfig::from_yaml(yaml).unwrap().build().unwrap();
    assert_eq!(session.fps, 40);
    session.apply_preset('b').unwrap();

    // One second: a2 for 0.5s, then a rest.
    let samples = session.render_offline(1.0, 1, SEED).unwrap();
    assert_eq!(samples.len(), 8000);
    assert!(rms(&samples[..3900]) > 0.05);
    assert_eq!(rms(&samples[4100..]), 0.0);
}

#[test]
fn manual_transport_and_synth() {
    let mut session = SongConfig::builtin().build().unwrap();
    session.controller.play(&session.store, 2, &[SoundId(4)], false).unwrap();

    let mut clock = TransportClock::new(session.fps);
    let mut synth = ChipSynth::new(3, session.sample_rate, 1, SEED);
    let drum = session.store.get(SoundId(4)).unwrap().total_ticks();

    let mut tail = Vec::new();
    for _ in 0..drum + 2 {
        clock.advance(&mut session.controller, &mut synth);
        tail = synth.render_tick(session.fps);
    }
    assert!(synth.is_silent());
    assert!(tail.iter().all(|&s| s == 0.0));
}

#[test]
fn synth_is_an_audio_device() {
    fn emit_first(device: &mut dyn AudioDevice, sound: &Sound) {
        let event = chipseq::channel::StepEvent::new(sound, &sound.steps()[0]);
        device.emit(0, &event);
    }
    let sound = Sound::parse("a2", "t", "7", "n", 1).unwrap();
    let mut synth = ChipSynth::new(1, 44100, 1, SEED);
    emit_first(&mut synth, &sound);
    assert!(rms(&synth.render(1024)) > 0.0);
}

#[test]
fn wav_export() {
    let mut session = SongConfig::builtin().build().unwrap();
    session.apply_preset('2').unwrap();
    let samples = session.render_offline(0.25, 2, SEED).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("melody.wav");
    write_wav(&path, &samples, session.sample_rate, 2).unwrap();

    let reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().channels, 2);
    assert_eq!(reader.spec().sample_rate, session.sample_rate);
    assert_eq!(reader.len() as usize, samples.len());
}

#[test]
fn unbounded_render_is_rejected() {
    let mut session = SongConfig::builtin().build().unwrap();
    session.apply_preset('1').unwrap();
    assert!(session.render_offline(f64::INFINITY, 2, SEED).is_err());
    assert!(session.render_offline(1e15, 2, SEED).is_err());
    assert!(session.render_offline(f64::NAN, 2, SEED).is_err());
}

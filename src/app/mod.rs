//! The interactive player: a terminal front end over a [`Session`], driving
//! the transport at the song's frame rate and streaming the synth's output
//! to an [`OutputSink`].

pub mod keys;
pub mod view;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};

use crate::audio::{ChipSynth, OutputSink};
use crate::session::Session;
use crate::transport::TransportClock;

pub use keys::{map_key, Action};

/// Seed for the noise voices.
const NOISE_SEED: u64 = 0x5eed;

/// The loop resynchronises instead of catching up when it falls this far
/// behind (terminal suspended, machine asleep).
const MAX_FRAME_LAG: Duration = Duration::from_millis(250);

pub struct App {
    session: Session,
    clock: TransportClock,
    synth: ChipSynth,
    engine: Option<Box<dyn OutputSink>>,
    should_quit: bool,
    status: String,
}

impl App {
    /// Build a player. Without an output the sequencer still runs, silently.
    pub fn new(session: Session, engine: Option<Box<dyn OutputSink>>) -> Self {
        let (sample_rate, channels) = match &engine {
            Some(e) => (e.sample_rate(), e.channels()),
            None => (session.sample_rate, 2),
        };
        let synth = ChipSynth::new(session.channel_count(), sample_rate, channels, NOISE_SEED);
        let clock = TransportClock::new(session.fps);
        let status = match &engine {
            Some(e) => format!("audio: {}", e.device_name()),
            None => "no audio".to_string(),
        };
        Self {
            session,
            clock,
            synth,
            engine,
            should_quit: false,
            status,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn clock(&self) -> &TransportClock {
        &self.clock
    }

    /// One-line status shown under the channel list.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// True when rendered audio goes to an output.
    pub fn has_audio(&self) -> bool {
        self.engine.is_some()
    }

    /// Set once [`Action::Quit`] has been handled.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Advance one frame and queue its audio.
    pub fn step_frame(&mut self) {
        if self.clock.is_paused() {
            return;
        }
        self.clock.advance(&mut self.session.controller, &mut self.synth);
        let block = self.synth.render_tick(self.clock.fps());
        if let Some(engine) = &mut self.engine {
            if let Err(e) = engine.send_block(block) {
                tracing::warn!(error = %e, frame = self.clock.frame(), "dropped audio block");
            }
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.session.controller.stop_all();
                self.flush_audio();
                self.should_quit = true;
            }
            Action::TogglePause => {
                self.clock.toggle_pause();
                if self.clock.is_paused() {
                    self.flush_audio();
                    if let Some(Err(e)) = self.engine.as_mut().map(|e| e.pause()) {
                        tracing::warn!(error = %e, "audio pause failed");
                    }
                    self.status = "paused".into();
                } else {
                    if let Some(Err(e)) = self.engine.as_mut().map(|e| e.resume()) {
                        tracing::warn!(error = %e, "audio resume failed");
                    }
                    self.status = "playing".into();
                }
            }
            Action::ApplyPreset(key) => match self.session.apply_preset(key) {
                Ok(true) => {
                    if let Some(preset) = self.session.preset(key) {
                        self.status = preset.label.clone();
                    }
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "preset failed");
                    self.status = format!("preset {key}: {e}");
                }
            },
        }
    }

    fn flush_audio(&mut self) {
        if let Some(engine) = &mut self.engine {
            if let Err(e) = engine.flush() {
                tracing::warn!(error = %e, "audio flush failed");
            }
        }
    }

    /// Run the terminal event loop until the user quits.
    pub fn run(
        &mut self,
        terminal: &mut ratatui::Terminal<impl ratatui::backend::Backend>,
    ) -> io::Result<()> {
        let frame_duration = self.clock.frame_duration();
        let mut next_frame = Instant::now();

        while !self.should_quit {
            terminal
                .draw(|frame| view::draw(frame, self))
                .map_err(|e| io::Error::other(e.to_string()))?;

            let timeout = next_frame.saturating_duration_since(Instant::now());
            if event::poll(timeout)? {
                if let CrosstermEvent::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Some(action) = keys::map_key(key, &self.session.presets) {
                            self.handle_action(action);
                        }
                    }
                }
            }

            next_frame = self.catch_up(next_frame, frame_duration);
        }
        Ok(())
    }

    /// Run without a terminal until `limit` elapses or `stop` is raised.
    pub fn run_headless(&mut self, limit: Option<Duration>, stop: &AtomicBool) {
        let frame_duration = self.clock.frame_duration();
        let started = Instant::now();
        let mut next_frame = started;

        while !self.should_quit && !stop.load(Ordering::SeqCst) {
            if limit.is_some_and(|l| started.elapsed() >= l) {
                break;
            }
            std::thread::sleep(next_frame.saturating_duration_since(Instant::now()));
            next_frame = self.catch_up(next_frame, frame_duration);
        }

        tracing::info!(
            frames = self.clock.frame(),
            secs = self.clock.elapsed_secs(),
            "headless run finished"
        );
        self.handle_action(Action::Quit);
    }

    /// Step every frame that is due and return the next deadline.
    fn catch_up(&mut self, mut next_frame: Instant, frame_duration: Duration) -> Instant {
        let now = Instant::now();
        if now.saturating_duration_since(next_frame) > MAX_FRAME_LAG {
            tracing::debug!("frame loop fell behind, resynchronising");
            next_frame = now;
        }
        while next_frame <= now {
            self.step_frame();
            next_frame += frame_duration;
        }
        next_frame
    }
}

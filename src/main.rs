//! chipseq: play, render and check chiptune songs.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chipseq::app::App;
use chipseq::audio::{write_wav, AudioEngine, OutputSink};
use chipseq::config::SongConfig;
use chipseq::session::{checked_duration, Session};

/// Seed for the noise voices in offline renders.
const RENDER_SEED: u64 = 0x5eed;

#[derive(Parser)]
#[command(name = "chipseq")]
#[command(about = "Multi-channel chiptune sequencer")]
#[command(version)]
struct Cli {
    /// Song file (defaults to ~/.chipseq/song.yaml, then the built-in song)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive player (default)
    Play {
        /// Preset applied at startup (overrides the song's start preset)
        #[arg(short, long)]
        preset: Option<char>,
    },

    /// Play through the audio device without a terminal UI
    Headless {
        /// Stop after this many seconds (runs until Ctrl+C otherwise)
        #[arg(short, long)]
        seconds: Option<f64>,

        #[arg(short, long)]
        preset: Option<char>,
    },

    /// Render to a WAV file
    Render {
        /// Output .wav file
        #[arg(short, long, default_value = "chipseq.wav")]
        out: PathBuf,

        #[arg(short, long, default_value_t = 10.0)]
        seconds: f64,

        #[arg(short, long)]
        preset: Option<char>,

        /// Output channels (1 = mono, 2 = stereo)
        #[arg(long, default_value_t = 2)]
        channels: u16,
    },

    /// Validate the song and print a summary
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Play { preset: None });

    match &command {
        Commands::Play { .. } => init_file_logging()?,
        _ => init_logging(),
    }

    let config = load_config(cli.config.as_deref())?;
    let session = config.build().context("song failed to build")?;

    match command {
        Commands::Play { preset } => play(session, preset.or(config.start_preset)),
        Commands::Headless { seconds, preset } => {
            headless(session, preset.or(config.start_preset), seconds)
        }
        Commands::Render {
            out,
            seconds,
            preset,
            channels,
        } => render(session, preset.or(config.start_preset), &out, seconds, channels),
        Commands::Check => {
            check(&config, &session);
            Ok(())
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("CHIPSEQ_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// The terminal belongs to the UI while it runs, so logs go to
/// `~/.chipseq/chipseq.log` instead.
fn init_file_logging() -> Result<()> {
    let Some(dir) = dirs::home_dir().map(|h| h.join(".chipseq")) else {
        return Ok(());
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join("chipseq.log");
    let file =
        File::create(&path).with_context(|| format!("failed to open {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SongConfig> {
    match path {
        Some(path) => {
            SongConfig::load(path).with_context(|| format!("failed to load {}", path.display()))
        }
        None => SongConfig::load_default().context("failed to load default song"),
    }
}

fn apply_start_preset(session: &mut Session, preset: Option<char>) -> Result<()> {
    let Some(key) = preset else {
        return Ok(());
    };
    if !session.apply_preset(key)? {
        bail!("no preset bound to '{key}'");
    }
    Ok(())
}

fn open_audio(sample_rate: u32) -> Option<Box<dyn OutputSink>> {
    match AudioEngine::with_sample_rate(sample_rate) {
        Ok(engine) => Some(Box::new(engine)),
        Err(e) => {
            tracing::warn!(error = %e, "audio unavailable, running silent");
            None
        }
    }
}

fn play(mut session: Session, preset: Option<char>) -> Result<()> {
    apply_start_preset(&mut session, preset)?;
    let engine = open_audio(session.sample_rate);
    let mut app = App::new(session, engine);

    let mut terminal = ratatui::try_init().context("failed to initialise terminal")?;
    let result = app.run(&mut terminal);
    ratatui::restore();
    result.context("terminal loop failed")
}

fn headless(mut session: Session, preset: Option<char>, seconds: Option<f64>) -> Result<()> {
    let limit = seconds
        .map(checked_duration)
        .transpose()
        .context("invalid --seconds")?;
    apply_start_preset(&mut session, preset)?;
    let engine = open_audio(session.sample_rate);
    if engine.is_none() {
        bail!("headless playback needs an audio device; use `render` instead");
    }

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || handler_stop.store(true, Ordering::SeqCst))
        .context("failed to install Ctrl+C handler")?;

    let mut app = App::new(session, engine);
    app.run_headless(limit, &stop);
    Ok(())
}

fn render(
    mut session: Session,
    preset: Option<char>,
    out: &Path,
    seconds: f64,
    channels: u16,
) -> Result<()> {
    if !(1..=2).contains(&channels) {
        bail!("channels must be 1 or 2, got {channels}");
    }
    apply_start_preset(&mut session, preset)?;
    let samples = session
        .render_offline(seconds, channels, RENDER_SEED)
        .context("invalid --seconds")?;
    write_wav(out, &samples, session.sample_rate, channels)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!(
        "wrote {} ({seconds:.1}s, {} Hz, {channels} ch)",
        out.display(),
        session.sample_rate
    );
    Ok(())
}

fn check(config: &SongConfig, session: &Session) {
    println!(
        "song: {} sounds, {} channels, {} fps, {} Hz",
        session.store.len(),
        session.channel_count(),
        session.fps,
        session.sample_rate
    );
    for id in session.store.ids() {
        if let Ok(sound) = session.store.get(id) {
            println!(
                "  sound {id}: {} steps, tone {}, speed {} ({:.2}s)",
                sound.len(),
                sound.tone(),
                sound.speed(),
                sound.total_ticks() as f64 / session.fps as f64
            );
        }
    }
    for (ch, def) in config.channels.iter().enumerate() {
        let ids: Vec<String> = def.playlist.iter().map(|id| id.to_string()).collect();
        println!("  channel #{ch} {}: [{}]", def.name, ids.join(", "));
    }
    for preset in &session.presets {
        println!("  preset '{}': {}", preset.key, preset.label);
    }
}

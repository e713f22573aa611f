//! paint-to-talk - Air-drawing canvas with spoken readback
//!
//! Replays a recorded hand-landmark trace through the full gesture → canvas
//! → OCR → speech pipeline. Camera and window plumbing stay outside the
//! process; the trace stands in for the tracker and the keyboard.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use image::RgbaImage;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use paint_to_talk::app::{Collaborators, PaintApp, PaintSession, Presenter, TickInfo};
use paint_to_talk::capture::{load_trace, CommandQueue, ScriptedTracker, SyntheticVideo};
use paint_to_talk::config::{self, AppConfig};
use paint_to_talk::speech::{RodioPlayer, WatsonSynthesizer, WatsonTranslator};
use paint_to_talk::vision::TesseractRecognizer;

/// paint-to-talk - gesture drawing with OCR readback
#[derive(Parser, Debug)]
#[command(name = "paint-to-talk")]
#[command(about = "Replay a landmark trace through the air-drawing pipeline")]
struct Args {
    /// Landmark trace to replay (JSON Lines, one record per frame)
    trace: PathBuf,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Export the final canvas here after the trace ends
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dump every composite frame into this directory
    #[arg(long)]
    frames_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("paint-to-talk starting...");
    let config = load_or_create_config(args.config.as_deref());

    let records = load_trace(&args.trace)?;
    info!("loaded {} trace records from {}", records.len(), args.trace.display());

    let commands = CommandQueue::new();
    let video = SyntheticVideo::new(config.canvas.width, config.canvas.height, records.len());
    let tracker = ScriptedTracker::new(records, commands.sender());
    let presenter = HeadlessPresenter::new(args.frames_dir.clone())?;

    let collaborators = Collaborators {
        video: Box::new(video),
        tracker: Box::new(tracker),
        presenter: Box::new(presenter),
        recognizer: Box::new(TesseractRecognizer::new(&config.ocr.command)),
        translator: Box::new(WatsonTranslator::new(&config.speech)),
        synthesizer: Box::new(WatsonSynthesizer::new(&config.speech)),
        audio: Box::new(RodioPlayer::new()),
    };

    let session = PaintSession::new(config);
    let app = PaintApp::new(session, collaborators, commands);
    let mut session = app.run()?;

    if let Some(path) = &args.output {
        session
            .export_to(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("final canvas written to {}", path.display());
    }

    info!("paint-to-talk shutdown complete");
    Ok(())
}

/// Load configuration from file or create default
fn load_or_create_config(explicit: Option<&std::path::Path>) -> AppConfig {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => config::default_config_path().ok(),
    };
    if let Some(path) = path {
        if path.exists() {
            if let Ok(config) = config::load_config(&path) {
                info!("Loaded configuration from {:?}", path);
                return config;
            }
        }
    }
    info!("Using default configuration");
    AppConfig::default()
}

/// Presenter for trace runs: no window, optionally dumps composites to disk.
struct HeadlessPresenter {
    frames_dir: Option<PathBuf>,
    frame_index: u64,
}

impl HeadlessPresenter {
    fn new(frames_dir: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = &frames_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(Self {
            frames_dir,
            frame_index: 0,
        })
    }
}

impl Presenter for HeadlessPresenter {
    fn present(&mut self, composite: &RgbaImage, info: &TickInfo) -> Result<()> {
        self.frame_index += 1;
        debug!(
            frame = self.frame_index,
            mode = %info.mode,
            gesture = ?info.gesture,
            "tick presented"
        );
        if let Some(dir) = &self.frames_dir {
            let path = dir.join(format!("frame_{:05}.png", self.frame_index));
            composite.save(&path)?;
        }
        Ok(())
    }
}

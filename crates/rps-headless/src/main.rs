//! Headless runner for the rock-paper-scissors arena.
//!
//! Drives a session at a fixed frame rate with no rendering and prints a
//! summary of the run. Useful for soak tests and for checking that a seed
//! reproduces.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rps_core::{Census, Kind, PairMode, SessionConfig, SessionController};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "rps-headless")]
#[command(about = "Run a rock-paper-scissors arena without a display")]
struct Args {
    /// JSON session config; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Arena width
    #[arg(long)]
    width: Option<f32>,

    /// Arena height
    #[arg(long)]
    height: Option<f32>,

    /// Entities per kind on every reset
    #[arg(long)]
    spawn_count: Option<usize>,

    /// Speed multiplier
    #[arg(long)]
    speed: Option<f32>,

    /// Spawner seed
    #[arg(long)]
    seed: Option<u64>,

    /// Collision pair enumeration
    #[arg(long, value_enum)]
    pair_mode: Option<PairModeArg>,

    /// Number of frames to run
    #[arg(long, default_value_t = 3600)]
    frames: u64,

    /// Frames per second; sets the frame time fed to the win check
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Sleep between frames to run at wall-clock speed
    #[arg(long)]
    realtime: bool,

    /// End the run at the first win instead of starting a new game
    #[arg(long)]
    stop_on_win: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PairModeArg {
    /// Every ordered pair, each contact resolved twice
    OrderedPairs,
    /// Every unordered pair, each contact resolved once
    UnorderedPairs,
}

impl From<PairModeArg> for PairMode {
    fn from(arg: PairModeArg) -> Self {
        match arg {
            PairModeArg::OrderedPairs => PairMode::OrderedPairs,
            PairModeArg::UnorderedPairs => PairMode::UnorderedPairs,
        }
    }
}

impl Args {
    /// Loads `--config` if given, then applies the override flags.
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SessionConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(count) = self.spawn_count {
            config.spawn_count_per_type = count;
        }
        if let Some(speed) = self.speed {
            config.speed_multiplier = speed;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(mode) = self.pair_mode {
            config.pair_mode = mode.into();
        }
        Ok(config)
    }

    fn frame_time(&self) -> Result<Duration> {
        anyhow::ensure!(self.fps > 0, "--fps must be at least 1");
        Ok(Duration::from_secs(1) / self.fps)
    }
}

fn load_config(path: &Path) -> Result<SessionConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// What happened over a run.
#[derive(Debug, Default, PartialEq)]
struct RunSummary {
    frames: u64,
    ticks: u64,
    conversions: usize,
    /// Wins per kind, indexed by `Kind::index`
    wins: [usize; 3],
    last_counts: Census,
}

impl RunSummary {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "frames": self.frames,
            "ticks": self.ticks,
            "conversions": self.conversions,
            "wins": {
                "rock": self.wins[Kind::Rock.index()],
                "paper": self.wins[Kind::Paper.index()],
                "scissors": self.wins[Kind::Scissors.index()],
            },
            "counts": self.last_counts,
        })
    }
}

fn run(session: &mut SessionController, args: &Args) -> Result<RunSummary> {
    let frame_time = args.frame_time()?;
    let mut summary = RunSummary::default();

    session.start().context("initial reset failed")?;
    for _ in 0..args.frames {
        let started = Instant::now();
        let report = session.frame(frame_time)?;
        summary.frames += 1;

        if let Some(tick) = &report.tick {
            summary.conversions += tick.conversions();
        }
        if let Some(winner) = report.winner {
            summary.wins[winner.index()] += 1;
            if args.stop_on_win {
                break;
            }
            session.start()?;
        }

        if args.realtime {
            if let Some(rest) = frame_time.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    summary.ticks = session.tick_count();
    summary.last_counts = session.counts();
    Ok(summary)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    debug!(?args, "arguments");

    let config = args.session_config()?;
    let mut session = SessionController::new(config).context("invalid session config")?;
    session.on_win(|kind| info!(%kind, "game over"));

    let summary = run(&mut session, &args).inspect_err(|err| error!(%err, "run aborted"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary.to_json())?);
    } else {
        println!("Seed: {}", session.seed());
        println!("Frames: {}", summary.frames);
        println!("Ticks: {}", summary.ticks);
        println!("Conversions: {}", summary.conversions);
        for kind in Kind::ALL {
            println!("{kind} wins: {}", summary.wins[kind.index()]);
        }
        println!("Final counts: {}", summary.last_counts);
    }
    Ok(())
}

//! Drone Swarm CLI - drive the swarm kernel from the terminal

use clap::{Args, Parser, Subcommand};
use drone_swarm::{
    FormationKind, NoteEvent, RhythmKind, Swarm, SwarmConfig, SwarmResult, SwarmSnapshot,
    SCALE_NAMES,
};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Parser)]
#[command(name = "drone-swarm")]
#[command(about = "Generative MIDI swarm", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the swarm and print its note events
    Run {
        #[command(flatten)]
        swarm: SwarmArgs,

        /// Stop after this many frames. Without it the run ends only when
        /// killed, and held notes are not drained
        #[arg(short = 'n', long)]
        ticks: Option<u64>,

        /// Don't wait between frames
        #[arg(long)]
        offline: bool,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Run offline and print the final swarm snapshot as JSON
    Snapshot {
        #[command(flatten)]
        swarm: SwarmArgs,

        /// Frames to run before the snapshot (default: 100)
        #[arg(short = 'n', long, default_value = "100")]
        ticks: u64,
    },

    /// List formations, rhythms and scales
    List,

    /// Print the default configuration as TOML
    Config,
}

#[derive(Args)]
struct SwarmArgs {
    /// Config file (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of drones
    #[arg(short, long)]
    agents: Option<usize>,

    /// Formation name
    #[arg(short, long)]
    formation: Option<String>,

    /// Rhythm name
    #[arg(short, long)]
    rhythm: Option<String>,

    /// Scale name
    #[arg(short, long)]
    scale: Option<String>,

    /// Root MIDI note (0-127)
    #[arg(long)]
    root: Option<i32>,

    /// Chaos 0.0-1.0
    #[arg(long)]
    chaos: Option<f32>,

    /// Formation strength 0.0-1.0
    #[arg(long)]
    strength: Option<f32>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Frames per second
    #[arg(long)]
    rate: Option<f32>,
}

impl SwarmArgs {
    fn into_config(self) -> SwarmResult<SwarmConfig> {
        let mut config = match &self.config {
            Some(path) => SwarmConfig::load(path)?,
            None => SwarmConfig::default(),
        };
        if let Some(agents) = self.agents {
            config.agent_count = agents;
        }
        if let Some(formation) = self.formation {
            config.formation = formation;
        }
        if let Some(rhythm) = self.rhythm {
            config.rhythm = rhythm;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(root) = self.root {
            config.root_note = root;
        }
        if let Some(chaos) = self.chaos {
            config.chaos = chaos;
        }
        if let Some(strength) = self.strength {
            config.formation_strength = strength;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(rate) = self.rate {
            config.tick_rate_hz = rate;
        }
        Ok(config.normalized())
    }
}

#[derive(Serialize)]
struct EventLine<'a> {
    frame: u64,
    #[serde(flatten)]
    event: &'a NoteEvent,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so event output stays clean
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            swarm,
            ticks,
            offline,
            json,
        } => {
            let config = swarm.into_config()?;
            run(config, ticks, offline, json)?;
        }
        Commands::Snapshot { swarm, ticks } => {
            let (snapshot, released) = snapshot_after(swarm.into_config()?, ticks);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            // Drained notes go to stderr so stdout stays valid JSON
            write_events(&mut std::io::stderr().lock(), snapshot.frame, &released, false)?;
        }
        Commands::List => {
            println!("Formations:");
            for kind in FormationKind::ALL {
                println!("  {}", kind);
            }
            println!("Rhythms:");
            for kind in RhythmKind::ALL {
                println!("  {}", kind);
            }
            println!("Scales:");
            for name in SCALE_NAMES {
                println!("  {}", name);
            }
        }
        Commands::Config => {
            print!("{}", SwarmConfig::default().to_toml()?);
        }
    }

    Ok(())
}

fn run(config: SwarmConfig, ticks: Option<u64>, offline: bool, json: bool) -> SwarmResult<()> {
    let frame_duration =
        Duration::try_from_secs_f32(1.0 / config.tick_rate_hz).unwrap_or(Duration::from_millis(40));
    info!(
        "Running at {} Hz{}",
        config.tick_rate_hz,
        if offline { " (offline)" } else { "" }
    );

    let mut swarm = Swarm::new(config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let start = Instant::now();
    let mut frames = 0u64;

    while ticks.map_or(true, |limit| frames < limit) {
        let tick = swarm.step();
        frames += 1;
        write_events(&mut out, tick.frame, &tick.events, json)?;

        if !offline {
            // Sleep to the next frame boundary so timing doesn't drift
            let due = frame_duration.mul_f64(frames as f64);
            if let Some(wait) = due.checked_sub(start.elapsed()) {
                std::thread::sleep(wait);
            }
        }
    }

    let released = swarm.shutdown();
    write_events(&mut out, swarm.frame_count(), &released, json)?;
    out.flush()?;
    Ok(())
}

/// Run offline, snapshot the final frame, then release every held note
fn snapshot_after(config: SwarmConfig, ticks: u64) -> (SwarmSnapshot, Vec<NoteEvent>) {
    let mut swarm = Swarm::new(config);
    for _ in 0..ticks {
        swarm.step();
    }
    let snapshot = swarm.snapshot();
    let released = swarm.shutdown();
    (snapshot, released)
}

fn write_events(out: &mut impl Write, frame: u64, events: &[NoteEvent], json: bool) -> SwarmResult<()> {
    for event in events {
        if json {
            let line = EventLine { frame, event };
            writeln!(out, "{}", serde_json::to_string(&line)?)?;
        } else {
            writeln!(out, "{:>6}  {}", frame, event)?;
        }
    }
    Ok(())
}

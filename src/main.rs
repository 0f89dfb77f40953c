//! Maze Chase headless runner
//!
//! Drives the simulation at its fixed timestep with an autopilot standing in
//! for the keyboard, logging events and sound cues as they happen.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use mazechase::Settings;
use mazechase::audio::CueQueue;
use mazechase::consts::TICK_RATE;
use mazechase::sim::{Direction, GameEvent, GamePhase, GameState, TickInput, tick};

/// Headless Maze Chase - run a seeded game without a window
#[derive(Parser, Debug)]
#[command(name = "mazechase")]
#[command(about = "Run a deterministic Maze Chase game and report the outcome")]
struct Args {
    /// Random seed for the game (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks to simulate
    #[arg(long, default_value_t = 60 * 60)]
    ticks: u64,

    /// JSON settings file; missing fields keep their defaults
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    snapshot: bool,
}

/// Presses keys the way an idle player would
struct Autopilot {
    rng: Pcg32,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
        }
    }

    fn next(&mut self, phase: GamePhase) -> TickInput {
        match phase {
            GamePhase::Loading | GamePhase::GameOver => TickInput {
                confirm: true,
                ..Default::default()
            },
            GamePhase::Paused => TickInput::default(),
            GamePhase::Running => {
                // Roughly two presses a second, biased upward
                let direction = if self.rng.random_bool(2.0 / TICK_RATE as f64) {
                    Some(match self.rng.random_range(0..6) {
                        0 | 1 | 2 => Direction::North,
                        3 => Direction::East,
                        4 => Direction::West,
                        _ => Direction::South,
                    })
                } else {
                    None
                };
                TickInput {
                    direction,
                    confirm: false,
                }
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => match Settings::load_from_path(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load settings from {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Maze Chase starting (seed {seed}, {} ticks)", args.ticks);

    let mut state = GameState::with_settings(seed, settings);
    let mut autopilot = Autopilot::new(seed);
    let mut cues = CueQueue::new();
    let mut runs = 0u32;
    let mut best_score = 0u64;

    for _ in 0..args.ticks {
        let input = autopilot.next(state.phase);
        tick(&mut state, &input);

        for event in &state.events {
            log::debug!("t={} {event:?}", state.time_ticks);
        }
        cues.push_events(&state.events);
        for cue in cues.drain() {
            log::trace!("cue {} @ {:.2}", cue.effect.asset_name(), cue.volume);
        }

        if let Some(session) = &state.session {
            best_score = best_score.max(session.score);
        }
        if state.events.contains(&GameEvent::GameOver) {
            runs += 1;
        }
    }

    let snapshot = state.snapshot();
    println!(
        "seed {seed}: {} ticks, phase {:?}, score {}, lives {}",
        state.time_ticks, snapshot.phase, snapshot.score, snapshot.lives
    );
    println!("best score {best_score}, finished runs {runs}");
    if let Some(session) = &state.session {
        println!(
            "maze: {} rows generated, head at {}",
            session.maze.generated(),
            session.maze.head_index()
        );
    }

    if args.snapshot {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                log::error!("Failed to serialize snapshot: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

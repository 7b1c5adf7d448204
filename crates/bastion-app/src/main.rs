//! Headless battle runner.
//!
//! Usage: `bastion-app [CONFIG.json] [--ticks N] [--live SECONDS]`
//!
//! Fast mode (the default) steps the engine as quickly as possible and
//! prints the final battle summary as JSON. Live mode runs the threaded
//! game loop in real time.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use bastion_app::config::load_config;
use bastion_app::control;
use bastion_app::logging::setup_logging;
use bastion_app::state::AppState;
use bastion_core::commands::PlayerCommand;
use bastion_core::types::Position;
use bastion_sim::{BattleEngine, SimConfig};

/// Opening build: one tower per quadrant next to the centre cross.
const OPENING: [(&str, f64, f64); 4] = [
    ("basic_tower", -80.0, -80.0),
    ("archer_tower", 80.0, -80.0),
    ("frost_tower", -80.0, 80.0),
    ("basic_tower", 80.0, 80.0),
];

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    ticks: u64,
    live_secs: Option<u64>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        ticks: 15_000,
        live_secs: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--ticks" => {
                let value = iter.next().ok_or("--ticks needs a value")?;
                args.ticks = value.parse().map_err(|_| format!("bad tick count `{value}`"))?;
            }
            "--live" => {
                let value = iter.next().ok_or("--live needs a value")?;
                args.live_secs =
                    Some(value.parse().map_err(|_| format!("bad duration `{value}`"))?);
            }
            other if other.starts_with("--") => return Err(format!("unknown flag `{other}`")),
            path => args.config = Some(PathBuf::from(path)),
        }
    }
    Ok(args)
}

fn run_fast(config: SimConfig, ticks: u64) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = BattleEngine::new(config)?;
    for (id, x, y) in OPENING {
        engine.place_tower(id, Position::new(x, y))?;
    }
    engine.queue_command(PlayerCommand::StartWave);

    let mut last = engine.tick();
    for _ in 1..ticks {
        if last.battle.is_game_over {
            break;
        }
        last = engine.tick();
    }

    tracing::info!(
        tick = last.time.tick,
        wave = last.battle.wave.number,
        score = last.battle.score,
        killed = last.battle.enemies_killed,
        "battle finished"
    );
    println!("{}", serde_json::to_string_pretty(&last.battle)?);
    Ok(())
}

fn run_live(config: SimConfig, secs: u64) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new();
    control::start_battle(&state, config)?;
    for (id, x, y) in OPENING {
        control::place_tower(&state, id, x, y)?;
    }
    control::send_command(&state, PlayerCommand::StartWave)?;

    for _ in 0..secs {
        std::thread::sleep(Duration::from_secs(1));
        if let Some(snap) = control::get_snapshot(&state)? {
            tracing::info!(
                wave = snap.battle.wave.number,
                timer = snap.battle.wave.timer_secs,
                population = snap.battle.population,
                gold = snap.battle.gold,
                "status"
            );
            if snap.battle.is_game_over {
                break;
            }
        }
    }
    control::stop_battle(&state)?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = setup_logging() {
        eprintln!("failed to initialise logging: {err}");
    }

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            tracing::error!("{msg}");
            return ExitCode::from(2);
        }
    };

    let config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!(%err, "could not load config");
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };

    let result = match args.live_secs {
        Some(secs) => run_live(config, secs),
        None => run_fast(config, args.ticks),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "battle failed");
            ExitCode::FAILURE
        }
    }
}

//! Game loop thread: runs the battle engine at the fixed tick rate.
//!
//! The engine is built inside the thread because its listeners are not
//! `Send`. Commands arrive over an `mpsc` channel and every snapshot is
//! stored in shared state for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use bastion_core::constants::TICK_RATE;
use bastion_core::events::BattleEvent;
use bastion_core::state::BattleSnapshot;
use bastion_core::types::Position;
use bastion_sim::{BattleEngine, SimConfig};

use crate::control::ControlError;
use crate::state::LoopCommand;

/// Nominal duration of one tick at 1x speed.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// A running loop thread and the channel that feeds it.
pub struct LoopHandle {
    pub commands: mpsc::Sender<LoopCommand>,
    pub thread: JoinHandle<()>,
}

/// Spawn the game loop thread. Returns once the engine has been built, so a
/// bad config surfaces here instead of inside the thread.
pub fn spawn_game_loop(
    config: SimConfig,
    latest_snapshot: Arc<Mutex<Option<BattleSnapshot>>>,
) -> Result<LoopHandle, ControlError> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();
    let (ready_tx, ready_rx) = mpsc::sync_channel(1);

    let thread = std::thread::Builder::new()
        .name("bastion-game-loop".into())
        .spawn(move || {
            let engine = match BattleEngine::new(config) {
                Ok(engine) => {
                    let _ = ready_tx.send(Ok(()));
                    engine
                }
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                    return;
                }
            };
            run_game_loop(engine, cmd_rx, &latest_snapshot);
        })
        .map_err(ControlError::Spawn)?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(LoopHandle {
            commands: cmd_tx,
            thread,
        }),
        Ok(Err(err)) => {
            let _ = thread.join();
            Err(ControlError::Path(err))
        }
        Err(_) => {
            let _ = thread.join();
            Err(ControlError::LoopExited)
        }
    }
}

/// Hook engine events into the log.
fn attach_log_listeners(engine: &mut BattleEngine) {
    engine.on_wave_complete(|event| {
        if let BattleEvent::WaveCompleted {
            wave,
            skipped,
            score_multiplier,
        } = event
        {
            tracing::info!(wave, skipped, score_multiplier, "wave complete");
        }
    });
    engine.on_game_over(|event| {
        if let BattleEvent::GameOver { score, wave } = event {
            tracing::warn!(score, wave, "battle lost");
        }
    });
}

/// Apply one loop message. Returns false when the loop should stop.
fn handle_message(engine: &mut BattleEngine, message: LoopCommand) -> bool {
    match message {
        LoopCommand::Player(cmd) => engine.queue_command(cmd),
        LoopCommand::PlaceTower {
            definition_id,
            x,
            y,
        } => {
            if let Err(err) = engine.place_tower(&definition_id, Position::new(x, y)) {
                tracing::warn!(%definition_id, x, y, %err, "tower placement rejected");
            }
        }
        LoopCommand::Shutdown => return false,
    }
    true
}

/// The game loop. Runs until Shutdown or channel disconnect.
fn run_game_loop(
    mut engine: BattleEngine,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<BattleSnapshot>>,
) {
    attach_log_listeners(&mut engine);
    let mut next_tick_time = Instant::now();
    tracing::info!("game loop started");

    loop {
        // 1. Drain all pending messages
        loop {
            match cmd_rx.try_recv() {
                Ok(message) => {
                    if !handle_message(&mut engine, message) {
                        tracing::info!("game loop stopped");
                        return;
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick (pause and game over are handled by the engine)
        let snapshot = engine.tick();

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until next tick, adjusting for time_scale
        let time_scale = engine.time_scale();
        let effective_tick_duration = if time_scale > 0.001 {
            TICK_DURATION.div_f64(time_scale)
        } else {
            TICK_DURATION
        };

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind, reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::commands::PlayerCommand;
    use bastion_core::enums::BattlePhase;

    fn wait_for<F: Fn(&BattleSnapshot) -> bool>(
        slot: &Mutex<Option<BattleSnapshot>>,
        pred: F,
    ) -> Option<BattleSnapshot> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(snap) = slot.lock().unwrap().as_ref() {
                if pred(snap) {
                    return Some(snap.clone());
                }
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<LoopCommand>();

        tx.send(LoopCommand::Player(PlayerCommand::StartWave)).unwrap();
        tx.send(LoopCommand::PlaceTower {
            definition_id: "basic_tower".into(),
            x: -320.0,
            y: -320.0,
        })
        .unwrap();
        tx.send(LoopCommand::Shutdown).unwrap();

        let commands: Vec<LoopCommand> = rx.try_iter().collect();
        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            LoopCommand::Player(PlayerCommand::StartWave)
        ));
        assert!(matches!(commands[1], LoopCommand::PlaceTower { .. }));
        assert!(matches!(commands[2], LoopCommand::Shutdown));
    }

    #[test]
    fn test_handle_message_applies_commands() {
        let mut engine = BattleEngine::new(SimConfig::default()).unwrap();
        assert!(handle_message(
            &mut engine,
            LoopCommand::Player(PlayerCommand::StartWave)
        ));
        assert!(handle_message(
            &mut engine,
            LoopCommand::PlaceTower {
                definition_id: "basic_tower".into(),
                x: -320.0,
                y: -320.0,
            }
        ));
        // Rejected placements are logged, not fatal.
        assert!(handle_message(
            &mut engine,
            LoopCommand::PlaceTower {
                definition_id: "basic_tower".into(),
                x: 0.0,
                y: 0.0,
            }
        ));
        assert!(!handle_message(&mut engine, LoopCommand::Shutdown));

        let snap = engine.tick();
        assert_eq!(snap.phase, BattlePhase::WaveActive);
        assert_eq!(snap.towers.len(), 1);
    }

    #[test]
    fn test_loop_thread_publishes_snapshots() {
        let slot = Arc::new(Mutex::new(None));
        let handle = spawn_game_loop(SimConfig::default(), slot.clone()).unwrap();

        handle
            .commands
            .send(LoopCommand::Player(PlayerCommand::StartWave))
            .unwrap();
        let snap = wait_for(&slot, |s| s.phase == BattlePhase::WaveActive);
        assert!(snap.is_some(), "loop never started the wave");

        handle.commands.send(LoopCommand::Shutdown).unwrap();
        handle.thread.join().unwrap();
    }

    #[test]
    fn test_bad_arena_fails_at_spawn() {
        let mut config = SimConfig::default();
        config.arena.cell_size = f64::NAN;
        let result = spawn_game_loop(config, Arc::new(Mutex::new(None)));
        assert!(matches!(result, Err(ControlError::Path(_))));
    }

    #[test]
    fn test_snapshot_serialization_under_3ms() {
        let mut engine = BattleEngine::new(SimConfig::default()).unwrap();
        engine.queue_command(PlayerCommand::StartWave);
        for _ in 0..500 {
            engine.tick();
        }

        let snapshot = engine.tick();
        let start = Instant::now();
        let json = serde_json::to_string(&snapshot).unwrap();
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_millis(3),
            "Snapshot serialization took {:?}, should be <3ms",
            elapsed
        );
        assert!(!json.is_empty());
    }

    #[test]
    fn test_tick_duration_constant() {
        // 50Hz = 20ms per tick
        assert_eq!(TICK_DURATION, Duration::from_millis(20));
    }
}

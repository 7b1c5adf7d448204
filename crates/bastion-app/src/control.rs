//! Control surface: start a battle, send input and poll snapshots.
//!
//! Each call forwards to the game loop thread through the channel stored
//! in `AppState`.

use thiserror::Error;

use bastion_core::commands::PlayerCommand;
use bastion_core::errors::PathError;
use bastion_core::state::BattleSnapshot;
use bastion_sim::SimConfig;

use crate::game_loop;
use crate::state::{AppState, LoopCommand};

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("battle already running")]
    AlreadyRunning,
    #[error("battle not started")]
    NotStarted,
    #[error("game loop thread has exited")]
    LoopExited,
    #[error("shared state lock poisoned")]
    Poisoned,
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("invalid battle route: {0}")]
    Path(#[from] PathError),
}

/// Start a battle on a fresh loop thread.
pub fn start_battle(state: &AppState, config: SimConfig) -> Result<(), ControlError> {
    let mut tx_lock = state.command_tx.lock().map_err(|_| ControlError::Poisoned)?;
    if tx_lock.is_some() {
        return Err(ControlError::AlreadyRunning);
    }

    let handle = game_loop::spawn_game_loop(config, state.latest_snapshot.clone())?;
    *tx_lock = Some(handle.commands);
    *state.loop_thread.lock().map_err(|_| ControlError::Poisoned)? = Some(handle.thread);
    Ok(())
}

fn send(state: &AppState, message: LoopCommand) -> Result<(), ControlError> {
    let tx_lock = state.command_tx.lock().map_err(|_| ControlError::Poisoned)?;
    match tx_lock.as_ref() {
        Some(tx) => tx.send(message).map_err(|_| ControlError::LoopExited),
        None => Err(ControlError::NotStarted),
    }
}

pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<(), ControlError> {
    send(state, LoopCommand::Player(command))
}

/// Request a tower placement. Rejections are reported in the log, and the
/// tower shows up in the next snapshot when accepted.
pub fn place_tower(
    state: &AppState,
    definition_id: &str,
    x: f64,
    y: f64,
) -> Result<(), ControlError> {
    send(
        state,
        LoopCommand::PlaceTower {
            definition_id: definition_id.to_string(),
            x,
            y,
        },
    )
}

pub fn get_snapshot(state: &AppState) -> Result<Option<BattleSnapshot>, ControlError> {
    let lock = state
        .latest_snapshot
        .lock()
        .map_err(|_| ControlError::Poisoned)?;
    Ok(lock.clone())
}

/// Stop the loop thread and wait for it to exit.
pub fn stop_battle(state: &AppState) -> Result<(), ControlError> {
    let tx = state
        .command_tx
        .lock()
        .map_err(|_| ControlError::Poisoned)?
        .take()
        .ok_or(ControlError::NotStarted)?;
    let _ = tx.send(LoopCommand::Shutdown);

    let thread = state
        .loop_thread
        .lock()
        .map_err(|_| ControlError::Poisoned)?
        .take();
    if let Some(thread) = thread {
        thread.join().map_err(|_| ControlError::LoopExited)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_commands_before_start_are_rejected() {
        let state = AppState::new();
        assert!(matches!(
            send_command(&state, PlayerCommand::Pause),
            Err(ControlError::NotStarted)
        ));
        assert!(matches!(stop_battle(&state), Err(ControlError::NotStarted)));
        assert!(get_snapshot(&state).unwrap().is_none());
    }

    #[test]
    fn test_start_place_and_stop() {
        let state = AppState::new();
        start_battle(&state, SimConfig::default()).unwrap();
        assert!(matches!(
            start_battle(&state, SimConfig::default()),
            Err(ControlError::AlreadyRunning)
        ));

        place_tower(&state, "archer_tower", -320.0, -320.0).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut placed = false;
        while Instant::now() < deadline && !placed {
            placed = get_snapshot(&state)
                .unwrap()
                .is_some_and(|snap| snap.towers.len() == 1);
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(placed, "tower never appeared in a snapshot");

        stop_battle(&state).unwrap();
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(matches!(
            send_command(&state, PlayerCommand::Resume),
            Err(ControlError::NotStarted)
        ));
    }
}

//! Application state shared between the control surface and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use bastion_core::commands::PlayerCommand;
use bastion_core::state::BattleSnapshot;

/// Messages sent to the game loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// Forwarded to the engine's command queue.
    Player(PlayerCommand),
    /// Place a tower from the catalog at a world position.
    PlaceTower {
        definition_id: String,
        x: f64,
        y: f64,
    },
    /// Stop the loop thread.
    Shutdown,
}

/// Shared host state.
///
/// `mpsc::Sender` is not Sync, so it lives behind a `Mutex`. The snapshot
/// slot is shared with the loop thread, which overwrites it every tick.
pub struct AppState {
    /// `None` until a battle is started.
    pub command_tx: Mutex<Option<mpsc::Sender<LoopCommand>>>,
    pub latest_snapshot: Arc<Mutex<Option<BattleSnapshot>>>,
    pub loop_thread: Mutex<Option<std::thread::JoinHandle<()>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            loop_thread: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(state.latest_snapshot.lock().unwrap().is_none());
        assert!(state.loop_thread.lock().unwrap().is_none());
    }
}

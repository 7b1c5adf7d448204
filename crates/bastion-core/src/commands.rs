//! Player commands sent from the presentation layer to the simulation.
//!
//! Commands are queued and applied at the next tick boundary. Placement,
//! selling and merging are direct engine calls because they return results.

use serde::{Deserialize, Serialize};

/// Battle flow commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Start the first wave. Ignored once waves are running.
    StartWave,
    /// End the current wave early for a score multiplier bonus.
    SkipWave,
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
    /// Set time scale (1.0 = normal, 2.0 = double).
    SetTimeScale { scale: f64 },
}

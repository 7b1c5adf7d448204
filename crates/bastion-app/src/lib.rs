//! Headless host for the battle engine.
//!
//! Runs the simulation on its own thread, forwards player input over a
//! channel and keeps the latest snapshot for polling.

pub mod config;
pub mod control;
pub mod game_loop;
pub mod logging;
pub mod state;

pub use bastion_core as core;

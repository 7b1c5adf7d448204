//! Core types and definitions for the BASTION battle simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, definitions, commands, snapshots, events, errors and constants.
//! It has no dependency on the ECS or any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod definitions;
pub mod enums;
pub mod errors;
pub mod events;
pub mod state;
pub mod types;

//! Recoverable domain errors returned to the caller. None of them mutate state.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("position ({x:.1}, {y:.1}) is outside the placement grid")]
    OutOfBounds { x: f64, y: f64 },
    #[error("cell ({col}, {row}) lies on the enemy path")]
    OnPath { col: u32, row: u32 },
    #[error("cell ({col}, {row}) is already occupied")]
    Occupied { col: u32, row: u32 },
    #[error("unknown tower definition `{0}`")]
    UnknownDefinition(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("merging `{definition_id}` needs {need} copies, found {have}")]
    InsufficientCopies {
        definition_id: String,
        have: usize,
        need: usize,
    },
    #[error("`{definition_id}` is already at the highest rarity")]
    MaxRarity { definition_id: String },
    #[error("unknown tower definition `{0}`")]
    UnknownDefinition(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TowerError {
    #[error("no tower with id {0}")]
    UnknownTower(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("a path needs at least 2 waypoints, got {0}")]
    TooFewWaypoints(usize),
    #[error("waypoint {0} is not finite")]
    NonFiniteWaypoint(usize),
}

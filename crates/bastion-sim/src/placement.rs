//! Battlefield geometry and the tower placement grid.
//!
//! The map is a square of `3 corridors + 2 quadrants` cells per side,
//! centred on the world origin. A cell is on-path when its centre lies
//! within half a corridor width of the route.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use bastion_core::components::GridSlot;
use bastion_core::constants::{CELL_SIZE, CORRIDOR_CELLS, QUADRANT_CELLS};
use bastion_core::errors::PlacementError;
use bastion_core::types::Position;

use crate::path::Path;

/// Map dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaLayout {
    pub cell_size: f64,
    pub corridor_cells: u32,
    pub quadrant_cells: u32,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            corridor_cells: CORRIDOR_CELLS,
            quadrant_cells: QUADRANT_CELLS,
        }
    }
}

impl ArenaLayout {
    /// Cells per side.
    pub fn total_cells(&self) -> u32 {
        self.corridor_cells * 3 + self.quadrant_cells * 2
    }

    /// Edge length of the whole map in world units.
    pub fn map_size(&self) -> f64 {
        self.total_cells() as f64 * self.cell_size
    }

    pub fn half_size(&self) -> f64 {
        self.map_size() / 2.0
    }

    pub fn corridor_half_width(&self) -> f64 {
        self.corridor_cells as f64 * self.cell_size / 2.0
    }

    /// Centre line of the outer corridor on the negative side (top or left).
    pub fn corridor_centre_near(&self) -> f64 {
        -self.half_size() + self.corridor_half_width()
    }

    /// Centre line of the outer corridor on the positive side (bottom or right).
    pub fn corridor_centre_far(&self) -> f64 {
        self.half_size() - self.corridor_half_width()
    }
}

/// Which cells accept towers, and which tower holds each cell.
#[derive(Debug, Clone)]
pub struct PlacementGrid {
    layout: ArenaLayout,
    cells: u32,
    on_path: Vec<bool>,
    occupants: Vec<Option<Entity>>,
}

impl PlacementGrid {
    pub fn new(layout: ArenaLayout, path: &Path) -> Self {
        let cells = layout.total_cells();
        let count = (cells * cells) as usize;
        let half_width = layout.corridor_half_width();
        let mut grid = Self {
            layout,
            cells,
            on_path: vec![false; count],
            occupants: vec![None; count],
        };
        for row in 0..cells {
            for col in 0..cells {
                let centre = grid.cell_centre(GridSlot { col, row });
                let idx = grid.index(GridSlot { col, row });
                grid.on_path[idx] = path.distance_to(centre.as_vec()) < half_width;
            }
        }
        grid
    }

    pub fn layout(&self) -> &ArenaLayout {
        &self.layout
    }

    /// The cell containing a world position, if inside the map.
    pub fn cell_at(&self, pos: &Position) -> Option<GridSlot> {
        let half = self.layout.half_size();
        let col = ((pos.x + half) / self.layout.cell_size).floor();
        let row = ((pos.y + half) / self.layout.cell_size).floor();
        let max = self.cells as f64;
        if !(0.0..max).contains(&col) || !(0.0..max).contains(&row) {
            return None;
        }
        Some(GridSlot {
            col: col as u32,
            row: row as u32,
        })
    }

    pub fn cell_centre(&self, slot: GridSlot) -> Position {
        let half = self.layout.half_size();
        let size = self.layout.cell_size;
        Position::new(
            -half + (slot.col as f64 + 0.5) * size,
            -half + (slot.row as f64 + 0.5) * size,
        )
    }

    pub fn is_on_path(&self, slot: GridSlot) -> bool {
        self.on_path[self.index(slot)]
    }

    pub fn occupant(&self, slot: GridSlot) -> Option<Entity> {
        self.occupants[self.index(slot)]
    }

    /// Resolve a world position to a free, buildable cell.
    pub fn check(&self, pos: &Position) -> Result<GridSlot, PlacementError> {
        let slot = self
            .cell_at(pos)
            .ok_or(PlacementError::OutOfBounds { x: pos.x, y: pos.y })?;
        if self.is_on_path(slot) {
            return Err(PlacementError::OnPath {
                col: slot.col,
                row: slot.row,
            });
        }
        if self.occupant(slot).is_some() {
            return Err(PlacementError::Occupied {
                col: slot.col,
                row: slot.row,
            });
        }
        Ok(slot)
    }

    pub fn occupy(&mut self, slot: GridSlot, tower: Entity) {
        let idx = self.index(slot);
        self.occupants[idx] = Some(tower);
    }

    pub fn release(&mut self, slot: GridSlot) {
        let idx = self.index(slot);
        self.occupants[idx] = None;
    }

    /// Number of cells that could ever hold a tower.
    pub fn buildable_count(&self) -> usize {
        self.on_path.iter().filter(|on| !**on).count()
    }

    fn index(&self, slot: GridSlot) -> usize {
        (slot.row * self.cells + slot.col) as usize
    }
}

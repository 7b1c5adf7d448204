//! Merge upgrades: trade duplicate towers for one of the next rarity tier.
//!
//! Copies are counted across the reserve of unplaced cards and the towers
//! on the field. Cards are consumed first, then placed towers, newest first.

use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use bastion_core::components::{GridSlot, Tower};
use bastion_core::constants::MERGE_COPIES_REQUIRED;
use bastion_core::definitions::{TowerCatalog, TowerDefinition};
use bastion_core::errors::MergeError;
use bastion_core::events::BattleEvent;

use crate::placement::PlacementGrid;

/// Tower cards held by the player but not on the field.
#[derive(Debug, Clone, Default)]
pub struct Reserve {
    cards: Vec<String>,
}

impl Reserve {
    pub fn add(&mut self, definition_id: &str) {
        self.cards.push(definition_id.to_string());
    }

    pub fn count(&self, definition_id: &str) -> usize {
        self.cards.iter().filter(|c| *c == definition_id).count()
    }

    /// Remove up to `n` cards with the given id, most recent first.
    fn take(&mut self, definition_id: &str, n: usize) -> usize {
        let mut taken = 0;
        let mut idx = self.cards.len();
        while idx > 0 && taken < n {
            idx -= 1;
            if self.cards[idx] == definition_id {
                self.cards.remove(idx);
                taken += 1;
            }
        }
        taken
    }

    pub fn cards(&self) -> &[String] {
        &self.cards
    }
}

/// What a merge will consume. Built before anything is mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    pub cards: usize,
    pub towers: Vec<Entity>,
}

/// Work out which copies a merge would consume.
pub fn plan(
    world: &World,
    reserve: &Reserve,
    definition_id: &str,
    need: usize,
) -> Result<MergePlan, MergeError> {
    let cards = reserve.count(definition_id).min(need);

    let mut placed: Vec<(u64, Entity)> = world
        .query::<&Tower>()
        .iter()
        .filter(|(_, tower)| tower.definition_id == definition_id)
        .map(|(entity, tower)| (tower.serial, entity))
        .collect();
    placed.sort_by(|a, b| b.0.cmp(&a.0));

    let have = reserve.count(definition_id) + placed.len();
    if have < need {
        return Err(MergeError::InsufficientCopies {
            definition_id: definition_id.to_string(),
            have,
            need,
        });
    }

    let towers = placed
        .into_iter()
        .take(need - cards)
        .map(|(_, entity)| entity)
        .collect();
    Ok(MergePlan { cards, towers })
}

/// Consume `MERGE_COPIES_REQUIRED` copies of `definition_id` and add a random
/// tower of the next populated rarity tier to the reserve. Nothing changes
/// on error.
pub fn merge_upgrade(
    world: &mut World,
    grid: &mut PlacementGrid,
    reserve: &mut Reserve,
    catalog: &TowerCatalog,
    rng: &mut ChaCha8Rng,
    definition_id: &str,
    events: &mut Vec<BattleEvent>,
) -> Result<TowerDefinition, MergeError> {
    let source = catalog
        .get(definition_id)
        .ok_or_else(|| MergeError::UnknownDefinition(definition_id.to_string()))?;
    let next_rarity =
        catalog
            .next_populated_rarity(source.rarity)
            .ok_or_else(|| MergeError::MaxRarity {
                definition_id: definition_id.to_string(),
            })?;
    let plan = plan(world, reserve, definition_id, MERGE_COPIES_REQUIRED)?;
    let result = catalog
        .by_rarity(next_rarity)
        .choose(rng)
        .map(|d| (*d).clone())
        .ok_or_else(|| MergeError::MaxRarity {
            definition_id: definition_id.to_string(),
        })?;

    reserve.take(definition_id, plan.cards);
    for entity in plan.towers {
        if let Ok(slot) = world.get::<&GridSlot>(entity).map(|s| *s) {
            grid.release(slot);
        }
        let _ = world.despawn(entity);
    }
    reserve.add(&result.id);

    tracing::debug!(consumed = definition_id, result = %result.id, "merge upgrade");
    events.push(BattleEvent::MergeCompleted {
        consumed_id: definition_id.to_string(),
        result_id: result.id.clone(),
    });
    Ok(result)
}

//! Tower and enemy definitions.
//!
//! Every definition is an explicit record with all fields populated at
//! construction. Effect and targeting are derived from the tower family
//! once, never looked up at the point of use.

use serde::{Deserialize, Serialize};

use crate::components::TowerStats;
use crate::enums::*;

/// A tower card as it appears in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerDefinition {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub kind: TowerKind,
    pub damage: f64,
    pub range: f64,
    pub attack_speed_ms: f64,
    pub projectile_speed: f64,
    pub effect: ProjectileEffect,
    pub strategy: TargetingStrategy,
}

/// The set of tower definitions available to a battle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TowerCatalog {
    definitions: Vec<TowerDefinition>,
}

/// Stats for one enemy about to be spawned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    pub kind: EnemyKind,
    pub health: f64,
    pub speed: f64,
    pub damage_to_base: u32,
    pub gold_value: u32,
    pub score_value: u32,
}

impl TowerDefinition {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &str,
        name: &str,
        rarity: Rarity,
        kind: TowerKind,
        damage: f64,
        range: f64,
        attack_speed_ms: f64,
        projectile_speed: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            rarity,
            kind,
            damage,
            range,
            attack_speed_ms,
            projectile_speed,
            effect: kind.projectile_effect(),
            strategy: kind.targeting_strategy(),
        }
    }

    /// Fresh stats with no bonuses.
    pub fn base_stats(&self) -> TowerStats {
        TowerStats {
            base_damage: self.damage,
            base_range: self.range,
            base_attack_speed_ms: self.attack_speed_ms,
            ..Default::default()
        }
    }
}

impl TowerCatalog {
    pub fn new(definitions: Vec<TowerDefinition>) -> Self {
        Self { definitions }
    }

    /// The seventeen towers of the standard card set.
    pub fn standard() -> Self {
        use Rarity::*;
        use TowerKind::*;
        Self::new(vec![
            TowerDefinition::new("basic_tower", "Basic Tower", Common, Basic, 8.0, 120.0, 1000.0, 400.0),
            TowerDefinition::new("archer_tower", "Archer Tower", Common, Archer, 6.0, 150.0, 700.0, 500.0),
            TowerDefinition::new("mage_tower", "Mage Tower", Uncommon, Mage, 25.0, 140.0, 1500.0, 300.0),
            TowerDefinition::new("cannon_tower", "Cannon Tower", Uncommon, Cannon, 20.0, 130.0, 2000.0, 350.0),
            TowerDefinition::new("frost_tower", "Frost Tower", Uncommon, Frost, 5.0, 100.0, 800.0, 300.0),
            TowerDefinition::new("lightning_tower", "Lightning Tower", Rare, Lightning, 15.0, 120.0, 1200.0, 600.0),
            TowerDefinition::new("sniper_tower", "Sniper Tower", Rare, Archer, 50.0, 250.0, 2500.0, 800.0),
            TowerDefinition::new("inferno_tower", "Inferno Tower", Epic, Mage, 30.0, 140.0, 1000.0, 400.0),
            TowerDefinition::new("void_cannon", "Void Cannon", Epic, Cannon, 60.0, 160.0, 3000.0, 300.0),
            TowerDefinition::new("ancient_guardian", "Ancient Guardian", Legendary, Mage, 25.0, 200.0, 500.0, 600.0),
            TowerDefinition::new("dragon_breath", "Dragon's Breath", Legendary, Cannon, 40.0, 180.0, 1500.0, 400.0),
            TowerDefinition::new("titan_fortress", "Titan Fortress", Mythic, Cannon, 100.0, 220.0, 2000.0, 500.0),
            TowerDefinition::new("phoenix_spire", "Phoenix Spire", Mythic, Mage, 50.0, 180.0, 800.0, 600.0),
            TowerDefinition::new("celestial_arbiter", "Celestial Arbiter", Exalted, Mage, 150.0, 250.0, 1500.0, 700.0),
            TowerDefinition::new("astral_nexus", "Astral Nexus", Celestial, Lightning, 200.0, 300.0, 1000.0, 800.0),
            TowerDefinition::new("eternal_sentinel", "Eternal Sentinel", Transcendent, Mage, 300.0, 350.0, 500.0, 1000.0),
            TowerDefinition::new("omniscient_obelisk", "Omniscient Obelisk", Divine, Cannon, 500.0, 400.0, 300.0, 1200.0),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&TowerDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    /// Definitions of the given rarity, in catalog order.
    pub fn by_rarity(&self, rarity: Rarity) -> Vec<&TowerDefinition> {
        self.definitions.iter().filter(|d| d.rarity == rarity).collect()
    }

    /// Lowest rarity above `rarity` that has at least one definition.
    pub fn next_populated_rarity(&self, rarity: Rarity) -> Option<Rarity> {
        let mut next = rarity.next();
        while let Some(r) = next {
            if self.definitions.iter().any(|d| d.rarity == r) {
                return Some(r);
            }
            next = r.next();
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = &TowerDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl EnemyDefinition {
    /// Unscaled stats for each enemy kind.
    pub fn base(kind: EnemyKind) -> Self {
        let (health, speed, damage_to_base, gold_value, score_value) = match kind {
            EnemyKind::Normal => (50.0, 60.0, 10, 5, 10),
            EnemyKind::Fast => (30.0, 120.0, 5, 4, 8),
            EnemyKind::Tank => (150.0, 35.0, 20, 10, 25),
            EnemyKind::Flying => (40.0, 80.0, 8, 7, 15),
            EnemyKind::Elite => (300.0, 45.0, 30, 50, 100),
            EnemyKind::Boss => (1000.0, 25.0, 50, 200, 500),
        };
        Self {
            kind,
            health,
            speed,
            damage_to_base,
            gold_value,
            score_value,
        }
    }

    /// Apply linear wave scaling: health by `1 + health_per_wave * wave`,
    /// gold and score by `1 + reward_per_wave * wave`. All results floored.
    pub fn scaled(&self, wave: u32, health_per_wave: f64, reward_per_wave: f64) -> Self {
        let w = wave as f64;
        let health_mult = 1.0 + w * health_per_wave;
        let reward_mult = 1.0 + w * reward_per_wave;
        Self {
            health: (self.health * health_mult).floor(),
            gold_value: (self.gold_value as f64 * reward_mult).floor() as u32,
            score_value: (self.score_value as f64 * reward_mult).floor() as u32,
            ..*self
        }
    }
}

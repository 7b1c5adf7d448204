//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Enemy archetype. Affects stats and damage mitigation only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Normal,
    Fast,
    /// Takes 70% of incoming damage.
    Tank,
    Flying,
    Elite,
    Boss,
}

/// Tower family. Determines on-hit effect and targeting strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    #[default]
    Basic,
    Archer,
    Mage,
    Cannon,
    Frost,
    Lightning,
}

/// Timed modifier applied to an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Burn,
    Freeze,
    Poison,
    Slow,
    Stun,
    Shield,
    Weakness,
}

/// How a tower picks its target among enemies in range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetingStrategy {
    /// Nearest enemy to the tower.
    #[default]
    Closest,
    /// Enemy furthest along the route (laps count).
    FurthestAlongPath,
    /// Enemy with the most neighbours inside the splash radius.
    ClosestToOtherEnemies,
}

/// Secondary behaviour a projectile performs on impact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileEffect {
    #[default]
    Plain,
    Splash,
    Chain,
    Slow,
}

/// Battle lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    /// Before the first wave. Towers may be placed, nothing spawns.
    #[default]
    Idle,
    /// Spawning and wave countdown running.
    WaveActive,
    /// Transient: the current wave ended (timer or skip) and the next one is being started.
    WaveResolving,
    /// Population cap breached for the full warning countdown. Terminal.
    GameOver,
}

/// Card rarity tier, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Exalted,
    Celestial,
    Transcendent,
    Divine,
}

/// Enemy lifecycle. Every state other than `Alive` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    #[default]
    Alive,
    /// Health reached zero. Rewards were granted.
    Dying,
    /// Reached the end of a non-looped route.
    ReachedBase,
    /// Frozen by game over. No rewards.
    Culled,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::Normal,
        EnemyKind::Fast,
        EnemyKind::Tank,
        EnemyKind::Flying,
        EnemyKind::Elite,
        EnemyKind::Boss,
    ];
}

impl TowerKind {
    /// On-hit effect for projectiles fired by this tower family.
    pub fn projectile_effect(self) -> ProjectileEffect {
        match self {
            TowerKind::Cannon => ProjectileEffect::Splash,
            TowerKind::Lightning => ProjectileEffect::Chain,
            TowerKind::Frost => ProjectileEffect::Slow,
            TowerKind::Basic | TowerKind::Archer | TowerKind::Mage => ProjectileEffect::Plain,
        }
    }

    /// Default targeting strategy for this tower family.
    pub fn targeting_strategy(self) -> TargetingStrategy {
        match self {
            TowerKind::Archer => TargetingStrategy::FurthestAlongPath,
            TowerKind::Cannon => TargetingStrategy::ClosestToOtherEnemies,
            _ => TargetingStrategy::Closest,
        }
    }
}

impl StatusKind {
    /// Declared stackable in the card data. Re-application still refreshes.
    pub fn is_stackable(self) -> bool {
        matches!(self, StatusKind::Burn | StatusKind::Poison | StatusKind::Shield)
    }

    /// Whether this effect deals periodic damage.
    pub fn is_damage_over_time(self) -> bool {
        matches!(self, StatusKind::Burn | StatusKind::Poison)
    }
}

impl Rarity {
    pub const ALL: [Rarity; 10] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
        Rarity::Exalted,
        Rarity::Celestial,
        Rarity::Transcendent,
        Rarity::Divine,
    ];

    /// The tier above this one, or `None` at the top.
    pub fn next(self) -> Option<Rarity> {
        let idx = Self::ALL.iter().position(|r| *r == self)?;
        Self::ALL.get(idx + 1).copied()
    }
}

impl LifeState {
    pub fn is_alive(self) -> bool {
        self == LifeState::Alive
    }
}

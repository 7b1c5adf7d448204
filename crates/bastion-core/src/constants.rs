//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 50;

/// Milliseconds per tick. 20.0 is exact in binary floating point.
pub const DT_MS: f64 = 1000.0 / TICK_RATE as f64;

/// Seconds per tick.
pub const DT_SECS: f64 = DT_MS / 1000.0;

// --- Battlefield ---

/// Edge length of one placement cell in world units.
pub const CELL_SIZE: f64 = 40.0;

/// Width of every corridor, in cells.
pub const CORRIDOR_CELLS: u32 = 3;

/// Edge length of each placement quadrant, in cells.
pub const QUADRANT_CELLS: u32 = 9;

/// Route samples per logical segment when smoothing.
pub const PATH_SAMPLES_PER_SEGMENT: u32 = 20;

/// Projectiles further than this beyond the map edge are destroyed.
pub const PROJECTILE_BOUNDS_MARGIN: f64 = 100.0;

// --- Enemies ---

/// Fraction of incoming damage a tank takes (floored).
pub const TANK_DAMAGE_FACTOR: f64 = 0.7;

/// Speed multiplier while slowed.
pub const SLOW_SPEED_MULTIPLIER: f64 = 0.5;

/// Speed multiplier while frozen. Overrides slow.
pub const FREEZE_SPEED_MULTIPLIER: f64 = 0.0;

/// Interval between damage-over-time ticks (ms).
pub const DOT_INTERVAL_MS: f64 = 500.0;

/// Fraction of max health dealt per damage-over-time tick (ceiled).
pub const DOT_HEALTH_FRACTION: f64 = 0.02;

/// Tolerance when snapping to a waypoint.
pub const WAYPOINT_EPSILON: f64 = 1e-6;

// --- Towers ---

/// Lowest cooldown any tower can reach through bonuses (ms).
pub const MIN_ATTACK_COOLDOWN_MS: f64 = 100.0;

/// Duration of the slow applied by frost projectiles (seconds).
pub const FROST_SLOW_SECS: f64 = 2.0;

/// Damage bonus granted per upgrade, as a fraction of current damage (floored).
pub const UPGRADE_DAMAGE_FACTOR: f64 = 0.5;

/// Range bonus granted per upgrade.
pub const UPGRADE_RANGE_BONUS: f64 = 20.0;

/// Cooldown reduction granted per upgrade (ms).
pub const UPGRADE_ATTACK_SPEED_BONUS_MS: f64 = 100.0;

/// Base of the sell refund.
pub const SELL_REFUND_BASE: f64 = 50.0;

/// Sell refund added per tower level.
pub const SELL_REFUND_PER_LEVEL: f64 = 25.0;

/// Copies of one tower definition consumed by a merge upgrade.
pub const MERGE_COPIES_REQUIRED: usize = 5;

// --- Projectiles ---

/// A projectile closer than this to its target has arrived.
pub const PROJECTILE_ARRIVAL_DISTANCE: f64 = 15.0;

/// Splash hits enemies strictly closer than this to the impact point.
pub const SPLASH_RADIUS: f64 = 50.0;

/// Splash damage as a fraction of the projectile damage.
pub const SPLASH_DAMAGE_FACTOR: f64 = 0.5;

/// Chain hops to enemies strictly closer than this to the primary target.
pub const CHAIN_RADIUS: f64 = 80.0;

/// Maximum number of chain hops per impact.
pub const CHAIN_MAX_HOPS: usize = 2;

/// Delay between successive chain hops (ms).
pub const CHAIN_HOP_DELAY_MS: f64 = 100.0;

/// Chain hop damage as a fraction of the projectile damage.
pub const CHAIN_DAMAGE_FACTOR: f64 = 0.5;

// --- Waves ---

/// Countdown before the next wave starts on its own (seconds).
pub const WAVE_TIMER_SECS: u32 = 30;

/// Score multiplier gained per skipped wave.
pub const SKIP_MULTIPLIER_STEP: f64 = 0.5;

/// Every wave divisible by this is a boss wave.
pub const BOSS_WAVE_INTERVAL: u32 = 10;

/// Delay before the boss of a boss wave appears (ms).
pub const BOSS_SPAWN_DELAY_MS: f64 = 500.0;

// --- Battle ---

/// Live enemies that trigger the population warning.
pub const DEFAULT_POPULATION_CAP: usize = 200;

/// Length of the population warning before game over (seconds).
pub const POPULATION_WARNING_SECS: u32 = 10;

/// Gold available at the start of a battle.
pub const STARTING_GOLD: u32 = 100;

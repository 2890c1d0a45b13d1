//! Game state and core simulation types
//!
//! Everything the simulation mutates lives here. Entity coordinates are
//! percentages of the play field (0-100 on each axis); sizes are pixel units
//! projected against the measured field at collision time.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Lives exhausted; the state is frozen until the shell discards it
    GameOver,
}

/// Hazard variants - they differ in size/speed only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Normal,
    Fast,
    Big,
    Mega,
}

/// A falling hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    /// Position in field percent (x, y)
    pub pos: Vec2,
    /// Velocity in percent per frame tick
    pub vel: Vec2,
    /// Sprite size in pixels
    pub size: f32,
    /// Cosmetic rotation in degrees
    pub rotation: f32,
    pub kind: HazardKind,
}

/// Residue left where a hazard landed. Never collides; the renderer owns the
/// fade-out, so the simulation keeps these for the rest of the round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Splat {
    pub id: u32,
    pub x: f32,
    pub size: f32,
    pub rotation: f32,
}

/// Power-up variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    Umbrella,
    ScoreDoubler,
}

/// A falling power-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub kind: PowerUpKind,
}

/// Which edge the enemy entered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemySide {
    Left,
    Right,
}

/// The roaming enemy. At most one exists at a time; its simulated position is
/// fixed at the entry edge - drift across the field is presentation-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub side: EnemySide,
    /// Frame-clock timestamp when spawned; despawns after a fixed lifespan
    pub spawned_at: f64,
    pub last_throw: f64,
}

/// The player character. Vertical position and width are fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Center x in field percent
    pub x: f32,
}

/// Timed status modifiers, stored as absolute expiry timestamps.
///
/// Collecting the same kind again overwrites the expiry, so the effect stays
/// on until the latest timestamp - there is no timer-callback race.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub invincible_until: Option<f64>,
    pub shield_until: Option<f64>,
    pub umbrella_until: Option<f64>,
    pub score_doubler_until: Option<f64>,
}

impl StatusEffects {
    /// Drop any effect whose expiry has passed. Called at the top of each tick.
    pub fn sweep(&mut self, now: f64) {
        for slot in [
            &mut self.invincible_until,
            &mut self.shield_until,
            &mut self.umbrella_until,
            &mut self.score_doubler_until,
        ] {
            if slot.is_some_and(|t| t <= now) {
                *slot = None;
            }
        }
    }

    pub fn invincible(&self) -> bool {
        self.invincible_until.is_some()
    }

    pub fn shielded(&self) -> bool {
        self.shield_until.is_some()
    }

    pub fn umbrella(&self) -> bool {
        self.umbrella_until.is_some()
    }

    pub fn score_doubled(&self) -> bool {
        self.score_doubler_until.is_some()
    }

    /// Any one of these makes the player immune to hazard hits
    pub fn protected(&self) -> bool {
        self.invincible() || self.shielded() || self.umbrella()
    }
}

/// Measured play-field size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSize {
    pub width: f32,
    pub height: f32,
}

impl FieldSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// False until the layout has settled; the tick skips everything until then
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Half the player width expressed in percent of this field's width
    pub fn player_half_width_percent(&self) -> f32 {
        PLAYER_WIDTH / 2.0 / self.width * 100.0
    }
}

/// Discrete events emitted by a tick, fired at the moment each condition
/// occurs. The shell forwards them to the audio collaborator fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player took an unshielded hit
    Hit,
    /// A hazard reached the ground
    Splat,
    PowerUpCollected(PowerUpKind),
    /// Storm warning raised; the burst follows after a fixed delay
    StormWarning,
    EnemySpawned,
    /// Lives hit zero. Emitted exactly once per round, with the final score.
    RoundOver { score: u64 },
}

/// Complete round state, owned exclusively by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Round seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    pub hazards: Vec<Hazard>,
    pub splats: Vec<Splat>,
    pub power_ups: Vec<PowerUp>,
    /// At most one enemy alive at a time
    pub enemy: Option<Enemy>,
    pub score: u64,
    pub lives: u8,
    pub effects: StatusEffects,
    /// Advisory flag for presentation/audio; does not alter motion
    pub storm_warning: bool,

    // Scheduling state: absolute timestamps compared against the frame clock.
    pub(crate) last_hazard_spawn: f64,
    pub(crate) last_powerup_spawn: f64,
    pub(crate) next_storm_at: f64,
    /// Pending burst time while a storm warning is up
    pub(crate) storm_burst_at: Option<f64>,
    pub(crate) next_enemy_at: f64,
    pub(crate) last_score_tick: f64,

    next_id: u32,
}

impl GameState {
    /// Create a fresh round. `now` is the frame-clock timestamp at round
    /// start; every spawn window is armed relative to it.
    pub fn new(seed: u64, now: f64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let next_storm_at = now + rng.random_range(STORM_MIN_INTERVAL_MS..STORM_MAX_INTERVAL_MS);
        let next_enemy_at =
            now + rng.random_range(ENEMY_FIRST_SPAWN_MIN_MS..ENEMY_FIRST_SPAWN_MAX_MS);

        Self {
            seed,
            rng,
            phase: GamePhase::Playing,
            player: Player { x: 50.0 },
            hazards: Vec::new(),
            splats: Vec::new(),
            power_ups: Vec::new(),
            enemy: None,
            score: 0,
            lives: INITIAL_LIVES,
            effects: StatusEffects::default(),
            storm_warning: false,
            last_hazard_spawn: now,
            last_powerup_spawn: now,
            next_storm_at,
            storm_burst_at: None,
            next_enemy_at,
            last_score_tick: now,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID, unique for the round
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn frequency and fall speed scale with score
    pub fn difficulty_factor(&self) -> f32 {
        1.0 + self.score as f32 / DIFFICULTY_SCORE_DIVISOR
    }
}

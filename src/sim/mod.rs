//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Advanced exactly once per rendered frame by the shell
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! The shell reads the state as a snapshot after each tick and forwards the
//! returned events to the audio collaborator.

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Aabb, hazard_box, player_box, power_up_box};
pub use state::{
    Enemy, EnemySide, FieldSize, GameEvent, GamePhase, GameState, Hazard, HazardKind, Player,
    PowerUp, PowerUpKind, Splat, StatusEffects,
};
pub use tick::{TickInput, tick};

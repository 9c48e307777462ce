//! Simulation module
//!
//! All gameplay logic lives here:
//! - Simulated millisecond clock, no wall-clock timers
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies; effects leave as `GameEvent`s

pub mod ai;
pub mod collision;
pub mod events;
pub mod motion;
pub mod round;
pub mod schedule;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Rect, finish_explosion, resolve_collisions};
pub use events::{GameEvent, SoundCue};
pub use round::{Scoreboard, check_round};
pub use schedule::{Scheduler, TimerId};
pub use spawner::{fire, spawn_meteor, spawn_projectile, spawn_super_meteor};
pub use state::{
    Arena, Combatant, EntityId, GameState, Meteor, MeteorKind, Projectile, RoundState, Side,
};
pub use tick::{Session, Snapshot, TickInput, tick};

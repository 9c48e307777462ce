//! Meteor Duel - a meteor-shooting arcade duel against a CPU turret
//!
//! Core modules:
//! - `sim`: Simulation (spawning, motion, collisions, AI, rounds)
//! - `settings`: Session configuration and validation
//! - `audio`: Eight-bit chip engine and sound cue voicing
//! - `platform`: Browser render/input adapter

pub mod audio;
pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};
pub use sim::{GameEvent, Session, SoundCue, TickInput};

/// Game configuration constants
pub mod consts {
    /// Meteor motion interval (ms)
    pub const METEOR_TICK_MS: u64 = 50;
    /// Projectile motion interval (ms)
    pub const PROJECTILE_TICK_MS: u64 = 25;
    /// Collision sweep interval (ms)
    pub const COLLISION_TICK_MS: u64 = 50;
    /// Scoreboard refresh + round check interval (ms)
    pub const ROUND_TICK_MS: u64 = 100;
    /// Explosion animation time before an exploded meteor is removed (ms)
    pub const EXPLOSION_DELAY_MS: u64 = 500;

    /// Meteor fall per motion tick
    pub const FALL_SPEED: f32 = 10.0;
    /// Super meteor horizontal drift as a fraction of fall speed
    pub const SUPER_DRIFT_FACTOR: f32 = 0.5;
    /// Chance of a bonus super meteor after each spawn
    pub const SUPER_METEOR_CHANCE: f64 = 0.1;
    /// Projectile rise per motion tick
    pub const PROJECTILE_STEP: f32 = 10.0;

    /// Meteor sizes (square)
    pub const METEOR_SIZE: f32 = 20.0;
    pub const SUPER_METEOR_SIZE: f32 = 12.0;

    /// Projectile size
    pub const PROJECTILE_WIDTH: f32 = 2.0;
    pub const PROJECTILE_HEIGHT: f32 = 32.0;
    /// Projectile spawns this far above the firing combatant's top edge
    pub const MUZZLE_OFFSET: f32 = 10.0;

    /// Combatant (player and CPU turret) size
    pub const COMBATANT_WIDTH: f32 = 50.0;
    pub const COMBATANT_HEIGHT: f32 = 15.0;
    /// Distance from the arena floor to a combatant's default top edge
    pub const COMBATANT_FLOOR_OFFSET: f32 = 50.0;

    /// Score that ends a round
    pub const WIN_SCORE: u32 = 10;

    /// CPU fires only when the target is within this horizontal distance
    pub const AI_FIRE_ALIGNMENT: f32 = 20.0;
    /// Per-round difficulty steps and floors
    pub const AI_COOLDOWN_STEP_MS: f32 = 15.0;
    pub const AI_COOLDOWN_FLOOR_MS: f32 = 100.0;
    pub const AI_RANGE_STEP: f32 = 0.2;
    pub const AI_RANGE_FLOOR: f32 = 1.0;
}

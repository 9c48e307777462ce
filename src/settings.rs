//! Session settings
//!
//! Supplied once by the host page when a session starts. Field names follow
//! the camelCase keys the page passes in, so the same JSON object works here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{AI_COOLDOWN_FLOOR_MS, AI_RANGE_FLOOR, COMBATANT_WIDTH, METEOR_SIZE};

/// Upper bound on simultaneous normal meteors
pub const MAX_METEOR_AMOUNT: u32 = 100;
/// Allowed CPU think interval (ms)
pub const AI_TICK_MIN_MS: u64 = 1;
pub const AI_TICK_MAX_MS: u64 = 1000;

/// Configuration rejected at session start
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("arena must be finite and larger than {min_width}x{min_height}, got {width}x{height}")]
    InvalidArena {
        width: f32,
        height: f32,
        min_width: f32,
        min_height: f32,
    },
    #[error("meteor amount must be between 1 and 100, got {0}")]
    InvalidMeteorAmount(u32),
    #[error("AI movement range must be a positive number, got {0}")]
    InvalidMovementRange(f32),
    #[error("AI shoot cooldown must be a non-negative number of milliseconds, got {0}")]
    InvalidShootCooldown(f32),
    #[error("super meteor height advantage must be a non-negative number, got {0}")]
    InvalidHeightAdvantage(f32),
    #[error("AI tick interval must be at least 1 ms")]
    InvalidAiTick,
    #[error("malformed settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    // === Arena ===
    pub width: f32,
    pub height: f32,

    // === CPU opponent ===
    /// Largest horizontal jump per think tick (floored to an integer step)
    pub ai_initial_movement_range: f32,
    /// Milliseconds between CPU shots
    pub ai_initial_shoot_cooldown: f32,
    /// CPU gets harder after the player wins a round
    pub ai_can_get_stronger: bool,
    /// CPU gets easier after it wins a round
    pub ai_can_get_weaker: bool,
    /// CPU think interval (ms)
    pub ai_tick_ms: u64,

    // === Scoreboard ===
    pub score_board_show_rounds: bool,
    pub score_board_show_cpu_speed: bool,

    // === Meteors ===
    /// Normal meteors kept alive at all times
    pub meteor_amount: u32,
    /// Allow bonus super meteors
    pub super_meteor: bool,
    /// Declared by the page script but never consulted by the hit rules
    pub ai_shoot_super_meteor: bool,
    /// Height bonus granted per super meteor destroyed
    pub super_meteor_height_advantage: f32,

    /// RNG seed (None = caller picks one)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 600.0,

            ai_initial_movement_range: 1.0,
            ai_initial_shoot_cooldown: 1000.0,
            ai_can_get_stronger: true,
            ai_can_get_weaker: true,
            ai_tick_ms: 10,

            score_board_show_rounds: true,
            score_board_show_cpu_speed: false,

            meteor_amount: 1,
            super_meteor: true,
            ai_shoot_super_meteor: true,
            super_meteor_height_advantage: 20.0,

            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from the host page's JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()
    }

    /// Settings for a session started by the host page.
    ///
    /// A blank config means all defaults. The host's seed wins; otherwise
    /// `fallback_seed` (the wall clock in the browser) is used.
    pub fn from_host_config(config_json: &str, fallback_seed: u64) -> Result<Self, SettingsError> {
        let mut settings = if config_json.trim().is_empty() {
            Settings::default().validate()?
        } else {
            Settings::from_json(config_json)?
        };
        settings.seed.get_or_insert(fallback_seed);
        Ok(settings)
    }

    /// Reject unusable values and clamp out-of-range tunables to their floors
    pub fn validate(mut self) -> Result<Self, SettingsError> {
        let min_width = COMBATANT_WIDTH.max(METEOR_SIZE);
        let min_height = METEOR_SIZE;
        if !self.width.is_finite()
            || !self.height.is_finite()
            || self.width <= min_width
            || self.height <= min_height
        {
            return Err(SettingsError::InvalidArena {
                width: self.width,
                height: self.height,
                min_width,
                min_height,
            });
        }

        if self.meteor_amount == 0 || self.meteor_amount > MAX_METEOR_AMOUNT {
            return Err(SettingsError::InvalidMeteorAmount(self.meteor_amount));
        }

        let range = self.ai_initial_movement_range;
        if !range.is_finite() || range <= 0.0 {
            return Err(SettingsError::InvalidMovementRange(range));
        }
        if range < AI_RANGE_FLOOR {
            log::warn!("AI movement range {} below floor, using {}", range, AI_RANGE_FLOOR);
            self.ai_initial_movement_range = AI_RANGE_FLOOR;
        }

        let cooldown = self.ai_initial_shoot_cooldown;
        if !cooldown.is_finite() || cooldown < 0.0 {
            return Err(SettingsError::InvalidShootCooldown(cooldown));
        }
        if cooldown < AI_COOLDOWN_FLOOR_MS {
            log::warn!(
                "AI shoot cooldown {}ms below floor, using {}ms",
                cooldown,
                AI_COOLDOWN_FLOOR_MS
            );
            self.ai_initial_shoot_cooldown = AI_COOLDOWN_FLOOR_MS;
        }

        let advantage = self.super_meteor_height_advantage;
        if !advantage.is_finite() || advantage < 0.0 {
            return Err(SettingsError::InvalidHeightAdvantage(advantage));
        }

        if self.ai_tick_ms < AI_TICK_MIN_MS {
            return Err(SettingsError::InvalidAiTick);
        }
        if self.ai_tick_ms > AI_TICK_MAX_MS {
            log::warn!("AI tick {}ms too slow, using {}ms", self.ai_tick_ms, AI_TICK_MAX_MS);
            self.ai_tick_ms = AI_TICK_MAX_MS;
        }

        Ok(self)
    }
}

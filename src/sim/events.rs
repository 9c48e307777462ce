//! Events emitted by the simulation for the render and audio adapters.

use serde::{Deserialize, Serialize};

use super::state::{EntityId, MeteorKind, Side};

/// Sound cues requested by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Someone fired
    Shoot,
    /// Normal meteor destroyed
    Explosion,
    /// Super meteor destroyed
    PowerUp,
    /// Super meteor entered the arena
    SuperMeteor,
}

impl SoundCue {
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::Shoot => "shoot",
            SoundCue::Explosion => "explosion",
            SoundCue::PowerUp => "power-up",
            SoundCue::SuperMeteor => "special",
        }
    }

    /// Playback volume (0.0 - 1.0)
    pub fn volume(&self) -> f32 {
        match self {
            SoundCue::Shoot | SoundCue::Explosion => 0.5,
            SoundCue::PowerUp | SoundCue::SuperMeteor => 1.0,
        }
    }

    /// Playback rate multiplier
    pub fn pitch(&self) -> f32 {
        1.0
    }
}

/// Something the render/audio side should react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    MeteorSpawned { id: EntityId, kind: MeteorKind },
    /// Hit registered; removal follows after the explosion delay
    MeteorExploding { id: EntityId, by: Side },
    MeteorRemoved { id: EntityId },
    ProjectileFired { id: EntityId, owner: Side },
    ProjectileRemoved { id: EntityId },
    ScoreChanged { side: Side, score: u32 },
    /// Combatant moved up after destroying a super meteor
    HeightBonusChanged { side: Side, bonus: f32 },
    RoundEnded {
        winner: Side,
        rounds_won: u32,
        rounds_lost: u32,
    },
    Sound { cue: SoundCue },
}

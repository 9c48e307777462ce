//! Collision detection and hit resolution
//!
//! Plain axis-aligned boxes over the entities' own position and size. Every
//! live meteor is swept against every live projectile, player shots first.

use serde::{Deserialize, Serialize};

use super::events::{GameEvent, SoundCue};
use super::spawner::spawn_meteor;
use super::state::{EntityId, GameState, MeteorKind, Side};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }
}

/// Run one collision sweep.
///
/// Each meteor takes at most one hit per sweep; the consumed projectile is
/// removed at once. Returns the meteors that started exploding so the caller
/// can schedule their removal.
pub fn resolve_collisions(state: &mut GameState) -> Vec<EntityId> {
    let mut exploded = Vec::new();

    for idx in 0..state.meteors.len() {
        if state.meteors[idx].is_exploding() {
            continue;
        }
        let bounds = state.meteors[idx].bounds();

        let hit = [Side::Player, Side::Ai].into_iter().find_map(|side| {
            state
                .projectiles
                .iter()
                .find(|p| p.owner == side && p.bounds().overlaps(&bounds))
                .map(|p| (p.id, side))
        });
        let Some((projectile_id, side)) = hit else {
            continue;
        };

        let meteor = &mut state.meteors[idx];
        meteor.exploding = Some(side);
        let (meteor_id, kind) = (meteor.id, meteor.kind);

        state.remove_projectile(projectile_id);
        state.emit(GameEvent::MeteorExploding {
            id: meteor_id,
            by: side,
        });
        apply_hit(state, side, kind);
        exploded.push(meteor_id);
    }

    exploded
}

/// Score a normal meteor or grant height for a super meteor
fn apply_hit(state: &mut GameState, side: Side, kind: MeteorKind) {
    match kind {
        MeteorKind::Super => {
            let advantage = state.settings.super_meteor_height_advantage;
            let combatant = state.combatant_mut(side);
            combatant.add_height_bonus(advantage);
            let bonus = combatant.height_bonus;
            log::debug!("{:?} destroyed a super meteor, height bonus {}", side, bonus);
            state.emit(GameEvent::HeightBonusChanged { side, bonus });
            state.emit(GameEvent::Sound {
                cue: SoundCue::PowerUp,
            });
        }
        MeteorKind::Normal => {
            let combatant = state.combatant_mut(side);
            combatant.score += 1;
            let score = combatant.score;
            state.emit(GameEvent::ScoreChanged { side, score });
            state.emit(GameEvent::Sound {
                cue: SoundCue::Explosion,
            });
        }
    }
}

/// Remove an exploded meteor once its animation has played.
///
/// Normal meteors are replaced. A meteor that is already gone is ignored.
pub fn finish_explosion(state: &mut GameState, id: EntityId) {
    if let Some(meteor) = state.remove_meteor(id) {
        if meteor.kind == MeteorKind::Normal {
            spawn_meteor(state);
        }
    }
}

//! Meteor and projectile creation

use glam::Vec2;
use rand::Rng;

use super::events::{GameEvent, SoundCue};
use super::state::{EntityId, GameState, Meteor, MeteorKind, Projectile, Side};
use crate::consts::*;

/// Spawn one normal meteor at a random x along the top edge.
///
/// Every spawn (initial or replacement) may also bring a bonus super meteor.
pub fn spawn_meteor(state: &mut GameState) -> EntityId {
    let max_x = state.arena.width - METEOR_SIZE;
    let x = state.rng.random_range(0.0..max_x);
    let id = spawn_meteor_at(
        state,
        MeteorKind::Normal,
        Vec2::new(x, 0.0),
        Vec2::new(0.0, FALL_SPEED),
    );

    if state.settings.super_meteor && state.rng.random_bool(SUPER_METEOR_CHANCE) {
        spawn_super_meteor(state);
    }

    id
}

/// Spawn a super meteor drifting diagonally left or right
pub fn spawn_super_meteor(state: &mut GameState) -> EntityId {
    let max_x = state.arena.width - SUPER_METEOR_SIZE;
    let x = state.rng.random_range(0.0..max_x);
    let direction = if state.rng.random_bool(0.5) { -1.0 } else { 1.0 };
    let drift = FALL_SPEED * SUPER_DRIFT_FACTOR * direction;

    let id = spawn_meteor_at(
        state,
        MeteorKind::Super,
        Vec2::new(x, 0.0),
        Vec2::new(drift, FALL_SPEED),
    );
    state.emit(GameEvent::Sound {
        cue: SoundCue::SuperMeteor,
    });
    id
}

/// Place a meteor at an exact position
pub fn spawn_meteor_at(state: &mut GameState, kind: MeteorKind, pos: Vec2, vel: Vec2) -> EntityId {
    let id = state.next_entity_id();
    state.meteors.push(Meteor::new(id, kind, pos, vel));
    state.emit(GameEvent::MeteorSpawned { id, kind });
    log::debug!("Spawned {:?} meteor {} at ({:.1}, {:.1})", kind, id, pos.x, pos.y);
    id
}

/// Spawn the initial meteor population
pub fn populate(state: &mut GameState) {
    for _ in 0..state.settings.meteor_amount {
        spawn_meteor(state);
    }
}

/// Create a projectile at `origin` (top-left corner)
pub fn spawn_projectile(state: &mut GameState, owner: Side, origin: Vec2) -> EntityId {
    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        owner,
        pos: origin,
    });
    state.emit(GameEvent::ProjectileFired { id, owner });
    state.emit(GameEvent::Sound {
        cue: SoundCue::Shoot,
    });
    id
}

/// Fire from a combatant's muzzle
pub fn fire(state: &mut GameState, side: Side) -> EntityId {
    let origin = state.combatant(side).muzzle();
    spawn_projectile(state, side, origin)
}

//! CPU opponent
//!
//! Greedy and reactive: chase the nearest meteor sideways in random-sized
//! jumps, fire when it is roughly overhead and the cooldown has passed. No
//! trajectory prediction, no memory beyond the last shot time.

use glam::Vec2;
use rand::Rng;

use super::spawner::fire;
use super::state::{GameState, Meteor, Side};
use crate::consts::AI_FIRE_ALIGNMENT;

/// One CPU think step at session time `now_ms`
pub fn think(state: &mut GameState, now_ms: u64) {
    let ai_pos = state.ai.pos();
    let Some(target) = nearest_meteor(&state.meteors, ai_pos).map(|m| m.pos) else {
        return;
    };

    // Halves round toward +inf
    let dx = (target.x - ai_pos.x + 0.5).floor();
    if dx != 0.0 {
        let max_step = state.round.ai_movement_range.floor().max(1.0) as u32;
        let roll = state.rng.random_range(1..=max_step);
        let min_x = state.arena.clamp_combatant_x(f32::MIN);
        let max_x = state.arena.clamp_combatant_x(f32::MAX);
        state.ai.x = pursuit_step(ai_pos.x, dx, roll, min_x, max_x);
    }

    let overhead = target.y < ai_pos.y && (target.x - ai_pos.x).abs() < AI_FIRE_ALIGNMENT;
    if overhead
        && cooldown_elapsed(state.ai_last_shot_ms, now_ms, state.round.ai_shoot_cooldown_ms)
    {
        fire(state, Side::Ai);
        state.ai_last_shot_ms = Some(now_ms);
    }
}

/// Nearest meteor by straight-line distance (first one wins ties)
pub fn nearest_meteor(meteors: &[Meteor], from: Vec2) -> Option<&Meteor> {
    let mut best: Option<(&Meteor, f32)> = None;
    for meteor in meteors {
        let dist = meteor.pos.distance_squared(from);
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((meteor, dist));
        }
    }
    best.map(|(m, _)| m)
}

/// Move `x` toward a target `dx` away by `roll` units without overshooting,
/// staying within `[min_x, max_x]`
pub fn pursuit_step(x: f32, dx: f32, roll: u32, min_x: f32, max_x: f32) -> f32 {
    let step = (roll as f32).min(dx.abs());
    if dx < 0.0 {
        (x - step).max(min_x)
    } else {
        (x + step).min(max_x)
    }
}

fn cooldown_elapsed(last_shot_ms: Option<u64>, now_ms: u64, cooldown_ms: f32) -> bool {
    match last_shot_ms {
        None => true,
        Some(last) => now_ms.saturating_sub(last) as f32 > cooldown_ms,
    }
}

//! Per-tick entity motion and out-of-bounds cleanup

use super::spawner::spawn_meteor;
use super::state::{GameState, Meteor, MeteorKind};
use crate::consts::*;

/// Advance every falling meteor one step.
///
/// Meteors past the floor are removed; normal ones are replaced right away.
/// Super meteors also leave when they drift off either side. Exploding
/// meteors hold still until their removal.
pub fn move_meteors(state: &mut GameState) {
    let arena = state.arena;
    let mut gone = Vec::new();

    for meteor in state.meteors.iter_mut().filter(|m| !m.is_exploding()) {
        if out_of_arena(meteor, arena.width, arena.height) {
            gone.push((meteor.id, meteor.kind));
        } else {
            meteor.pos += meteor.vel;
        }
    }

    for (id, kind) in gone {
        if state.remove_meteor(id).is_some() && kind == MeteorKind::Normal {
            spawn_meteor(state);
        }
    }
}

fn out_of_arena(meteor: &Meteor, width: f32, height: f32) -> bool {
    if meteor.pos.y > height {
        return true;
    }
    match meteor.kind {
        MeteorKind::Normal => false,
        MeteorKind::Super => meteor.pos.x < -METEOR_SIZE || meteor.pos.x > width + METEOR_SIZE,
    }
}

/// Advance every projectile one step toward the top edge
pub fn move_projectiles(state: &mut GameState) {
    let mut gone = Vec::new();

    for projectile in &mut state.projectiles {
        if projectile.pos.y < 0.0 {
            gone.push(projectile.id);
        } else {
            projectile.pos.y -= PROJECTILE_STEP;
        }
    }

    for id in gone {
        state.remove_projectile(id);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::settings::Settings;
    use crate::sim::spawner::{spawn_meteor_at, spawn_projectile};
    use crate::sim::state::Side;

    fn quiet_state() -> GameState {
        GameState::new(
            Settings {
                super_meteor: false,
                ..Default::default()
            },
            7,
        )
    }

    #[test]
    fn test_normal_meteor_falls_and_is_replaced() {
        let mut state = quiet_state();
        let id = spawn_meteor_at(
            &mut state,
            MeteorKind::Normal,
            Vec2::new(100.0, 0.0),
            Vec2::new(0.0, FALL_SPEED),
        );

        move_meteors(&mut state);
        assert_eq!(state.meteor(id).unwrap().pos, Vec2::new(100.0, 10.0));

        // 600 high: falls to 610, then leaves on the following tick
        for _ in 0..60 {
            move_meteors(&mut state);
        }
        assert_eq!(state.meteor(id).unwrap().pos.y, 610.0);
        move_meteors(&mut state);
        assert!(state.meteor(id).is_none());
        assert_eq!(state.normal_meteor_count(), 1);
        assert_ne!(state.meteors[0].id, id);
        assert_eq!(state.meteors[0].pos.y, 0.0);
    }

    #[test]
    fn test_super_meteor_leaves_sideways_without_replacement() {
        let mut state = quiet_state();
        let id = spawn_meteor_at(
            &mut state,
            MeteorKind::Super,
            Vec2::new(5.0, 0.0),
            Vec2::new(-5.0, FALL_SPEED),
        );

        // 5 -> 0 -> -5 -> -10 -> -15 -> -20 -> -25 (outside) -> removed
        for _ in 0..6 {
            move_meteors(&mut state);
        }
        assert_eq!(state.meteor(id).unwrap().pos.x, -25.0);
        move_meteors(&mut state);
        assert!(state.meteor(id).is_none());
        assert!(state.meteors.is_empty());
    }

    #[test]
    fn test_exploding_meteor_holds_still() {
        let mut state = quiet_state();
        let id = spawn_meteor_at(
            &mut state,
            MeteorKind::Normal,
            Vec2::new(50.0, 40.0),
            Vec2::new(0.0, FALL_SPEED),
        );
        state.meteors[0].exploding = Some(Side::Player);

        move_meteors(&mut state);
        assert_eq!(state.meteor(id).unwrap().pos, Vec2::new(50.0, 40.0));
    }

    #[test]
    fn test_projectile_rises_then_leaves() {
        let mut state = quiet_state();
        let id = spawn_projectile(&mut state, Side::Ai, Vec2::new(10.0, 25.0));

        move_projectiles(&mut state); // 15
        move_projectiles(&mut state); // 5
        move_projectiles(&mut state); // -5
        assert_eq!(state.projectiles[0].pos.y, -5.0);
        move_projectiles(&mut state);
        assert!(state.projectiles.is_empty());
        assert!(state.remove_projectile(id).is_none());
    }
}

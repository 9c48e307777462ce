//! Platform layer
//!
//! Maps simulation entities to DOM presentation: class names, element
//! geometry and pointer coordinates. The browser binding lives in `dom`
//! (nodes and listeners) and `host` (the page-facing entry points); both only
//! build for wasm32.

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod host;

use crate::sim::{Meteor, MeteorKind, Projectile, Rect, Side};

pub const CLASS_METEOR: &str = "game-meteor";
pub const CLASS_SUPER_METEOR: &str = "game-super-meteor";
pub const CLASS_BULLET: &str = "game-bullet";
pub const CLASS_AI_BULLET: &str = "game-ai-bullet";
pub const CLASS_PLAYER: &str = "game-player";
pub const CLASS_AI: &str = "game-ai";
pub const CLASS_SCORE: &str = "game-score";
pub const CLASS_EXPLODING: &str = "exploding";

/// Key identifying the DOM node of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Meteor(u32),
    Projectile(u32),
    Combatant(Side),
}

pub fn meteor_classes(meteor: &Meteor) -> Vec<&'static str> {
    let mut classes = vec![CLASS_METEOR];
    if meteor.kind == MeteorKind::Super {
        classes.push(CLASS_SUPER_METEOR);
    }
    if let Some(by) = meteor.exploding {
        classes.push(explode_class(by));
        classes.push(CLASS_EXPLODING);
    }
    classes
}

/// Explosion tint, by who landed the hit
pub fn explode_class(by: Side) -> &'static str {
    match by {
        Side::Player => "game-meteor-explode-player",
        Side::Ai => "game-meteor-explode-ai",
    }
}

pub fn projectile_class(projectile: &Projectile) -> &'static str {
    match projectile.owner {
        Side::Player => CLASS_BULLET,
        Side::Ai => CLASS_AI_BULLET,
    }
}

pub fn combatant_class(side: Side) -> &'static str {
    match side {
        Side::Player => CLASS_PLAYER,
        Side::Ai => CLASS_AI,
    }
}

/// Inline style placing an element over the given rectangle
pub fn rect_style(rect: &Rect) -> String {
    format!(
        "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px",
        rect.left, rect.top, rect.width, rect.height
    )
}

/// Convert a viewport x coordinate into arena coordinates.
///
/// The arena element may be scaled by CSS; `rect_left`/`rect_width` are its
/// on-screen box.
pub fn pointer_to_arena_x(client_x: f32, rect_left: f32, rect_width: f32, arena_width: f32) -> f32 {
    let local = client_x - rect_left;
    if rect_width > 0.0 {
        local * arena_width / rect_width
    } else {
        local
    }
}

/// Scoreboard lines as HTML
pub fn scoreboard_html(lines: &[String]) -> String {
    lines.join("<br>")
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    #[test]
    fn test_meteor_classes_follow_state() {
        let mut meteor = Meteor::new(1, MeteorKind::Normal, Vec2::ZERO, Vec2::ZERO);
        assert_eq!(meteor_classes(&meteor), vec![CLASS_METEOR]);

        meteor.exploding = Some(Side::Ai);
        assert_eq!(
            meteor_classes(&meteor),
            vec![CLASS_METEOR, "game-meteor-explode-ai", CLASS_EXPLODING]
        );

        let special = Meteor::new(2, MeteorKind::Super, Vec2::ZERO, Vec2::ZERO);
        assert_eq!(
            meteor_classes(&special),
            vec![CLASS_METEOR, CLASS_SUPER_METEOR]
        );
    }

    #[test]
    fn test_projectile_and_combatant_classes() {
        let shot = Projectile {
            id: 3,
            owner: Side::Ai,
            pos: Vec2::ZERO,
        };
        assert_eq!(projectile_class(&shot), CLASS_AI_BULLET);
        assert_eq!(combatant_class(Side::Player), CLASS_PLAYER);
    }

    #[test]
    fn test_node_keys_are_distinct() {
        use std::collections::HashSet;

        let keys: HashSet<NodeKey> = [
            NodeKey::Meteor(1),
            NodeKey::Projectile(1),
            NodeKey::Combatant(Side::Player),
            NodeKey::Combatant(Side::Ai),
            NodeKey::Combatant(Side::Ai),
        ]
        .into_iter()
        .collect();
        assert_eq!(keys.len(), 4);
        assert!(keys.contains(&NodeKey::Combatant(Side::Player)));
    }

    #[test]
    fn test_rect_style() {
        let style = rect_style(&Rect::new(10.0, 20.5, 2.0, 32.0));
        assert_eq!(
            style,
            "position:absolute;left:10px;top:20.5px;width:2px;height:32px"
        );
    }

    #[test]
    fn test_pointer_scaling() {
        assert_eq!(pointer_to_arena_x(150.0, 100.0, 400.0, 400.0), 50.0);
        // Arena drawn at half size
        assert_eq!(pointer_to_arena_x(150.0, 100.0, 200.0, 400.0), 100.0);
        // Collapsed element falls back to raw offset
        assert_eq!(pointer_to_arena_x(150.0, 100.0, 0.0, 400.0), 50.0);
    }

    #[test]
    fn test_scoreboard_html() {
        let lines = vec!["YOU 1 - 2 CPU".to_string(), "won : 1".to_string()];
        assert_eq!(scoreboard_html(&lines), "YOU 1 - 2 CPU<br>won : 1");
    }
}

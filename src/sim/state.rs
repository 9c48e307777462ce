//! World state and core simulation types
//!
//! One `GameState` per session. Round boundaries reset it in place.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::events::GameEvent;
use crate::consts::*;
use crate::settings::Settings;

/// Entity identifier (monotonic, never reused within a session)
pub type EntityId = u32;

/// Which combatant owns a projectile or scored a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Ai,
}

/// Meteor types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeteorKind {
    /// Falls straight down, scores a point, replaced when destroyed
    #[default]
    Normal,
    /// Smaller, drifts diagonally, grants height bonus, never replaced
    Super,
}

impl MeteorKind {
    pub fn size(&self) -> f32 {
        match self {
            MeteorKind::Normal => METEOR_SIZE,
            MeteorKind::Super => SUPER_METEOR_SIZE,
        }
    }
}

/// A falling meteor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteor {
    pub id: EntityId,
    pub kind: MeteorKind,
    /// Top-left corner
    pub pos: Vec2,
    /// Displacement per motion tick
    pub vel: Vec2,
    /// Set once when hit; the meteor stays in place until its explosion finishes
    pub exploding: Option<Side>,
}

impl Meteor {
    pub fn new(id: EntityId, kind: MeteorKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            exploding: None,
        }
    }

    pub fn bounds(&self) -> Rect {
        let size = self.kind.size();
        Rect::new(self.pos.x, self.pos.y, size, size)
    }

    pub fn is_exploding(&self) -> bool {
        self.exploding.is_some()
    }
}

/// A projectile travelling up the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub owner: Side,
    /// Top-left corner
    pub pos: Vec2,
}

impl Projectile {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PROJECTILE_WIDTH, PROJECTILE_HEIGHT)
    }
}

/// Player or CPU turret
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub side: Side,
    /// Left edge
    pub x: f32,
    /// Top edge with no height bonus
    pub base_top: f32,
    /// Upward offset earned from super meteors (this round)
    pub height_bonus: f32,
    pub score: u32,
}

impl Combatant {
    pub fn new(side: Side, arena: &Arena) -> Self {
        Self {
            side,
            x: (arena.width - COMBATANT_WIDTH) / 2.0,
            base_top: arena.height - COMBATANT_FLOOR_OFFSET,
            height_bonus: 0.0,
            score: 0,
        }
    }

    /// Current top edge
    pub fn top(&self) -> f32 {
        self.base_top - self.height_bonus
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.top())
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.top(), COMBATANT_WIDTH, COMBATANT_HEIGHT)
    }

    /// Where this combatant's shots appear
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(
            self.x + (COMBATANT_WIDTH - PROJECTILE_WIDTH) / 2.0,
            self.top() - MUZZLE_OFFSET,
        )
    }

    /// Height bonus only grows within a round
    pub fn add_height_bonus(&mut self, amount: f32) {
        self.height_bonus += amount.max(0.0);
    }

    /// Clear score and bonus, return to default height
    pub fn reset_for_round(&mut self) {
        self.score = 0;
        self.height_bonus = 0.0;
    }
}

/// Arena dimensions (fixed for a session)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    /// Clamp a combatant's left edge so it stays inside the arena
    pub fn clamp_combatant_x(&self, x: f32) -> f32 {
        x.clamp(0.0, self.width - COMBATANT_WIDTH)
    }
}

/// Round counters and CPU difficulty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub rounds_won: u32,
    pub rounds_lost: u32,
    /// Max CPU step per think (>= 1)
    pub ai_movement_range: f32,
    /// Min time between CPU shots (>= 100ms after escalation)
    pub ai_shoot_cooldown_ms: f32,
}

impl RoundState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            rounds_won: 0,
            rounds_lost: 0,
            ai_movement_range: settings.ai_initial_movement_range,
            ai_shoot_cooldown_ms: settings.ai_initial_shoot_cooldown,
        }
    }

    /// Player won a round: CPU shoots faster and moves further
    pub fn escalate(&mut self) {
        self.ai_shoot_cooldown_ms =
            (self.ai_shoot_cooldown_ms - AI_COOLDOWN_STEP_MS).max(AI_COOLDOWN_FLOOR_MS);
        self.ai_movement_range += AI_RANGE_STEP;
    }

    /// CPU won a round: CPU shoots slower and moves less
    pub fn deescalate(&mut self) {
        self.ai_shoot_cooldown_ms += AI_COOLDOWN_STEP_MS;
        self.ai_movement_range = (self.ai_movement_range - AI_RANGE_STEP).max(AI_RANGE_FLOOR);
    }

    /// CPU shot rate shown on the scoreboard
    pub fn ai_shots_per_second(&self) -> f32 {
        1000.0 / self.ai_shoot_cooldown_ms
    }
}

/// Complete world state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub arena: Arena,
    /// Live meteors (sorted by id)
    pub meteors: Vec<Meteor>,
    /// Live projectiles (sorted by id)
    pub projectiles: Vec<Projectile>,
    pub player: Combatant,
    pub ai: Combatant,
    pub round: RoundState,
    /// Session time of the CPU's last shot
    pub ai_last_shot_ms: Option<u64>,
    pub rng: Pcg32,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    /// Create an empty world (no meteors yet) from validated settings
    pub fn new(settings: Settings, seed: u64) -> Self {
        let arena = Arena {
            width: settings.width,
            height: settings.height,
        };
        Self {
            round: RoundState::new(&settings),
            player: Combatant::new(Side::Player, &arena),
            ai: Combatant::new(Side::Ai, &arena),
            arena,
            settings,
            meteors: Vec::new(),
            projectiles: Vec::new(),
            ai_last_shot_ms: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Player => &mut self.player,
            Side::Ai => &mut self.ai,
        }
    }

    pub fn meteor(&self, id: EntityId) -> Option<&Meteor> {
        self.meteors.iter().find(|m| m.id == id)
    }

    /// Remove a meteor by id. Removing twice is harmless.
    pub fn remove_meteor(&mut self, id: EntityId) -> Option<Meteor> {
        let idx = self.meteors.iter().position(|m| m.id == id)?;
        let meteor = self.meteors.remove(idx);
        self.emit(GameEvent::MeteorRemoved { id });
        Some(meteor)
    }

    /// Remove a projectile by id. Removing twice is harmless.
    pub fn remove_projectile(&mut self, id: EntityId) -> Option<Projectile> {
        let idx = self.projectiles.iter().position(|p| p.id == id)?;
        let projectile = self.projectiles.remove(idx);
        self.emit(GameEvent::ProjectileRemoved { id });
        Some(projectile)
    }

    /// Normal meteors currently alive (exploding ones included)
    pub fn normal_meteor_count(&self) -> usize {
        self.meteors
            .iter()
            .filter(|m| m.kind == MeteorKind::Normal)
            .count()
    }

    /// Reset scores and height bonuses at a round boundary
    pub fn reset_round(&mut self) {
        self.player.reset_for_round();
        self.ai.reset_for_round();
    }

    /// Drop every entity (session teardown)
    pub fn clear_entities(&mut self) {
        self.meteors.clear();
        self.projectiles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combatants_start_centered_on_floor() {
        let state = GameState::new(Settings::default(), 1);
        assert_eq!(state.player.x, 225.0);
        assert_eq!(state.ai.x, 225.0);
        assert_eq!(state.player.top(), 550.0);
        assert_eq!(state.ai.top(), 550.0);
    }

    #[test]
    fn test_height_bonus_raises_and_resets() {
        let mut state = GameState::new(Settings::default(), 1);
        state.player.add_height_bonus(20.0);
        state.player.add_height_bonus(-5.0);
        assert_eq!(state.player.height_bonus, 20.0);
        assert_eq!(state.player.top(), 530.0);

        state.player.score = 7;
        state.reset_round();
        assert_eq!(state.player.height_bonus, 0.0);
        assert_eq!(state.player.score, 0);
        assert_eq!(state.player.top(), 550.0);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut state = GameState::new(Settings::default(), 1);
        let id = state.next_entity_id();
        state.meteors.push(Meteor::new(id, MeteorKind::Normal, Vec2::ZERO, Vec2::ZERO));

        assert!(state.remove_meteor(id).is_some());
        assert!(state.remove_meteor(id).is_none());
        assert!(state.remove_projectile(999).is_none());
        assert_eq!(state.events, vec![GameEvent::MeteorRemoved { id }]);
    }

    #[test]
    fn test_difficulty_floors() {
        let mut round = RoundState::new(&Settings {
            ai_initial_movement_range: 1.1,
            ai_initial_shoot_cooldown: 110.0,
            ..Default::default()
        });

        round.escalate();
        assert_eq!(round.ai_shoot_cooldown_ms, 100.0);
        assert!((round.ai_movement_range - 1.3).abs() < 1e-5);

        round.escalate();
        assert_eq!(round.ai_shoot_cooldown_ms, 100.0);

        round.deescalate();
        round.deescalate();
        round.deescalate();
        assert_eq!(round.ai_shoot_cooldown_ms, 145.0);
        assert_eq!(round.ai_movement_range, 1.0);
    }
}

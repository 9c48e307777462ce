//! Session driver
//!
//! Owns the world state and the scheduler, and runs each sub-behaviour on its
//! own fixed interval. Everything happens on one thread; jobs due at the same
//! instant run in registration order.

use serde::{Deserialize, Serialize};

use super::ai;
use super::collision::{finish_explosion, resolve_collisions};
use super::events::GameEvent;
use super::motion::{move_meteors, move_projectiles};
use super::round::{Scoreboard, check_round};
use super::schedule::{Scheduler, TimerId};
use super::spawner::{fire, populate};
use super::state::{Arena, Combatant, EntityId, GameState, Meteor, Projectile, Side};
use crate::consts::*;
use crate::settings::{Settings, SettingsError};

/// Seed used when the settings leave it open
pub const DEFAULT_SEED: u64 = 0x6d65_7465_6f72;

/// Input gathered since the last advance
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x relative to the arena's left edge
    pub pointer_x: Option<f32>,
    /// Fire trigger (primary or context click)
    pub fire: bool,
}

/// Work items driven by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Job {
    MoveMeteors,
    MoveProjectiles,
    ResolveCollisions,
    AiThink,
    RoundCheck,
    FinishExplosion(EntityId),
}

/// Everything a render adapter needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub now_ms: u64,
    pub arena: Arena,
    pub meteors: Vec<Meteor>,
    pub projectiles: Vec<Projectile>,
    pub player: Combatant,
    pub ai: Combatant,
    pub scoreboard: Scoreboard,
}

/// One running game
pub struct Session {
    state: GameState,
    scheduler: Scheduler<Job>,
    /// Session-long intervals
    intervals: Vec<TimerId>,
    /// Pending explosion removals
    explosions: Vec<(EntityId, TimerId)>,
    scoreboard: Scoreboard,
    running: bool,
}

impl Session {
    /// Validate settings, spawn the starting meteors and arm every interval
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        let settings = settings.validate()?;
        let seed = settings.seed.unwrap_or(DEFAULT_SEED);
        let ai_tick_ms = settings.ai_tick_ms;

        let mut state = GameState::new(settings, seed);
        populate(&mut state);

        let mut scheduler = Scheduler::new();
        let intervals = vec![
            scheduler.every(METEOR_TICK_MS, Job::MoveMeteors),
            scheduler.every(PROJECTILE_TICK_MS, Job::MoveProjectiles),
            scheduler.every(COLLISION_TICK_MS, Job::ResolveCollisions),
            scheduler.every(ai_tick_ms, Job::AiThink),
            scheduler.every(ROUND_TICK_MS, Job::RoundCheck),
        ];

        log::info!(
            "Session started: {}x{}, {} meteor(s), seed {}",
            state.arena.width,
            state.arena.height,
            state.settings.meteor_amount,
            seed
        );

        Ok(Self {
            scoreboard: Scoreboard::from_state(&state),
            state,
            scheduler,
            intervals,
            explosions: Vec::new(),
            running: true,
        })
    }

    /// Apply pointer movement and fire triggers immediately
    pub fn apply_input(&mut self, input: &TickInput) {
        if !self.running {
            return;
        }
        if let Some(pointer_x) = input.pointer_x {
            let x = pointer_x - COMBATANT_WIDTH / 2.0;
            self.state.player.x = self.state.arena.clamp_combatant_x(x);
        }
        if input.fire {
            fire(&mut self.state, Side::Player);
        }
    }

    /// Run every job due within the next `dt_ms` milliseconds
    pub fn advance(&mut self, dt_ms: u64) {
        if !self.running {
            return;
        }
        let until = self.scheduler.now_ms() + dt_ms;
        while let Some(job) = self.scheduler.next_due(until) {
            self.run(job);
        }
        self.scheduler.settle(until);
    }

    fn run(&mut self, job: Job) {
        let now = self.scheduler.now_ms();
        match job {
            Job::MoveMeteors => move_meteors(&mut self.state),
            Job::MoveProjectiles => move_projectiles(&mut self.state),
            Job::ResolveCollisions => {
                for id in resolve_collisions(&mut self.state) {
                    let timer = self
                        .scheduler
                        .after(EXPLOSION_DELAY_MS, Job::FinishExplosion(id));
                    self.explosions.push((id, timer));
                }
            }
            Job::AiThink => ai::think(&mut self.state, now),
            Job::RoundCheck => {
                check_round(&mut self.state);
                self.scoreboard = Scoreboard::from_state(&self.state);
            }
            Job::FinishExplosion(id) => {
                self.explosions.retain(|(meteor, _)| *meteor != id);
                finish_explosion(&mut self.state, id);
            }
        }
    }

    /// Stop every timer and drop every entity. Later calls do nothing.
    pub fn teardown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        let timers = self
            .intervals
            .drain(..)
            .chain(self.explosions.drain(..).map(|(_, timer)| timer));
        let mut cancelled = 0;
        for timer in timers {
            if self.scheduler.cancel(timer) {
                cancelled += 1;
            }
        }
        self.state.clear_entities();
        self.state.events.clear();
        log::info!(
            "Session torn down at {}ms, {} timer(s) cancelled, {} left",
            self.scheduler.now_ms(),
            cancelled,
            self.scheduler.pending()
        );
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Timers still armed (intervals plus pending explosion removals)
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Scoreboard as of the last round check
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            now_ms: self.now_ms(),
            arena: self.state.arena,
            meteors: self.state.meteors.clone(),
            projectiles: self.state.projectiles.clone(),
            player: self.state.player.clone(),
            ai: self.state.ai.clone(),
            scoreboard: self.scoreboard.clone(),
        }
    }
}

/// Apply input, then advance the session by `dt_ms`
pub fn tick(session: &mut Session, input: &TickInput, dt_ms: u64) {
    session.apply_input(input);
    session.advance(dt_ms);
}

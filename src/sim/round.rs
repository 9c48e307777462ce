//! Round bookkeeping, difficulty adjustment and the scoreboard model

use std::fmt;

use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::state::{GameState, Side};
use crate::consts::WIN_SCORE;

/// Check for a finished round and reset the world if one ended.
///
/// Player wins are checked first; only one branch runs per call.
pub fn check_round(state: &mut GameState) -> Option<Side> {
    let winner = if state.player.score >= WIN_SCORE {
        Side::Player
    } else if state.ai.score >= WIN_SCORE {
        Side::Ai
    } else {
        return None;
    };

    state.reset_round();

    match winner {
        Side::Player => {
            state.round.rounds_won += 1;
            if state.settings.ai_can_get_stronger {
                state.round.escalate();
            }
        }
        Side::Ai => {
            state.round.rounds_lost += 1;
            if state.settings.ai_can_get_weaker {
                state.round.deescalate();
            }
        }
    }

    log::info!(
        "Round over, {:?} wins ({}-{}), CPU range {:.1}, cooldown {}ms",
        winner,
        state.round.rounds_won,
        state.round.rounds_lost,
        state.round.ai_movement_range,
        state.round.ai_shoot_cooldown_ms
    );
    state.emit(GameEvent::RoundEnded {
        winner,
        rounds_won: state.round.rounds_won,
        rounds_lost: state.round.rounds_lost,
    });

    Some(winner)
}

/// What the score display shows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    pub player_score: u32,
    pub ai_score: u32,
    /// Present once at least one round was won (and rounds are shown)
    pub rounds_won: Option<u32>,
    /// Present once at least one round was lost (and rounds are shown)
    pub rounds_lost: Option<u32>,
    /// CPU shots per second (when enabled)
    pub cpu_speed_hz: Option<f32>,
}

impl Scoreboard {
    pub fn from_state(state: &GameState) -> Self {
        let show_rounds = state.settings.score_board_show_rounds;
        let round = &state.round;
        Self {
            player_score: state.player.score,
            ai_score: state.ai.score,
            rounds_won: (show_rounds && round.rounds_won > 0).then_some(round.rounds_won),
            rounds_lost: (show_rounds && round.rounds_lost > 0).then_some(round.rounds_lost),
            cpu_speed_hz: state
                .settings
                .score_board_show_cpu_speed
                .then(|| round.ai_shots_per_second()),
        }
    }

    /// Display lines, top to bottom
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("YOU {} - {} CPU", self.player_score, self.ai_score)];
        if let Some(won) = self.rounds_won {
            lines.push(format!("won : {}", won));
        }
        if let Some(lost) = self.rounds_lost {
            lines.push(format!("lost: {}", lost));
        }
        if let Some(hz) = self.cpu_speed_hz {
            lines.push(format!("{:.2}Hz", hz));
        }
        lines
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::consts::{AI_COOLDOWN_FLOOR_MS, AI_RANGE_FLOOR};
    use crate::settings::Settings;

    fn state_with(settings: Settings) -> GameState {
        GameState::new(settings, 5)
    }

    #[test]
    fn test_no_round_below_threshold() {
        let mut state = state_with(Settings::default());
        state.player.score = 9;
        state.ai.score = 9;
        assert_eq!(check_round(&mut state), None);
        assert_eq!(state.player.score, 9);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_player_win_escalates() {
        let mut state = state_with(Settings::default());
        state.player.score = 10;
        state.ai.score = 4;
        state.player.add_height_bonus(40.0);
        state.ai.add_height_bonus(20.0);

        assert_eq!(check_round(&mut state), Some(Side::Player));
        assert_eq!(state.round.rounds_won, 1);
        assert_eq!(state.round.rounds_lost, 0);
        assert_eq!((state.player.score, state.ai.score), (0, 0));
        assert_eq!(state.player.height_bonus, 0.0);
        assert_eq!(state.ai.height_bonus, 0.0);
        assert_eq!(state.player.top(), 550.0);
        assert_eq!(state.ai.top(), 550.0);
        assert_eq!(state.round.ai_shoot_cooldown_ms, 985.0);
        assert!((state.round.ai_movement_range - 1.2).abs() < 1e-5);
        assert_eq!(
            state.events,
            vec![GameEvent::RoundEnded {
                winner: Side::Player,
                rounds_won: 1,
                rounds_lost: 0
            }]
        );
    }

    #[test]
    fn test_ai_win_deescalates_with_floor() {
        let mut state = state_with(Settings::default());
        state.ai.score = 10;

        assert_eq!(check_round(&mut state), Some(Side::Ai));
        assert_eq!(state.round.rounds_lost, 1);
        assert_eq!(state.round.ai_shoot_cooldown_ms, 1015.0);
        assert_eq!(state.round.ai_movement_range, AI_RANGE_FLOOR);
    }

    #[test]
    fn test_difficulty_locked_when_disabled() {
        let mut state = state_with(Settings {
            ai_can_get_stronger: false,
            ai_can_get_weaker: false,
            ..Default::default()
        });
        state.player.score = 10;
        check_round(&mut state);
        state.ai.score = 12;
        check_round(&mut state);
        assert_eq!(state.round.rounds_won, 1);
        assert_eq!(state.round.rounds_lost, 1);
        assert_eq!(state.round.ai_shoot_cooldown_ms, 1000.0);
        assert_eq!(state.round.ai_movement_range, 1.0);
    }

    #[test]
    fn test_scoreboard_lines() {
        let mut state = state_with(Settings {
            score_board_show_cpu_speed: true,
            ..Default::default()
        });
        assert_eq!(
            Scoreboard::from_state(&state).lines(),
            vec!["YOU 0 - 0 CPU".to_string(), "1.00Hz".to_string()]
        );

        state.round.rounds_won = 2;
        state.round.ai_shoot_cooldown_ms = 300.0;
        state.player.score = 3;
        let board = Scoreboard::from_state(&state);
        assert_eq!(board.rounds_won, Some(2));
        assert_eq!(board.rounds_lost, None);
        assert_eq!(board.to_string(), "YOU 3 - 0 CPU\nwon : 2\n3.33Hz");
    }

    #[test]
    fn test_scoreboard_hides_rounds() {
        let mut state = state_with(Settings {
            score_board_show_rounds: false,
            ..Default::default()
        });
        state.round.rounds_won = 1;
        state.round.rounds_lost = 1;
        assert_eq!(Scoreboard::from_state(&state).lines().len(), 1);
    }

    proptest! {
        #[test]
        fn prop_difficulty_respects_floors(outcomes in proptest::collection::vec(any::<bool>(), 0..200)) {
            let mut state = state_with(Settings::default());
            for player_wins in outcomes {
                let before = state.round.clone();
                if player_wins {
                    state.player.score = 10;
                } else {
                    state.ai.score = 10;
                }
                check_round(&mut state);
                prop_assert!(state.round.ai_shoot_cooldown_ms >= AI_COOLDOWN_FLOOR_MS);
                prop_assert!(state.round.ai_movement_range >= AI_RANGE_FLOOR);
                if player_wins {
                    prop_assert_eq!(state.round.rounds_won, before.rounds_won + 1);
                    prop_assert!(state.round.ai_movement_range > before.ai_movement_range);
                } else {
                    prop_assert_eq!(state.round.rounds_lost, before.rounds_lost + 1);
                    prop_assert!(state.round.ai_shoot_cooldown_ms > before.ai_shoot_cooldown_ms);
                }
                prop_assert_eq!(state.player.score, 0);
                prop_assert_eq!(state.ai.score, 0);
            }
        }
    }
}

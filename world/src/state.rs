//! Player-facing counters and the playing / game-over state machine.

use bomber_core::{GameConfig, GameStatus, Phase};

/// Result of applying one point of damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Damage {
    /// The session was already over; nothing changed.
    Ignored,
    /// A life was lost and some remain.
    Hit { lives: u32 },
    /// The last life was lost and the session ended.
    Fatal { score: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GameState {
    lives: u32,
    score: u32,
    max_bombs: u32,
    phase: Phase,
}

impl GameState {
    pub(crate) fn new(config: &GameConfig) -> Self {
        Self {
            lives: config.initial_lives,
            score: 0,
            max_bombs: config.initial_max_bombs.max(1),
            phase: Phase::Playing,
        }
    }

    pub(crate) fn reset(&mut self, config: &GameConfig) {
        *self = Self::new(config);
    }

    pub(crate) fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub(crate) fn max_bombs(&self) -> u32 {
        self.max_bombs
    }

    pub(crate) fn apply_damage(&mut self) -> Damage {
        if self.is_game_over() {
            return Damage::Ignored;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = Phase::GameOver;
            Damage::Fatal { score: self.score }
        } else {
            Damage::Hit { lives: self.lives }
        }
    }

    /// Adds points and returns the new total.
    pub(crate) fn add_score(&mut self, points: u32) -> u32 {
        self.score = self.score.saturating_add(points);
        self.score
    }

    /// Raises the bomb limit by one and returns the new limit.
    pub(crate) fn grant_bomb(&mut self) -> u32 {
        self.max_bombs = self.max_bombs.saturating_add(1);
        self.max_bombs
    }

    pub(crate) fn status(&self, current_bombs: u32) -> GameStatus {
        GameStatus {
            lives: self.lives,
            score: self.score,
            max_bombs: self.max_bombs,
            current_bombs,
            phase: self.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_counts_down_to_a_single_game_over() {
        let mut state = GameState::new(&GameConfig::default());
        let _ = state.add_score(30);

        assert_eq!(state.apply_damage(), Damage::Hit { lives: 2 });
        assert_eq!(state.apply_damage(), Damage::Hit { lives: 1 });
        assert_eq!(state.apply_damage(), Damage::Fatal { score: 30 });
        assert!(state.is_game_over());
        assert_eq!(state.apply_damage(), Damage::Ignored);
        assert_eq!(state.status(0).lives, 0);
    }

    #[test]
    fn reset_restores_initial_counters() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        let _ = state.add_score(120);
        let _ = state.grant_bomb();
        while state.apply_damage() != Damage::Ignored {}

        state.reset(&config);

        assert_eq!(
            state.status(0),
            GameStatus {
                lives: 3,
                score: 0,
                max_bombs: 1,
                current_bombs: 0,
                phase: Phase::Playing,
            }
        );
    }

    #[test]
    fn grant_bomb_raises_limit() {
        let mut state = GameState::new(&GameConfig::default());
        assert_eq!(state.grant_bomb(), 2);
        assert_eq!(state.max_bombs(), 2);
    }
}

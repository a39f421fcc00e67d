#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns game status snapshots into heads-up display pushes.

use bomber_core::{GameStatus, Phase};

/// Counters shown on the heads-up display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudUpdate {
    /// Score accumulated this session.
    pub score: u32,
    /// Lives the player has left.
    pub lives: u32,
    /// Bombs the player may still place right now.
    pub bombs_available: u32,
    /// Concurrent bomb limit.
    pub max_bombs: u32,
}

impl From<&GameStatus> for HudUpdate {
    fn from(status: &GameStatus) -> Self {
        Self {
            score: status.score,
            lives: status.lives,
            bombs_available: status.bombs_available(),
            max_bombs: status.max_bombs,
        }
    }
}

/// Change the display collaborator must reflect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HudChange {
    /// Counters differ from the last push.
    Counters(HudUpdate),
    /// The game-over overlay should be shown or hidden.
    GameOverVisible(bool),
}

/// HUD system that remembers what was last pushed so it only reports changes.
#[derive(Debug, Default)]
pub struct Hud {
    shown: Option<HudUpdate>,
    game_over_visible: bool,
}

impl Hud {
    /// Creates a HUD system that has not pushed anything yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares the snapshot with what is on screen and emits the differences.
    ///
    /// The first call always pushes counters.
    pub fn handle(&mut self, status: &GameStatus, out: &mut Vec<HudChange>) {
        let update = HudUpdate::from(status);
        if self.shown != Some(update) {
            self.shown = Some(update);
            out.push(HudChange::Counters(update));
        }

        let game_over = status.phase == Phase::GameOver;
        if game_over != self.game_over_visible {
            self.game_over_visible = game_over;
            out.push(HudChange::GameOverVisible(game_over));
        }
    }

    /// Counters most recently pushed, if any.
    #[must_use]
    pub fn shown(&self) -> Option<HudUpdate> {
        self.shown
    }
}

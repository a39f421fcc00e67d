#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure controls system that translates frame input into world commands and a
//! movement intent for the physics collaborator.

use std::f32::consts::FRAC_1_SQRT_2;

use bomber_core::{CellCoord, Command, Event};
use glam::Vec2;

/// Player walking speed in world units per second.
pub const DEFAULT_WALK_SPEED: f32 = 160.0;

/// Input snapshot distilled from adapter-provided frame input data.
///
/// Direction flags describe keys held this frame; `place_bomb` and `restart`
/// are edge-triggered and should only be set on the frame the key went down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlsInput {
    /// Move toward decreasing columns.
    pub left: bool,
    /// Move toward increasing columns.
    pub right: bool,
    /// Move toward decreasing rows.
    pub up: bool,
    /// Move toward increasing rows.
    pub down: bool,
    /// Drop a bomb on the player's cell.
    pub place_bomb: bool,
    /// Start over once the session has ended.
    pub restart: bool,
}

/// Controls system that tracks the session phase from world events.
#[derive(Clone, Debug)]
pub struct Controls {
    walk_speed: f32,
    game_over: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}

impl Controls {
    /// Creates a controls system walking at [`DEFAULT_WALK_SPEED`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            walk_speed: DEFAULT_WALK_SPEED,
            game_over: false,
        }
    }

    /// Overrides the walking speed.
    #[must_use]
    pub fn with_walk_speed(mut self, walk_speed: f32) -> Self {
        self.walk_speed = walk_speed.max(0.0);
        self
    }

    /// Consumes world events and frame input, emitting commands into `out`.
    ///
    /// Returns the velocity the physics collaborator should apply to the
    /// player this frame. While the session is over the player stands still
    /// and either action key requests a restart.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: ControlsInput,
        player_cell: Option<CellCoord>,
        out: &mut Vec<Command>,
    ) -> Vec2 {
        for event in events {
            match event {
                Event::GameOver { .. } => self.game_over = true,
                Event::GameRestarted => self.game_over = false,
                _ => {}
            }
        }

        if self.game_over {
            if input.restart || input.place_bomb {
                out.push(Command::Restart);
            }
            return Vec2::ZERO;
        }

        if input.place_bomb {
            if let Some(cell) = player_cell {
                out.push(Command::PlaceBomb { cell });
            }
        }

        self.velocity(input)
    }

    fn velocity(&self, input: ControlsInput) -> Vec2 {
        let x = if input.left {
            -self.walk_speed
        } else if input.right {
            self.walk_speed
        } else {
            0.0
        };
        let y = if input.up {
            -self.walk_speed
        } else if input.down {
            self.walk_speed
        } else {
            0.0
        };

        let velocity = Vec2::new(x, y);
        if x != 0.0 && y != 0.0 {
            velocity * FRAC_1_SQRT_2
        } else {
            velocity
        }
    }
}

//! Terminal collaborators for running a session without a window.

use std::{collections::BTreeSet, time::Duration};

use bomber_core::{CellCoord, CellKind, WorldPoint};
use bomber_session::{HudDisplay, PhysicsBackend};
use bomber_system_hud::HudUpdate;
use glam::Vec2;
use log::{debug, info};

/// Fraction of a tile covered by the player's collision box.
const PLAYER_BODY_FRACTION: f32 = 0.8;

/// Axis-aligned physics that stops the player at wall and bomb cells.
#[derive(Debug)]
pub(crate) struct HeadlessPhysics {
    tile_length: f32,
    half_extent: f32,
    walls: BTreeSet<CellCoord>,
    bombs: BTreeSet<CellCoord>,
    position: Vec2,
    velocity: Vec2,
}

impl HeadlessPhysics {
    pub(crate) fn new(tile_length: f32) -> Self {
        Self {
            tile_length,
            half_extent: tile_length * PLAYER_BODY_FRACTION / 2.0,
            walls: BTreeSet::new(),
            bombs: BTreeSet::new(),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
        }
    }

    /// Cells under the corners of the player's box centred on `center`.
    ///
    /// `None` stands for a corner that lies off the grid.
    fn covered_cells(&self, center: Vec2) -> [Option<CellCoord>; 4] {
        let min = center - Vec2::splat(self.half_extent);
        let max = center + Vec2::splat(self.half_extent);
        [
            Vec2::new(min.x, min.y),
            Vec2::new(max.x, min.y),
            Vec2::new(min.x, max.y),
            Vec2::new(max.x, max.y),
        ]
        .map(|corner| WorldPoint::new(corner.x, corner.y).cell(self.tile_length))
    }

    /// Bombs block the player unless the player already overlaps their cell,
    /// so a freshly dropped bomb can still be walked away from.
    fn blocked(&self, candidate: Vec2) -> bool {
        let current = self.covered_cells(self.position);
        self.covered_cells(candidate)
            .into_iter()
            .any(|cell| match cell {
                None => true,
                Some(cell) => {
                    self.walls.contains(&cell)
                        || (self.bombs.contains(&cell) && !current.contains(&Some(cell)))
                }
            })
    }
}

impl PhysicsBackend for HeadlessPhysics {
    fn create_static_body(&mut self, cell: CellCoord, _kind: CellKind) {
        let _ = self.walls.insert(cell);
    }

    fn destroy_body(&mut self, cell: CellCoord) {
        let _ = self.walls.remove(&cell);
    }

    fn add_bomb_collider(&mut self, cell: CellCoord) {
        let _ = self.bombs.insert(cell);
    }

    fn remove_bomb_collider(&mut self, cell: CellCoord) {
        let _ = self.bombs.remove(&cell);
    }

    fn set_player_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn place_player(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
    }

    fn step(&mut self, dt: Duration) {
        let delta = self.velocity * dt.as_secs_f32();
        // Resolve each axis separately so the player slides along walls.
        for axis_delta in [Vec2::new(delta.x, 0.0), Vec2::new(0.0, delta.y)] {
            if axis_delta == Vec2::ZERO {
                continue;
            }
            let candidate = self.position + axis_delta;
            if self.blocked(candidate) {
                debug!("player blocked at {candidate}");
            } else {
                self.position = candidate;
            }
        }
    }

    fn player_position(&self) -> Vec2 {
        self.position
    }
}

/// Display that writes HUD changes to the log.
#[derive(Debug, Default)]
pub(crate) struct LogDisplay {
    last: Option<HudUpdate>,
}

impl LogDisplay {
    pub(crate) fn last(&self) -> Option<HudUpdate> {
        self.last
    }
}

impl HudDisplay for LogDisplay {
    fn show(&mut self, update: HudUpdate) {
        info!(
            "score {} | lives {} | bombs {}/{}",
            update.score, update.lives, update.bombs_available, update.max_bombs
        );
        self.last = Some(update);
    }

    fn show_game_over(&mut self, visible: bool) {
        if visible {
            info!("GAME OVER, press restart");
        } else {
            info!("back in the arena");
        }
    }
}

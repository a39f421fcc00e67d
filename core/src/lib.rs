#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Blast Grid engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

mod config;
mod layout;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{ConfigError, DamagePolicy, GameConfig, MIN_GRID_EXTENT};
pub use layout::{LayoutError, MapLayout};

/// Cells that are always cleared around the player's spawn point.
pub const SPAWN_CLEAR_ZONE: [CellCoord; 3] = [
    CellCoord::new(1, 1),
    CellCoord::new(1, 2),
    CellCoord::new(2, 1),
];

/// Cell the player occupies when a session starts or restarts.
pub const SPAWN_CELL: CellCoord = CellCoord::new(1, 1);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the current map with a freshly generated one of the given size.
    GenerateMap {
        /// Number of cell columns laid out in the grid.
        columns: u32,
        /// Number of cell rows laid out in the grid.
        rows: u32,
    },
    /// Replaces the current map with a hand-authored layout.
    LoadMap {
        /// Layout describing the kind of every cell.
        layout: MapLayout,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Reports the player's position as resolved by the physics collaborator.
    PlayerMoved {
        /// Player position measured in world units.
        position: WorldPoint,
    },
    /// Requests that a bomb be placed on the provided cell.
    PlaceBomb {
        /// Cell that should receive the bomb.
        cell: CellCoord,
    },
    /// Requests that a bomb whose fuse ran out be resolved into an explosion.
    DetonateBomb {
        /// Identifier of the bomb to detonate.
        bomb: BombId,
    },
    /// Resets lives, score, bombs and the map to their initial state.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a new map replaced the previous one.
    MapGenerated {
        /// Number of cell columns in the new map.
        columns: u32,
        /// Number of cell rows in the new map.
        rows: u32,
    },
    /// A wall cell came into existence and needs a static body.
    WallCreated {
        /// Cell holding the wall.
        cell: CellCoord,
        /// Either [`CellKind::Solid`] or [`CellKind::Breakable`].
        kind: CellKind,
    },
    /// A breakable wall was destroyed by an explosion.
    WallDestroyed {
        /// Cell that previously held the wall.
        cell: CellCoord,
    },
    /// A wall was torn down because the map is being replaced.
    WallRemoved {
        /// Cell that previously held the wall.
        cell: CellCoord,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a bomb was placed and its fuse started.
    BombPlaced {
        /// Identifier allocated to the bomb.
        bomb: BombId,
        /// Cell the bomb occupies.
        cell: CellCoord,
        /// Time until the fuse runs out.
        fuse: Duration,
    },
    /// Reports that a placement request was refused. World state is unchanged.
    BombPlacementRejected {
        /// Cell named in the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementRejection,
    },
    /// The fuse of a bomb ran out and the bomb awaits detonation.
    FuseExpired {
        /// Identifier of the bomb whose fuse ran out.
        bomb: BombId,
    },
    /// A bomb was removed from the registry and its explosion resolved.
    BombDetonated {
        /// Identifier of the detonated bomb.
        bomb: BombId,
        /// Cell the bomb occupied.
        cell: CellCoord,
    },
    /// A bomb was dropped without exploding because the session restarted.
    BombDiscarded {
        /// Identifier of the discarded bomb.
        bomb: BombId,
        /// Cell the bomb occupied.
        cell: CellCoord,
    },
    /// Lists every cell reached by a single detonation.
    ExplosionResolved {
        /// Cell the explosion originated from.
        origin: CellCoord,
        /// Cells covered by the blast, center first.
        cells: Vec<CellCoord>,
    },
    /// Points were awarded for destroying a wall.
    ScoreAwarded {
        /// Cell whose wall produced the points.
        cell: CellCoord,
        /// Points awarded.
        points: u32,
        /// Score after the award.
        total: u32,
    },
    /// A power-up appeared on a destroyed wall cell.
    PowerUpSpawned {
        /// Cell holding the power-up.
        cell: CellCoord,
    },
    /// The player picked up a power-up.
    PowerUpCollected {
        /// Cell that held the power-up.
        cell: CellCoord,
        /// Bomb limit after the pickup.
        max_bombs: u32,
    },
    /// A power-up vanished because the session restarted.
    PowerUpRemoved {
        /// Cell that held the power-up.
        cell: CellCoord,
    },
    /// The player was caught by an explosion.
    PlayerHit {
        /// Lives remaining after the hit.
        lives: u32,
    },
    /// The player was placed back on the spawn point.
    PlayerRespawned {
        /// Spawn position in world units.
        position: WorldPoint,
    },
    /// The last life was lost. Emitted once per session.
    GameOver {
        /// Final score of the session.
        score: u32,
    },
    /// Every piece of session state returned to its initial value.
    GameRestarted,
}

/// Classification of a single map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Walkable floor.
    Empty,
    /// Indestructible wall.
    Solid,
    /// Wall that explosions destroy.
    Breakable,
}

impl CellKind {
    /// Whether the cell holds a wall of any kind.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Solid | Self::Breakable)
    }
}

/// Cardinal directions on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Order in which an explosion visits the arms of its cross.
    pub const BLAST_ORDER: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];
}

/// Unique identifier assigned to a bomb.
///
/// Identifiers increase monotonically for the lifetime of a world and are
/// never reused, so they also order bombs by placement time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BombId(u64);

impl BombId {
    /// Creates a new bomb identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the adjacent cell in the given direction.
    ///
    /// Yields `None` when stepping off the zero edge; the upper bound is left
    /// to the caller since coordinates carry no grid dimensions.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::North => (Some(self.column), self.row.checked_sub(1)),
            Direction::East => (self.column.checked_add(1), Some(self.row)),
            Direction::South => (Some(self.column), self.row.checked_add(1)),
            Direction::West => (self.column.checked_sub(1), Some(self.row)),
        };
        Some(CellCoord::new(column?, row?))
    }

    /// Center of the cell measured in world units.
    #[must_use]
    pub fn center(self, tile_length: f32) -> WorldPoint {
        WorldPoint::new(
            (self.column as f32 + 0.5) * tile_length,
            (self.row as f32 + 0.5) * tile_length,
        )
    }
}

/// Position measured in world units (one tile spans `tile_length` units).
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate, growing downward.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Cell containing the point, or `None` for negative or non-finite coordinates.
    #[must_use]
    pub fn cell(self, tile_length: f32) -> Option<CellCoord> {
        if tile_length.is_nan() || tile_length <= 0.0 || !self.x.is_finite() || !self.y.is_finite()
        {
            return None;
        }
        if self.x < 0.0 || self.y < 0.0 {
            return None;
        }
        let column = (self.x / tile_length).floor();
        let row = (self.y / tile_length).floor();
        if column > u32::MAX as f32 || row > u32::MAX as f32 {
            return None;
        }
        Some(CellCoord::new(column as u32, row as u32))
    }
}

/// Reasons a bomb placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementRejection {
    /// The session is over; only a restart is accepted.
    GameOver,
    /// The number of live bombs already equals the bomb limit.
    LimitReached,
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell holds a wall.
    Blocked,
    /// Another bomb already sits on the requested cell.
    Occupied,
}

/// Phase of the session state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Lives remain and input is accepted.
    Playing,
    /// Lives ran out; terminal until a restart.
    GameOver,
}

/// Read-only snapshot of the player-facing counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GameStatus {
    /// Lives remaining.
    pub lives: u32,
    /// Accumulated score.
    pub score: u32,
    /// Number of bombs that may be live at once.
    pub max_bombs: u32,
    /// Number of bombs currently ticking.
    pub current_bombs: u32,
    /// Active phase of the session.
    pub phase: Phase,
}

impl GameStatus {
    /// Number of bombs the player can still place.
    #[must_use]
    pub const fn bombs_available(&self) -> u32 {
        self.max_bombs.saturating_sub(self.current_bombs)
    }

    /// Whether the session reached its terminal phase.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

/// Failures raised by grid lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The requested cell lies outside the grid.
    #[error("cell {cell:?} lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Cell named in the lookup.
        cell: CellCoord,
        /// Number of columns in the grid.
        columns: u32,
        /// Number of rows in the grid.
        rows: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::{BombId, CellCoord, Direction, PlacementRejection, WorldPoint};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn neighbor_steps_one_cell_and_stops_at_zero_edge() {
        let cell = CellCoord::new(0, 3);
        assert_eq!(cell.neighbor(Direction::East), Some(CellCoord::new(1, 3)));
        assert_eq!(cell.neighbor(Direction::South), Some(CellCoord::new(0, 4)));
        assert_eq!(cell.neighbor(Direction::North), Some(CellCoord::new(0, 2)));
        assert_eq!(cell.neighbor(Direction::West), None);
        assert_eq!(CellCoord::new(2, 0).neighbor(Direction::North), None);
    }

    #[test]
    fn cell_center_sits_half_a_tile_in() {
        let center = CellCoord::new(1, 1).center(32.0);
        assert_eq!(center, WorldPoint::new(48.0, 48.0));
    }

    #[test]
    fn point_maps_back_to_containing_cell() {
        assert_eq!(
            WorldPoint::new(48.0, 79.9).cell(32.0),
            Some(CellCoord::new(1, 2))
        );
        assert_eq!(WorldPoint::new(-1.0, 10.0).cell(32.0), None);
        assert_eq!(WorldPoint::new(10.0, 10.0).cell(0.0), None);
        assert_eq!(WorldPoint::new(f32::NAN, 10.0).cell(32.0), None);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = WorldPoint::new(0.0, 0.0);
        let b = WorldPoint::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < f32::EPSILON);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn identifiers_and_rejections_survive_bincode() {
        assert_round_trip(&BombId::new(42));
        assert_round_trip(&PlacementRejection::Occupied);
        assert_round_trip(&CellCoord::new(5, 7));
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Blast Grid.

mod bombs;
mod explosion;
mod grid;
mod state;

use std::{collections::BTreeSet, time::Duration};

use bomber_core::{
    BombId, CellCoord, Command, ConfigError, DamagePolicy, Event, GameConfig, MapLayout,
    PlacementRejection, WorldPoint, MIN_GRID_EXTENT, SPAWN_CELL,
};
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use self::{
    bombs::BombRegistry,
    state::{Damage, GameState},
};

pub use self::grid::{is_fixed_solid, TileMap};

/// Represents the authoritative Blast Grid world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    map: TileMap,
    bombs: BombRegistry,
    state: GameState,
    power_ups: BTreeSet<CellCoord>,
    player: WorldPoint,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world with an empty map. Issue [`Command::GenerateMap`] or
    /// [`Command::LoadMap`] before placing bombs.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            map: TileMap::empty(),
            bombs: BombRegistry::new(),
            state: GameState::new(&config),
            power_ups: BTreeSet::new(),
            player: SPAWN_CELL.center(config.tile_length),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
        })
    }

    fn replace_map(&mut self, map: TileMap, out_events: &mut Vec<Event>) {
        self.discard_transients(out_events);

        for (cell, _) in self.map.walls() {
            out_events.push(Event::WallRemoved { cell });
        }
        self.map = map;
        for (cell, kind) in self.map.walls() {
            out_events.push(Event::WallCreated { cell, kind });
        }
        out_events.push(Event::MapGenerated {
            columns: self.map.columns(),
            rows: self.map.rows(),
        });
    }

    fn generate_map(&mut self, columns: u32, rows: u32, out_events: &mut Vec<Event>) {
        if columns < MIN_GRID_EXTENT || rows < MIN_GRID_EXTENT {
            warn!("ignoring request for a {columns}x{rows} map");
            return;
        }
        let map = TileMap::generate(
            columns,
            rows,
            self.config.breakable_probability,
            &mut self.rng,
        );
        debug!("generated {columns}x{rows} map");
        self.replace_map(map, out_events);
    }

    fn load_map(&mut self, layout: &MapLayout, out_events: &mut Vec<Event>) {
        debug!("loading {}x{} layout", layout.columns(), layout.rows());
        self.replace_map(TileMap::from_layout(layout), out_events);
    }

    fn discard_transients(&mut self, out_events: &mut Vec<Event>) {
        for bomb in self.bombs.clear() {
            out_events.push(Event::BombDiscarded {
                bomb: bomb.id,
                cell: bomb.cell,
            });
        }
        for cell in std::mem::take(&mut self.power_ups) {
            out_events.push(Event::PowerUpRemoved { cell });
        }
    }

    fn place_bomb(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        match self.try_place_bomb(cell) {
            Ok(bomb) => {
                debug!("bomb {} placed at {cell:?}", bomb.get());
                out_events.push(Event::BombPlaced {
                    bomb,
                    cell,
                    fuse: self.config.fuse(),
                });
            }
            Err(reason) => {
                debug!("bomb placement at {cell:?} rejected: {reason:?}");
                out_events.push(Event::BombPlacementRejected { cell, reason });
            }
        }
    }

    fn try_place_bomb(&mut self, cell: CellCoord) -> Result<BombId, PlacementRejection> {
        if self.state.is_game_over() {
            return Err(PlacementRejection::GameOver);
        }
        if self.bombs.len() >= self.state.max_bombs() {
            return Err(PlacementRejection::LimitReached);
        }
        let kind = self
            .map
            .classify(cell)
            .map_err(|_| PlacementRejection::OutOfBounds)?;
        if kind.is_wall() {
            return Err(PlacementRejection::Blocked);
        }
        self.bombs
            .place(cell, self.state.max_bombs(), self.config.fuse())
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });
        for bomb in self.bombs.advance(dt) {
            out_events.push(Event::FuseExpired { bomb });
        }
    }

    fn detonate(&mut self, bomb_id: BombId, out_events: &mut Vec<Event>) {
        let Some(bomb) = self.bombs.take_expired(bomb_id) else {
            debug!("ignoring detonation of bomb {} that is not pending", bomb_id.get());
            return;
        };
        out_events.push(Event::BombDetonated {
            bomb: bomb.id,
            cell: bomb.cell,
        });

        let cells = explosion::blast_cells(&self.map, bomb.cell);
        if cells.is_empty() {
            warn!("bomb {} sat on a solid cell {:?}", bomb.id.get(), bomb.cell);
            return;
        }
        out_events.push(Event::ExplosionResolved {
            origin: bomb.cell,
            cells: cells.clone(),
        });

        let mut caught = false;
        for cell in cells {
            if let Ok(true) = self.map.destroy(cell) {
                self.wall_destroyed(cell, out_events);
            }

            if !explosion::catches(self.player, cell, self.config.tile_length) {
                continue;
            }
            let already_caught = std::mem::replace(&mut caught, true);
            if already_caught && self.config.damage_policy == DamagePolicy::OncePerDetonation {
                continue;
            }
            self.damage_player(out_events);
        }
    }

    fn wall_destroyed(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        out_events.push(Event::WallDestroyed { cell });

        let points = self.config.points_per_wall;
        let total = self.state.add_score(points);
        out_events.push(Event::ScoreAwarded {
            cell,
            points,
            total,
        });

        if self.rng.gen_bool(self.config.power_up_probability) && self.power_ups.insert(cell) {
            debug!("power-up spawned at {cell:?}");
            out_events.push(Event::PowerUpSpawned { cell });
        }
    }

    fn damage_player(&mut self, out_events: &mut Vec<Event>) {
        match self.state.apply_damage() {
            Damage::Ignored => {}
            Damage::Hit { lives } => {
                info!("player hit, {lives} lives left");
                out_events.push(Event::PlayerHit { lives });
            }
            Damage::Fatal { score } => {
                info!("game over with score {score}");
                out_events.push(Event::PlayerHit { lives: 0 });
                out_events.push(Event::GameOver { score });
            }
        }
    }

    fn move_player(&mut self, position: WorldPoint, out_events: &mut Vec<Event>) {
        self.player = position;
        if self.state.is_game_over() {
            return;
        }
        let Some(cell) = position.cell(self.config.tile_length) else {
            return;
        };
        if self.power_ups.remove(&cell) {
            let max_bombs = self.state.grant_bomb();
            debug!("power-up collected at {cell:?}, bomb limit now {max_bombs}");
            out_events.push(Event::PowerUpCollected { cell, max_bombs });
        }
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        info!("restarting session");
        self.state.reset(&self.config);

        // Loaded layouts may be smaller than generation allows.
        let (columns, rows) =
            if self.map.columns() < MIN_GRID_EXTENT || self.map.rows() < MIN_GRID_EXTENT {
                (self.config.columns, self.config.rows)
            } else {
                (self.map.columns(), self.map.rows())
            };
        self.generate_map(columns, rows, out_events);

        self.player = SPAWN_CELL.center(self.config.tile_length);
        out_events.push(Event::PlayerRespawned {
            position: self.player,
        });
        out_events.push(Event::GameRestarted);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::GenerateMap { columns, rows } => world.generate_map(columns, rows, out_events),
        Command::LoadMap { layout } => world.load_map(&layout, out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::PlayerMoved { position } => world.move_player(position, out_events),
        Command::PlaceBomb { cell } => world.place_bomb(cell, out_events),
        Command::DetonateBomb { bomb } => world.detonate(bomb, out_events),
        Command::Restart => world.restart(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{TileMap, World};
    use bomber_core::{BombId, CellCoord, CellKind, GameConfig, GameStatus, GridError, WorldPoint};

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Provides read-only access to the current map.
    #[must_use]
    pub fn tile_map(world: &World) -> &TileMap {
        &world.map
    }

    /// Reports the kind of a single cell.
    pub fn classify(world: &World, cell: CellCoord) -> Result<CellKind, GridError> {
        world.map.classify(cell)
    }

    /// Snapshot of lives, score, bomb counts and phase.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.state.status(world.bombs.len())
    }

    /// Total simulated time accumulated through ticks.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.bombs.clock()
    }

    /// Last reported player position.
    #[must_use]
    pub fn player_position(world: &World) -> WorldPoint {
        world.player
    }

    /// Cell containing the player, if the position lies on the grid.
    #[must_use]
    pub fn player_cell(world: &World) -> Option<CellCoord> {
        world
            .player
            .cell(world.config.tile_length)
            .filter(|cell| world.map.contains(*cell))
    }

    /// Bomb sitting on the provided cell, if any.
    #[must_use]
    pub fn bomb_at(world: &World, cell: CellCoord) -> Option<BombId> {
        world.bombs.occupant(cell)
    }

    /// Captures every live bomb ordered by identifier.
    #[must_use]
    pub fn bomb_view(world: &World) -> Vec<BombSnapshot> {
        let now = world.bombs.clock();
        world
            .bombs
            .iter()
            .map(|bomb| BombSnapshot {
                id: bomb.id,
                cell: bomb.cell,
                fuse_remaining: bomb.due.saturating_sub(now),
                expired: bomb.expired,
            })
            .collect()
    }

    /// Cells currently holding a power-up, in row-major order.
    #[must_use]
    pub fn power_ups(world: &World) -> Vec<CellCoord> {
        let mut cells: Vec<CellCoord> = world.power_ups.iter().copied().collect();
        cells.sort_by_key(|cell| (cell.row(), cell.column()));
        cells
    }

    /// Immutable representation of a single bomb used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BombSnapshot {
        /// Identifier allocated to the bomb.
        pub id: BombId,
        /// Cell the bomb occupies.
        pub cell: CellCoord,
        /// Time left before the fuse runs out.
        pub fuse_remaining: Duration,
        /// Whether the fuse ran out and the bomb awaits detonation.
        pub expired: bool,
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver that wires the world, the pure systems and the host
//! collaborators into a playable session.

use std::time::Duration;

use anyhow::{ensure, Context, Result as AnyResult};
use bomber_core::{CellCoord, CellKind, Command, Event, GameConfig, MapLayout, WorldPoint};
use bomber_system_controls::{Controls, ControlsInput};
use bomber_system_detonation::Detonation;
use bomber_system_hud::{Hud, HudChange, HudUpdate};
use bomber_world::{self as world, query, World};
use glam::Vec2;
use log::{debug, info};

/// Physics collaborator that owns collision bodies and the player's motion.
pub trait PhysicsBackend {
    /// Adds an immovable body covering the provided wall cell.
    fn create_static_body(&mut self, cell: CellCoord, kind: CellKind);

    /// Removes the body covering the provided cell, if one exists.
    fn destroy_body(&mut self, cell: CellCoord);

    /// Adds a collider between the player and a freshly placed bomb.
    ///
    /// The player must still be able to walk off the cell the bomb was
    /// dropped on; the collider only blocks re-entry.
    fn add_bomb_collider(&mut self, cell: CellCoord);

    /// Removes the bomb collider on the provided cell, if one exists.
    fn remove_bomb_collider(&mut self, cell: CellCoord);

    /// Sets the velocity applied to the player on the next step.
    fn set_player_velocity(&mut self, velocity: Vec2);

    /// Teleports the player, clearing any residual motion.
    fn place_player(&mut self, position: Vec2);

    /// Advances the simulation by the provided delta.
    fn step(&mut self, dt: Duration);

    /// Current player position in world units.
    fn player_position(&self) -> Vec2;
}

/// Display collaborator that renders the heads-up counters.
pub trait HudDisplay {
    /// Shows the latest counters.
    fn show(&mut self, update: HudUpdate);

    /// Shows or hides the game-over overlay.
    fn show_game_over(&mut self, visible: bool);
}

/// Running session composed of the world, its systems and the collaborators.
#[derive(Debug)]
pub struct Session<P, D> {
    world: World,
    detonation: Detonation,
    controls: Controls,
    hud: Hud,
    physics: P,
    display: D,
    frame_events: Vec<Event>,
    hud_changes: Vec<HudChange>,
}

impl<P, D> Session<P, D>
where
    P: PhysicsBackend,
    D: HudDisplay,
{
    /// Builds the world from `config`, generates the opening map and pushes
    /// the first HUD snapshot.
    pub fn new(config: GameConfig, physics: P, display: D) -> AnyResult<Self> {
        let (columns, rows) = (config.columns, config.rows);
        let mut session = Self::empty(config, physics, display)?;
        session.pump(vec![Command::GenerateMap { columns, rows }]);
        session.spawn_player();
        session.refresh_hud();
        info!("session started on a {columns}x{rows} map");
        Ok(session)
    }

    /// Builds the world from `config` and starts on a hand-authored layout.
    pub fn with_layout(
        config: GameConfig,
        layout: MapLayout,
        physics: P,
        display: D,
    ) -> AnyResult<Self> {
        let (columns, rows) = (layout.columns(), layout.rows());
        let mut session = Self::empty(config, physics, display)?;
        session.pump(vec![Command::LoadMap { layout }]);
        session.spawn_player();
        session.refresh_hud();
        info!("session started on a {columns}x{rows} layout");
        Ok(session)
    }

    fn empty(config: GameConfig, physics: P, display: D) -> AnyResult<Self> {
        let world = World::new(config).context("invalid game configuration")?;
        Ok(Self {
            world,
            detonation: Detonation::new(),
            controls: Controls::new(),
            hud: Hud::new(),
            physics,
            display,
            frame_events: Vec::new(),
            hud_changes: Vec::new(),
        })
    }

    fn spawn_player(&mut self) {
        let position = query::player_position(&self.world);
        self.physics.place_player(to_vec2(position));
    }

    /// Runs one frame: applies input, steps physics, advances fuses and
    /// refreshes the display.
    pub fn update(&mut self, dt: Duration, input: ControlsInput) -> AnyResult<()> {
        let mut commands = Vec::new();
        let velocity = self.controls.handle(
            &self.frame_events,
            input,
            query::player_cell(&self.world),
            &mut commands,
        );
        self.frame_events.clear();
        self.pump(commands);

        self.physics.set_player_velocity(velocity);
        self.physics.step(dt);
        let position = self.physics.player_position();
        ensure!(
            position.is_finite(),
            "physics reported a non-finite player position {position}"
        );

        self.pump(vec![
            Command::PlayerMoved {
                position: WorldPoint::new(position.x, position.y),
            },
            Command::Tick { dt },
        ]);
        self.refresh_hud();
        Ok(())
    }

    fn pump(&mut self, mut pending: Vec<Command>) {
        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.detonation.handle(&events, &mut pending);
            self.route(&events);
            self.frame_events.extend(events);
        }
    }

    fn route(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::WallCreated { cell, kind } => self.physics.create_static_body(*cell, *kind),
                Event::WallDestroyed { cell } | Event::WallRemoved { cell } => {
                    self.physics.destroy_body(*cell);
                }
                Event::BombPlaced { cell, .. } => self.physics.add_bomb_collider(*cell),
                Event::BombDetonated { cell, .. } | Event::BombDiscarded { cell, .. } => {
                    self.physics.remove_bomb_collider(*cell);
                }
                Event::PlayerRespawned { position } => {
                    self.physics.place_player(to_vec2(*position));
                }
                Event::BombPlacementRejected { cell, reason } => {
                    debug!("bomb at {cell:?} refused: {reason:?}");
                }
                _ => {}
            }
        }
    }

    fn refresh_hud(&mut self) {
        self.hud
            .handle(&query::status(&self.world), &mut self.hud_changes);
        for change in self.hud_changes.drain(..) {
            match change {
                HudChange::Counters(update) => self.display.show(update),
                HudChange::GameOverVisible(visible) => self.display.show_game_over(visible),
            }
        }
    }

    /// Read-only access to the world for render hooks.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events produced by the most recent frame, in the order they occurred.
    #[must_use]
    pub fn frame_events(&self) -> &[Event] {
        &self.frame_events
    }

    /// Physics collaborator driven by this session.
    #[must_use]
    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// Display collaborator driven by this session.
    #[must_use]
    pub fn display(&self) -> &D {
        &self.display
    }
}

fn to_vec2(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x, point.y)
}

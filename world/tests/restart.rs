use std::time::Duration;

use bomber_core::{
    CellCoord, CellKind, Command, Event, GameConfig, GameStatus, MapLayout, Phase, WorldPoint,
};
use bomber_world::{self as world, is_fixed_solid, query, World};

fn generated_world(config: GameConfig) -> World {
    let mut world = World::new(config.clone()).expect("valid config");
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::GenerateMap {
            columns: config.columns,
            rows: config.rows,
        },
        &mut events,
    );
    world
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn lose_every_life(world: &mut World) {
    let spawn = CellCoord::new(1, 1);
    for _ in 0..3 {
        let _ = run(
            world,
            Command::PlayerMoved {
                position: spawn.center(32.0),
            },
        );
        let _ = run(world, Command::PlaceBomb { cell: spawn });
        let events = run(
            world,
            Command::Tick {
                dt: Duration::from_millis(4_000),
            },
        );
        for event in events {
            if let Event::FuseExpired { bomb } = event {
                let _ = run(world, Command::DetonateBomb { bomb });
            }
        }
    }
}

#[test]
fn fresh_map_keeps_border_and_intersections_solid() {
    for seed in [1, 2, 3, 0xdead_beef] {
        let world = generated_world(GameConfig {
            seed,
            ..GameConfig::default()
        });
        let map = query::tile_map(&world);
        for row in 0..map.rows() {
            for column in 0..map.columns() {
                let cell = CellCoord::new(column, row);
                let on_border =
                    column == 0 || row == 0 || column == map.columns() - 1 || row == map.rows() - 1;
                let intersection = column % 2 == 0 && row % 2 == 0;
                if on_border || intersection {
                    assert_eq!(query::classify(&world, cell), Ok(CellKind::Solid));
                    assert!(is_fixed_solid(cell, map.columns(), map.rows()));
                }
            }
        }
    }
}

#[test]
fn restart_after_game_over_restores_initial_state() {
    let mut world = generated_world(GameConfig {
        power_up_probability: 0.0,
        ..GameConfig::default()
    });
    lose_every_life(&mut world);
    assert!(query::status(&world).is_game_over());
    let map_before = query::tile_map(&world).clone();

    let events = run(&mut world, Command::Restart);

    assert_eq!(
        query::status(&world),
        GameStatus {
            lives: 3,
            score: 0,
            max_bombs: 1,
            current_bombs: 0,
            phase: Phase::Playing,
        }
    );
    assert_ne!(
        query::tile_map(&world),
        &map_before,
        "restart draws a new map from the seeded stream"
    );
    assert_eq!(events.last(), Some(&Event::GameRestarted));
    assert!(events.contains(&Event::PlayerRespawned {
        position: WorldPoint::new(48.0, 48.0),
    }));
    assert_eq!(query::player_position(&world), WorldPoint::new(48.0, 48.0));
}

#[test]
fn restart_tears_down_every_wall_before_building_new_ones() {
    let mut world = generated_world(GameConfig::default());
    let walls_before = query::tile_map(&world).walls().count();

    let events = run(&mut world, Command::Restart);

    let removed = events
        .iter()
        .filter(|event| matches!(event, Event::WallRemoved { .. }))
        .count();
    let created = events
        .iter()
        .filter(|event| matches!(event, Event::WallCreated { .. }))
        .count();
    assert_eq!(removed, walls_before);
    assert_eq!(created, query::tile_map(&world).walls().count());
}

#[test]
fn stale_detonation_after_restart_is_ignored() {
    let mut world = generated_world(GameConfig::default());
    let _ = run(
        &mut world,
        Command::PlaceBomb {
            cell: CellCoord::new(1, 1),
        },
    );
    let expired: Vec<_> = run(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(4_000),
        },
    )
    .into_iter()
    .filter_map(|event| match event {
        Event::FuseExpired { bomb } => Some(bomb),
        _ => None,
    })
    .collect();
    assert_eq!(expired.len(), 1);

    let restart_events = run(&mut world, Command::Restart);
    assert!(restart_events.contains(&Event::BombDiscarded {
        bomb: expired[0],
        cell: CellCoord::new(1, 1),
    }));
    let map_after_restart = query::tile_map(&world).clone();

    let events = run(&mut world, Command::DetonateBomb { bomb: expired[0] });

    assert!(events.is_empty(), "stale bomb must not explode");
    assert_eq!(query::tile_map(&world), &map_after_restart);
    assert_eq!(query::status(&world).lives, 3);
}

#[test]
fn pending_fuses_are_cancelled_by_restart() {
    let mut world = generated_world(GameConfig::default());
    let _ = run(
        &mut world,
        Command::PlaceBomb {
            cell: CellCoord::new(1, 1),
        },
    );
    let _ = run(&mut world, Command::Restart);

    let events = run(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(10),
        },
    );

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::FuseExpired { .. })));
    assert!(query::bomb_view(&world).is_empty());
}

#[test]
fn bomb_ids_keep_increasing_across_restarts() {
    let mut world = generated_world(GameConfig::default());
    let cell = CellCoord::new(1, 1);
    let _ = run(&mut world, Command::PlaceBomb { cell });
    let before = query::bomb_at(&world, cell).expect("bomb placed");
    let _ = run(&mut world, Command::Restart);
    let _ = run(&mut world, Command::PlaceBomb { cell });
    let after = query::bomb_at(&world, cell).expect("bomb placed");

    assert!(after > before);
}

#[test]
fn power_up_is_collected_exactly_once() {
    let mut world = World::new(GameConfig {
        power_up_probability: 1.0,
        ..GameConfig::default()
    })
    .expect("valid config");
    let layout: MapLayout = "
        ######
        #..+.#
        ######
    "
    .parse()
    .expect("layout parses");
    let _ = run(&mut world, Command::LoadMap { layout });
    let _ = run(
        &mut world,
        Command::PlayerMoved {
            position: WorldPoint::new(10_000.0, 10_000.0),
        },
    );
    let _ = run(
        &mut world,
        Command::PlaceBomb {
            cell: CellCoord::new(2, 1),
        },
    );
    for event in run(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(4_000),
        },
    ) {
        if let Event::FuseExpired { bomb } = event {
            let _ = run(&mut world, Command::DetonateBomb { bomb });
        }
    }
    let power_up = CellCoord::new(3, 1);
    assert_eq!(query::power_ups(&world), vec![power_up]);

    let first = run(
        &mut world,
        Command::PlayerMoved {
            position: power_up.center(32.0),
        },
    );
    let second = run(
        &mut world,
        Command::PlayerMoved {
            position: WorldPoint::new(power_up.center(32.0).x + 4.0, 48.0),
        },
    );

    assert_eq!(
        first,
        vec![Event::PowerUpCollected {
            cell: power_up,
            max_bombs: 2,
        }]
    );
    assert!(second.is_empty());
    assert!(query::power_ups(&world).is_empty());
    assert_eq!(query::status(&world).max_bombs, 2);
}

#[test]
fn restart_resets_collected_bomb_limit_and_clears_power_ups() {
    let mut world = World::new(GameConfig {
        power_up_probability: 1.0,
        ..GameConfig::default()
    })
    .expect("valid config");
    let layout: MapLayout = "
        ######
        #+.+.#
        ######
    "
    .parse()
    .expect("layout parses");
    let _ = run(&mut world, Command::LoadMap { layout });
    let _ = run(
        &mut world,
        Command::PlayerMoved {
            position: WorldPoint::new(10_000.0, 10_000.0),
        },
    );
    let _ = run(
        &mut world,
        Command::PlaceBomb {
            cell: CellCoord::new(2, 1),
        },
    );
    for event in run(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(4_000),
        },
    ) {
        if let Event::FuseExpired { bomb } = event {
            let _ = run(&mut world, Command::DetonateBomb { bomb });
        }
    }
    let _ = run(
        &mut world,
        Command::PlayerMoved {
            position: CellCoord::new(3, 1).center(32.0),
        },
    );
    assert_eq!(query::status(&world).max_bombs, 2);

    assert_eq!(query::power_ups(&world), vec![CellCoord::new(1, 1)]);

    let events = run(&mut world, Command::Restart);

    assert!(events.contains(&Event::PowerUpRemoved {
        cell: CellCoord::new(1, 1),
    }));
    assert!(query::power_ups(&world).is_empty());
    assert_eq!(query::status(&world).max_bombs, 1);
    assert_eq!(query::tile_map(&world).columns(), 13);
}

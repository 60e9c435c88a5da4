use std::time::Duration;

use vortex_defence_core::{
    Command, Event, GridCoordinate, Path, PlayMode, ShipKind, Wave, WaveElement,
};
use vortex_defence_system_spawning::Spawning;
use vortex_defence_world::{self as world, query, World, DEFAULT_ORIGIN};

const FRAME: Duration = Duration::from_millis(100);

fn wave(delays_ms: &[u64]) -> Wave {
    Wave::new(
        delays_ms
            .iter()
            .map(|delay| WaveElement {
                ship: ShipKind::SmallScout,
                delay_before_creation: Duration::from_millis(*delay),
            })
            .collect(),
    )
}

fn step(world: &mut World, spawning: &mut Spawning) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: FRAME }, &mut events);
    let mut commands = Vec::new();
    spawning.handle(
        &events,
        query::play_mode(world),
        query::route(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn spawned(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::ShipSpawned { .. }))
        .count()
}

#[test]
fn wave_releases_ships_after_their_delays() {
    let mut world = World::new();
    let mut spawning = Spawning::new(wave(&[0, 300, 200]));

    let releases: Vec<usize> = (0..8)
        .map(|_| spawned(&step(&mut world, &mut spawning)))
        .collect();

    assert_eq!(releases, vec![1, 0, 0, 1, 0, 1, 0, 0]);
    assert!(spawning.is_finished());
    assert_eq!(query::ship_view(&world).iter().count(), 3);
    assert!(query::ship_view(&world)
        .iter()
        .all(|ship| ship.cell == DEFAULT_ORIGIN));
}

#[test]
fn builder_mode_resets_accumulator() {
    let mut spawning = Spawning::new(wave(&[1_000]));
    let route = Path::single(GridCoordinate::new(0, 0));
    let mut commands = Vec::new();

    spawning.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(500),
        }],
        PlayMode::Attack,
        Some(&route),
        &mut commands,
    );
    assert!(commands.is_empty(), "no spawn before the delay elapses");

    spawning.handle(&[], PlayMode::Builder, Some(&route), &mut commands);
    spawning.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(500),
        }],
        PlayMode::Attack,
        Some(&route),
        &mut commands,
    );
    assert!(commands.is_empty(), "builder mode restarts the countdown");

    spawning.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(500),
        }],
        PlayMode::Attack,
        Some(&route),
        &mut commands,
    );
    assert_eq!(
        commands,
        vec![Command::SpawnShip {
            kind: ShipKind::SmallScout,
            path: route,
        }]
    );
}

#[test]
fn pending_ship_waits_for_a_route() {
    let mut spawning = Spawning::new(wave(&[100]));
    let mut commands = Vec::new();

    spawning.handle(
        &[Event::TimeAdvanced { dt: FRAME }],
        PlayMode::Attack,
        None,
        &mut commands,
    );
    assert!(commands.is_empty());
    assert_eq!(spawning.remaining(), 1);

    let world = World::new();
    spawning.handle(
        &[Event::TimeAdvanced { dt: FRAME }],
        PlayMode::Attack,
        query::route(&world),
        &mut commands,
    );
    assert_eq!(commands.len(), 1);
    assert!(spawning.is_finished());
}

use std::time::Duration;

use vortex_defence_core::{
    Command, EntityId, Event, GridCoordinate, PhysicalPosition, PlayMode, ShipKind, ShipMotion,
    ShipState, TurretKind,
};
use vortex_defence_system_projectiles::Projectiles;
use vortex_defence_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(16);

fn armed_world() -> (World, EntityId) {
    let mut world = World::new();
    let cell = GridCoordinate::new(4, 2);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetPlayMode {
            mode: PlayMode::Builder,
        },
        &mut events,
    );
    world::apply(&mut world, Command::PlaceStructure { cell }, &mut events);
    world::apply(
        &mut world,
        Command::PlaceTurret {
            kind: TurretKind::DoubleGuns,
            cell,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SetPlayMode {
            mode: PlayMode::Attack,
        },
        &mut events,
    );
    let turret = events
        .iter()
        .find_map(|event| match event {
            Event::TurretPlaced { turret, .. } => Some(*turret),
            _ => None,
        })
        .expect("turret placed");
    (world, turret)
}

fn fire_upwards(world: &mut World, turret: EntityId) -> EntityId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::FireProjectile {
            turret,
            origin: PhysicalPosition::new(288.0, 136.0),
            angle: 0.0,
        },
        &mut events,
    );
    match events.as_slice() {
        [Event::ProjectileFired { projectile, .. }] => *projectile,
        other => panic!("unexpected fire events {other:?}"),
    }
}

fn tick(world: &mut World, system: &mut Projectiles) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: FRAME }, &mut events);
    let mut commands = Vec::new();
    system.handle(
        &events,
        &query::projectile_view(world),
        &query::ship_view(world),
        &query::layout(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn projectile_is_removed_in_the_tick_it_leaves_the_grid() {
    let (mut world, turret) = armed_world();
    let projectile = fire_upwards(&mut world, turret);
    let mut system = Projectiles::new();

    for step in 1..=17 {
        let events = tick(&mut world, &mut system);
        assert!(
            !events.contains(&Event::ProjectileRemoved { projectile }),
            "removed early on tick {step}"
        );
        let snapshot = query::projectile_view(&world)
            .get(projectile)
            .copied()
            .expect("still flying");
        assert!(!query::layout(&world).is_outside(snapshot.position));
    }

    let events = tick(&mut world, &mut system);
    assert!(events.contains(&Event::ProjectileRemoved { projectile }));
    assert!(query::projectile_view(&world).get(projectile).is_none());
}

#[test]
fn projectile_records_the_ship_in_its_way() {
    let (mut world, turret) = armed_world();
    let path = query::route(&world).cloned().expect("route");
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnShip {
            kind: ShipKind::SmallScout,
            path,
        },
        &mut events,
    );
    let ship = match events.as_slice() {
        [Event::ShipSpawned { ship, .. }] => *ship,
        other => panic!("unexpected spawn events {other:?}"),
    };
    let snapshot = query::ship_view(&world).get(ship).cloned().expect("ship");
    let cell = GridCoordinate::new(4, 0);
    let motion = ShipMotion {
        position: query::layout(&world).center_pixel(cell).expect("inside grid"),
        cell,
        path_index: 5,
        scale: 1.0,
        state: ShipState::FollowingPath,
        ..snapshot.motion()
    };
    world::apply(&mut world, Command::MoveShip { ship, motion }, &mut events);

    let projectile = fire_upwards(&mut world, turret);
    let mut system = Projectiles::new();
    let mut hit_on = None;
    for step in 1..=20 {
        if tick(&mut world, &mut system).contains(&Event::ProjectileHit { projectile, ship }) {
            hit_on = Some(step);
            break;
        }
    }
    assert_eq!(hit_on, Some(10));

    let struck = query::projectile_view(&world)
        .get(projectile)
        .copied()
        .expect("waiting for damage resolution");
    for _ in 0..3 {
        let _ = tick(&mut world, &mut system);
    }
    assert_eq!(
        query::projectile_view(&world).get(projectile).copied(),
        Some(struck)
    );
}

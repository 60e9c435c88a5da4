//! Fixed-timestep driver that wires the world and every system together.

use std::{fmt, time::Duration};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};
use vortex_defence_core::{Command, Event, GridCoordinate, PlayMode, ShipOutcome, TurretTarget};
use vortex_defence_system_builder::{BuildTool, Builder, BuilderInput, CellContents};
use vortex_defence_system_damage::Damage;
use vortex_defence_system_movement::Movement;
use vortex_defence_system_projectiles::Projectiles;
use vortex_defence_system_spawning::Spawning;
use vortex_defence_system_tower_combat::TowerCombat;
use vortex_defence_system_tower_targeting::TowerTargeting;
use vortex_defence_world::{self as world, query, World};

use crate::config::LevelConfig;

/// Counters collected while a level runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Ticks simulated so far.
    pub ticks: u32,
    /// Ships that entered the world.
    pub spawned: u32,
    /// Ships that reached the destination portal.
    pub escaped: u32,
    /// Ships destroyed by turret fire.
    pub destroyed: u32,
    /// Projectiles launched by turrets.
    pub shots_fired: u32,
    /// Projectiles that struck a ship.
    pub hits: u32,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks: {} ships spawned, {} escaped, {} destroyed ({} hits from {} shots)",
            self.ticks, self.spawned, self.escaped, self.destroyed, self.hits, self.shots_fired
        )
    }
}

/// Headless simulation of a single level.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    movement: Movement,
    targeting: TowerTargeting,
    combat: TowerCombat,
    projectiles: Projectiles,
    damage: Damage,
    spawning: Spawning,
    targets: Vec<TurretTarget>,
    summary: Summary,
}

impl Simulation {
    /// Builds the level's world and prepares every system for the attack.
    pub fn from_level(level: &LevelConfig) -> Result<Self> {
        level.validate()?;
        let mut world = World::with_portals(level.layout(), level.origin, level.destination)
            .context("failed to create the level grid")?;
        let mut movement = Movement::default();
        let mut projectiles = Projectiles::new();

        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SetPlayMode {
                mode: PlayMode::Builder,
            },
            &mut events,
        );

        let mut builder = Builder::new();
        for cell in &level.structures {
            let produced = click(&mut world, &mut builder, &events, *cell);
            events.clear();
            match produced.iter().find_map(rejection) {
                Some(reason) => bail!("structure at {cell} was rejected: {reason}"),
                None if produced.is_empty() => bail!("cell {cell} cannot hold a structure"),
                None => {}
            }
        }

        for turret in &level.turrets {
            builder.select_tool(BuildTool::Turret(turret.kind));
            let produced = click(&mut world, &mut builder, &events, turret.cell);
            events.clear();
            if !produced
                .iter()
                .any(|event| matches!(event, Event::TurretPlaced { .. }))
            {
                bail!("turret at {} needs a bare structure", turret.cell);
            }
        }

        world::apply(
            &mut world,
            Command::SetPlayMode {
                mode: PlayMode::Attack,
            },
            &mut events,
        );
        let mut ignored = Vec::new();
        movement.handle(
            &events,
            &query::ship_view(&world),
            &query::layout(&world),
            &mut ignored,
        );
        projectiles.handle(
            &events,
            &query::projectile_view(&world),
            &query::ship_view(&world),
            &query::layout(&world),
            &mut ignored,
        );

        let route = query::route(&world).map_or(0, |route| route.len());
        info!(
            structures = level.structures.len(),
            turrets = level.turrets.len(),
            ships = level.wave.len(),
            route,
            "level ready"
        );

        Ok(Self {
            world,
            movement,
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            projectiles,
            damage: Damage::new(),
            spawning: Spawning::new(level.wave()),
            targets: Vec::new(),
            summary: Summary::default(),
        })
    }

    /// Banner printed when the simulation boots.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Read-only access to the simulated world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Counters collected so far.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Whether the wave is exhausted and nothing is left in flight.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.spawning.is_finished()
            && query::ship_view(&self.world).iter().next().is_none()
            && query::projectile_view(&self.world).iter().next().is_none()
    }

    /// Advances the simulation by one tick and returns every event it produced.
    pub fn step(&mut self, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        let mut commands = Vec::new();
        self.movement.handle(
            &events,
            &query::ship_view(&self.world),
            &query::layout(&self.world),
            &mut commands,
        );
        self.flush(&mut commands, &mut events);

        let play_mode = query::play_mode(&self.world);
        let turrets = query::turret_view(&self.world);
        self.targeting.handle(
            play_mode,
            &turrets,
            &query::ship_view(&self.world),
            &mut self.targets,
        );
        self.combat
            .handle(play_mode, &turrets, &self.targets, &mut commands);
        self.flush(&mut commands, &mut events);

        self.projectiles.handle(
            &events,
            &query::projectile_view(&self.world),
            &query::ship_view(&self.world),
            &query::layout(&self.world),
            &mut commands,
        );
        self.flush(&mut commands, &mut events);

        self.damage
            .handle(&query::projectile_view(&self.world), &mut commands);
        self.flush(&mut commands, &mut events);

        self.spawning.handle(
            &events,
            play_mode,
            query::route(&self.world),
            &mut commands,
        );
        self.flush(&mut commands, &mut events);

        self.summary.ticks += 1;
        self.record(&events);
        debug!(tick = self.summary.ticks, events = events.len(), "tick processed");
        events
    }

    /// Steps until the level settles or `max_ticks` have elapsed.
    pub fn run(&mut self, max_ticks: u32, dt: Duration) -> Summary {
        while self.summary.ticks < max_ticks && !self.is_settled() {
            let _ = self.step(dt);
        }
        info!(
            ticks = self.summary.ticks,
            settled = self.is_settled(),
            escaped = self.summary.escaped,
            destroyed = self.summary.destroyed,
            "simulation finished"
        );
        self.summary
    }

    fn flush(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }

    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::ShipSpawned { .. } => self.summary.spawned += 1,
                Event::ShipRemoved {
                    outcome: ShipOutcome::Escaped,
                    ..
                } => self.summary.escaped += 1,
                Event::ShipRemoved {
                    outcome: ShipOutcome::Destroyed,
                    ..
                } => self.summary.destroyed += 1,
                Event::ProjectileFired { .. } => self.summary.shots_fired += 1,
                Event::ProjectileHit { .. } => self.summary.hits += 1,
                _ => {}
            }
        }
    }
}

fn click(
    world: &mut World,
    builder: &mut Builder,
    events: &[Event],
    cell: GridCoordinate,
) -> Vec<Event> {
    let mut commands = Vec::new();
    {
        let view: &World = world;
        builder.handle(
            events,
            BuilderInput::new(true, false, Some(cell)),
            |cell| cell_contents(view, cell),
            &mut commands,
        );
    }

    let mut produced = Vec::new();
    for command in commands {
        world::apply(world, command, &mut produced);
    }
    produced
}

/// Classifies a cell for the builder from the world's occupancy query.
#[must_use]
pub fn cell_contents(world: &World, cell: GridCoordinate) -> CellContents {
    query::occupants_at(world, cell).map_or(CellContents::Other, |occupants| {
        CellContents::classify(
            occupants
                .iter()
                .map(|occupant| (occupant.id(), occupant.kind())),
        )
    })
}

fn rejection(event: &Event) -> Option<String> {
    match event {
        Event::StructurePlacementRejected { reason, .. } => Some(format!("{reason:?}")),
        _ => None,
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Vortex Defence.
//!
//! The world owns the occupancy grid, the entity store, and the current route
//! between the two portals. It is the only writer: systems observe it through
//! [`query`] and request changes by handing [`Command`] values to [`apply`].

mod entities;
mod navigation;
mod occupancy;

use std::time::Duration;

use tracing::{debug, info, warn};
use vortex_defence_core::{
    angles, Command, EntityId, EntityKind, Event, GridCoordinate, GridError, GridLayout, Path,
    PhysicalPosition, PlacementError, PlayMode, RemovalError, ShipKind, ShipMotion, ShipOutcome,
    ShipState, SpawnError, TurretKind, WELCOME_BANNER,
};

use entities::{EntityStore, Payload, Projectile, Ship, Turret};
pub use navigation::find_shortest_path;
pub use occupancy::{MultiOccupancyGrid, Occupant, SingleOccupancyGrid};

/// Cell of the portal ships emerge from in the default level.
pub const DEFAULT_ORIGIN: GridCoordinate = GridCoordinate::new(0, 0);
/// Cell of the portal ships escape through in the default level.
pub const DEFAULT_DESTINATION: GridCoordinate = GridCoordinate::new(11, 6);

/// Radians each portal turns per tick; the origin spins counter-clockwise.
const PORTAL_ROTATION_SPEED: f32 = 0.01;

/// Represents the authoritative Vortex Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    layout: GridLayout,
    play_mode: PlayMode,
    origin: GridCoordinate,
    destination: GridCoordinate,
    entities: EntityStore,
    occupancy: MultiOccupancyGrid,
    route: Option<Path>,
}

impl World {
    /// Creates the default level: a 12×7 grid of 64 px tiles with portals in
    /// opposite corners.
    #[must_use]
    pub fn new() -> Self {
        Self::populated(GridLayout::default(), DEFAULT_ORIGIN, DEFAULT_DESTINATION)
    }

    /// Creates a world for the provided layout with portals on the given cells.
    ///
    /// Fails when either portal lies outside the layout.
    pub fn with_portals(
        layout: GridLayout,
        origin: GridCoordinate,
        destination: GridCoordinate,
    ) -> Result<Self, GridError> {
        let dimensions = layout.dimensions();
        for cell in [origin, destination] {
            if !dimensions.contains(cell) {
                return Err(dimensions.out_of_range(cell));
            }
        }
        Ok(Self::populated(layout, origin, destination))
    }

    /// Builds the world around portals that lie inside `layout`.
    fn populated(layout: GridLayout, origin: GridCoordinate, destination: GridCoordinate) -> Self {
        let mut world = Self {
            banner: WELCOME_BANNER,
            layout,
            play_mode: PlayMode::Attack,
            origin,
            destination,
            entities: EntityStore::default(),
            occupancy: MultiOccupancyGrid::new(layout.dimensions()),
            route: None,
        };
        for cell in [origin, destination] {
            let id = world.entities.insert(
                EntityKind::Vortex,
                layout.cell_center(cell),
                0.0,
                Payload::Tile { cell },
            );
            let _ = world
                .occupancy
                .add_occupant(Occupant::new(id, EntityKind::Vortex), cell);
        }
        world.route = world.compute_route();
        world
    }

    fn compute_route(&self) -> Option<Path> {
        match find_shortest_path(
            &self.occupancy.planning_grid(),
            self.origin,
            self.destination,
        ) {
            Ok(route) => route,
            Err(error) => {
                warn!(%error, "route search rejected portal coordinates");
                None
            }
        }
    }

    /// Recomputes the route and reports it when it differs from the previous one.
    fn refresh_route(&mut self, out_events: &mut Vec<Event>) {
        let route = self.compute_route();
        if route == self.route {
            return;
        }

        self.route = route;
        if let Some(route) = &self.route {
            debug!(moves = route.moves(), "route recomputed");
            out_events.push(Event::RouteChanged {
                route: route.clone(),
            });
        }
    }

    fn spin_portals(&mut self) {
        let origin = self.origin;
        for entity in self.entities.iter_mut() {
            if let Payload::Tile { cell } = entity.payload {
                if !entity.kind.is_portal() {
                    continue;
                }
                let step = if cell == origin {
                    -PORTAL_ROTATION_SPEED
                } else {
                    PORTAL_ROTATION_SPEED
                };
                entity.angle = angles::normalize(entity.angle + step);
            }
        }
    }

    fn accumulate_cooldowns(&mut self, dt: Duration) {
        for entity in self.entities.iter_mut() {
            if let Payload::Turret(turret) = &mut entity.payload {
                turret.since_last_shot = turret.since_last_shot.saturating_add(dt);
            }
        }
    }

    fn place_structure(&mut self, cell: GridCoordinate) -> Result<EntityId, PlacementError> {
        if self.play_mode != PlayMode::Builder {
            return Err(PlacementError::InvalidMode);
        }
        let position = self
            .layout
            .center_pixel(cell)
            .map_err(|_| PlacementError::OutOfBounds)?;
        if !self
            .occupancy
            .is_empty_at(cell)
            .map_err(|_| PlacementError::OutOfBounds)?
        {
            return Err(PlacementError::Occupied);
        }
        if self.is_on_live_ship_path(cell) {
            return Err(PlacementError::OnShipPath);
        }

        let id = self.entities.insert(
            EntityKind::Structure,
            position,
            0.0,
            Payload::Tile { cell },
        );
        self.occupancy
            .add_occupant(Occupant::new(id, EntityKind::Structure), cell)
            .map_err(|_| PlacementError::OutOfBounds)?;

        if self.compute_route().is_none() {
            let _ = self.occupancy.remove_occupant(id, cell);
            let _ = self.entities.remove(id);
            return Err(PlacementError::PathBlocked);
        }

        Ok(id)
    }

    /// Reports whether a ship still travelling its route has `cell` ahead.
    fn is_on_live_ship_path(&self, cell: GridCoordinate) -> bool {
        self.entities.iter().any(|entity| match &entity.payload {
            Payload::Ship(ship) => {
                matches!(ship.state, ShipState::Spawning | ShipState::FollowingPath)
                    && ship
                        .path
                        .coordinates()
                        .get(ship.path_index..)
                        .is_some_and(|ahead| ahead.contains(&cell))
            }
            _ => false,
        })
    }

    fn remove_structure(&mut self, cell: GridCoordinate) -> Result<Option<EntityId>, RemovalError> {
        if self.play_mode != PlayMode::Builder {
            return Err(RemovalError::InvalidMode);
        }
        let occupants = self
            .occupancy
            .occupants_at(cell)
            .map_err(|_| RemovalError::OutOfBounds)?;
        let Some(structure) = occupants
            .iter()
            .find(|occupant| occupant.kind() == EntityKind::Structure)
            .map(Occupant::id)
        else {
            return Ok(None);
        };
        if occupants
            .iter()
            .any(|occupant| matches!(occupant.kind(), EntityKind::Turret(_)))
        {
            return Err(RemovalError::SupportsTurret);
        }

        self.occupancy
            .remove_occupant(structure, cell)
            .map_err(|_| RemovalError::OutOfBounds)?;
        let _ = self.entities.remove(structure);
        Ok(Some(structure))
    }

    fn place_turret(&mut self, kind: TurretKind, cell: GridCoordinate) -> Result<EntityId, PlacementError> {
        if self.play_mode != PlayMode::Builder {
            return Err(PlacementError::InvalidMode);
        }
        let position = self
            .layout
            .center_pixel(cell)
            .map_err(|_| PlacementError::OutOfBounds)?;
        let occupants = self
            .occupancy
            .occupants_at(cell)
            .map_err(|_| PlacementError::OutOfBounds)?;
        match occupants {
            [single] if single.kind().supports_turret() => {}
            _ => return Err(PlacementError::RequiresStructure),
        }

        let entity_kind = EntityKind::Turret(kind);
        let id = self
            .entities
            .insert(entity_kind, position, 0.0, Payload::Turret(Turret::new(kind, cell)));
        self.occupancy
            .add_occupant(Occupant::new(id, entity_kind), cell)
            .map_err(|_| PlacementError::OutOfBounds)?;
        Ok(id)
    }

    fn remove_turret(&mut self, turret: EntityId) -> Result<Option<GridCoordinate>, RemovalError> {
        if self.play_mode != PlayMode::Builder {
            return Err(RemovalError::InvalidMode);
        }
        let cell = match self.entities.get(turret).map(|entity| &entity.payload) {
            Some(Payload::Turret(state)) => state.cell,
            _ => return Ok(None),
        };

        let _ = self.entities.remove(turret);
        self.occupancy
            .remove_occupant(turret, cell)
            .map_err(|_| RemovalError::OutOfBounds)?;
        Ok(Some(cell))
    }

    fn spawn_ship(&mut self, kind: ShipKind, path: Path) -> Result<EntityId, SpawnError> {
        if self.play_mode != PlayMode::Attack {
            return Err(SpawnError::InvalidMode);
        }
        let dimensions = self.layout.dimensions();
        if path
            .coordinates()
            .iter()
            .any(|cell| !dimensions.contains(*cell))
        {
            return Err(SpawnError::OutOfBounds);
        }

        let start = path.start();
        let position = self
            .layout
            .center_pixel(start)
            .map_err(|_| SpawnError::OutOfBounds)?;
        let angle = match path.get(1).map(|next| self.layout.center_pixel(next)) {
            Some(Ok(next)) => angles::angle_to_reach(position, next),
            _ => 0.0,
        };

        let entity_kind = EntityKind::Ship(kind);
        let id = self.entities.insert(
            entity_kind,
            position,
            angle,
            Payload::Ship(Ship::new(kind, path)),
        );
        self.occupancy
            .add_occupant(Occupant::new(id, entity_kind), start)
            .map_err(|_| SpawnError::OutOfBounds)?;
        Ok(id)
    }

    fn move_ship(&mut self, id: EntityId, motion: ShipMotion, out_events: &mut Vec<Event>) {
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        let Payload::Ship(ship) = &mut entity.payload else {
            return;
        };
        if ship.state.is_finished() && !motion.state.is_finished() {
            debug!(ship = id.get(), state = ?motion.state, "ignoring motion for a destroyed ship");
            return;
        }

        let previous_state = ship.state;
        let previous_cell = ship.cell;
        entity.position = motion.position;
        entity.angle = angles::normalize(motion.angle);
        ship.scale = motion.scale;
        ship.path_index = motion.path_index;
        ship.state = motion.state;
        let destroyed = ship.hit_points == 0;

        if motion.cell != previous_cell {
            match self.occupancy.move_occupant(id, previous_cell, motion.cell) {
                Ok(()) => {
                    ship.cell = motion.cell;
                    out_events.push(Event::ShipAdvanced {
                        ship: id,
                        from: previous_cell,
                        to: motion.cell,
                    });
                }
                Err(error) => warn!(ship = id.get(), %error, "ship motion left the grid"),
            }
        }

        if motion.state != previous_state {
            out_events.push(Event::ShipStateChanged {
                ship: id,
                state: motion.state,
            });
        }

        if motion.state == ShipState::Removed {
            let cell = ship.cell;
            let _ = self.occupancy.remove_occupant(id, cell);
            let _ = self.entities.remove(id);
            let outcome = if destroyed {
                ShipOutcome::Destroyed
            } else {
                ShipOutcome::Escaped
            };
            info!(ship = id.get(), ?outcome, "ship removed");
            out_events.push(Event::ShipRemoved { ship: id, outcome });
        }
    }

    fn damage_ship(&mut self, id: EntityId, points: u32, out_events: &mut Vec<Event>) {
        let Some(Payload::Ship(ship)) = self.entities.get_mut(id).map(|entity| &mut entity.payload)
        else {
            return;
        };
        if ship.state.is_finished() {
            return;
        }

        let destroyed = ship.receive_damage(points);
        out_events.push(Event::ShipDamaged {
            ship: id,
            remaining: ship.hit_points,
        });
        if destroyed {
            debug!(ship = id.get(), "ship destroyed");
            out_events.push(Event::ShipStateChanged {
                ship: id,
                state: ShipState::Exploding,
            });
        }
    }

    fn fire_projectile(
        &mut self,
        turret: EntityId,
        origin: PhysicalPosition,
        angle: f32,
    ) -> Option<EntityId> {
        let entity = self.entities.get_mut(turret)?;
        let Payload::Turret(state) = &mut entity.payload else {
            return None;
        };
        state.since_last_shot = Duration::ZERO;
        let kind = state.kind.projectile();

        Some(self.entities.insert(
            EntityKind::Projectile(kind),
            origin,
            angle,
            Payload::Projectile(Projectile::new(kind, angle)),
        ))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.spin_portals();
            world.accumulate_cooldowns(dt);
        }
        Command::SetPlayMode { mode } => {
            if world.play_mode != mode {
                world.play_mode = mode;
                info!(?mode, "play mode changed");
                out_events.push(Event::PlayModeChanged { mode });
            }
        }
        Command::PlaceStructure { cell } => match world.place_structure(cell) {
            Ok(structure) => {
                debug!(%cell, structure = structure.get(), "structure placed");
                out_events.push(Event::StructurePlaced { structure, cell });
                world.refresh_route(out_events);
            }
            Err(reason) => {
                debug!(%cell, ?reason, "structure placement rejected");
                out_events.push(Event::StructurePlacementRejected { cell, reason });
            }
        },
        Command::RemoveStructure { cell } => match world.remove_structure(cell) {
            Ok(Some(structure)) => {
                debug!(%cell, structure = structure.get(), "structure removed");
                out_events.push(Event::StructureRemoved { structure, cell });
                world.refresh_route(out_events);
            }
            Ok(None) => {}
            Err(reason) => {
                debug!(%cell, ?reason, "structure removal rejected");
                out_events.push(Event::StructureRemovalRejected { cell, reason });
            }
        },
        Command::PlaceTurret { kind, cell } => match world.place_turret(kind, cell) {
            Ok(turret) => {
                debug!(%cell, turret = turret.get(), ?kind, "turret placed");
                out_events.push(Event::TurretPlaced { turret, kind, cell });
            }
            Err(reason) => {
                debug!(%cell, ?reason, "turret placement rejected");
                out_events.push(Event::TurretPlacementRejected { kind, cell, reason });
            }
        },
        Command::RemoveTurret { turret } => match world.remove_turret(turret) {
            Ok(Some(cell)) => {
                debug!(%cell, turret = turret.get(), "turret removed");
                out_events.push(Event::TurretRemoved { turret, cell });
            }
            Ok(None) => {}
            Err(reason) => {
                debug!(turret = turret.get(), ?reason, "turret removal rejected");
                out_events.push(Event::TurretRemovalRejected { turret, reason });
            }
        },
        Command::SpawnShip { kind, path } => {
            let cell = path.start();
            match world.spawn_ship(kind, path) {
                Ok(ship) => {
                    info!(ship = ship.get(), ?kind, %cell, "ship spawned");
                    out_events.push(Event::ShipSpawned { ship, kind, cell });
                }
                Err(reason) => {
                    warn!(?kind, ?reason, "ship spawn rejected");
                    out_events.push(Event::ShipSpawnRejected { kind, reason });
                }
            }
        }
        Command::MoveShip { ship, motion } => world.move_ship(ship, motion, out_events),
        Command::DamageShip { ship, points } => world.damage_ship(ship, points, out_events),
        Command::AimTurret { turret, angle } => {
            if let Some(entity) = world.entities.get_mut(turret) {
                if matches!(entity.payload, Payload::Turret(_)) {
                    entity.angle = angles::normalize(angle);
                }
            }
        }
        Command::FireProjectile {
            turret,
            origin,
            angle,
        } => {
            if let Some(projectile) = world.fire_projectile(turret, origin, angle) {
                out_events.push(Event::ProjectileFired {
                    projectile,
                    turret,
                    position: origin,
                });
            }
        }
        Command::MoveProjectile {
            projectile,
            position,
            hit,
        } => {
            let Some(entity) = world.entities.get_mut(projectile) else {
                return;
            };
            let Payload::Projectile(state) = &mut entity.payload else {
                return;
            };
            entity.position = position;
            state.hit = hit;
            if let Some(ship) = hit {
                out_events.push(Event::ProjectileHit { projectile, ship });
            }
        }
        Command::RemoveProjectile { projectile } => {
            let is_projectile = world
                .entities
                .get(projectile)
                .is_some_and(|entity| matches!(entity.payload, Payload::Projectile(_)));
            if is_projectile {
                let _ = world.entities.remove(projectile);
                out_events.push(Event::ProjectileRemoved { projectile });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use vortex_defence_core::{
        EntitySnapshot, GridCoordinate, GridError, GridLayout, Path, PlayMode, ProjectileSnapshot,
        ProjectileView, ShipSnapshot, ShipView, TurretSnapshot, TurretView,
    };

    use super::{Payload, World};
    use crate::occupancy::{Occupant, SingleOccupancyGrid};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Pixel layout of the grid.
    #[must_use]
    pub fn layout(world: &World) -> GridLayout {
        world.layout
    }

    /// Currently active play mode.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.play_mode
    }

    /// Cell of the portal ships emerge from.
    #[must_use]
    pub fn origin(world: &World) -> GridCoordinate {
        world.origin
    }

    /// Cell of the portal ships escape through.
    #[must_use]
    pub fn destination(world: &World) -> GridCoordinate {
        world.destination
    }

    /// Current shortest route between the portals.
    #[must_use]
    pub fn route(world: &World) -> Option<&Path> {
        world.route.as_ref()
    }

    /// Occupants of a cell in insertion order.
    pub fn occupants_at(world: &World, cell: GridCoordinate) -> Result<&[Occupant], GridError> {
        world.occupancy.occupants_at(cell)
    }

    /// Reports whether a cell holds no occupant.
    pub fn is_empty_at(world: &World, cell: GridCoordinate) -> Result<bool, GridError> {
        world.occupancy.is_empty_at(cell)
    }

    /// Single-occupant projection of the grid used for route planning.
    #[must_use]
    pub fn planning_grid(world: &World) -> SingleOccupancyGrid {
        world.occupancy.planning_grid()
    }

    /// Shortest route between two cells around the current structures.
    pub fn find_shortest_path(
        world: &World,
        start: GridCoordinate,
        end: GridCoordinate,
    ) -> Result<Option<Path>, GridError> {
        crate::find_shortest_path(&world.occupancy.planning_grid(), start, end)
    }

    /// Captures a read-only view of every ship.
    #[must_use]
    pub fn ship_view(world: &World) -> ShipView {
        let snapshots = world
            .entities
            .iter()
            .filter_map(|entity| match &entity.payload {
                Payload::Ship(ship) => Some(ShipSnapshot {
                    id: entity.id,
                    kind: ship.kind,
                    position: entity.position,
                    angle: entity.angle,
                    scale: ship.scale,
                    speed: ship.speed,
                    path: ship.path.clone(),
                    path_index: ship.path_index,
                    cell: ship.cell,
                    hit_points: ship.hit_points,
                    state: ship.state,
                }),
                _ => None,
            })
            .collect();
        ShipView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of every turret.
    #[must_use]
    pub fn turret_view(world: &World) -> TurretView {
        let snapshots = world
            .entities
            .iter()
            .filter_map(|entity| match &entity.payload {
                Payload::Turret(turret) => Some(TurretSnapshot {
                    id: entity.id,
                    kind: turret.kind,
                    cell: turret.cell,
                    position: entity.position,
                    angle: entity.angle,
                    sight_range: turret.sight_range,
                    rotation_speed: turret.rotation_speed,
                    firing_delay: turret.firing_delay,
                    since_last_shot: turret.since_last_shot,
                }),
                _ => None,
            })
            .collect();
        TurretView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of every projectile in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        let snapshots = world
            .entities
            .iter()
            .filter_map(|entity| match &entity.payload {
                Payload::Projectile(projectile) => Some(ProjectileSnapshot {
                    id: entity.id,
                    kind: projectile.kind,
                    position: entity.position,
                    direction: projectile.direction,
                    speed: projectile.speed,
                    damage: projectile.damage,
                    hit: projectile.hit,
                }),
                _ => None,
            })
            .collect();
        ProjectileView::from_snapshots(snapshots)
    }

    /// Presentation data for every live entity, ordered by draw order and then
    /// identifier.
    #[must_use]
    pub fn entities(world: &World) -> Vec<EntitySnapshot> {
        let mut snapshots: Vec<EntitySnapshot> = world
            .entities
            .iter()
            .map(|entity| EntitySnapshot {
                id: entity.id,
                kind: entity.kind,
                position: entity.position,
                angle: entity.angle,
                scale: entity.scale(),
                draw_order: entity.draw_order,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| (snapshot.draw_order, snapshot.id));
        snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_world() -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetPlayMode {
                mode: PlayMode::Builder,
            },
            &mut events,
        );
        world
    }

    #[test]
    fn default_world_routes_between_corner_portals() {
        let world = World::new();
        let route = query::route(&world).expect("empty grid is connected");
        assert_eq!(route.start(), DEFAULT_ORIGIN);
        assert_eq!(route.end(), DEFAULT_DESTINATION);
        assert_eq!(route.len(), 18);
    }

    #[test]
    fn portals_spin_in_opposite_directions() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_millis(16)
            }]
        );
        let portals: Vec<_> = query::entities(&world)
            .into_iter()
            .filter(|entity| entity.kind == EntityKind::Vortex)
            .collect();
        assert_eq!(portals.len(), 2);
        assert!((portals[0].angle - (angles::TWO_PI - 0.01)).abs() < 1e-5);
        assert!((portals[1].angle - 0.01).abs() < 1e-5);
    }

    #[test]
    fn portals_outside_the_layout_are_rejected() {
        let layout = GridLayout::default();
        let outside = GridCoordinate::new(12, 0);
        assert!(matches!(
            World::with_portals(layout, DEFAULT_ORIGIN, outside),
            Err(GridError::OutOfRange { coordinate, .. }) if coordinate == outside
        ));

        let world = World::with_portals(layout, GridCoordinate::new(0, 3), GridCoordinate::new(11, 3))
            .expect("portals inside layout");
        assert_eq!(query::route(&world).map(Path::moves), Some(11));
    }

    #[test]
    fn structures_require_builder_mode() {
        let mut world = World::new();
        let mut events = Vec::new();
        let cell = GridCoordinate::new(3, 3);
        apply(&mut world, Command::PlaceStructure { cell }, &mut events);
        assert_eq!(
            events,
            vec![Event::StructurePlacementRejected {
                cell,
                reason: PlacementError::InvalidMode,
            }]
        );
    }

    #[test]
    fn portal_cells_reject_structures() {
        let mut world = builder_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceStructure {
                cell: DEFAULT_ORIGIN,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::StructurePlacementRejected {
                cell: DEFAULT_ORIGIN,
                reason: PlacementError::Occupied,
            }]
        );
    }

    #[test]
    fn spawn_is_rejected_in_builder_mode() {
        let mut world = builder_world();
        let mut events = Vec::new();
        let path = query::route(&world).cloned().expect("route");
        apply(
            &mut world,
            Command::SpawnShip {
                kind: ShipKind::SmallScout,
                path,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::ShipSpawnRejected {
                kind: ShipKind::SmallScout,
                reason: SpawnError::InvalidMode,
            }]
        );
        assert_eq!(query::ship_view(&world).iter().count(), 0);
    }

    #[test]
    fn entities_are_sorted_by_draw_order() {
        let mut world = builder_world();
        let mut events = Vec::new();
        let cell = GridCoordinate::new(4, 4);
        apply(&mut world, Command::PlaceStructure { cell }, &mut events);
        apply(
            &mut world,
            Command::PlaceTurret {
                kind: TurretKind::DoubleGuns,
                cell,
            },
            &mut events,
        );

        let orders: Vec<u8> = query::entities(&world)
            .iter()
            .map(|entity| entity.draw_order)
            .collect();
        assert_eq!(orders, vec![0, 0, 0, 10]);
    }
}

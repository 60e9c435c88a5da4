#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Vortex Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query immutable views, and respond
//! exclusively with new command batches.

pub mod angles;
mod geometry;
mod kinds;
mod path;

use std::time::Duration;

pub use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use geometry::{
    GridCoordinate, GridDimensions, GridLayout, PhysicalPosition, PhysicalRect, DEFAULT_COLUMNS,
    DEFAULT_ROWS, DEFAULT_TILE_SIZE,
};
pub use kinds::{EntityKind, Footprint, ProjectileKind, ShipKind, TurretKind};
pub use path::{Path, PathError};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Vortex Defence.";

/// Describes the active gameplay mode for the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayMode {
    /// Ships spawn and travel while turrets defend the route.
    Attack,
    /// Construction mode in which structures and turrets may be edited.
    Builder,
}

/// Failures raised by grid operations.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridError {
    /// The coordinate lies outside the grid.
    #[error("coordinate {coordinate} lies outside the {columns}x{rows} grid")]
    OutOfRange {
        /// Coordinate that was rejected.
        coordinate: GridCoordinate,
        /// Number of columns in the grid.
        columns: u32,
        /// Number of rows in the grid.
        rows: u32,
    },
    /// The single-occupant cell already holds an occupant.
    #[error("cell {coordinate} is already occupied")]
    CellOccupied {
        /// Coordinate of the occupied cell.
        coordinate: GridCoordinate,
    },
}

/// Identifier allocated by the world to every entity it stores.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Lifecycle stage of a ship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipState {
    /// Growing out of the origin portal.
    Spawning,
    /// Travelling along the assigned path.
    FollowingPath,
    /// Shrinking into the destination portal.
    Despawning,
    /// Spinning and shrinking after losing all hit points.
    Exploding,
    /// Terminal state; the world discards the ship.
    Removed,
}

impl ShipState {
    /// Whether the ship has been destroyed or is about to be discarded.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Exploding | Self::Removed)
    }
}

/// How a ship left the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShipOutcome {
    /// The ship despawned into the destination portal.
    Escaped,
    /// The ship was destroyed by turret fire.
    Destroyed,
}

/// Kinematic state of a ship computed by the motion engine for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShipMotion {
    /// Pixel position of the ship's centre.
    pub position: PhysicalPosition,
    /// Facing angle in `[0, 2π)`.
    pub angle: f32,
    /// Draw scale used by the grow and shrink animations.
    pub scale: f32,
    /// Index of the next waypoint on the ship's path.
    pub path_index: usize,
    /// Logical cell the ship occupies in the grid.
    pub cell: GridCoordinate,
    /// Lifecycle stage after the tick.
    pub state: ShipState,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the world transition to the provided play mode.
    SetPlayMode {
        /// Mode the world should activate.
        mode: PlayMode,
    },
    /// Requests a structure on the provided cell.
    PlaceStructure {
        /// Cell that should receive the structure.
        cell: GridCoordinate,
    },
    /// Requests removal of the structure on the provided cell.
    RemoveStructure {
        /// Cell holding the structure.
        cell: GridCoordinate,
    },
    /// Requests a turret mounted on the structure at the provided cell.
    PlaceTurret {
        /// Type of turret to construct.
        kind: TurretKind,
        /// Cell holding the supporting structure.
        cell: GridCoordinate,
    },
    /// Requests removal of an existing turret.
    RemoveTurret {
        /// Identifier of the turret targeted for removal.
        turret: EntityId,
    },
    /// Requests a new ship at the start of the provided path.
    SpawnShip {
        /// Type of ship to create.
        kind: ShipKind,
        /// Route the ship will follow.
        path: Path,
    },
    /// Replaces a ship's kinematic state with the motion engine's result.
    MoveShip {
        /// Identifier of the ship being moved.
        ship: EntityId,
        /// New kinematic state.
        motion: ShipMotion,
    },
    /// Applies damage to a ship.
    DamageShip {
        /// Identifier of the struck ship.
        ship: EntityId,
        /// Hit points to remove.
        points: u32,
    },
    /// Rotates a turret to the provided facing angle.
    AimTurret {
        /// Identifier of the turret.
        turret: EntityId,
        /// New facing angle in radians.
        angle: f32,
    },
    /// Launches a projectile from a turret and resets its cooldown.
    FireProjectile {
        /// Identifier of the firing turret.
        turret: EntityId,
        /// Pixel position the projectile starts from.
        origin: PhysicalPosition,
        /// Direction of flight as a facing angle.
        angle: f32,
    },
    /// Moves a projectile and records the ship it struck, if any.
    MoveProjectile {
        /// Identifier of the projectile.
        projectile: EntityId,
        /// New pixel position.
        position: PhysicalPosition,
        /// Ship struck at the new position.
        hit: Option<EntityId>,
    },
    /// Discards a projectile.
    RemoveProjectile {
        /// Identifier of the projectile.
        projectile: EntityId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the simulation entered a new play mode.
    PlayModeChanged {
        /// Mode that became active after processing commands.
        mode: PlayMode,
    },
    /// Confirms that a structure was placed.
    StructurePlaced {
        /// Identifier assigned to the structure.
        structure: EntityId,
        /// Cell holding the structure.
        cell: GridCoordinate,
    },
    /// Confirms that a structure was removed.
    StructureRemoved {
        /// Identifier of the removed structure.
        structure: EntityId,
        /// Cell that held the structure.
        cell: GridCoordinate,
    },
    /// Reports that a structure placement was rejected.
    StructurePlacementRejected {
        /// Cell provided in the request.
        cell: GridCoordinate,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a structure removal was rejected.
    StructureRemovalRejected {
        /// Cell provided in the request.
        cell: GridCoordinate,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// Confirms that a turret was mounted.
    TurretPlaced {
        /// Identifier assigned to the turret.
        turret: EntityId,
        /// Type of turret that was placed.
        kind: TurretKind,
        /// Cell holding the turret.
        cell: GridCoordinate,
    },
    /// Confirms that a turret was removed.
    TurretRemoved {
        /// Identifier of the removed turret.
        turret: EntityId,
        /// Cell that held the turret.
        cell: GridCoordinate,
    },
    /// Reports that a turret placement was rejected.
    TurretPlacementRejected {
        /// Type of turret requested.
        kind: TurretKind,
        /// Cell provided in the request.
        cell: GridCoordinate,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a turret removal was rejected.
    TurretRemovalRejected {
        /// Identifier provided in the request.
        turret: EntityId,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// Announces the route ships now follow between the portals.
    RouteChanged {
        /// Shortest route from the origin to the destination portal.
        route: Path,
    },
    /// Confirms that a ship entered the world.
    ShipSpawned {
        /// Identifier assigned to the ship.
        ship: EntityId,
        /// Type of ship created.
        kind: ShipKind,
        /// Cell the ship starts on.
        cell: GridCoordinate,
    },
    /// Reports that a spawn request was rejected.
    ShipSpawnRejected {
        /// Type of ship requested.
        kind: ShipKind,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Confirms that a ship's logical cell changed.
    ShipAdvanced {
        /// Identifier of the ship.
        ship: EntityId,
        /// Cell the ship occupied before the move.
        from: GridCoordinate,
        /// Cell the ship occupies afterwards.
        to: GridCoordinate,
    },
    /// Announces a ship lifecycle transition.
    ShipStateChanged {
        /// Identifier of the ship.
        ship: EntityId,
        /// Stage the ship entered.
        state: ShipState,
    },
    /// Confirms that a ship lost hit points.
    ShipDamaged {
        /// Identifier of the ship.
        ship: EntityId,
        /// Hit points left after the damage.
        remaining: u32,
    },
    /// Confirms that a ship left the simulation.
    ShipRemoved {
        /// Identifier of the ship.
        ship: EntityId,
        /// Whether the ship escaped or was destroyed.
        outcome: ShipOutcome,
    },
    /// Confirms that a turret launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: EntityId,
        /// Identifier of the firing turret.
        turret: EntityId,
        /// Starting position of the projectile.
        position: PhysicalPosition,
    },
    /// Reports that a projectile struck a ship.
    ProjectileHit {
        /// Identifier of the projectile.
        projectile: EntityId,
        /// Identifier of the struck ship.
        ship: EntityId,
    },
    /// Confirms that a projectile was discarded.
    ProjectileRemoved {
        /// Identifier of the projectile.
        projectile: EntityId,
    },
}

/// Reasons a structure or turret placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The simulation is not in builder mode, so placement is disabled.
    InvalidMode,
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell already holds an occupant.
    Occupied,
    /// The structure would leave no route between the portals.
    PathBlocked,
    /// Turrets require a cell holding exactly one structure.
    RequiresStructure,
    /// A ship still has to travel through the requested cell.
    OnShipPath,
}

/// Reasons a structure or turret removal request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalError {
    /// The simulation is not in builder mode, so removal is disabled.
    InvalidMode,
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The structure carries a turret that must be removed first.
    SupportsTurret,
}

/// Reasons a spawn request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnError {
    /// Ships only spawn while the simulation is in attack mode.
    InvalidMode,
    /// The path leaves the grid.
    OutOfBounds,
}

/// Immutable representation of a single ship used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct ShipSnapshot {
    /// Unique identifier assigned to the ship.
    pub id: EntityId,
    /// Type of the ship.
    pub kind: ShipKind,
    /// Pixel position of the ship's centre.
    pub position: PhysicalPosition,
    /// Facing angle in `[0, 2π)`.
    pub angle: f32,
    /// Draw scale.
    pub scale: f32,
    /// Pixels travelled per tick.
    pub speed: f32,
    /// Route assigned at spawn.
    pub path: Path,
    /// Index of the next waypoint.
    pub path_index: usize,
    /// Logical cell held in the occupancy grid.
    pub cell: GridCoordinate,
    /// Remaining hit points.
    pub hit_points: u32,
    /// Lifecycle stage.
    pub state: ShipState,
}

impl ShipSnapshot {
    /// Kinematic portion of the snapshot.
    #[must_use]
    pub fn motion(&self) -> ShipMotion {
        ShipMotion {
            position: self.position,
            angle: self.angle,
            scale: self.scale,
            path_index: self.path_index,
            cell: self.cell,
            state: self.state,
        }
    }
}

/// Read-only snapshot describing all ships.
#[derive(Clone, Debug, Default)]
pub struct ShipView {
    snapshots: Vec<ShipSnapshot>,
}

impl ShipView {
    /// Creates a new ship view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ShipSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured ship snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &ShipSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a ship by identifier.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&ShipSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ShipSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single turret used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretSnapshot {
    /// Identifier allocated to the turret.
    pub id: EntityId,
    /// Type of the turret.
    pub kind: TurretKind,
    /// Cell holding the turret.
    pub cell: GridCoordinate,
    /// Pixel position of the turret's centre.
    pub position: PhysicalPosition,
    /// Facing angle in `[0, 2π)`.
    pub angle: f32,
    /// Maximum targeting distance in pixels.
    pub sight_range: f32,
    /// Maximum rotation per tick in radians.
    pub rotation_speed: f32,
    /// Minimum time between two shots.
    pub firing_delay: Duration,
    /// Time accumulated since the previous shot.
    pub since_last_shot: Duration,
}

/// Read-only snapshot describing all turrets.
#[derive(Clone, Debug, Default)]
pub struct TurretView {
    snapshots: Vec<TurretSnapshot>,
}

impl TurretView {
    /// Creates a new turret view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TurretSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured turret snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &TurretSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a turret by identifier.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&TurretSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TurretSnapshot> {
        self.snapshots
    }
}

/// Target assignment computed for a turret during the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretTarget {
    /// Turret that acquired the target.
    pub turret: EntityId,
    /// Ship selected as the target.
    pub ship: EntityId,
    /// Facing angle that points the turret at the ship.
    pub bearing: f32,
    /// Distance between the turret and the ship in pixels.
    pub distance: f32,
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: EntityId,
    /// Type of the projectile.
    pub kind: ProjectileKind,
    /// Pixel position of the projectile's centre.
    pub position: PhysicalPosition,
    /// Unit vector of travel.
    pub direction: Vec2,
    /// Pixels travelled per tick.
    pub speed: f32,
    /// Hit points removed from a struck ship.
    pub damage: u32,
    /// Ship struck during the latest tick.
    pub hit: Option<EntityId>,
}

/// Read-only snapshot describing all projectiles.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a projectile by identifier.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&ProjectileSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Presentation data for one live entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Identifier of the entity.
    pub id: EntityId,
    /// Kind tag used to select a texture.
    pub kind: EntityKind,
    /// Pixel position of the entity's centre.
    pub position: PhysicalPosition,
    /// Facing angle in `[0, 2π)`.
    pub angle: f32,
    /// Draw scale.
    pub scale: f32,
    /// Rendering priority; larger values draw on top.
    pub draw_order: u8,
}

/// One ship scheduled by a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveElement {
    /// Type of ship to spawn.
    pub ship: ShipKind,
    /// Time to wait after the previous element before spawning.
    pub delay_before_creation: Duration,
}

/// Ordered list of ships released during attack mode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wave {
    elements: Vec<WaveElement>,
}

impl Wave {
    /// Creates a wave from elements released in order.
    #[must_use]
    pub fn new(elements: Vec<WaveElement>) -> Self {
        Self { elements }
    }

    /// Elements of the wave in release order.
    #[must_use]
    pub fn elements(&self) -> &[WaveElement] {
        &self.elements
    }

    /// Number of ships in the wave.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the wave schedules no ships.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

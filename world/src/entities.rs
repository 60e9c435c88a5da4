//! Flat entity records and the store that allocates their identifiers.

use std::{collections::BTreeMap, time::Duration};

use vortex_defence_core::{
    angles, EntityId, EntityKind, GridCoordinate, Path, PhysicalPosition, ProjectileKind,
    ShipKind, ShipState, TurretKind, Vec2,
};

/// Scale ships start from while emerging from the origin portal.
pub(crate) const SPAWN_SCALE: f32 = 0.05;

#[derive(Clone, Debug)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) kind: EntityKind,
    pub(crate) position: PhysicalPosition,
    pub(crate) angle: f32,
    pub(crate) draw_order: u8,
    pub(crate) payload: Payload,
}

impl Entity {
    pub(crate) fn scale(&self) -> f32 {
        match &self.payload {
            Payload::Ship(ship) => ship.scale,
            _ => 1.0,
        }
    }
}

/// Kind-specific state carried by an entity.
#[derive(Clone, Debug)]
pub(crate) enum Payload {
    Tile { cell: GridCoordinate },
    Ship(Ship),
    Turret(Turret),
    Projectile(Projectile),
}

#[derive(Clone, Debug)]
pub(crate) struct Ship {
    pub(crate) kind: ShipKind,
    pub(crate) path: Path,
    pub(crate) path_index: usize,
    pub(crate) cell: GridCoordinate,
    pub(crate) speed: f32,
    pub(crate) hit_points: u32,
    pub(crate) state: ShipState,
    pub(crate) scale: f32,
}

impl Ship {
    pub(crate) fn new(kind: ShipKind, path: Path) -> Self {
        let cell = path.start();
        Self {
            kind,
            path_index: usize::from(path.moves() > 0),
            path,
            cell,
            speed: kind.speed(),
            hit_points: kind.hit_points(),
            state: ShipState::Spawning,
            scale: SPAWN_SCALE,
        }
    }

    /// Removes hit points, saturating at zero. Returns `true` when the damage
    /// destroyed the ship.
    pub(crate) fn receive_damage(&mut self, points: u32) -> bool {
        if self.state.is_finished() {
            return false;
        }

        self.hit_points = self.hit_points.saturating_sub(points);
        if self.hit_points == 0 {
            self.state = ShipState::Exploding;
            return true;
        }
        false
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Turret {
    pub(crate) kind: TurretKind,
    pub(crate) cell: GridCoordinate,
    pub(crate) sight_range: f32,
    pub(crate) rotation_speed: f32,
    pub(crate) firing_delay: Duration,
    pub(crate) since_last_shot: Duration,
}

impl Turret {
    pub(crate) fn new(kind: TurretKind, cell: GridCoordinate) -> Self {
        Self {
            kind,
            cell,
            sight_range: kind.sight_range(),
            rotation_speed: kind.rotation_speed(),
            firing_delay: kind.firing_delay(),
            since_last_shot: Duration::ZERO,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) kind: ProjectileKind,
    pub(crate) direction: Vec2,
    pub(crate) speed: f32,
    pub(crate) damage: u32,
    pub(crate) hit: Option<EntityId>,
}

impl Projectile {
    pub(crate) fn new(kind: ProjectileKind, angle: f32) -> Self {
        Self {
            kind,
            direction: angles::direction(angle),
            speed: kind.speed(),
            damage: kind.damage(),
            hit: None,
        }
    }
}

/// Ordered entity storage; iteration follows ascending identifiers.
#[derive(Debug, Default)]
pub(crate) struct EntityStore {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u32,
}

impl EntityStore {
    pub(crate) fn insert(
        &mut self,
        kind: EntityKind,
        position: PhysicalPosition,
        angle: f32,
        payload: Payload,
    ) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let _ = self.entities.insert(
            id,
            Entity {
                id,
                kind,
                position,
                angle: angles::normalize(angle),
                draw_order: kind.draw_order(),
                payload,
            },
        );
        id
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }
}

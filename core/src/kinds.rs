//! Entity kind tags and the per-kind parameters and capabilities derived from them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Width and height of an entity's collision rectangle in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    width: f32,
    height: f32,
}

impl Footprint {
    /// Creates a footprint from its pixel dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

/// Types of ships that travel along the route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipKind {
    /// Light, fast scout.
    SmallScout,
}

impl ShipKind {
    /// Distance travelled per tick in pixels.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::SmallScout => 10.0,
        }
    }

    /// Hit points the ship spawns with.
    #[must_use]
    pub const fn hit_points(self) -> u32 {
        match self {
            Self::SmallScout => 60,
        }
    }

    /// Collision rectangle of the ship.
    #[must_use]
    pub const fn footprint(self) -> Footprint {
        match self {
            Self::SmallScout => Footprint::new(60.0, 50.0),
        }
    }
}

/// Types of turrets that can be mounted on structures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurretKind {
    /// Twin-barrelled turret firing light shells.
    DoubleGuns,
}

impl TurretKind {
    /// Maximum targeting distance in pixels.
    #[must_use]
    pub const fn sight_range(self) -> f32 {
        match self {
            Self::DoubleGuns => 256.0,
        }
    }

    /// Maximum rotation per tick in radians.
    #[must_use]
    pub const fn rotation_speed(self) -> f32 {
        match self {
            Self::DoubleGuns => 0.01,
        }
    }

    /// Minimum time between two shots.
    #[must_use]
    pub const fn firing_delay(self) -> Duration {
        match self {
            Self::DoubleGuns => Duration::from_millis(600),
        }
    }

    /// Projectile launched when the turret fires.
    #[must_use]
    pub const fn projectile(self) -> ProjectileKind {
        match self {
            Self::DoubleGuns => ProjectileKind::DoubleGunsFire,
        }
    }

    /// Collision rectangle of the turret.
    #[must_use]
    pub const fn footprint(self) -> Footprint {
        match self {
            Self::DoubleGuns => Footprint::new(64.0, 64.0),
        }
    }
}

/// Types of projectiles fired by turrets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Shell fired by [`TurretKind::DoubleGuns`].
    DoubleGunsFire,
}

impl ProjectileKind {
    /// Distance travelled per tick in pixels.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::DoubleGunsFire => 8.0,
        }
    }

    /// Hit points removed from a struck ship.
    #[must_use]
    pub const fn damage(self) -> u32 {
        match self {
            Self::DoubleGunsFire => 20,
        }
    }

    /// Collision rectangle of the projectile.
    #[must_use]
    pub const fn footprint(self) -> Footprint {
        match self {
            Self::DoubleGunsFire => Footprint::new(16.0, 6.0),
        }
    }
}

/// Explicit tag describing what an entity is.
///
/// Occupancy and collision rules are decided by the capability queries below
/// rather than by inspecting payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Portal where ships appear or vanish.
    Vortex,
    /// Player-built obstacle that reroutes ships.
    Structure,
    /// Turret mounted on a structure.
    Turret(TurretKind),
    /// Ship travelling along the route.
    Ship(ShipKind),
    /// Projectile in flight.
    Projectile(ProjectileKind),
}

impl EntityKind {
    /// Whether the kind prevents ships from routing through its cell.
    #[must_use]
    pub const fn blocks_path(self) -> bool {
        matches!(self, Self::Structure)
    }

    /// Whether the kind marks a spawn or despawn cell.
    #[must_use]
    pub const fn is_portal(self) -> bool {
        matches!(self, Self::Vortex)
    }

    /// Whether a turret may be mounted on top of the kind.
    #[must_use]
    pub const fn supports_turret(self) -> bool {
        matches!(self, Self::Structure)
    }

    /// Whether turrets may select the kind as a target.
    #[must_use]
    pub const fn is_targetable(self) -> bool {
        matches!(self, Self::Ship(_))
    }

    /// Whether projectiles collide with the kind.
    #[must_use]
    pub const fn is_collidable(self) -> bool {
        matches!(self, Self::Ship(_))
    }

    /// Rendering priority; larger values draw on top.
    #[must_use]
    pub const fn draw_order(self) -> u8 {
        match self {
            Self::Vortex | Self::Structure => 0,
            Self::Turret(_) => 10,
            Self::Ship(_) => 20,
            Self::Projectile(_) => 21,
        }
    }

    /// Collision rectangle of the kind; static tiles fill their cell.
    #[must_use]
    pub const fn footprint(self, tile_size: f32) -> Footprint {
        match self {
            Self::Vortex | Self::Structure => Footprint::new(tile_size, tile_size),
            Self::Turret(kind) => kind.footprint(),
            Self::Ship(kind) => kind.footprint(),
            Self::Projectile(kind) => kind.footprint(),
        }
    }
}

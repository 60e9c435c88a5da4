#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile engine that advances shots and records the ships they strike.
//!
//! Collisions use a two-step test. A cheap broad phase keeps ships whose
//! centre lies within one tile of the projectile on both axes, then the
//! narrow phase intersects the axis-aligned footprints of both entities.
//! Hits are reported as data on [`Command::MoveProjectile`]; applying damage
//! is left to a separate system.

use vortex_defence_core::{
    Command, EntityId, EntityKind, Event, GridLayout, PhysicalPosition, PhysicalRect, PlayMode,
    ProjectileSnapshot, ProjectileView, ShipSnapshot, ShipView,
};

/// Pure system that reacts to time advancing by moving every projectile.
#[derive(Debug)]
pub struct Projectiles {
    play_mode: PlayMode,
}

impl Projectiles {
    /// Creates a projectile engine that starts in attack mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            play_mode: PlayMode::Attack,
        }
    }

    /// Consumes world events and snapshots to emit projectile commands.
    ///
    /// Projectiles that already hold a hit are left for damage resolution.
    /// Those that leave the grid are removed in the tick they cross its edge.
    pub fn handle(
        &mut self,
        events: &[Event],
        projectiles: &ProjectileView,
        ships: &ShipView,
        layout: &GridLayout,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::PlayModeChanged { mode } = event {
                self.play_mode = *mode;
            }
        }

        if self.play_mode == PlayMode::Builder {
            return;
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for projectile in projectiles.iter() {
            if projectile.hit.is_some() {
                continue;
            }

            let position = projectile
                .position
                .offset_by(projectile.direction * projectile.speed);

            if layout.is_outside(position) {
                out.push(Command::RemoveProjectile {
                    projectile: projectile.id,
                });
                continue;
            }

            out.push(Command::MoveProjectile {
                projectile: projectile.id,
                position,
                hit: first_collision(projectile, position, ships, layout),
            });
        }
    }
}

impl Default for Projectiles {
    fn default() -> Self {
        Self::new()
    }
}

/// Finds the lowest-id ship whose footprint overlaps the projectile at `position`.
#[must_use]
pub fn first_collision(
    projectile: &ProjectileSnapshot,
    position: PhysicalPosition,
    ships: &ShipView,
    layout: &GridLayout,
) -> Option<EntityId> {
    let tile_size = layout.tile_size();
    let footprint = EntityKind::Projectile(projectile.kind).footprint(tile_size);
    let bounds = PhysicalRect::centered(position, footprint.width(), footprint.height());

    ships
        .iter()
        .filter(|ship| is_candidate(ship, position, tile_size))
        .find(|ship| {
            let footprint = EntityKind::Ship(ship.kind).footprint(tile_size);
            PhysicalRect::centered(ship.position, footprint.width(), footprint.height())
                .intersects(&bounds)
        })
        .map(|ship| ship.id)
}

fn is_candidate(ship: &ShipSnapshot, position: PhysicalPosition, tile_size: f32) -> bool {
    EntityKind::Ship(ship.kind).is_collidable()
        && !ship.state.is_finished()
        && (ship.position.x() - position.x()).abs() <= tile_size
        && (ship.position.y() - position.y()).abs() <= tile_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use vortex_defence_core::{
        GridCoordinate, Path, ProjectileKind, ShipKind, ShipState, Vec2,
    };

    fn projectile(id: u32, x: f32, y: f32, direction: Vec2) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: EntityId::new(id),
            kind: ProjectileKind::DoubleGunsFire,
            position: PhysicalPosition::new(x, y),
            direction,
            speed: 8.0,
            damage: 20,
            hit: None,
        }
    }

    fn ship(id: u32, x: f32, y: f32) -> ShipSnapshot {
        ShipSnapshot {
            id: EntityId::new(id),
            kind: ShipKind::SmallScout,
            position: PhysicalPosition::new(x, y),
            angle: 0.0,
            scale: 1.0,
            speed: 10.0,
            path: Path::single(GridCoordinate::new(0, 0)),
            path_index: 0,
            cell: GridCoordinate::new(0, 0),
            hit_points: 60,
            state: ShipState::FollowingPath,
        }
    }

    fn tick() -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        }]
    }

    fn run(projectiles: Vec<ProjectileSnapshot>, ships: Vec<ShipSnapshot>) -> Vec<Command> {
        let mut system = Projectiles::new();
        let mut out = Vec::new();
        system.handle(
            &tick(),
            &ProjectileView::from_snapshots(projectiles),
            &ShipView::from_snapshots(ships),
            &GridLayout::default(),
            &mut out,
        );
        out
    }

    #[test]
    fn projectile_advances_along_its_direction() {
        let out = run(vec![projectile(1, 100.0, 100.0, Vec2::new(1.0, 0.0))], Vec::new());
        assert_eq!(
            out,
            vec![Command::MoveProjectile {
                projectile: EntityId::new(1),
                position: PhysicalPosition::new(108.0, 100.0),
                hit: None,
            }]
        );
    }

    #[test]
    fn leaving_the_grid_removes_the_projectile_immediately() {
        let out = run(vec![projectile(1, 4.0, 100.0, Vec2::new(-1.0, 0.0))], Vec::new());
        assert_eq!(
            out,
            vec![Command::RemoveProjectile {
                projectile: EntityId::new(1),
            }]
        );
    }

    #[test]
    fn overlapping_footprints_record_lowest_id_hit() {
        let out = run(
            vec![projectile(1, 100.0, 100.0, Vec2::new(1.0, 0.0))],
            vec![ship(7, 130.0, 100.0), ship(3, 120.0, 110.0)],
        );
        assert_eq!(
            out,
            vec![Command::MoveProjectile {
                projectile: EntityId::new(1),
                position: PhysicalPosition::new(108.0, 100.0),
                hit: Some(EntityId::new(3)),
            }]
        );
    }

    #[test]
    fn nearby_ship_without_overlap_is_missed() {
        let out = run(
            vec![projectile(1, 100.0, 100.0, Vec2::new(1.0, 0.0))],
            vec![ship(2, 108.0, 140.0)],
        );
        assert!(matches!(
            out.as_slice(),
            [Command::MoveProjectile { hit: None, .. }]
        ));
    }

    #[test]
    fn exploding_ships_are_not_struck() {
        let mut wreck = ship(2, 108.0, 100.0);
        wreck.state = ShipState::Exploding;
        let out = run(vec![projectile(1, 100.0, 100.0, Vec2::new(1.0, 0.0))], vec![wreck]);
        assert!(matches!(
            out.as_slice(),
            [Command::MoveProjectile { hit: None, .. }]
        ));
    }

    #[test]
    fn projectiles_with_pending_hits_are_left_alone() {
        let mut struck = projectile(1, 100.0, 100.0, Vec2::new(1.0, 0.0));
        struck.hit = Some(EntityId::new(4));
        assert!(run(vec![struck], vec![ship(4, 100.0, 100.0)]).is_empty());
    }

    #[test]
    fn builder_mode_freezes_projectiles() {
        let mut system = Projectiles::new();
        let mut out = Vec::new();
        let mut events = vec![Event::PlayModeChanged {
            mode: PlayMode::Builder,
        }];
        events.extend(tick());
        system.handle(
            &events,
            &ProjectileView::from_snapshots(vec![projectile(1, 100.0, 100.0, Vec2::X)]),
            &ShipView::default(),
            &GridLayout::default(),
            &mut out,
        );
        assert!(out.is_empty());
    }
}

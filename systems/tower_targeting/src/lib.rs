#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic turret targets from world snapshots.

use vortex_defence_core::{
    angles, EntityId, EntityKind, PhysicalPosition, PlayMode, ShipState, ShipView, TurretTarget,
    TurretView,
};

/// Turret targeting system that reuses a scratch buffer between ticks.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    candidates: Vec<Candidate>,
}

impl TowerTargeting {
    /// Creates a new targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes turret targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments. Each turret picks the ship furthest along its path among
    /// those inside its sight range.
    pub fn handle(
        &mut self,
        play_mode: PlayMode,
        turrets: &TurretView,
        ships: &ShipView,
        out: &mut Vec<TurretTarget>,
    ) {
        out.clear();

        if play_mode != PlayMode::Attack {
            return;
        }

        self.prepare_candidates(ships);
        if self.candidates.is_empty() {
            return;
        }

        for turret in turrets.iter() {
            let mut best: Option<(Candidate, f32)> = None;

            for candidate in &self.candidates {
                let distance = turret.position.distance_to(candidate.position);
                if distance > turret.sight_range {
                    continue;
                }

                // Candidates are sorted by id, so only a strictly greater
                // progress replaces the current choice.
                let replaces = match &best {
                    Some((existing, _)) => candidate.path_index > existing.path_index,
                    None => true,
                };
                if replaces {
                    best = Some((*candidate, distance));
                }
            }

            if let Some((candidate, distance)) = best {
                out.push(TurretTarget {
                    turret: turret.id,
                    ship: candidate.id,
                    bearing: angles::angle_to_reach(turret.position, candidate.position),
                    distance,
                });
            }
        }
    }

    fn prepare_candidates(&mut self, ships: &ShipView) {
        self.candidates.clear();

        for ship in ships.iter() {
            if ship.state != ShipState::FollowingPath
                || !EntityKind::Ship(ship.kind).is_targetable()
            {
                continue;
            }

            self.candidates.push(Candidate {
                id: ship.id,
                position: ship.position,
                path_index: ship.path_index,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: EntityId,
    position: PhysicalPosition,
    path_index: usize,
}

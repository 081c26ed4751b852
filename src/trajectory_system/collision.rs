//! Removal of satellites that hit the ground or come too close to each other.
//!
//! Resolution runs in two phases. The mark phase works on a snapshot of the
//! live positions and only flips satellites to `Dead`; the compact phase then
//! moves every dead satellite out of the list in one pass. Indices never shift
//! while pairs are still being examined.

use crate::config::PhysicsConfig;
use crate::control::planet::CelestialBody;
use crate::control::satellite::{RemovalCause, Satellite};
use crate::utils::vector3d::Vector3D;

#[derive(Debug, Clone)]
pub struct CollisionResolver {
    pub proximity_threshold_sq: f64,
}

impl CollisionResolver {
    pub fn new(proximity_threshold_sq: f64) -> Self {
        CollisionResolver {
            proximity_threshold_sq,
        }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        CollisionResolver::new(config.proximity_threshold_sq)
    }

    /// Indices of live satellites strictly inside the body.
    pub fn ground_impacts(&self, satellites: &[Satellite], body: &CelestialBody) -> Vec<usize> {
        satellites
            .iter()
            .enumerate()
            .filter(|(_, satellite)| {
                satellite.is_alive() && body.is_below_surface(&satellite.position)
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Every unordered pair `(i, j)`, `i < j`, of live satellites closer than
    /// the threshold.
    pub fn proximity_pairs(&self, satellites: &[Satellite]) -> Vec<(usize, usize)> {
        let live: Vec<(usize, Vector3D)> = satellites
            .iter()
            .enumerate()
            .filter(|(_, satellite)| satellite.is_alive())
            .map(|(index, satellite)| (index, satellite.position))
            .collect();

        let mut pairs = Vec::new();
        for (a, (i, position_i)) in live.iter().enumerate() {
            for (j, position_j) in &live[a + 1..] {
                if position_i.distance_squared(position_j) < self.proximity_threshold_sq {
                    pairs.push((*i, *j));
                }
            }
        }
        pairs
    }

    /// Marks ground impacts, then close pairs among the survivors. Returns the
    /// number of satellites newly marked dead.
    pub fn mark(&self, satellites: &mut [Satellite], body: &CelestialBody) -> usize {
        let mut marked = 0;

        for index in self.ground_impacts(satellites, body) {
            if satellites[index].kill(RemovalCause::GroundImpact) {
                marked += 1;
            }
        }

        for (i, j) in self.proximity_pairs(satellites) {
            let (id_i, id_j) = (satellites[i].id, satellites[j].id);
            if satellites[i].kill(RemovalCause::Collision { other: id_j }) {
                marked += 1;
            }
            if satellites[j].kill(RemovalCause::Collision { other: id_i }) {
                marked += 1;
            }
        }

        marked
    }

    /// Marks and compacts. The removed satellites are returned in their
    /// original order, each exactly once.
    pub fn resolve(&self, satellites: &mut Vec<Satellite>, body: &CelestialBody) -> Vec<Satellite> {
        if self.mark(satellites, body) == 0 {
            return Vec::new();
        }
        compact(satellites)
    }
}

/// Moves every dead satellite out of `satellites`, keeping the order of both halves.
pub fn compact(satellites: &mut Vec<Satellite>) -> Vec<Satellite> {
    let (live, dead): (Vec<Satellite>, Vec<Satellite>) = std::mem::take(satellites)
        .into_iter()
        .partition(Satellite::is_alive);
    *satellites = live;
    dead
}

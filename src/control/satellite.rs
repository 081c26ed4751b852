use serde::Serialize;
use tracing::warn;

use crate::control::planet::CelestialBody;
use crate::control::render::VisualHandle;
use crate::errors::SimulationError;
use crate::utils::vector3d::Vector3D;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SatelliteId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RemovalCause {
    GroundImpact,
    Collision { other: SatelliteId },
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SatelliteState {
    Active,
    Dead(RemovalCause),
}

/// Accelerations applied to a satellite during the most recent tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ForceSample {
    pub gravity: Vector3D,
    pub drag: Vector3D,
}

impl ForceSample {
    pub fn total(&self) -> Vector3D {
        self.gravity + self.drag
    }
}

#[derive(Debug)]
pub struct Satellite {
    pub id: SatelliteId,
    pub position: Vector3D,
    pub velocity: Vector3D,
    pub mass: f64,
    pub height: f64,
    pub forces: ForceSample,
    pub handle: Option<VisualHandle>,
    state: SatelliteState,
}

impl Satellite {
    /// Builds a satellite moving at `speed` along `direction`.
    ///
    /// `direction` does not need to be normalized. A zero direction is only
    /// accepted when `speed` is zero.
    pub fn new(
        id: SatelliteId,
        position: Vector3D,
        mass: f64,
        speed: f64,
        direction: Vector3D,
        planet: &CelestialBody,
    ) -> Result<Self, SimulationError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "satellite mass must be positive and finite, got {}",
                mass
            )));
        }
        if !position.is_finite() {
            return Err(SimulationError::InvalidConfiguration(format!(
                "satellite position must be finite, got {:?}",
                position
            )));
        }
        if !speed.is_finite() || !direction.is_finite() {
            return Err(SimulationError::InvalidConfiguration(format!(
                "initial velocity must be finite, got speed {} along {:?}",
                speed, direction
            )));
        }

        // A zero direction leaves the satellite at rest.
        if speed != 0.0 && direction.try_normalize().is_none() {
            warn!(
                "satellite {} has speed {} m/s but no direction, starting at rest",
                id.0, speed
            );
        }
        let velocity = direction.normalize() * speed;

        Ok(Satellite {
            id,
            position,
            velocity,
            mass,
            height: planet.altitude_of(&position),
            forces: ForceSample::default(),
            handle: None,
            state: SatelliteState::Active,
        })
    }

    pub fn state(&self) -> SatelliteState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == SatelliteState::Active
    }

    /// Moves the satellite to `Dead`. Returns `false` if it was already dead,
    /// in which case the original cause is kept.
    pub fn kill(&mut self, cause: RemovalCause) -> bool {
        if self.is_alive() {
            self.state = SatelliteState::Dead(cause);
            true
        } else {
            false
        }
    }

    pub fn refresh_height(&mut self, planet: &CelestialBody) {
        self.height = planet.altitude_of(&self.position);
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }
}

use crate::config::PhysicsConfig;
use crate::control::planet::CelestialBody;
use crate::control::satellite::{ForceSample, Satellite};
use crate::errors::SimulationError;
use crate::utils::vector3d::Vector3D;

#[derive(Debug, Clone)]
pub struct ForceModel {
    pub air_density: f64,
    pub drag_coefficient: f64,
    pub cross_section_area: f64,
    pub drag_ceiling_altitude: f64,
}

impl ForceModel {
    pub fn new(
        air_density: f64,
        drag_coefficient: f64,
        cross_section_area: f64,
        drag_ceiling_altitude: f64,
    ) -> Self {
        ForceModel {
            air_density,
            drag_coefficient,
            cross_section_area,
            drag_ceiling_altitude,
        }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        ForceModel::new(
            config.air_density,
            config.drag_coefficient,
            config.cross_section_area,
            config.drag_ceiling_altitude,
        )
    }

    /// Point-mass gravity toward `body`. Fails when the satellite sits on the
    /// body's center, where the direction is undefined.
    pub fn compute_gravity(
        &self,
        satellite: &Satellite,
        body: &CelestialBody,
    ) -> Result<Vector3D, SimulationError> {
        let r_vec = body.position - satellite.position;
        let r_squared = r_vec.magnitude_squared();
        let direction = match r_vec.try_normalize() {
            Some(direction) if r_squared > 0.0 => direction,
            _ => {
                return Err(SimulationError::DegenerateGeometry(format!(
                    "satellite {:?} at {:?} has no direction to {}",
                    satellite.id, satellite.position, body.name
                )))
            }
        };

        let acceleration = direction * (body.gm() / r_squared);

        if acceleration.is_finite() {
            Ok(acceleration)
        } else {
            Err(SimulationError::DegenerateGeometry(format!(
                "gravity on satellite {:?} is not finite",
                satellite.id
            )))
        }
    }

    /// Quadratic drag below the ceiling altitude, zero at or above it.
    pub fn compute_drag(&self, satellite: &Satellite, body: &CelestialBody) -> Vector3D {
        if body.altitude_of(&satellite.position) >= self.drag_ceiling_altitude {
            return Vector3D::ZERO;
        }

        let direction = match (-satellite.velocity).try_normalize() {
            Some(direction) => direction,
            None => return Vector3D::ZERO,
        };
        let drag_magnitude = self.calculate_drag_force(satellite.velocity.magnitude_squared());

        direction * drag_magnitude / satellite.mass
    }

    pub fn sample(
        &self,
        satellite: &Satellite,
        body: &CelestialBody,
    ) -> Result<ForceSample, SimulationError> {
        Ok(ForceSample {
            gravity: self.compute_gravity(satellite, body)?,
            drag: self.compute_drag(satellite, body),
        })
    }

    fn calculate_drag_force(&self, speed_squared: f64) -> f64 {
        0.5 * self.air_density * self.cross_section_area * speed_squared * self.drag_coefficient
    }
}

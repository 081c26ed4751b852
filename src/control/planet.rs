use std::f64::consts::TAU;

use crate::config::PhysicsConfig;
use crate::utils::vector3d::Vector3D;

#[derive(Clone, Debug)]
pub struct CelestialBody {
    pub name: String,
    pub position: Vector3D,
    pub radius: f64,
    pub mass: f64,
    pub gravitational_constant: f64,
    pub rotation_rate: f64,
    rotation_angle: f64,
}

impl CelestialBody {
    pub fn new(name: String, position: Vector3D, radius: f64, mass: f64) -> Self {
        CelestialBody {
            name,
            position,
            radius,
            mass,
            gravitational_constant: crate::constants::GRAVITATIONAL_CONSTANT,
            rotation_rate: 0.0,
            rotation_angle: 0.0,
        }
    }

    /// The central planet described by `config`, fixed at the origin.
    pub fn from_config(config: &PhysicsConfig) -> Self {
        CelestialBody {
            name: "Earth".to_string(),
            position: Vector3D::ZERO,
            radius: config.planet_radius,
            mass: config.planet_mass,
            gravitational_constant: config.gravitational_constant,
            rotation_rate: config.planet_rotation_rate,
            rotation_angle: 0.0,
        }
    }

    pub fn gm(&self) -> f64 {
        self.gravitational_constant * self.mass
    }

    pub fn surface_gravity(&self) -> f64 {
        self.gm() / self.radius.powi(2)
    }

    pub fn gravity_at_altitude(&self, altitude: f64) -> f64 {
        let distance = self.radius + altitude;
        self.gm() / distance.powi(2)
    }

    pub fn circular_velocity(&self, altitude: f64) -> f64 {
        let distance = self.radius + altitude;
        (self.gm() / distance).sqrt()
    }

    pub fn escape_velocity(&self, altitude: f64) -> f64 {
        let distance = self.radius + altitude;
        (2.0 * self.gm() / distance).sqrt()
    }

    pub fn altitude_of(&self, position: &Vector3D) -> f64 {
        (*position - self.position).magnitude() - self.radius
    }

    pub fn is_below_surface(&self, position: &Vector3D) -> bool {
        position.distance_squared(&self.position) < self.radius.powi(2)
    }

    /// Current spin angle about the y axis, in `[0, 2π)`.
    pub fn rotation_angle(&self) -> f64 {
        self.rotation_angle
    }

    pub fn rotate(&mut self, delta_time: f64) {
        if !delta_time.is_finite() || delta_time < 0.0 {
            return;
        }
        self.rotation_angle = (self.rotation_angle + self.rotation_rate * delta_time) % TAU;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn earth() -> CelestialBody {
        CelestialBody::from_config(&PhysicsConfig::default())
    }

    #[test]
    fn test_surface_gravity_close_to_standard() {
        assert_abs_diff_eq!(earth().surface_gravity(), 9.8, epsilon = 0.05);
    }

    #[test]
    fn test_gravity_follows_inverse_square() {
        let earth = earth();
        let ratio = earth.gravity_at_altitude(earth.radius) / earth.surface_gravity();
        assert_abs_diff_eq!(ratio, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_escape_velocity_is_sqrt2_circular() {
        let earth = earth();
        let altitude = 400_000.0;
        assert_abs_diff_eq!(
            earth.escape_velocity(altitude) / earth.circular_velocity(altitude),
            std::f64::consts::SQRT_2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_below_surface_detection() {
        let earth = earth();
        assert!(earth.is_below_surface(&Vector3D::new(earth.radius - 1.0, 0.0, 0.0)));
        assert!(!earth.is_below_surface(&Vector3D::new(earth.radius, 0.0, 0.0)));
        assert_abs_diff_eq!(
            earth.altitude_of(&Vector3D::new(0.0, earth.radius + 500.0, 0.0)),
            500.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_rotation_wraps_and_ignores_bad_delta() {
        let mut body = CelestialBody::new("Test".to_string(), Vector3D::ZERO, 1.0, 1.0);
        body.rotation_rate = 1.0;
        body.rotate(TAU + 0.5);
        assert_abs_diff_eq!(body.rotation_angle(), 0.5, epsilon = 1e-12);
        body.rotate(-3.0);
        body.rotate(f64::NAN);
        assert_abs_diff_eq!(body.rotation_angle(), 0.5, epsilon = 1e-12);
    }
}
